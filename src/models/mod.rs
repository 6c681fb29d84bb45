pub mod agent;
pub mod appointment;
pub mod property;
pub mod user;

pub use agent::Agent;
pub use appointment::Appointment;
pub use property::Property;
pub use user::User;
