pub mod agent;
pub mod appointment;
pub mod property;
pub mod user;
