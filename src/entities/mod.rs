pub mod prelude;

pub mod agents;
pub mod appointments;
pub mod properties;
pub mod property_ratings;
pub mod users;
