pub use super::agents::Entity as Agents;
pub use super::appointments::Entity as Appointments;
pub use super::properties::Entity as Properties;
pub use super::property_ratings::Entity as PropertyRatings;
pub use super::users::Entity as Users;
