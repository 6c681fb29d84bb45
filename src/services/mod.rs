pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;

pub mod property_service;
pub mod property_service_impl;
pub use property_service::{PropertyError, PropertyService};
pub use property_service_impl::SeaOrmPropertyService;

pub mod appointment_service;
pub mod appointment_service_impl;
pub use appointment_service::{AppointmentError, AppointmentService};
pub use appointment_service_impl::SeaOrmAppointmentService;

pub mod agent_service;
pub mod agent_service_impl;
pub use agent_service::{AgentError, AgentService};
pub use agent_service_impl::SeaOrmAgentService;
