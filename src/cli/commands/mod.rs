mod agents;
mod init;
mod validate;

pub use agents::cmd_list_agents;
pub use init::cmd_init;
pub use validate::cmd_validate;
