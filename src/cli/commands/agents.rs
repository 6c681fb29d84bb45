//! List agents command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_agents(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let agents = store.list_agents().await?;

    if agents.is_empty() {
        println!("No agent profiles.");
        return Ok(());
    }

    println!("Agents ({} total)", agents.len());
    println!("{:-<70}", "");

    for agent in agents {
        println!("★ {} {} ({})", agent.rating, agent.name, agent.specialization);
        println!(
            "  ID: {} | Properties sold: {}",
            agent.id, agent.properties_sold
        );
    }

    Ok(())
}
