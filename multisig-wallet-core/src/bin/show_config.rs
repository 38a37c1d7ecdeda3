use multisig_wallet_core::{init_logging, DeploymentConfig, NAME, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = DeploymentConfig::from_env()?;

    if std::env::args().any(|arg| arg == "--json") {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{} {} Deployment Configuration:\n", NAME, VERSION);
    println!("  Deployment Token: {}", config.deployment_token);
    println!("  Required Confirmations: {}", config.required_confirmation_count);
    println!("  Balance Poll Interval: {:?}", config.balance_poll_interval);
    Ok(())
}
