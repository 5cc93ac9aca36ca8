use std::fs;

use anyhow::Result;
use common::config::Config;
use emqx::EmqxClient;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use types::catalog::Catalog;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let conf = Config::from_env()?;

    let raw = match fs::read_to_string(&conf.yaml_file_path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("the file {} could not be read: {e}", conf.yaml_file_path);
            return Ok(());
        }
    };
    let catalog: Catalog = match serde_yml::from_str(&raw) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("error parsing YAML file: {e}");
            return Ok(());
        }
    };

    let artifacts = translator::translate(&catalog);
    info!("provisioning {} action/rule pairs", artifacts.len());

    let client = EmqxClient::new(&conf);
    for artifact in &artifacts {
        // A failed entry is logged and the remaining entries still run.
        match client.sync(artifact).await {
            Ok(true) => {}
            Ok(false) => warn!("broker rejected {}", artifact.action_name),
            Err(e) => warn!("failed to sync {}: {e}", artifact.action_name),
        }
    }

    Ok(())
}
