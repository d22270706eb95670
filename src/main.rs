use std::sync::Arc;

use certflow::{
    ca::OpensslRunner,
    observability::{init_logging, log_settings_info},
    pipeline,
    secrets::{KubeSecretStore, SecretStore},
    Result, Settings, APP_NAME, VERSION,
};
use clap::Parser;
use tracing::error;

#[derive(Parser)]
#[command(name = "certflow")]
#[command(about = "Provisions and rotates mTLS certificate material for cluster services")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// If set to true, issued certificates are published as cluster secrets
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    generate_k8s_secrets: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.to_string().contains("not found") {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    init_logging();

    let cli = Cli::parse();

    tracing::info!(app_name = APP_NAME, version = VERSION, "Starting certflow");

    let mut settings = Settings::from_env()?;
    settings.generate_k8s_secrets = cli.generate_k8s_secrets;
    settings.validate()?;
    log_settings_info(&settings);

    // The store client is built once, before the batch, and only when
    // secret sync is enabled; every service reuses it.
    let secret_store: Option<Arc<dyn SecretStore>> = if settings.generate_k8s_secrets {
        match KubeSecretStore::connect().await {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                error!(error = %e, "Failed to connect to the cluster secret store");
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let runner = Arc::new(OpensslRunner::new());

    if let Err(e) = pipeline::run_batch(&settings, runner, secret_store).await {
        error!(error = %e, "Certificate batch failed");
        std::process::exit(1);
    }

    Ok(())
}
