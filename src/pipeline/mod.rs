//! # Batch Orchestrator
//!
//! Runs the per-service certificate pipeline across the configured service
//! list. Each service goes through a strict linear sequence; any step
//! failure aborts the remainder of that service's pipeline and the whole
//! batch — services after the failed one never start.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use crate::ca::{CaEngine, CommandRunner};
use crate::config::Settings;
use crate::errors::{Error, Result};
use crate::plan::{CertRole, ServiceCertPlan};
use crate::secrets::{self, SecretStore};
use crate::storage;

/// Read the service list: a JSON array of service name strings.
pub fn load_service_list(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::io(e, format!("reading service list {}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::serialization(e, format!("parsing service list {}", path.display())))
}

/// Run the full pipeline for one service:
///
/// resolve → directory → old-artifact cleanup → authority → client CSR →
/// client cert → server CSR → server cert → transient cleanup →
/// [secret remove → secret upsert]
///
/// The secret steps run only when a store is supplied. On failure the
/// directory is left as-is for inspection; the next run's cleanup over the
/// full artifact list resets it.
pub async fn run_service(
    settings: &Settings,
    service_name: &str,
    engine: &CaEngine,
    secret_store: Option<&dyn SecretStore>,
) -> Result<()> {
    let plan = ServiceCertPlan::resolve(&settings.cert_directory, &settings.namespace, service_name);
    let dir = plan.cert_directory.as_path();

    info!(
        service = service_name,
        directory = %dir.display(),
        secret = %plan.secret_name,
        "Provisioning certificates"
    );

    storage::ensure_directory(dir)?;
    storage::remove_artifacts(dir, plan.artifact_list)?;

    engine.create_authority(dir, &plan.ca_common_name).await?;
    engine.create_csr(dir, CertRole::Client, plan.common_name_for(CertRole::Client)).await?;
    engine.sign_certificate(dir, CertRole::Client, plan.expiration_days).await?;
    engine.create_csr(dir, CertRole::Server, plan.common_name_for(CertRole::Server)).await?;
    engine.sign_certificate(dir, CertRole::Server, plan.expiration_days).await?;

    storage::remove_artifacts(dir, plan.transient_list)?;

    if let Some(store) = secret_store {
        secrets::remove_secret(store, &plan.secret_name, &settings.namespace).await?;
        secrets::upsert_secret(store, &plan, &settings.namespace).await?;
    }

    info!(service = service_name, "Service certificates ready");
    Ok(())
}

/// Process the service list in order. The first failing service aborts the
/// batch; there is no per-service isolation.
pub async fn run_batch(
    settings: &Settings,
    runner: Arc<dyn CommandRunner>,
    secret_store: Option<Arc<dyn SecretStore>>,
) -> Result<()> {
    let services = load_service_list(&settings.services_file)?;
    info!(
        count = services.len(),
        services_file = %settings.services_file.display(),
        secret_sync = secret_store.is_some(),
        "Starting certificate batch"
    );

    let engine = CaEngine::new(runner);

    for service in &services {
        if let Err(e) = run_service(settings, service, &engine, secret_store.as_deref()).await {
            error!(service = %service, error = %e, "Service pipeline failed, aborting batch");
            return Err(e);
        }
    }

    info!(count = services.len(), "Certificate batch completed");
    Ok(())
}
