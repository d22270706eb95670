//! Startup logging helpers.

use crate::config::Settings;

/// Log configuration at startup
pub fn log_settings_info(settings: &Settings) {
    tracing::info!(
        cert_directory = %settings.cert_directory.display(),
        namespace = %settings.namespace,
        expiration_timeout_seconds = settings.expiration_timeout_seconds,
        services_file = %settings.services_file.display(),
        secret_sync = settings.generate_k8s_secrets,
        "Certflow pipeline configuration"
    );
}
