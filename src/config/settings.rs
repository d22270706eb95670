//! # Configuration Settings
//!
//! Defines the configuration structure for the certflow pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Default base directory for issued certificate material
const DEFAULT_CERT_DIRECTORY: &str = "./cert";

/// Default target namespace for published secrets
const DEFAULT_NAMESPACE: &str = "default";

/// Default expiration timeout in seconds (365 days)
const DEFAULT_EXPIRATION_TIMEOUT_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Default services list file, co-located with the working directory
const DEFAULT_SERVICES_FILE: &str = "services.list.json";

/// Pipeline configuration, resolved once at process start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base directory under which per-service certificate directories live
    pub cert_directory: PathBuf,

    /// Namespace the published secrets are created in
    pub namespace: String,

    /// Expiration timeout in seconds. Informational: per-certificate
    /// validity is expressed in days on the resolved plan.
    pub expiration_timeout_seconds: u64,

    /// Path to the JSON file holding the list of service names
    pub services_file: PathBuf,

    /// Whether issued material is synchronized into the secret store
    pub generate_k8s_secrets: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cert_directory: PathBuf::from(DEFAULT_CERT_DIRECTORY),
            namespace: DEFAULT_NAMESPACE.to_string(),
            expiration_timeout_seconds: DEFAULT_EXPIRATION_TIMEOUT_SECONDS,
            services_file: PathBuf::from(DEFAULT_SERVICES_FILE),
            generate_k8s_secrets: true,
        }
    }
}

impl Settings {
    /// Create settings from environment variables
    pub fn from_env() -> Result<Self> {
        let cert_directory = std::env::var("CERTFLOW_CERT_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CERT_DIRECTORY));

        let namespace = std::env::var("CERTFLOW_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());

        let expiration_timeout_seconds = match std::env::var("CERTFLOW_EXPIRATION_TIMEOUT") {
            Ok(raw) => raw.parse().map_err(|e| {
                Error::config(format!("Invalid CERTFLOW_EXPIRATION_TIMEOUT: {}", e))
            })?,
            Err(_) => DEFAULT_EXPIRATION_TIMEOUT_SECONDS,
        };

        let services_file = std::env::var("CERTFLOW_SERVICES_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SERVICES_FILE));

        Ok(Self {
            cert_directory,
            namespace,
            expiration_timeout_seconds,
            services_file,
            generate_k8s_secrets: true,
        })
    }

    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<()> {
        if self.cert_directory.as_os_str().is_empty() {
            return Err(Error::config("Certificate directory cannot be empty"));
        }
        if self.namespace.is_empty() {
            return Err(Error::config("Namespace cannot be empty"));
        }
        if self.expiration_timeout_seconds == 0 {
            return Err(Error::config("Expiration timeout must be positive"));
        }
        if self.services_file.as_os_str().is_empty() {
            return Err(Error::config("Services list file cannot be empty"));
        }
        Ok(())
    }
}
