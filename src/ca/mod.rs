//! # Certificate Authority Engine
//!
//! Drives an external CA toolchain (the openssl CLI) to create a
//! self-signed authority, certificate signing requests, and signed
//! certificates. The toolchain is reached through the [`CommandRunner`]
//! capability, so the engine itself never spawns processes; tests and
//! alternative deployments substitute their own runner without touching
//! pipeline logic.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::{Error, Result};
use crate::plan::{CertRole, CA_CERT, CA_KEY};

/// Validity of the self-signed authority certificate, fixed by design.
const AUTHORITY_VALIDITY_DAYS: u32 = 365;

/// Timeout for a single toolchain invocation. The toolchain runs locally
/// and non-interactively; anything slower than this is hung.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability for executing one external command to completion.
///
/// A non-zero exit status, spawn failure, or timeout is reported as
/// [`Error::CommandExecution`]. Implementations must not start the next
/// command before the previous one finished.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Production runner: spawns the command, captures output, and bounds the
/// invocation with a timeout so a hung toolchain cannot stall the batch.
#[derive(Debug, Clone)]
pub struct OpensslRunner {
    timeout: Duration,
}

impl OpensslRunner {
    pub fn new() -> Self {
        Self { timeout: COMMAND_TIMEOUT }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for OpensslRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for OpensslRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<()> {
        let description = format!("{} {}", program, args.join(" "));
        info!(command = %description, "Executing command");

        let output = tokio::time::timeout(self.timeout, Command::new(program).args(args).output())
            .await
            .map_err(|_| {
                warn!(command = %description, timeout = ?self.timeout, "Command timed out");
                Error::command_execution(
                    description.clone(),
                    format!("timed out after {:?}", self.timeout),
                )
            })?
            .map_err(|e| {
                warn!(command = %description, error = %e, "Command spawn failed");
                Error::command_execution(description.clone(), format!("failed to execute: {}", e))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(command = %description, status = %output.status, stderr = %stderr, "Command failed");
            Err(Error::command_execution(
                description,
                format!("{}: {}", output.status, stderr),
            ))
        }
    }
}

/// Issues certificate material into a service's directory via the
/// injected runner.
pub struct CaEngine {
    runner: Arc<dyn CommandRunner>,
}

impl CaEngine {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Create a self-signed authority certificate and private key, fixed
    /// 365-day validity, no passphrase.
    pub async fn create_authority(&self, directory: &Path, common_name: &str) -> Result<()> {
        let args = vec![
            "req".to_string(),
            "-new".to_string(),
            "-x509".to_string(),
            "-days".to_string(),
            AUTHORITY_VALIDITY_DAYS.to_string(),
            "-nodes".to_string(),
            "-out".to_string(),
            directory.join(CA_CERT).display().to_string(),
            "-keyout".to_string(),
            directory.join(CA_KEY).display().to_string(),
            "-subj".to_string(),
            format!("/CN={}", common_name),
        ];
        self.runner.run("openssl", &args).await?;
        info!(directory = %directory.display(), common_name, "Certificate authority created");
        Ok(())
    }

    /// Create a signing request and private key for the role. The
    /// request's DNS subject alternative name is the common name; for the
    /// server role that is the in-cluster service DNS name TLS clients
    /// validate against.
    pub async fn create_csr(
        &self,
        directory: &Path,
        role: CertRole,
        common_name: &str,
    ) -> Result<()> {
        let args = vec![
            "req".to_string(),
            "-new".to_string(),
            "-nodes".to_string(),
            "-out".to_string(),
            directory.join(role.csr_file()).display().to_string(),
            "-keyout".to_string(),
            directory.join(role.key_file()).display().to_string(),
            "-subj".to_string(),
            format!("/CN={}", common_name),
            "-addext".to_string(),
            format!("subjectAltName=DNS:{}", common_name),
        ];
        self.runner.run("openssl", &args).await?;
        info!(directory = %directory.display(), role = %role, common_name, "Signing request created");
        Ok(())
    }

    /// Sign the role's CSR against the authority. Requires the CSR and
    /// the authority cert+key to already exist; fails fast naming the
    /// missing file otherwise. Produces or updates the authority serial
    /// file as a side effect.
    pub async fn sign_certificate(
        &self,
        directory: &Path,
        role: CertRole,
        expiration_days: u32,
    ) -> Result<()> {
        crate::storage::require_artifacts(directory, &[role.csr_file(), CA_CERT, CA_KEY])?;

        let args = vec![
            "x509".to_string(),
            "-req".to_string(),
            "-in".to_string(),
            directory.join(role.csr_file()).display().to_string(),
            "-CA".to_string(),
            directory.join(CA_CERT).display().to_string(),
            "-CAkey".to_string(),
            directory.join(CA_KEY).display().to_string(),
            "-CAcreateserial".to_string(),
            "-out".to_string(),
            directory.join(role.cert_file()).display().to_string(),
            "-days".to_string(),
            expiration_days.to_string(),
        ];
        self.runner.run("openssl", &args).await?;
        info!(directory = %directory.display(), role = %role, expiration_days, "Certificate signed");
        Ok(())
    }
}
