//! # Config Resolver
//!
//! Pure derivation of per-service certificate plans. [`ServiceCertPlan::resolve`]
//! is total and deterministic: the plan is fully determined by its three
//! inputs, so rotation runs can recompute it safely on every invocation.

use std::path::{Path, PathBuf};

/// CA certificate filename
pub const CA_CERT: &str = "ca.crt";
/// CA private key filename
pub const CA_KEY: &str = "ca.key";
/// CA serial file, produced as a signing side effect
pub const CA_SERIAL: &str = "ca.srl";

/// Every artifact a pipeline run may produce, in order. Old-run cleanup
/// covers this full set.
pub const ARTIFACT_LIST: &[&str] = &[
    CA_CERT,
    CA_KEY,
    CA_SERIAL,
    "server.csr",
    "server.key",
    "server.crt",
    "client.csr",
    "client.key",
    "client.crt",
];

/// Signing requests are deleted once their certificates are issued.
pub const TRANSIENT_LIST: &[&str] = &["server.csr", "client.csr"];

/// Default per-certificate validity in days
pub const DEFAULT_EXPIRATION_DAYS: u32 = 365;

/// The two roles a certificate pair is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertRole {
    Client,
    Server,
}

impl CertRole {
    /// Role name as it appears in artifact filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            CertRole::Client => "client",
            CertRole::Server => "server",
        }
    }

    /// Signing request filename for this role
    pub fn csr_file(&self) -> &'static str {
        match self {
            CertRole::Client => "client.csr",
            CertRole::Server => "server.csr",
        }
    }

    /// Private key filename for this role
    pub fn key_file(&self) -> &'static str {
        match self {
            CertRole::Client => "client.key",
            CertRole::Server => "server.key",
        }
    }

    /// Certificate filename for this role
    pub fn cert_file(&self) -> &'static str {
        match self {
            CertRole::Client => "client.crt",
            CertRole::Server => "server.crt",
        }
    }
}

impl std::fmt::Display for CertRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-resolved certificate plan for one (service, namespace) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCertPlan {
    /// Directory holding this service's certificate material
    pub cert_directory: PathBuf,

    /// Name of the secret the material is published under
    pub secret_name: String,

    /// Common name of the per-service certificate authority
    pub ca_common_name: String,

    /// Common name of the client certificate
    pub client_common_name: String,

    /// Common name of the server certificate: the fully-qualified
    /// in-cluster DNS name TLS clients validate against
    pub server_common_name: String,

    /// All artifact filenames a run may produce
    pub artifact_list: &'static [&'static str],

    /// Artifacts deleted after issuance
    pub transient_list: &'static [&'static str],

    /// Per-certificate validity in days
    pub expiration_days: u32,
}

impl ServiceCertPlan {
    /// Resolve the plan for a service. Pure: no I/O, no failure mode,
    /// identical inputs yield identical plans.
    pub fn resolve(base_directory: &Path, namespace: &str, service_name: &str) -> Self {
        Self {
            cert_directory: base_directory.join(service_name),
            secret_name: format!("{}-certs", service_name),
            ca_common_name: format!("{}-ca", service_name),
            client_common_name: format!("{}-client", service_name),
            server_common_name: format!("{}.{}.svc.cluster.local", service_name, namespace),
            artifact_list: ARTIFACT_LIST,
            transient_list: TRANSIENT_LIST,
            expiration_days: DEFAULT_EXPIRATION_DAYS,
        }
    }

    /// Common name used for the given role's CSR subject and SAN
    pub fn common_name_for(&self, role: CertRole) -> &str {
        match role {
            CertRole::Client => &self.client_common_name,
            CertRole::Server => &self.server_common_name,
        }
    }
}
