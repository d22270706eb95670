//! Kubernetes binding of the [`SecretStore`] trait.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::{Api, DeleteParams, ObjectMeta, PostParams};
use kube::Client;
use tracing::debug;

use super::error::Result;
use super::{SecretRecord, SecretStore, SecretsError};

/// Secret store backed by the cluster's core/v1 Secret API.
///
/// One instance is constructed per process (in-cluster config when
/// deployed) and shared across the whole batch.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Connect using the inferred cluster configuration.
    pub async fn connect() -> Result<Self> {
        let client = Client::try_default()
            .await
            .map_err(|e| SecretsError::connection_failed(e.to_string()))?;
        debug!("Connected to cluster secret API");
        Ok(Self { client })
    }

    /// Wrap an existing client, mainly for tests against a mock server.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Build the API object. Data values go out base64-encoded via
/// `ByteString` serialization.
fn to_kube_secret(record: &SecretRecord) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(record.name.clone()),
            namespace: Some(record.namespace.clone()),
            ..Default::default()
        },
        data: Some(
            record
                .data
                .iter()
                .map(|(label, bytes)| (label.clone(), ByteString(bytes.clone())))
                .collect(),
        ),
        ..Default::default()
    }
}

fn map_kube_error(name: &str, err: kube::Error) -> SecretsError {
    match err {
        kube::Error::Api(ae) if ae.code == 409 => SecretsError::conflict(name),
        kube::Error::Api(ae) if ae.code == 404 => SecretsError::not_found(name),
        kube::Error::Api(ae) => SecretsError::api(ae.code, ae.message),
        other => SecretsError::connection_failed(other.to_string()),
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn create_secret(&self, record: &SecretRecord) -> Result<()> {
        self.api(&record.namespace)
            .create(&PostParams::default(), &to_kube_secret(record))
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(&record.name, e))
    }

    async fn replace_secret(&self, record: &SecretRecord) -> Result<()> {
        self.api(&record.namespace)
            .replace(&record.name, &PostParams::default(), &to_kube_secret(record))
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(&record.name, e))
    }

    async fn delete_secret(&self, namespace: &str, name: &str) -> Result<()> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| map_kube_error(name, e))
    }
}
