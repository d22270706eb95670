//! # Secret Synchronizer
//!
//! Reads issued certificate material from the filesystem store and upserts
//! it into the cluster secret store with create-or-replace semantics. The
//! store itself is reached through the [`SecretStore`] trait; the
//! production binding is [`KubeSecretStore`].

mod error;
mod kube_store;

pub use error::SecretsError;
pub use kube_store::KubeSecretStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::info;

use crate::errors::Result;
use crate::plan::ServiceCertPlan;
use crate::storage;

/// Artifact labels published into the secret: everything a TLS peer needs
/// downstream. Private CA key and serial stay on disk.
pub const SECRET_ARTIFACTS: &[&str] =
    &["ca.crt", "server.crt", "server.key", "client.crt", "client.key"];

/// External representation of one service's published material, keyed by
/// `(name, namespace)`. Values are raw bytes; they are base64-encoded at
/// the store's wire boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub name: String,
    pub namespace: String,
    pub data: BTreeMap<String, Vec<u8>>,
}

/// Minimal secret store surface the synchronizer needs.
///
/// `create_secret` signals a name collision as [`SecretsError::Conflict`]
/// and `delete_secret` signals absence as [`SecretsError::NotFound`]; both
/// are consumed by the synchronizer's fallbacks. Everything else surfaces
/// unchanged.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn create_secret(&self, record: &SecretRecord) -> error::Result<()>;
    async fn replace_secret(&self, record: &SecretRecord) -> error::Result<()>;
    async fn delete_secret(&self, namespace: &str, name: &str) -> error::Result<()>;
}

/// Publish the plan's issued material, replacing any existing secret of
/// the same name wholesale rather than merging into it.
pub async fn upsert_secret(
    store: &dyn SecretStore,
    plan: &ServiceCertPlan,
    namespace: &str,
) -> Result<()> {
    let mut data = BTreeMap::new();
    for artifact in SECRET_ARTIFACTS {
        let bytes = storage::read_artifact(&plan.cert_directory, artifact)?;
        data.insert(artifact.to_string(), bytes);
    }

    let record = SecretRecord {
        name: plan.secret_name.clone(),
        namespace: namespace.to_string(),
        data,
    };

    match store.create_secret(&record).await {
        Ok(()) => {
            info!(secret = %record.name, namespace, "Secret created");
            Ok(())
        }
        Err(SecretsError::Conflict { .. }) => {
            store.replace_secret(&record).await.map_err(crate::Error::SecretStore)?;
            info!(secret = %record.name, namespace, "Secret replaced");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete the named secret. Absence is success: a first run has nothing
/// to remove.
pub async fn remove_secret(store: &dyn SecretStore, name: &str, namespace: &str) -> Result<()> {
    match store.delete_secret(namespace, name).await {
        Ok(()) => {
            info!(secret = %name, namespace, "Secret deleted");
            Ok(())
        }
        Err(SecretsError::NotFound { .. }) => {
            info!(secret = %name, namespace, "Secret not found, nothing to delete");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use crate::errors::Error;

    /// In-memory store keyed by (namespace, name).
    #[derive(Default)]
    struct InMemoryStore {
        records: Mutex<BTreeMap<(String, String), BTreeMap<String, Vec<u8>>>>,
    }

    impl InMemoryStore {
        fn get(&self, namespace: &str, name: &str) -> Option<BTreeMap<String, Vec<u8>>> {
            self.records
                .lock()
                .unwrap()
                .get(&(namespace.to_string(), name.to_string()))
                .cloned()
        }

        fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SecretStore for InMemoryStore {
        async fn create_secret(&self, record: &SecretRecord) -> error::Result<()> {
            let mut records = self.records.lock().unwrap();
            let key = (record.namespace.clone(), record.name.clone());
            if records.contains_key(&key) {
                return Err(SecretsError::conflict(&record.name));
            }
            records.insert(key, record.data.clone());
            Ok(())
        }

        async fn replace_secret(&self, record: &SecretRecord) -> error::Result<()> {
            let mut records = self.records.lock().unwrap();
            let key = (record.namespace.clone(), record.name.clone());
            if !records.contains_key(&key) {
                return Err(SecretsError::not_found(&record.name));
            }
            records.insert(key, record.data.clone());
            Ok(())
        }

        async fn delete_secret(&self, namespace: &str, name: &str) -> error::Result<()> {
            let mut records = self.records.lock().unwrap();
            match records.remove(&(namespace.to_string(), name.to_string())) {
                Some(_) => Ok(()),
                None => Err(SecretsError::not_found(name)),
            }
        }
    }

    fn write_artifacts(dir: &Path, content: &[u8]) {
        for artifact in SECRET_ARTIFACTS {
            std::fs::write(dir.join(artifact), content).unwrap();
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_then_replaces() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = ServiceCertPlan::resolve(tmp.path(), "prod", "billing");
        std::fs::create_dir_all(&plan.cert_directory).unwrap();
        let store = InMemoryStore::default();

        write_artifacts(&plan.cert_directory, b"first rotation");
        upsert_secret(&store, &plan, "prod").await.unwrap();
        assert_eq!(store.len(), 1);

        write_artifacts(&plan.cert_directory, b"second rotation");
        upsert_secret(&store, &plan, "prod").await.unwrap();

        // Still exactly one record, holding the latest content.
        assert_eq!(store.len(), 1);
        let data = store.get("prod", "billing-certs").unwrap();
        assert_eq!(data.len(), SECRET_ARTIFACTS.len());
        assert_eq!(data["ca.crt"], b"second rotation");
        assert_eq!(data["client.key"], b"second rotation");
    }

    #[tokio::test]
    async fn test_upsert_fails_on_missing_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = ServiceCertPlan::resolve(tmp.path(), "prod", "billing");
        std::fs::create_dir_all(&plan.cert_directory).unwrap();
        // server.key deliberately absent
        for artifact in ["ca.crt", "server.crt", "client.crt", "client.key"] {
            std::fs::write(plan.cert_directory.join(artifact), b"pem").unwrap();
        }

        let store = InMemoryStore::default();
        let err = upsert_secret(&store, &plan, "prod").await.unwrap_err();
        match err {
            Error::ArtifactNotFound { path } => assert!(path.ends_with("server.key")),
            other => panic!("expected ArtifactNotFound, got {other}"),
        }
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_upsert_surfaces_other_store_errors() {
        struct FailingStore;

        #[async_trait]
        impl SecretStore for FailingStore {
            async fn create_secret(&self, _record: &SecretRecord) -> error::Result<()> {
                Err(SecretsError::api(500, "boom"))
            }
            async fn replace_secret(&self, _record: &SecretRecord) -> error::Result<()> {
                unreachable!("replace must not run when create fails with a non-conflict")
            }
            async fn delete_secret(&self, _namespace: &str, _name: &str) -> error::Result<()> {
                Ok(())
            }
        }

        let tmp = tempfile::tempdir().unwrap();
        let plan = ServiceCertPlan::resolve(tmp.path(), "prod", "billing");
        std::fs::create_dir_all(&plan.cert_directory).unwrap();
        write_artifacts(&plan.cert_directory, b"pem");

        let err = upsert_secret(&FailingStore, &plan, "prod").await.unwrap_err();
        assert!(matches!(err, Error::SecretStore(SecretsError::Api { code: 500, .. })));
    }

    #[tokio::test]
    async fn test_remove_secret_is_idempotent_on_absence() {
        let store = InMemoryStore::default();
        remove_secret(&store, "billing-certs", "prod").await.unwrap();
        remove_secret(&store, "billing-certs", "prod").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_secret_deletes_existing() {
        let store = InMemoryStore::default();
        let record = SecretRecord {
            name: "billing-certs".to_string(),
            namespace: "prod".to_string(),
            data: BTreeMap::new(),
        };
        store.create_secret(&record).await.unwrap();

        remove_secret(&store, "billing-certs", "prod").await.unwrap();
        assert_eq!(store.len(), 0);
    }
}
