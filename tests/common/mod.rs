//! Common test utilities for the pipeline integration tests.
//!
//! Provides a fake CA toolchain runner that records invocations and writes
//! the files the real openssl CLI would, plus an in-memory secret store.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use certflow::ca::CommandRunner;
use certflow::errors::{Error, Result};
use certflow::secrets::{SecretRecord, SecretStore, SecretsError};

/// Fake openssl: records every invocation, emulates the toolchain's file
/// outputs (`-out`, `-keyout`, serial on `-CAcreateserial`), and can be
/// told to fail when a configured argument appears.
pub struct FakeOpenssl {
    calls: Mutex<Vec<Vec<String>>>,
    fail_on_arg: Option<String>,
}

impl FakeOpenssl {
    pub fn new() -> Self {
        Self { calls: Mutex::new(Vec::new()), fail_on_arg: None }
    }

    /// Fail any invocation whose argument list contains `marker` as a
    /// substring, without producing output files.
    pub fn failing_on(marker: impl Into<String>) -> Self {
        Self { calls: Mutex::new(Vec::new()), fail_on_arg: Some(marker.into()) }
    }

    /// All recorded invocations, each as the full argument vector.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// True if any recorded argument contains the given substring.
    pub fn saw_arg_containing(&self, needle: &str) -> bool {
        self.calls().iter().flatten().any(|arg| arg.contains(needle))
    }
}

#[async_trait]
impl CommandRunner for FakeOpenssl {
    async fn run(&self, _program: &str, args: &[String]) -> Result<()> {
        self.calls.lock().unwrap().push(args.to_vec());

        if let Some(marker) = &self.fail_on_arg {
            if args.iter().any(|arg| arg.contains(marker.as_str())) {
                return Err(Error::command_execution(
                    format!("openssl {}", args.join(" ")),
                    "exit status 1 (forced by test)",
                ));
            }
        }

        // Emulate output files the way the CLI produces them.
        for window in args.windows(2) {
            if window[0] == "-out" || window[0] == "-keyout" {
                let path = PathBuf::from(&window[1]);
                std::fs::write(&path, format!("fake pem: {}", window[1]))
                    .map_err(|e| Error::io(e, format!("writing {}", path.display())))?;
            }
        }
        if args.iter().any(|arg| arg == "-CAcreateserial") {
            if let Some(ca_path) = args
                .windows(2)
                .find(|w| w[0] == "-CA")
                .map(|w| PathBuf::from(&w[1]))
            {
                let serial = ca_path.with_file_name("ca.srl");
                std::fs::write(&serial, "01\n")
                    .map_err(|e| Error::io(e, format!("writing {}", serial.display())))?;
            }
        }
        Ok(())
    }
}

/// In-memory secret store keyed by (namespace, name), with an operation
/// log for asserting call order.
#[derive(Default)]
pub struct InMemorySecretStore {
    records: Mutex<BTreeMap<(String, String), BTreeMap<String, Vec<u8>>>>,
    operations: Mutex<Vec<String>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<BTreeMap<String, Vec<u8>>> {
        self.records
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    fn log(&self, op: &str, name: &str) {
        self.operations.lock().unwrap().push(format!("{} {}", op, name));
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn create_secret(&self, record: &SecretRecord) -> std::result::Result<(), SecretsError> {
        self.log("create", &record.name);
        let mut records = self.records.lock().unwrap();
        let key = (record.namespace.clone(), record.name.clone());
        if records.contains_key(&key) {
            return Err(SecretsError::conflict(&record.name));
        }
        records.insert(key, record.data.clone());
        Ok(())
    }

    async fn replace_secret(&self, record: &SecretRecord) -> std::result::Result<(), SecretsError> {
        self.log("replace", &record.name);
        let mut records = self.records.lock().unwrap();
        let key = (record.namespace.clone(), record.name.clone());
        if !records.contains_key(&key) {
            return Err(SecretsError::not_found(&record.name));
        }
        records.insert(key, record.data.clone());
        Ok(())
    }

    async fn delete_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> std::result::Result<(), SecretsError> {
        self.log("delete", name);
        let mut records = self.records.lock().unwrap();
        match records.remove(&(namespace.to_string(), name.to_string())) {
            Some(_) => Ok(()),
            None => Err(SecretsError::not_found(name)),
        }
    }
}

/// Names of the files present in a directory, sorted.
pub fn dir_entries(path: &Path) -> Vec<String> {
    let mut entries: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    entries
}
