//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for a scheduler backed by a JSON file in a temp directory
//! - Tracing setup for diagnosing failures (`RUST_LOG=review_scheduler=debug`)

#![allow(dead_code)]

pub mod fixtures;

use std::fs;
use std::path::{Path, PathBuf};

use review_scheduler::{ReviewScheduler, SchedulerConfig};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test context owning a temp directory that holds the state document.
pub struct TestContext {
    dir: TempDir,
    pub config: SchedulerConfig,
}

impl TestContext {
    /// Create a new test context with the data file nested under `data/`.
    pub fn new() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = SchedulerConfig {
            data_file: dir.path().join("data").join("srs_data.json"),
            ..SchedulerConfig::default()
        };
        Self { dir, config }
    }

    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Open a scheduler over the context's data file.
    pub fn open(&self) -> ReviewScheduler {
        ReviewScheduler::open(&self.config)
    }

    /// Overwrite the data file with raw content.
    pub fn write_raw(&self, content: &str) {
        if let Some(parent) = self.data_file().parent() {
            fs::create_dir_all(parent).expect("Failed to create data dir");
        }
        fs::write(self.data_file(), content).expect("Failed to write data file");
    }

    pub fn read_raw(&self) -> String {
        fs::read_to_string(self.data_file()).expect("Failed to read data file")
    }
}
