//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

pub const STACK: &str = "\
apiVersion: influxdata.com/v2alpha1
kind: Dashboard
metadata:
  name: system-dashboard
spec:
  name: System
  charts:
    - kind: xy
      name: cpu
      queries:
        - query: |-
            from(bucket: \"{{bucket}}\")
              |> range(start: v.timeRangeStart)
---
apiVersion: influxdata.com/v2alpha1
kind: Label
metadata:
  name: prod-label
spec:
  name: prod
";

/// Test context with temporary directory
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file relative to the temp directory
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// Write the project configuration file
    pub fn with_config(self, config: &str) -> Self {
        self.write(".stack-manager/config.yaml", config);
        self
    }

    /// Write an executable script standing in for the influx CLI
    #[cfg(unix)]
    pub fn fake_influx(&self, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.write("fake-influx", &format!("#!/bin/sh\n{script}"));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("influxdb-stack-manager").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("STACK_MANAGER_CONFIG")
            .env_remove("RUST_LOG")
            .env("STACK_MANAGER_LOG_LEVEL", "warn")
            .env("NO_COLOR", "1");
        cmd
    }
}
