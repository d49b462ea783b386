//! Common test utilities for tpconf integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! host's `/etc/tpconf` data or the user's `~/.config/tpconf/config.kdl`.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated directories.
///
/// - `data_dir`: Settings layer files (via `TPCONF_DATA_DIR`)
/// - `template_dir`: Templates (via `TPCONF_TEMPLATE_DIR`)
/// - `config_dir`: Holds config.kdl (via `TPCONF_CONFIG_DIR`)
/// - `debug_dir`: Debug records (via `TPCONF_DEBUG_DIR`)
///
/// Variables are set per-command, which keeps tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub template_dir: TempDir,
    pub config_dir: TempDir,
    pub debug_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with empty directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            template_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
            debug_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the tpconf binary bound to this environment.
    pub fn tpconf(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tpconf"));
        cmd.env("TPCONF_CONFIG_DIR", self.config_dir.path());
        cmd.env("TPCONF_DATA_DIR", self.data_dir.path());
        cmd.env("TPCONF_TEMPLATE_DIR", self.template_dir.path());
        cmd.env("TPCONF_DEBUG_DIR", self.debug_dir.path());
        cmd.env_remove("TPCONF_DATA_MODULE");
        cmd.env_remove("TPCONF_LOG");
        cmd
    }

    /// Write one settings layer for `app` in the `tinydata` module.
    pub fn write_layer(&self, app: &str, layer: &str, kdl: &str) -> PathBuf {
        self.write_module_layer("tinydata", app, layer, kdl)
    }

    /// Write one settings layer for `app` in `data_module`.
    pub fn write_module_layer(&self, data_module: &str, app: &str, layer: &str, kdl: &str) -> PathBuf {
        let dir = self.data_dir.path().join(data_module).join(app);
        fs::create_dir_all(&dir).expect("Failed to create app directory");
        let path = dir.join(format!("{}.kdl", layer));
        fs::write(&path, kdl).expect("Failed to write settings layer");
        path
    }

    /// Write a template file.
    pub fn write_template(&self, name: &str, body: &str) -> PathBuf {
        let path = self.template_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create template directory");
        }
        fs::write(&path, body).expect("Failed to write template");
        path
    }

    /// Write config.kdl.
    pub fn write_config(&self, kdl: &str) -> PathBuf {
        let path = self.config_dir.path().join("config.kdl");
        fs::write(&path, kdl).expect("Failed to write config file");
        path
    }

    /// Write the settings used by most scenarios: a stock openssh layout.
    pub fn with_openssh(self) -> Self {
        self.write_layer(
            "openssh",
            "default",
            r#"
config_dir_path "/etc/ssh"
config_file_path "/etc/ssh/sshd_config"
config_file_mode "0600"
config_file_owner "root"
config_file_group "root"
package_name "openssh-server"
service_name "sshd"
"#,
        );
        self
    }

    pub fn debug_path(&self) -> &Path {
        self.debug_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("stdout is not valid JSON")
}
