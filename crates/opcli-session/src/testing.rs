//! Fake credential-manager binary for tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::SessionConfig;

/// A `/bin/sh` script standing in for the CLI, plus a scratch base
/// directory. The script receives the real signin arguments, so `$7` is the
/// `--config` path and `$(dirname "$7")` is a writable scratch directory.
pub struct FakeOp {
    _dir: TempDir,
    config: Arc<SessionConfig>,
}

impl FakeOp {
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let script = dir.path().join("op");
        fs::write(&script, format!("#!/bin/sh\n{body}")).expect("write fake op");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).expect("chmod fake op");

        let base_dir = dir.path().join("base");
        let config = SessionConfig::new(script, &base_dir);
        fs::create_dir_all(config.op_config_path().parent().expect("config parent"))
            .expect("create op_config dir");

        Self {
            _dir: dir,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> Arc<SessionConfig> {
        Arc::clone(&self.config)
    }

    /// Contents of a file the script wrote next to the config path.
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.scratch_path(name)).expect("read scratch file")
    }

    /// Write the account directory the CLI would normally maintain.
    pub fn write_directory(&self, json: &str) {
        fs::write(self.config.op_config_path(), json).expect("write account directory");
    }

    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.config.op_config_path().with_file_name(name)
    }
}
