use std::path::PathBuf;

/// Default name of the credential-manager binary, resolved through `PATH`.
pub const DEFAULT_CMD_PATH: &str = "op";

/// Directory under `base_dir` that holds the credential manager's own config.
const OP_CONFIG_DIR: &str = "op_config";

const OP_CONFIG_FILE: &str = "config";

/// Where the credential manager lives and where its config is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cmd_path: PathBuf,
    pub base_dir: PathBuf,
}

impl SessionConfig {
    pub fn new(cmd_path: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            cmd_path: cmd_path.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Config with the default `op` binary.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self::new(DEFAULT_CMD_PATH, base_dir)
    }

    /// Path handed to `--config`, which is also where the account directory
    /// is read from.
    pub fn op_config_path(&self) -> PathBuf {
        self.base_dir.join(OP_CONFIG_DIR).join(OP_CONFIG_FILE)
    }
}
