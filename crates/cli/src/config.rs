use std::path::PathBuf;

/// Default directory for the file-backed store.
pub const DEFAULT_DATA_DIR: &str = "./reelbase-data";

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding one JSON file per stored collection.
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default           |
    /// |---------------------|-------------------|
    /// | `REELBASE_DATA_DIR` | `./reelbase-data` |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup("REELBASE_DATA_DIR")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.into());
        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }

    /// A `--data-dir` flag wins over the environment.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }
}
