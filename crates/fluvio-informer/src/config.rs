use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use fluvio_informer_model::NameSpace;

use crate::ConfigError;

const DEFAULT_RESYNC: Duration = Duration::from_secs(30);

fn default_resync() -> Duration {
    DEFAULT_RESYNC
}

/// Informer settings, stored as toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformerConfig {
    /// how often cached objects are redelivered to subscribers, zero disables
    #[serde(default = "default_resync", with = "humantime_serde")]
    pub resync: Duration,
    /// namespace to observe, empty means all
    #[serde(default)]
    pub namespace: String,
}

impl Default for InformerConfig {
    fn default() -> Self {
        Self {
            resync: DEFAULT_RESYNC,
            namespace: String::new(),
        }
    }
}

impl InformerConfig {
    pub fn namespace(&self) -> NameSpace {
        NameSpace::from(self.namespace.as_str())
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(?path, "loading informer config");
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Access {
            path: path.to_owned(),
            source,
        })?;
        content.parse()
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        debug!(?path, resync = ?self.resync, "saving informer config");
        fs::write(path, toml::to_string(self)?).map_err(|source| ConfigError::Access {
            path: path.to_owned(),
            source,
        })
    }
}

impl FromStr for InformerConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}
