use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PATH_HOSTSFILE: &str = "/etc/hosts";
pub const PATH_CONFIG: &str = "/etc/hostsfile.yaml";

/// Placeholder in `host=` selectors, replaced by the system hostname.
pub const RESERVED_HOSTNAME: &str = "%HOSTNAME%";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to open config file {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unable to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct HostsfileConfig {
    #[serde(default = "default_hosts_file")]
    pub hosts_file: PathBuf,
    /// Hostnames that are never reported.
    #[serde(default)]
    pub exclude: BTreeSet<String>,
}

impl Default for HostsfileConfig {
    fn default() -> Self {
        HostsfileConfig {
            hosts_file: default_hosts_file(),
            exclude: BTreeSet::new(),
        }
    }
}

fn default_hosts_file() -> PathBuf {
    PathBuf::from(PATH_HOSTSFILE)
}

impl HostsfileConfig {
    /// An explicitly requested config must exist. Without one, the system wide config is used if
    /// present, defaults otherwise.
    pub fn load(opt_path: Option<&Path>) -> Result<HostsfileConfig, ConfigError> {
        match opt_path {
            Some(path) => Self::from_path(path),
            None if Path::new(PATH_CONFIG).is_file() => Self::from_path(Path::new(PATH_CONFIG)),
            None => {
                log::debug!("no config at {:?}, using defaults", PATH_CONFIG);
                Ok(HostsfileConfig::default())
            }
        }
    }

    fn from_path(path: &Path) -> Result<HostsfileConfig, ConfigError> {
        log::debug!("reading config {:?}", path);
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
