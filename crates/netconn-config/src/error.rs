use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Config file not found. Looked in:\n\
        - ./netconn.yaml, ./.netconn.yaml\n\
        - ~/.config/netconn/netconn.yaml\n\
        Set NETCONN_CONFIG_PATH to point at a file directly"
    )]
    ConfigFileNotFound,

    #[error("Config file {0} does not exist (from NETCONN_CONFIG_PATH)")]
    ConfigFileMissing(PathBuf),

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
