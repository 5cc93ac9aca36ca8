use std::{io, result};

pub type ProvisionResult<T, E = ProvisionError> = result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("environment variable {0} is not set")]
    Env(String),
    #[error("{0}")]
    Conf(String),
    #[error("I/O: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    YamlErr(#[from] serde_yml::Error),
    #[error("{0}")]
    JsonErr(#[from] serde_json::Error),
    #[error("{0}")]
    HttpErr(#[from] reqwest::Error),
}
