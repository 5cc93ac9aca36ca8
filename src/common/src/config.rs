use std::env;

use crate::{ProvisionError, ProvisionResult};

/// Connection settings for the broker's management API plus the catalog
/// location, all taken from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub emqx_host: String,
    pub emqx_api_port: u16,
    pub emqx_user: String,
    pub emqx_password: String,
    pub yaml_file_path: String,
}

impl Config {
    pub fn from_env() -> ProvisionResult<Self> {
        let emqx_api_port = var("EMQX_API_PORT")?
            .parse()
            .map_err(|_| ProvisionError::Conf("EMQX_API_PORT must be a port number".to_owned()))?;

        Ok(Self {
            emqx_host: var("EMQX_HOST")?,
            emqx_api_port,
            emqx_user: var("EMQX_USER")?,
            emqx_password: var("EMQX_PASSWORD")?,
            yaml_file_path: var("YAML_FILE_PATH")?,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.emqx_host, self.emqx_api_port)
    }
}

fn var(name: &str) -> ProvisionResult<String> {
    env::var(name).map_err(|_| ProvisionError::Env(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn test_base_url() {
        let conf = Config {
            emqx_host: "broker.local".to_owned(),
            emqx_api_port: 18083,
            emqx_user: "admin".to_owned(),
            emqx_password: "public".to_owned(),
            yaml_file_path: "devices.yaml".to_owned(),
        };
        assert_eq!(conf.base_url(), "http://broker.local:18083");
    }
}
