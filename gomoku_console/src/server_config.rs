use anyhow::Context;
use serde::{Deserialize, Serialize};


pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllowedOrigin {
    Any,
    // Serialized origin, e.g. "https://gomoku.example.org".
    ThisSite(String),
}

impl AllowedOrigin {
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match self {
            AllowedOrigin::Any => true,
            AllowedOrigin::ThisSite(site) => origin == Some(site.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origin: AllowedOrigin,
    pub allow_turn_override: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            allowed_origin: AllowedOrigin::Any,
            allow_turn_override: true,
        }
    }
}

impl ServerConfig {
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        let config: ServerConfig =
            serde_yaml::from_str(contents).context("Parsing server config")?;
        if let AllowedOrigin::ThisSite(site) = &config.allowed_origin {
            url::Url::parse(site).with_context(|| format!("Invalid allowed origin '{site}'"))?;
        }
        Ok(config)
    }

    // Port from the command line (or `PORT` env var) wins over the file.
    pub fn load(config_file: Option<&str>, port: Option<u16>) -> anyhow::Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Reading config file '{path}'"))?;
                Self::from_yaml(&contents)?
            }
            None => ServerConfig::default(),
        };
        if let Some(port) = port {
            config.port = port;
        }
        Ok(config)
    }
}
