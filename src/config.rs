use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;


#[derive(Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Emit {
    Tokens,
    Ast,
    Value,
}

impl Emit {
    pub fn from_name(name: &str) -> Option<Emit> {
        match name {
            "tokens" => Some(Emit::Tokens),
            "ast" => Some(Emit::Ast),
            "value" => Some(Emit::Value),
            _ => None,
        }
    }
}

impl Default for Emit {
    fn default() -> Emit {
        Emit::Value
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub prompt: String,
    pub emit: Emit,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prompt: "> ".to_string(),
            emit: Emit::default(),
            verbose: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("incorrect configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Config, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let s = read_to_string(path)?;
        Config::from_toml(&s)
    }
}
