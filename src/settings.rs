use std::env;

use config::{Config, ConfigError, Environment, File};
use glob::glob;
use serde_derive::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
pub struct Settings {
    pub discord_token: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let cwd = match env::current_dir() {
            Ok(cwd) => cwd.display().to_string(),
            Err(_) => ".".to_string(),
        };

        debug!(
            "Looking for configuration file {cwd}/config and/or configuration files in {cwd}{}",
            "/config/"
        );

        let config = Config::builder()
            .add_source(File::with_name(&format!("{cwd}/config")).required(false))
            .add_source(
                glob(&format!("{cwd}/config/*"))
                    .unwrap()
                    .map(|path| File::from(path.unwrap()))
                    .collect::<Vec<_>>(),
            )
            .add_source(Environment::with_prefix("UNFB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
