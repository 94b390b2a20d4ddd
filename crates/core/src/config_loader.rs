use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging TOML, environment variables, and JSON.
    ///
    /// Missing files are not an error; every field has a documented default.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration from a specific TOML file path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("MOOD_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let config = ConfigLoader::load_from("config/does-not-exist.toml").unwrap();
        assert_eq!(config.batch.window_hours, 96);
        assert_eq!(config.batch.inter_delay_secs, 5);
    }
}
