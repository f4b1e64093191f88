//! Settings layered from built-in defaults, an optional TOML file and
//! `TRIPFLIGHTS_`-prefixed environment variables (highest precedence).

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::offset::UtcOffset;
use crate::schedule::calculator::ScheduleCalculator;

const CONFIG_FILE_NAME: &str = "tripflights.toml";
const ENV_PREFIX: &str = "TRIPFLIGHTS_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zone assumed for a flight end whose offset was never chosen.
    pub default_offset: UtcOffset,
    /// Where the trip book is read from and written to.
    pub book_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_offset: UtcOffset::UTC_PLUS_8,
            book_path: PathBuf::from("data/trips.json"),
        }
    }
}

impl Config {
    /// Loads settings; without an explicit path, `tripflights.toml` in the
    /// working directory is used when it exists.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let config_file = config_path.unwrap_or(Path::new(CONFIG_FILE_NAME));

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;
        tracing::debug!(?config, "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.book_path.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "book_path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn calculator(&self) -> ScheduleCalculator {
        ScheduleCalculator::new(self.default_offset)
    }
}
