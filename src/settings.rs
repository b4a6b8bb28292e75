use std::path::Path;

use config::{Config, ConfigError, File, FileFormat, Source};
use serde::Deserialize;

use crate::registration::AuctioneerEndpoint;

/// Base name of the settings file; the extension picks the format.
pub const CONFIG_NAME: &str = "config";

/// Environment variables named `BIDDER__<KEY>` replace file values.
pub const ENV_PREFIX: &str = "BIDDER";

const KEYS: [&str; 2] = ["AunctioneerHost", "AunctioneerPath"];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // config may lowercase keys depending on the source, so accept both spellings
    #[serde(rename = "AunctioneerHost", alias = "aunctioneerhost")]
    pub auctioneer_host: String,
    #[serde(rename = "AunctioneerPath", alias = "aunctioneerpath")]
    pub auctioneer_path: String,
}

impl Settings {
    /// Load `config.*` from the working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new("."))
    }

    /// Load `config.*` from `dir`, with `BIDDER__*` environment overrides.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let base = dir.join(CONFIG_NAME);
        let file = File::with_name(&base.to_string_lossy()).required(true);
        Self::build(file, |name| std::env::var(name).ok())
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::build(File::from_str(toml_str, FileFormat::Toml), |name| {
            std::env::var(name).ok()
        })
    }

    /// Overrides are set under the file's own key spelling so they replace
    /// the file value instead of appearing next to it.
    fn build<S, F>(source: S, lookup: F) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder().add_source(source);
        for key in KEYS {
            builder = builder.set_override_option(key, lookup(&env_var_name(key)))?;
        }
        builder.build()?.try_deserialize()
    }

    pub fn endpoint(&self) -> AuctioneerEndpoint {
        AuctioneerEndpoint::new(&self.auctioneer_host, &self.auctioneer_path)
    }
}

/// `AunctioneerHost` -> `BIDDER__AUNCTIONEERHOST`
pub fn env_var_name(key: &str) -> String {
    format!("{ENV_PREFIX}__{}", key.to_uppercase())
}
