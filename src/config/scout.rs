// src/config/scout.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const ENV_CONFIG_PATH: &str = "PRICE_SCOUT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/price_scout.toml";
/// The upstream credential is only ever taken from the environment.
pub const ENV_API_KEY: &str = "RAPIDAPI_KEY";

const DEFAULT_BASE_URL: &str = "https://coles-product-price-api.p.rapidapi.com/coles/price-changes/?date=2025-03-02&page=1&page_size=20";
const DEFAULT_AFFILIATE_ID: &str = "YOUR_AFFILIATE_ID_123";
const DEFAULT_COUNTRY_CODE: &str = "IN";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_platform_name() -> String {
    "RapidAPI Partner".to_string()
}
fn default_affiliate_id() -> String {
    DEFAULT_AFFILIATE_ID.to_string()
}
fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Where the interesting fields live in the upstream JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseSchema {
    pub results_field: String,
    pub price_field: String,
    pub link_field: String,
    /// Platform tag stamped on every normalized item.
    pub platform: String,
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self {
            results_field: "results".to_string(),
            price_field: "new_price".to_string(),
            link_field: "url".to_string(),
            platform: "coles".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Never read from the config file; see [`ENV_API_KEY`].
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default = "default_platform_name")]
    pub platform_name: String,
    #[serde(default = "default_affiliate_id")]
    pub affiliate_id: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub schema: ResponseSchema,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            platform_name: default_platform_name(),
            affiliate_id: default_affiliate_id(),
            country_code: default_country_code(),
            timeout_secs: default_timeout_secs(),
            bind_addr: default_bind_addr(),
            schema: ResponseSchema::default(),
        }
    }
}

impl ScoutConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: ScoutConfig = toml::from_str(s)?;
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    /// Defaults, then the config file (if any), then environment overrides.
    ///
    /// File lookup:
    /// 1) $PRICE_SCOUT_CONFIG (must exist)
    /// 2) config/price_scout.toml
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG_PATH) {
            Ok(p) => {
                let pb = PathBuf::from(p);
                if !pb.exists() {
                    return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
                }
                Self::load_from_file(&pb)?
            }
            Err(_) => {
                let pb = PathBuf::from(DEFAULT_CONFIG_PATH);
                if pb.exists() {
                    Self::load_from_file(&pb)?
                } else {
                    Self::default()
                }
            }
        };
        cfg.apply_env(|k| env::var(k).ok())?;
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PRICE_SCOUT_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("PRICE_SCOUT_AFFILIATE_ID") {
            self.affiliate_id = v;
        }
        if let Some(v) = lookup("PRICE_SCOUT_COUNTRY_CODE") {
            self.country_code = v;
        }
        if let Some(v) = lookup("PRICE_SCOUT_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("PRICE_SCOUT_TIMEOUT_SECS is not a number: {v:?}"))?;
        }
        if let Some(v) = lookup("PRICE_SCOUT_BIND") {
            self.bind_addr = v;
        }
        self.api_key = lookup(ENV_API_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.sanitize();
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn sanitize(&mut self) {
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.affiliate_id.trim().is_empty() {
            self.affiliate_id = default_affiliate_id();
        }
        if self.country_code.trim().is_empty() {
            self.country_code = default_country_code();
        }
    }
}
