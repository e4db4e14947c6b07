use contracts::usecases::u601_sales_import::{DerivationPolicy, FeeDefaults, FeeInclusion};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

static APP_CONFIG: Lazy<Config> = Lazy::new(|| match load_config() {
    Ok(config) => config,
    Err(e) => {
        tracing::error!("Invalid config.toml, falling back to defaults: {}", e);
        Config::default()
    }
});

/// Process-wide configuration, loaded on first access
pub fn app_config() -> &'static Config {
    &APP_CONFIG
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    /// Extra header aliases: role code → aliases, appended after the built-in ones
    #[serde(default)]
    pub aliases: HashMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Policy defaults applied to every new import
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub quantity_default: f64,
    pub shipping_fee: f64,
    pub other_fee: f64,
    pub fee_inclusion: FeeInclusion,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: 3000 },
            engine: EngineConfig {
                quantity_default: 1.0,
                shipping_fee: 0.0,
                other_fee: 0.0,
                fee_inclusion: FeeInclusion::SubtractBeforeProfit,
            },
            aliases: HashMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn default_policy(&self) -> DerivationPolicy {
        DerivationPolicy {
            fee_inclusion: self.fee_inclusion,
            quantity_default: self.quantity_default,
            fee_defaults: FeeDefaults {
                shipping: self.shipping_fee,
                other: self.other_fee,
            },
            ..DerivationPolicy::default()
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000

[engine]
quantity_default = 1.0
shipping_fee = 0.0
other_fee = 0.0
fee_inclusion = "subtract_before_profit"

[aliases]
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = default_config().unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.engine.quantity_default, 1.0);
        assert_eq!(config.engine.fee_inclusion, FeeInclusion::SubtractBeforeProfit);
        assert!(config.aliases.is_empty());

        let fallback = Config::default();
        assert_eq!(fallback.server.port, config.server.port);
        assert_eq!(fallback.engine.shipping_fee, config.engine.shipping_fee);
    }

    #[test]
    fn test_aliases_section() {
        let text = r#"
[server]
port = 8080

[engine]
quantity_default = 1.0
shipping_fee = 25.0
other_fee = 0.0
fee_inclusion = "ignore_in_profit"

[aliases]
geography = ["wilaya", "gouvernorat"]
"#;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.aliases["geography"], vec!["wilaya", "gouvernorat"]);

        let policy = config.engine.default_policy();
        assert_eq!(policy.fee_defaults.shipping, 25.0);
        assert_eq!(policy.fee_inclusion, FeeInclusion::IgnoreInProfit);
        assert_eq!(policy.quantity_default, 1.0);
    }
}
