use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cpq::pricing::{LandedCostEngine, DEFAULT_EXCHANGE_RATE, DEFAULT_SETTLEMENT_CURRENCY};
use crate::cpq::rates::{ShippingRate, ShippingRateTable};
use crate::domain::shipping::ShippingMethod;

pub const CONFIG_FILE_NAME: &str = "tradequote.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pricing: PricingConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingConfig {
    pub exchange_rate: Decimal,
    pub settlement_currency: String,
    pub air_express: ShippingRate,
    pub sea_freight: ShippingRate,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub exchange_rate: Option<Decimal>,
    pub settlement_currency: Option<String>,
    pub air_express: Option<ShippingRate>,
    pub sea_freight: Option<ShippingRate>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            settlement_currency: DEFAULT_SETTLEMENT_CURRENCY.to_string(),
            air_express: ShippingRate::AIR_EXPRESS,
            sea_freight: ShippingRate::SEA_FREIGHT,
        }
    }
}

impl PricingConfig {
    pub fn rate_table(&self) -> ShippingRateTable {
        ShippingRateTable::new([
            (ShippingMethod::AirExpress, self.air_express),
            (ShippingMethod::SeaFreight, self.sea_freight),
        ])
    }

    pub fn engine(&self) -> LandedCostEngine {
        LandedCostEngine::new(self.rate_table(), self.exchange_rate, &self.settlement_currency)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.normalize();
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(pricing) = patch.pricing {
            if let Some(exchange_rate) = pricing.exchange_rate {
                self.pricing.exchange_rate = exchange_rate;
            }
            if let Some(settlement_currency) = pricing.settlement_currency {
                self.pricing.settlement_currency = settlement_currency;
            }
            if let Some(shipping) = pricing.shipping {
                if let Some(air_express) = shipping.air_express {
                    air_express.apply_to(&mut self.pricing.air_express);
                }
                if let Some(sea_freight) = shipping.sea_freight {
                    sea_freight.apply_to(&mut self.pricing.sea_freight);
                }
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("TRADEQUOTE_EXCHANGE_RATE") {
            self.pricing.exchange_rate = parse_decimal("TRADEQUOTE_EXCHANGE_RATE", &value)?;
        }
        if let Some(value) = read_env("TRADEQUOTE_SETTLEMENT_CURRENCY") {
            self.pricing.settlement_currency = value;
        }

        if let Some(value) = read_env("TRADEQUOTE_AIR_EXPRESS_RATE_PER_KG") {
            self.pricing.air_express.rate_per_kg_usd =
                parse_decimal("TRADEQUOTE_AIR_EXPRESS_RATE_PER_KG", &value)?;
        }
        if let Some(value) = read_env("TRADEQUOTE_AIR_EXPRESS_MINIMUM_CHARGE") {
            self.pricing.air_express.minimum_charge_usd =
                parse_decimal("TRADEQUOTE_AIR_EXPRESS_MINIMUM_CHARGE", &value)?;
        }
        if let Some(value) = read_env("TRADEQUOTE_SEA_FREIGHT_RATE_PER_KG") {
            self.pricing.sea_freight.rate_per_kg_usd =
                parse_decimal("TRADEQUOTE_SEA_FREIGHT_RATE_PER_KG", &value)?;
        }
        if let Some(value) = read_env("TRADEQUOTE_SEA_FREIGHT_MINIMUM_CHARGE") {
            self.pricing.sea_freight.minimum_charge_usd =
                parse_decimal("TRADEQUOTE_SEA_FREIGHT_MINIMUM_CHARGE", &value)?;
        }

        let log_level =
            read_env("TRADEQUOTE_LOGGING_LEVEL").or_else(|| read_env("TRADEQUOTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("TRADEQUOTE_LOGGING_FORMAT").or_else(|| read_env("TRADEQUOTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(exchange_rate) = overrides.exchange_rate {
            self.pricing.exchange_rate = exchange_rate;
        }
        if let Some(settlement_currency) = overrides.settlement_currency {
            self.pricing.settlement_currency = settlement_currency;
        }
        if let Some(air_express) = overrides.air_express {
            self.pricing.air_express = air_express;
        }
        if let Some(sea_freight) = overrides.sea_freight {
            self.pricing.sea_freight = sea_freight;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    fn normalize(&mut self) {
        self.pricing.settlement_currency = self.pricing.settlement_currency.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pricing(&self.pricing)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Explicit path first, then `tradequote.toml`, then `config/tradequote.toml`.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(CONFIG_FILE_NAME), Path::new("config").join(CONFIG_FILE_NAME)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    if pricing.exchange_rate <= Decimal::ZERO {
        return Err(ConfigError::Validation(
            "pricing.exchange_rate must be greater than zero".to_string(),
        ));
    }

    let currency = pricing.settlement_currency.trim();
    if currency.len() != 3 || !currency.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ConfigError::Validation(format!(
            "pricing.settlement_currency must be a three-letter currency code, got `{currency}`"
        )));
    }

    for (name, rate) in
        [("air_express", &pricing.air_express), ("sea_freight", &pricing.sea_freight)]
    {
        if rate.rate_per_kg_usd < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "pricing.shipping.{name}.rate_per_kg_usd must be 0 or greater"
            )));
        }
        if rate.minimum_charge_usd < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "pricing.shipping.{name}.minimum_charge_usd must be 0 or greater"
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(value.trim()).map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    pricing: Option<PricingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    exchange_rate: Option<Decimal>,
    settlement_currency: Option<String>,
    shipping: Option<ShippingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ShippingPatch {
    air_express: Option<ShippingRatePatch>,
    sea_freight: Option<ShippingRatePatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ShippingRatePatch {
    rate_per_kg_usd: Option<Decimal>,
    minimum_charge_usd: Option<Decimal>,
}

impl ShippingRatePatch {
    fn apply_to(self, rate: &mut ShippingRate) {
        if let Some(rate_per_kg_usd) = self.rate_per_kg_usd {
            rate.rate_per_kg_usd = rate_per_kg_usd;
        }
        if let Some(minimum_charge_usd) = self.minimum_charge_usd {
            rate.minimum_charge_usd = minimum_charge_usd;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
    use crate::domain::shipping::ShippingMethod;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_match_published_rate_card() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.pricing.exchange_rate == Decimal::new(202, 2), "exchange rate is 2.02")?;
        ensure(config.pricing.settlement_currency == "BBD", "settlement currency is BBD")?;
        ensure(
            config.pricing.air_express.minimum_charge_usd == Decimal::new(25, 0),
            "air express minimum is 25",
        )?;
        ensure(
            config.pricing.sea_freight.rate_per_kg_usd == Decimal::new(8, 2),
            "sea freight rate is 0.08/kg",
        )?;
        ensure(matches!(config.logging.format, LogFormat::Compact), "default format is compact")
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_TRADEQUOTE_RATE", "1.95");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("tradequote.toml");
            fs::write(
                &path,
                r#"
[pricing]
exchange_rate = "${TEST_TRADEQUOTE_RATE}"
settlement_currency = "XCD"

[pricing.shipping.sea_freight]
minimum_charge_usd = "20.00"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.pricing.exchange_rate == Decimal::new(195, 2),
                "exchange rate should be interpolated from environment",
            )?;
            ensure(config.pricing.settlement_currency == "XCD", "currency should come from file")?;
            ensure(
                config.pricing.sea_freight.minimum_charge_usd == Decimal::new(20, 0),
                "sea minimum should come from file",
            )?;
            ensure(
                config.pricing.sea_freight.rate_per_kg_usd == Decimal::new(8, 2),
                "unpatched sea rate keeps its default",
            )?;
            Ok(())
        })();

        clear_vars(&["TEST_TRADEQUOTE_RATE"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRADEQUOTE_EXCHANGE_RATE", "2.10");
        env::set_var("TRADEQUOTE_AIR_EXPRESS_RATE_PER_KG", "0.20");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("tradequote.toml");
            fs::write(
                &path,
                r#"
[pricing]
exchange_rate = "2.05"

[pricing.shipping.air_express]
rate_per_kg_usd = "0.18"
minimum_charge_usd = "30"

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    exchange_rate: Some(Decimal::ONE),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.pricing.exchange_rate == Decimal::ONE, "override exchange rate wins")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.pricing.air_express.rate_per_kg_usd == Decimal::new(20, 2),
                "env air rate should win over file and defaults",
            )?;
            ensure(
                config.pricing.air_express.minimum_charge_usd == Decimal::new(30, 0),
                "file air minimum should win over defaults",
            )?;
            Ok(())
        })();

        clear_vars(&["TRADEQUOTE_EXCHANGE_RATE", "TRADEQUOTE_AIR_EXPRESS_RATE_PER_KG"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRADEQUOTE_LOG_LEVEL", "warn");
        env::set_var("TRADEQUOTE_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "json logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["TRADEQUOTE_LOG_LEVEL", "TRADEQUOTE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn malformed_env_decimal_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRADEQUOTE_EXCHANGE_RATE", "two");

        let result = match AppConfig::load(LoadOptions::default()) {
            Ok(_) => Err("expected env override failure".to_string()),
            Err(error) => ensure(
                matches!(
                    error,
                    ConfigError::InvalidEnvOverride { ref key, .. }
                        if key == "TRADEQUOTE_EXCHANGE_RATE"
                ),
                "error should name the offending variable",
            ),
        };

        clear_vars(&["TRADEQUOTE_EXCHANGE_RATE"]);
        result
    }

    #[test]
    fn validation_rejects_non_positive_exchange_rate() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                exchange_rate: Some(Decimal::ZERO),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".into()),
            Err(error) => error,
        };

        ensure(
            matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("exchange_rate")
            ),
            "validation failure should mention pricing.exchange_rate",
        )
    }

    #[test]
    fn validation_rejects_bad_currency_code() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                settlement_currency: Some("BBD$".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        ensure(matches!(result, Err(ConfigError::Validation(_))), "currency code must be 3 letters")
    }

    #[test]
    fn settlement_currency_is_stored_trimmed() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TRADEQUOTE_SETTLEMENT_CURRENCY", " XCD ");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            ensure(config.pricing.settlement_currency == "XCD", "env currency should be trimmed")?;

            let config = AppConfig::load(LoadOptions {
                overrides: ConfigOverrides {
                    settlement_currency: Some(" USD".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;
            let engine = config.pricing.engine();
            ensure(
                crate::cpq::pricing::PricingEngine::settlement_currency(&engine) == "USD",
                "engine should quote in the trimmed currency",
            )
        })();

        clear_vars(&["TRADEQUOTE_SETTLEMENT_CURRENCY"]);
        result
    }

    #[test]
    fn pricing_config_builds_engine_with_configured_rates() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                exchange_rate: Some(Decimal::ONE),
                settlement_currency: Some("USD".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        let engine = config.pricing.engine();
        ensure(engine.exchange_rate() == Decimal::ONE, "engine uses configured exchange rate")?;
        ensure(
            engine.rates().methods().eq([ShippingMethod::AirExpress, ShippingMethod::SeaFreight]),
            "engine carries both shipping methods",
        )?;
        ensure(
            crate::cpq::pricing::PricingEngine::settlement_currency(&engine) == "USD",
            "engine quotes in configured currency",
        )
    }

    #[test]
    fn missing_required_file_is_reported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let result = AppConfig::load(LoadOptions {
            config_path: Some(dir.path().join("absent.toml")),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(matches!(result, Err(ConfigError::MissingConfigFile(_))), "missing file error")
    }
}
