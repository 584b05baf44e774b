use std::env;
use std::fs;
use std::path::Path;

use toml::Value;
use tradequote_core::config::{resolve_config_path, AppConfig, LoadOptions};

pub fn run(explicit_path: Option<&Path>) -> String {
    let options = LoadOptions {
        config_path: explicit_path.map(Path::to_path_buf),
        require_file: explicit_path.is_some(),
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let pricing = &config.pricing;
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "pricing.exchange_rate",
        &pricing.exchange_rate.to_string(),
        source("pricing.exchange_rate", &["TRADEQUOTE_EXCHANGE_RATE"]),
    ));
    lines.push(render_line(
        "pricing.settlement_currency",
        &pricing.settlement_currency,
        source("pricing.settlement_currency", &["TRADEQUOTE_SETTLEMENT_CURRENCY"]),
    ));

    for (method, rate, env_prefix) in [
        ("air_express", &pricing.air_express, "TRADEQUOTE_AIR_EXPRESS"),
        ("sea_freight", &pricing.sea_freight, "TRADEQUOTE_SEA_FREIGHT"),
    ] {
        let rate_key = format!("pricing.shipping.{method}.rate_per_kg_usd");
        let rate_env = format!("{env_prefix}_RATE_PER_KG");
        lines.push(render_line(
            &rate_key,
            &rate.rate_per_kg_usd.to_string(),
            source(&rate_key, &[rate_env.as_str()]),
        ));

        let minimum_key = format!("pricing.shipping.{method}.minimum_charge_usd");
        let minimum_env = format!("{env_prefix}_MINIMUM_CHARGE");
        lines.push(render_line(
            &minimum_key,
            &rate.minimum_charge_usd.to_string(),
            source(&minimum_key, &[minimum_env.as_str()]),
        ));
    }

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["TRADEQUOTE_LOGGING_LEVEL", "TRADEQUOTE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["TRADEQUOTE_LOGGING_FORMAT", "TRADEQUOTE_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
