pub mod bulk;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod price;
pub mod quote;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use tradequote_core::config::{AppConfig, LoadOptions};
use tradequote_core::{Catalog, LandedCostEngine, PricingError, QuotingService};

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG: u8 = 3;
pub const EXIT_INVALID_REQUEST: u8 = 4;
pub const EXIT_NOT_FOUND: u8 = 5;

#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

impl GlobalOptions {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config_path.clone(),
            require_file: self.config_path.is_some(),
            ..LoadOptions::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl CommandResult {
    pub fn success_with(
        command: &str,
        message: impl Into<String>,
        data: Option<impl Serialize>,
    ) -> Self {
        let data = match data.map(serde_json::to_value).transpose() {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(command, "serialization", error.to_string(), 1);
            }
        };
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn pricing_failure(command: &str, error: &PricingError) -> Self {
        let (error_class, exit_code) = match error {
            PricingError::InvalidShippingMethod(_) => {
                ("invalid_shipping_method", EXIT_INVALID_REQUEST)
            }
            PricingError::InvalidProductSpec { .. } => {
                ("invalid_product_spec", EXIT_INVALID_REQUEST)
            }
            PricingError::ArithmeticDegenerate(_) => {
                ("arithmetic_degenerate", EXIT_INVALID_REQUEST)
            }
            PricingError::NoLineItems => ("no_line_items", EXIT_INVALID_REQUEST),
            PricingError::CurrencyMismatch { .. } => ("currency_mismatch", 1),
            PricingError::ProductNotFound(_) => ("product_not_found", EXIT_NOT_FOUND),
        };
        Self::failure(command, error_class, error.to_string(), exit_code)
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Loads configuration and catalog, mapping failures to command outcomes.
pub fn quoting_service(
    command: &str,
    options: &GlobalOptions,
) -> Result<QuotingService<LandedCostEngine>, CommandResult> {
    let config = AppConfig::load(options.load_options()).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG)
    })?;
    let catalog = load_catalog(options.catalog_path.as_deref()).map_err(|error| {
        CommandResult::failure(command, "catalog_load", format!("{error:#}"), EXIT_CATALOG)
    })?;

    Ok(QuotingService::new(config.pricing.engine(), catalog))
}

pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::demo());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog `{}`", path.display()))?;
    Catalog::from_json(&raw)
        .with_context(|| format!("failed to parse catalog `{}`", path.display()))
}
