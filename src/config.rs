//! Configuration layer: CLI flags plus typed settings from the environment.

use std::str::FromStr;

use clap::Parser;
use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

/// Command-line arguments for the generator binary.
#[derive(Debug, Parser)]
#[command(name = "listpress", version, about = "List-of-lists website generator")]
pub struct CliArgs {
    /// Log at DEBUG instead of INFO.
    #[arg(short, long)]
    pub verbose: bool,

    /// Use S3 rather than local files for inputs and output.
    #[arg(long)]
    pub s3: bool,
}

/// Fully-resolved settings after environment resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Site name; selects the `<site>.json` data file.
    pub site: String,
    /// Site bucket name and public hostname. Required in S3 mode.
    pub site_url: Option<String>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings from the process environment (`SITE`, `SITE_URL`,
/// `LOG_LEVEL`, `LOG_JSON`).
pub fn from_env() -> Result<Settings, LoadError> {
    load(Environment::default())
}

/// Parse CLI arguments and resolve settings, returning both for downstream
/// use. `--verbose` takes precedence over `LOG_LEVEL`.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let mut settings = from_env()?;
    if args.verbose {
        settings.logging.level = LevelFilter::DEBUG;
    }

    Ok((args, settings))
}

fn load(source: Environment) -> Result<Settings, LoadError> {
    let raw: RawSettings = Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()?;

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    site: Option<String>,
    site_url: Option<String>,
    log_level: Option<String>,
    log_json: Option<String>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let site = raw
            .site
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| LoadError::invalid("site", "SITE must be set"))?;

        let site_url = raw.site_url.and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });

        let logging = build_logging_settings(raw.log_level, raw.log_json)?;

        Ok(Self {
            site,
            site_url,
            logging,
        })
    }

    /// The site bucket name (also the public hostname). Only available in
    /// S3 mode, where `SITE_URL` is mandatory.
    pub fn require_site_url(&self) -> Result<&str, LoadError> {
        self.site_url
            .as_deref()
            .ok_or_else(|| LoadError::invalid("site_url", "SITE_URL must be set when using S3"))
    }
}

fn build_logging_settings(
    level: Option<String>,
    json: Option<String>,
) -> Result<LoggingSettings, LoadError> {
    let level = match level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("log_level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if json.as_deref().is_some_and(is_truthy) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn fake_env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn site_is_required() {
        let err = load(fake_env(&[])).expect_err("missing SITE must fail");
        assert!(matches!(err, LoadError::Invalid { key: "site", .. }));
    }

    #[test]
    fn site_url_stays_optional() {
        let settings =
            load(fake_env(&[("SITE", "mylists")])).expect("SITE alone is valid in local mode");
        assert_eq!(settings.site, "mylists");
        assert!(settings.site_url.is_none());
        assert!(settings.require_site_url().is_err());
    }

    #[test]
    fn environment_resolves_site_and_url() {
        let settings = load(fake_env(&[
            ("SITE", "mylists"),
            ("SITE_URL", "lists.example.com"),
        ]))
        .expect("valid settings");

        assert_eq!(settings.site, "mylists");
        assert_eq!(settings.require_site_url().unwrap(), "lists.example.com");
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let err = load(fake_env(&[("SITE", "  ")])).expect_err("blank SITE must fail");
        assert!(matches!(err, LoadError::Invalid { key: "site", .. }));

        let settings =
            load(fake_env(&[("SITE", "mylists"), ("SITE_URL", "")])).expect("valid settings");
        assert!(settings.site_url.is_none());
    }

    #[test]
    fn logging_defaults_to_compact_info() {
        let settings = load(fake_env(&[("SITE", "mylists")])).expect("valid settings");
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
    }

    #[test]
    fn logging_overrides_from_environment() {
        let settings = load(fake_env(&[
            ("SITE", "mylists"),
            ("LOG_LEVEL", "debug"),
            ("LOG_JSON", "true"),
        ]))
        .expect("valid settings");

        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert!(matches!(settings.logging.format, LogFormat::Json));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let err = load(fake_env(&[("SITE", "mylists"), ("LOG_LEVEL", "loud")]))
            .expect_err("bogus level must fail");
        assert!(matches!(err, LoadError::Invalid { key: "log_level", .. }));
    }

    #[test]
    fn parse_cli_flags() {
        let args = CliArgs::parse_from(["listpress", "--verbose", "--s3"]);
        assert!(args.verbose);
        assert!(args.s3);

        let args = CliArgs::parse_from(["listpress"]);
        assert!(!args.verbose);
        assert!(!args.s3);
    }
}
