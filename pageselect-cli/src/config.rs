//! Front-end configuration from the environment and command line flags.

use thiserror::Error;

/// Environment variable overriding the API origin.
pub const ENV_BASE_URL: &str = "PAGESELECT_BASE_URL";
/// Environment variable overriding the page size.
pub const ENV_PAGE_SIZE: &str = "PAGESELECT_PAGE_SIZE";
/// Environment variable selecting the offline dataset (`1`/`true`).
pub const ENV_OFFLINE: &str = "PAGESELECT_OFFLINE";

/// Rows in the generated offline dataset.
const OFFLINE_ROWS: usize = 50;

/// Error type for the front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidSetting { name: &'static str, value: String },

    #[error("unknown flag '{0}' (supported: --offline, --page-size N)")]
    UnknownFlag(String),

    #[error("could not set up logging: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] pageselect_lib::error::FetchError),
}

/// Resolved front-end settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub base_url: Option<String>,
    pub page_size: usize,
    /// Serve a generated dataset instead of calling the API.
    pub offline: bool,
    pub offline_rows: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            page_size: 12,
            offline: false,
            offline_rows: OFFLINE_ROWS,
        }
    }
}

impl CliConfig {
    /// Reads `.env`, the process environment and `std::env::args`.
    pub fn load() -> Result<Self, CliError> {
        let _ = dotenvy::dotenv();
        let vars = |name: &str| std::env::var(name).ok();
        Self::from_sources(vars, std::env::args().skip(1))
    }

    /// Resolves settings from a variable lookup and flags. Flags win.
    pub fn from_sources<F, I>(vars: F, args: I) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();

        if let Some(url) = vars(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config.base_url = Some(url);
        }
        if let Some(size) = vars(ENV_PAGE_SIZE) {
            config.page_size = parse_page_size(ENV_PAGE_SIZE, &size)?;
        }
        if let Some(offline) = vars(ENV_OFFLINE) {
            config.offline = parse_flag(ENV_OFFLINE, &offline)?;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--offline" => config.offline = true,
                "--page-size" => {
                    let value = args.next().unwrap_or_default();
                    config.page_size = parse_page_size("--page-size", &value)?;
                }
                _ => return Err(CliError::UnknownFlag(arg)),
            }
        }

        Ok(config)
    }
}

fn parse_page_size(name: &'static str, value: &str) -> Result<usize, CliError> {
    match value.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(CliError::InvalidSetting {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(CliError::InvalidSetting {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve(vars: &[(&str, &str)], args: &[&str]) -> Result<CliConfig, CliError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CliConfig::from_sources(
            |name| vars.get(name).cloned(),
            args.iter().map(|a| a.to_string()),
        )
    }

    #[test]
    fn test_defaults() {
        assert_eq!(resolve(&[], &[]).unwrap(), CliConfig::default());
    }

    #[test]
    fn test_environment() {
        let config = resolve(
            &[
                (ENV_BASE_URL, "http://localhost:9000"),
                (ENV_PAGE_SIZE, "25"),
                (ENV_OFFLINE, "yes"),
            ],
            &[],
        )
        .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(config.page_size, 25);
        assert!(config.offline);
    }

    #[test]
    fn test_flags_override_environment() {
        let config = resolve(&[(ENV_PAGE_SIZE, "25")], &["--page-size", "5", "--offline"]).unwrap();
        assert_eq!(config.page_size, 5);
        assert!(config.offline);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            resolve(&[(ENV_PAGE_SIZE, "0")], &[]),
            Err(CliError::InvalidSetting { .. })
        ));
        assert!(matches!(
            resolve(&[(ENV_OFFLINE, "maybe")], &[]),
            Err(CliError::InvalidSetting { .. })
        ));
        assert!(matches!(
            resolve(&[], &["--page-size"]),
            Err(CliError::InvalidSetting { .. })
        ));
        assert!(matches!(resolve(&[], &["--verbose"]), Err(CliError::UnknownFlag(_))));
    }
}
