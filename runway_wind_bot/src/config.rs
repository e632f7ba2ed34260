use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use runway_wind::{SafetyThresholds, metar::SpeedBasis};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::debug;

use crate::error::{ApplicationError, ApplicationResult};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");
const ENVIRONMENT_PREFIX: &str = "RUNWAY_WIND";

pub(crate) fn runway_wind_bot_project_dir() -> ApplicationResult<ProjectDirs> {
    ProjectDirs::from("", "meltinglava", "runway_wind_bot").ok_or(ApplicationError::NoConfigDirectory)
}

/// Settings loaded once at startup and only read afterwards.
#[derive(Debug)]
pub(crate) struct BotConfig {
    config_file_path: PathBuf,
    config: Configurable,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
struct StoredTokens<'a> {
    airportdb_api_token: Option<&'a str>,
    checkwx_api_key: Option<&'a str>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Deserialize)]
struct Configurable {
    airportdb_api_token: Option<String>,
    checkwx_api_key: Option<String>,
    timezone: String,
    #[serde(default)]
    speed_basis: SpeedBasis,
    http_timeout_secs: u64,
    http_retries: u32,
    #[serde(default)]
    safety: SafetyThresholds,
}

impl BotConfig {
    pub fn load(clean_config: bool) -> ApplicationResult<Self> {
        let config_dir = runway_wind_bot_project_dir()?.config_dir().to_path_buf();
        let config_file_path = config_dir.join("config.toml");
        if !config_file_path.exists() {
            fs::create_dir_all(&config_dir)?;
            fs::write(&config_file_path, DEFAULT_CONFIG)?;
            debug!("Wrote default config to {:?}", config_file_path);
        }

        let config = read_configuration(Some(&config_file_path))?;
        if clean_config {
            reset_configuration(&config_file_path, &config)?;
            return Self::load(false);
        }

        Ok(Self {
            config_file_path,
            config,
        })
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_file_path
    }

    pub fn safety(&self) -> &SafetyThresholds {
        &self.config.safety
    }

    pub fn speed_basis(&self) -> SpeedBasis {
        self.config.speed_basis
    }

    pub fn timezone(&self) -> &str {
        &self.config.timezone
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.config.http_timeout_secs)
    }

    pub fn http_retries(&self) -> u32 {
        self.config.http_retries
    }

    pub fn checkwx_api_key(&self) -> ApplicationResult<&str> {
        self.config
            .checkwx_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ApplicationError::MissingApiToken("checkwx_api_key"))
    }

    pub fn airportdb_api_token(&self) -> ApplicationResult<&str> {
        self.config
            .airportdb_api_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or(ApplicationError::MissingApiToken("airportdb_api_token"))
    }

    /// The effective configuration as pretty JSON, with secrets masked.
    pub fn describe(&self) -> ApplicationResult<String> {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| "********".to_string());
        let masked = Configurable {
            airportdb_api_token: mask(&self.config.airportdb_api_token),
            checkwx_api_key: mask(&self.config.checkwx_api_key),
            timezone: self.config.timezone.clone(),
            ..self.config
        };
        Ok(serde_json::to_string_pretty(&masked)?)
    }
}

/// Defaults first, then the user file, then `RUNWAY_WIND_*` variables.
fn read_configuration(config_file_path: Option<&Path>) -> ApplicationResult<Configurable> {
    read_configuration_with(config_file_path, Environment::with_prefix(ENVIRONMENT_PREFIX))
}

fn read_configuration_with(
    config_file_path: Option<&Path>,
    environment: Environment,
) -> ApplicationResult<Configurable> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
    if let Some(path) = config_file_path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let configurable = builder
        .add_source(environment)
        .build()?
        .try_deserialize::<Configurable>()?;
    Ok(configurable)
}

/// Rewrites the config file with the defaults, keeping any tokens that
/// were stored in it.
fn reset_configuration(config_file_path: &Path, current: &Configurable) -> ApplicationResult<()> {
    let tokens = StoredTokens {
        airportdb_api_token: current.airportdb_api_token.as_deref(),
        checkwx_api_key: current.checkwx_api_key.as_deref(),
    };
    let mut raw_config_file = toml::to_string_pretty(&tokens)?;
    if !raw_config_file.is_empty() {
        raw_config_file.push('\n');
    }
    raw_config_file.push_str(DEFAULT_CONFIG);
    fs::write(config_file_path, raw_config_file)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    impl BotConfig {
        pub fn new_for_test() -> Self {
            Self {
                config_file_path: PathBuf::from("config.toml"),
                config: Configurable {
                    airportdb_api_token: Some("airportdb-test".to_string()),
                    checkwx_api_key: Some("checkwx-test".to_string()),
                    ..read_configuration(None).expect("Failed to read default configuration")
                },
            }
        }
    }

    #[test]
    fn test_default_configuration() {
        let config = read_configuration(Some(Path::new("config.toml"))).unwrap();
        assert_eq!(config.timezone, "Europe/Warsaw");
        assert_eq!(config.speed_basis, SpeedBasis::Sustained);
        assert_eq!(config.http_retries, 3);
        assert_eq!(config.safety, SafetyThresholds::default());
    }

    #[test]
    fn test_missing_tokens_are_reported() {
        let config = BotConfig {
            config_file_path: PathBuf::from("config.toml"),
            config: Configurable {
                checkwx_api_key: Some(String::new()),
                ..read_configuration(None).unwrap()
            },
        };
        assert!(matches!(
            config.checkwx_api_key(),
            Err(ApplicationError::MissingApiToken("checkwx_api_key"))
        ));
        assert!(config.airportdb_api_token().is_err());
        assert_eq!(
            BotConfig::new_for_test().airportdb_api_token().unwrap(),
            "airportdb-test"
        );
    }

    #[test]
    fn test_describe_masks_tokens() {
        let description = BotConfig::new_for_test().describe().unwrap();
        assert!(!description.contains("checkwx-test"));
        assert!(description.contains("********"));
        assert!(description.contains("tailwind_unsafe_above_knots"));
    }

    #[test]
    fn test_reset_keeps_tokens() {
        let dir = std::env::temp_dir().join(format!("runway_wind_bot_test_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "timezone = 'UTC'\nhttp_retries = 9\n").unwrap();

        let current = Configurable {
            airportdb_api_token: Some("keep-me".to_string()),
            ..read_configuration(Some(&path)).unwrap()
        };
        assert_eq!(current.http_retries, 9);
        reset_configuration(&path, &current).unwrap();

        let reset = read_configuration(Some(&path)).unwrap();
        assert_eq!(reset.airportdb_api_token.as_deref(), Some("keep-me"));
        assert_eq!(reset.http_retries, 3);
        assert_eq!(reset.timezone, "Europe/Warsaw");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_reset_keeps_tokens_with_quotes() {
        let dir = std::env::temp_dir().join(format!(
            "runway_wind_bot_quotes_test_{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let token = r#"it's a "quoted" \ token"#;
        let current = Configurable {
            checkwx_api_key: Some(token.to_string()),
            ..read_configuration(Some(&path)).unwrap()
        };
        reset_configuration(&path, &current).unwrap();

        let reset = read_configuration(Some(&path)).unwrap();
        assert_eq!(reset.checkwx_api_key.as_deref(), Some(token));
        assert_eq!(reset.airportdb_api_token, None);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_environment_overrides_file() {
        let environment = [
            ("RUNWAY_WIND_CHECKWX_API_KEY", "from-env"),
            ("RUNWAY_WIND_TIMEZONE", "UTC"),
            ("OTHER_TIMEZONE", "Asia/Tokyo"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect::<config::Map<String, String>>();

        let config = read_configuration_with(
            Some(Path::new("config.toml")),
            Environment::with_prefix(ENVIRONMENT_PREFIX).source(Some(environment)),
        )
        .unwrap();
        assert_eq!(config.checkwx_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.timezone, "UTC");
        assert_eq!(config.airportdb_api_token, None);
        assert_eq!(config.http_retries, 3);
    }
}
