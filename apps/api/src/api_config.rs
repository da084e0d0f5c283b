use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use axum::http::HeaderName;
use fieldgate_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_USER_HEADER: &str = "x-forwarded-user";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub user_header: HeaderName,
    pub seed_demo_data: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 3001,
        };

        let user_header = lookup("FIELDGATE_USER_HEADER")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_HEADER.to_owned());
        let user_header = HeaderName::from_str(user_header.trim()).map_err(|error| {
            AppError::Validation(format!(
                "invalid FIELDGATE_USER_HEADER '{user_header}': {error}"
            ))
        })?;

        let seed_demo_data = match lookup("FIELDGATE_SEED_DEMO_DATA") {
            Some(value) => parse_flag("FIELDGATE_SEED_DEMO_DATA", value.as_str())?,
            None => true,
        };

        Ok(Self {
            api_host,
            api_port,
            user_header,
            seed_demo_data,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Validation(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;

        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AppError::Validation(format!(
            "{name} must be a boolean flag, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use fieldgate_core::AppError;

    use super::ApiConfig;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = config_from(&[]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_host, "127.0.0.1");
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.user_header.as_str(), "x-forwarded-user");
        assert!(config.seed_demo_data);
        assert_eq!(
            config.socket_address().map(|address| address.to_string()).ok(),
            Some("127.0.0.1:3001".to_owned())
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("API_HOST", "0.0.0.0"),
            ("API_PORT", "8080"),
            ("FIELDGATE_USER_HEADER", "X-Remote-User"),
            ("FIELDGATE_SEED_DEMO_DATA", "false"),
        ]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_port, 8080);
        assert_eq!(config.user_header.as_str(), "x-remote-user");
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn invalid_values_are_validation_errors() {
        assert!(matches!(
            config_from(&[("API_PORT", "not-a-port")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[("FIELDGATE_SEED_DEMO_DATA", "maybe")]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            config_from(&[("FIELDGATE_USER_HEADER", "bad header")]),
            Err(AppError::Validation(_))
        ));

        let config = config_from(&[("API_HOST", "localhost")]);
        assert!(config.is_ok());
        assert!(matches!(
            config.unwrap_or_else(|_| unreachable!()).socket_address(),
            Err(AppError::Validation(_))
        ));
    }
}
