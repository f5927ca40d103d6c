use crate::cli::Cli;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Hostnames that may be reached over plain http.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API URL must use http or https, got '{0}://'")]
    UnsupportedScheme(String),
    #[error("API URL must include a host")]
    MissingHost,
    #[error("API URL must use https for non-localhost host '{0}'")]
    InsecureRemote(String),
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// Connection settings resolved from flags and environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub page_size: usize,
}

impl ApiConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let base_url = cli.api_url.trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;
        if cli.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(Self {
            base_url,
            token: cli.token.clone().filter(|t| !t.trim().is_empty()),
            page_size: cli.page_size,
        })
    }
}

/// Localhost may use any http(s) scheme; everything else must be https.
pub fn validate_base_url(base: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(base).map_err(|source| ConfigError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
    }

    let host = parsed.host_str().ok_or(ConfigError::MissingHost)?;
    if LOCALHOST_DOMAINS
        .iter()
        .any(|allowed| host.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if scheme != "https" {
        return Err(ConfigError::InsecureRemote(host.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn localhost_may_use_plain_http() {
        assert!(validate_base_url("http://localhost:3000/api").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn remote_hosts_need_https() {
        assert!(validate_base_url("https://cms.example.com/api").is_ok());
        assert!(matches!(
            validate_base_url("http://cms.example.com/api"),
            Err(ConfigError::InsecureRemote(host)) if host == "cms.example.com"
        ));
    }

    #[test]
    fn garbage_and_odd_schemes_are_rejected() {
        assert!(matches!(
            validate_base_url("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            validate_base_url("ftp://localhost/api"),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn from_cli_trims_trailing_slash_and_blank_token() {
        let cli = Cli::try_parse_from([
            "portfolio-admin",
            "labels",
            "--api-url",
            "https://cms.example.com/api/",
            "--token",
            "  ",
        ])
        .unwrap();
        let config = ApiConfig::from_cli(&cli).unwrap();
        assert_eq!(config.base_url, "https://cms.example.com/api");
        assert_eq!(config.token, None);
        assert_eq!(config.page_size, 10);
    }
}
