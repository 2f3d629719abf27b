//! Process configuration read from the environment.

use crate::provisioning::{
    adapters::{DEFAULT_GITHUB_API_URL, GitHubSettings},
    domain::PublishingTarget,
    services::{OrchestratorSettings, RetryPolicy},
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_VCS_HOST: &str = "github.com";
const DEFAULT_PAGES_HOST: &str = "github.io";
const DEFAULT_NOTIFY_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_NOTIFY_BASE_DELAY_MS: u64 = 1000;
const DEFAULT_LICENSE_HOLDER: &str = "Student";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Startup configuration failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `GITHUB_TOKEN` is unset or empty.
    #[error("GITHUB_TOKEN is required")]
    MissingToken,
    /// `STUDENT_SECRET` is unset or empty.
    #[error("STUDENT_SECRET is required")]
    MissingSecret,
    /// `GITHUB_USERNAME` is unset or empty.
    #[error("GITHUB_USERNAME is required")]
    MissingOwner,
    /// A numeric variable could not be parsed.
    #[error("{variable} must be a non-negative integer, got '{value}'")]
    InvalidNumber {
        /// Variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Immutable application configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Provider API token.
    pub github_token: String,
    /// Shared secret callers must present.
    pub student_secret: String,
    /// Account that owns created repositories.
    pub owner: String,
    /// Listening port.
    pub port: u16,
    /// Provider API base URL.
    pub github_api_url: String,
    /// Transport timeout applied to each provider call.
    pub provider_timeout: Duration,
    /// Host used in repository URLs.
    pub vcs_host: String,
    /// Host suffix used in static hosting URLs.
    pub pages_host: String,
    /// Delivery attempts per result.
    pub notify_max_attempts: u32,
    /// Delay before the first delivery retry.
    pub notify_base_delay: Duration,
    /// Copyright holder written into generated licences.
    pub license_holder: String,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// numeric variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary lookup function.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// numeric variable is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let github_token = read("GITHUB_TOKEN").ok_or(ConfigError::MissingToken)?;
        let student_secret = read("STUDENT_SECRET").ok_or(ConfigError::MissingSecret)?;
        let owner = read("GITHUB_USERNAME").ok_or(ConfigError::MissingOwner)?;
        let notify_max_attempts =
            parse_number(read("NOTIFY_MAX_ATTEMPTS"), "NOTIFY_MAX_ATTEMPTS")?
                .unwrap_or(DEFAULT_NOTIFY_MAX_ATTEMPTS);
        let notify_base_delay_ms =
            parse_number(read("NOTIFY_BASE_DELAY_MS"), "NOTIFY_BASE_DELAY_MS")?
                .unwrap_or(DEFAULT_NOTIFY_BASE_DELAY_MS);
        let provider_timeout_secs =
            parse_number(read("GITHUB_TIMEOUT_SECS"), "GITHUB_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS);

        Ok(Self {
            github_token,
            student_secret,
            owner,
            port: parse_number(read("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT),
            github_api_url: read("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_owned()),
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            vcs_host: read("GITHUB_HOST").unwrap_or_else(|| DEFAULT_VCS_HOST.to_owned()),
            pages_host: read("PAGES_HOST").unwrap_or_else(|| DEFAULT_PAGES_HOST.to_owned()),
            notify_max_attempts,
            notify_base_delay: Duration::from_millis(notify_base_delay_ms),
            license_holder: read("LICENSE_HOLDER")
                .unwrap_or_else(|| DEFAULT_LICENSE_HOLDER.to_owned()),
        })
    }

    /// Returns the publishing target derived from the owner and hosts.
    #[must_use]
    pub fn publishing_target(&self) -> PublishingTarget {
        PublishingTarget::new(&self.owner, &self.vcs_host, &self.pages_host)
    }

    /// Returns settings for the GitHub provider adapter.
    #[must_use]
    pub fn github_settings(&self) -> GitHubSettings {
        GitHubSettings::new(&self.github_token, &self.owner)
            .with_api_url(&self.github_api_url)
            .with_request_timeout(self.provider_timeout)
    }

    /// Returns orchestrator settings.
    #[must_use]
    pub fn orchestrator_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings::new(&self.student_secret, self.publishing_target())
    }

    /// Returns the delivery retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.notify_max_attempts, self.notify_base_delay)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("github_token", &"<redacted>")
            .field("student_secret", &"<redacted>")
            .field("owner", &self.owner)
            .field("port", &self.port)
            .field("github_api_url", &self.github_api_url)
            .field("provider_timeout", &self.provider_timeout)
            .field("vcs_host", &self.vcs_host)
            .field("pages_host", &self.pages_host)
            .field("notify_max_attempts", &self.notify_max_attempts)
            .field("notify_base_delay", &self.notify_base_delay)
            .field("license_holder", &self.license_holder)
            .finish()
    }
}

fn parse_number<T: FromStr>(
    value: Option<String>,
    variable: &'static str,
) -> Result<Option<T>, ConfigError> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidNumber { variable, value: raw })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::provisioning::domain::ProjectIdentifier;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;
    use std::time::Duration;

    #[fixture]
    fn required() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("GITHUB_TOKEN", "ghp_example"),
            ("STUDENT_SECRET", "s3cret"),
            ("GITHUB_USERNAME", "octo"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|name| vars.get(name).map(|value| (*value).to_owned()))
    }

    #[rstest]
    fn applies_defaults(required: HashMap<&'static str, &'static str>) {
        let config = load(&required).expect("config should load");

        assert_eq!(config.port, 3000);
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
        assert_eq!(config.vcs_host, "github.com");
        assert_eq!(config.pages_host, "github.io");
        assert_eq!(config.notify_max_attempts, 5);
        assert_eq!(config.notify_base_delay, Duration::from_secs(1));
        assert_eq!(config.license_holder, "Student");
    }

    #[rstest]
    fn reads_overrides(mut required: HashMap<&'static str, &'static str>) {
        required.insert("PORT", "8080");
        required.insert("GITHUB_API_URL", "http://127.0.0.1:9000");
        required.insert("NOTIFY_MAX_ATTEMPTS", "2");
        required.insert("NOTIFY_BASE_DELAY_MS", "0");
        required.insert("LICENSE_HOLDER", "Ada Lovelace");
        required.insert("GITHUB_TIMEOUT_SECS", "5");

        let config = load(&required).expect("config should load");

        assert_eq!(config.port, 8080);
        assert_eq!(config.github_api_url, "http://127.0.0.1:9000");
        assert_eq!(config.retry_policy().max_attempts(), 2);
        assert_eq!(config.retry_policy().base_delay(), Duration::ZERO);
        assert_eq!(config.license_holder, "Ada Lovelace");
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert!(format!("{:?}", config.github_settings()).contains("5s"));
    }

    #[rstest]
    #[case("GITHUB_TOKEN", ConfigError::MissingToken)]
    #[case("STUDENT_SECRET", ConfigError::MissingSecret)]
    #[case("GITHUB_USERNAME", ConfigError::MissingOwner)]
    fn required_variables_are_enforced(
        mut required: HashMap<&'static str, &'static str>,
        #[case] variable: &'static str,
        #[case] expected: ConfigError,
    ) {
        required.remove(variable);
        assert_eq!(load(&required), Err(expected.clone()));

        required.insert(variable, "  ");
        assert_eq!(load(&required), Err(expected));
    }

    #[rstest]
    #[case("PORT", "eighty")]
    #[case("GITHUB_TIMEOUT_SECS", "-1")]
    fn rejects_malformed_numbers(
        mut required: HashMap<&'static str, &'static str>,
        #[case] variable: &'static str,
        #[case] value: &'static str,
    ) {
        required.insert(variable, value);

        assert_eq!(
            load(&required),
            Err(ConfigError::InvalidNumber {
                variable,
                value: value.to_owned(),
            })
        );
    }

    #[rstest]
    fn derives_publishing_urls(mut required: HashMap<&'static str, &'static str>) {
        required.insert("GITHUB_HOST", "git.example.test");
        required.insert("PAGES_HOST", "pages.example.test");
        let config = load(&required).expect("config should load");
        let target = config.publishing_target();
        let project = ProjectIdentifier::derive("demo", 42);

        assert_eq!(
            target.repository_url(&project),
            "https://git.example.test/octo/demo-42"
        );
        assert_eq!(
            target.pages_url(&project),
            "https://octo.pages.example.test/demo-42/"
        );
    }

    #[rstest]
    fn debug_output_redacts_credentials(required: HashMap<&'static str, &'static str>) {
        let config = load(&required).expect("config should load");
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("ghp_example"));
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("octo"));
    }
}
