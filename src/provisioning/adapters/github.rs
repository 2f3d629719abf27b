//! GitHub REST adapter for the repository provider port.

use crate::provisioning::{
    domain::{CommitRef, RepoRef},
    ports::{ProviderError, ProviderResult, RepositoryProvider},
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Public GitHub REST endpoint.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("pagesmith/", env!("CARGO_PKG_VERSION"));
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGES_BRANCH: &str = "main";
const PAGES_PATH: &str = "/";

/// Connection settings for [`GitHubProvider`].
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubSettings {
    api_url: String,
    token: String,
    owner: String,
    request_timeout: Duration,
}

impl GitHubSettings {
    /// Creates settings for the public GitHub API.
    #[must_use]
    pub fn new(token: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_owned(),
            token: token.into(),
            owner: owner.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Overrides the per-request transport timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Returns the owning account.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

impl fmt::Debug for GitHubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSettings")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Repository provider backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: Client,
    base_url: Url,
    settings: GitHubSettings,
}

#[derive(Debug, Serialize)]
struct CreateRepositoryBody<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    has_issues: bool,
    has_projects: bool,
    has_wiki: bool,
    auto_init: bool,
}

#[derive(Debug, Serialize)]
struct WriteFileBody<'a> {
    message: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct PagesBody<'a> {
    source: PagesSource<'a>,
}

#[derive(Debug, Serialize)]
struct PagesSource<'a> {
    branch: &'a str,
    path: &'a str,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    name: String,
    owner: OwnerResponse,
}

#[derive(Debug, Deserialize)]
struct OwnerResponse {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl GitHubProvider {
    /// Creates a provider from settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Misconfigured`] when the base URL or token is
    /// unusable or the HTTP client cannot be built.
    pub fn new(settings: GitHubSettings) -> ProviderResult<Self> {
        let base_url = Url::parse(&settings.api_url)
            .map_err(|err| ProviderError::Misconfigured(format!("invalid API URL: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ProviderError::Misconfigured(format!(
                "API URL '{}' cannot be used as a base",
                settings.api_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ProviderError::Misconfigured(format!("HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            settings,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> ProviderResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Misconfigured("API URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repository_endpoint(&self, repository: &RepoRef, tail: &[&str]) -> ProviderResult<Url> {
        let mut segments = vec!["repos", repository.owner(), repository.name()];
        segments.extend_from_slice(tail);
        self.endpoint(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.settings.token)
    }

    async fn send(&self, request: RequestBuilder) -> ProviderResult<Response> {
        let response = request.send().await.map_err(ProviderError::transport)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "GitHub response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|error| error.message)
            .unwrap_or(body);
        Err(ProviderError::rejected(status.as_u16(), message))
    }
}

#[async_trait]
impl RepositoryProvider for GitHubProvider {
    async fn create_repository(&self, name: &str, description: &str) -> ProviderResult<RepoRef> {
        let body = CreateRepositoryBody {
            name,
            description,
            private: false,
            has_issues: true,
            has_projects: true,
            has_wiki: true,
            auto_init: false,
        };
        let url = self.endpoint(&["user", "repos"])?;
        let response = self.send(self.request(Method::POST, url).json(&body)).await?;
        let created: RepositoryResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::InvalidResponse(err.to_string()))?;
        Ok(RepoRef::new(created.owner.login, created.name))
    }

    async fn write_file(
        &self,
        repository: &RepoRef,
        path: &str,
        content: &str,
        message: &str,
    ) -> ProviderResult<()> {
        let mut tail = vec!["contents"];
        tail.extend(path.split('/').filter(|segment| !segment.is_empty()));
        let url = self.repository_endpoint(repository, &tail)?;
        let body = WriteFileBody {
            message,
            content: STANDARD.encode(content.as_bytes()),
        };
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }

    async fn enable_static_hosting(&self, repository: &RepoRef) -> ProviderResult<()> {
        let url = self.repository_endpoint(repository, &["pages"])?;
        let body = PagesBody {
            source: PagesSource {
                branch: PAGES_BRANCH,
                path: PAGES_PATH,
            },
        };
        self.send(self.request(Method::POST, url).json(&body)).await?;
        Ok(())
    }

    async fn list_commits(&self, repository: &RepoRef) -> ProviderResult<Vec<CommitRef>> {
        let url = self.repository_endpoint(repository, &["commits"])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        let commits: Vec<CommitResponse> = response
            .json()
            .await
            .map_err(|err| ProviderError::InvalidResponse(err.to_string()))?;
        Ok(commits
            .into_iter()
            .map(|commit| CommitRef::new(commit.sha))
            .collect())
    }
}
