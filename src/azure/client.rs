use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const API_VERSION: &str = "7.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Longest slice of a remote error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

// Organization names: letters, digits and hyphens, starting with an alphanumeric.
static RE_ORGANIZATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,49}$").unwrap());

// Characters Azure DevOps rejects in project names, plus the WIQL string quote.
static RE_PROJECT_FORBIDDEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|;#$*{},+=\[\]'\x00-\x1f\x7f]"#).unwrap());

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid {kind} name: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },
}

/// Caller-supplied credentials for a single request. Never persisted.
#[derive(Clone, serde::Deserialize)]
pub struct Credentials {
    #[serde(deserialize_with = "crate::support::deserialize_non_empty_string")]
    pub organization: String,
    #[serde(deserialize_with = "crate::support::deserialize_non_empty_string")]
    pub project: String,
    #[serde(deserialize_with = "crate::support::deserialize_non_empty_string")]
    pub pat: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("pat", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        pat: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            pat: pat.into(),
        }
    }

    /// Rejects names that could break out of a URL segment or a WIQL string literal.
    pub fn validate(&self) -> Result<(), AzureError> {
        if !RE_ORGANIZATION.is_match(&self.organization) {
            return Err(AzureError::InvalidIdentifier {
                kind: "organization",
                value: self.organization.clone(),
            });
        }

        let project = self.project.as_str();
        if project.is_empty()
            || project.chars().count() > 64
            || project.starts_with('_')
            || project.starts_with('.')
            || project.ends_with('.')
            || RE_PROJECT_FORBIDDEN.is_match(project)
        {
            return Err(AzureError::InvalidIdentifier {
                kind: "project",
                value: self.project.clone(),
            });
        }

        Ok(())
    }
}

/// Settings shared by every per-request client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    /// Overrides `https://{organization}.visualstudio.com`.
    pub base_url: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: None,
        }
    }
}

/// Azure DevOps REST client bound to one request's credentials.
pub struct AzureDevOpsClient {
    client: Client,
    credentials: Credentials,
    base_url: String,
}

impl AzureDevOpsClient {
    pub fn new(credentials: Credentials, options: &ClientOptions) -> Result<Self, AzureError> {
        credentials.validate()?;

        let client = Client::builder().timeout(options.timeout).build()?;
        let base_url = match &options.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.visualstudio.com", credentials.organization),
        };

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    pub fn organization(&self) -> &str {
        &self.credentials.organization
    }

    pub fn project(&self) -> &str {
        &self.credentials.project
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<T, AzureError> {
        log::debug!("Request: {} {}", method, url);
        if let Some(b) = &body
            && let Ok(json) = serde_json::to_string_pretty(b)
        {
            log::debug!("Request body: {}", json);
        }

        let mut request = self
            .client
            .request(method, url)
            .basic_auth("", Some(&self.credentials.pat))
            .header("Content-Type", "application/json");

        if let Some(b) = body {
            request = request.json(b);
        }

        let response = request.send().await?;
        let status = response.status();

        log::debug!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::debug!("Error response: {}", error_text);
            return Err(AzureError::Status {
                status: status.as_u16(),
                body: truncate_chars(&error_text, MAX_ERROR_BODY_CHARS),
            });
        }

        let response_text = response.text().await?;
        log::debug!("Response body: {} bytes", response_text.len());

        let data = serde_json::from_str(&response_text)?;
        Ok(data)
    }

    /// Request scoped to the project: `{base}/{project}/_apis/{path}`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<T, AzureError> {
        let url = format!(
            "{}/{}/_apis/{}",
            self.base_url,
            urlencoding::encode(&self.credentials.project),
            path
        );
        self.send(method, &url, body).await
    }

    /// Request at the organization level (not project-scoped).
    pub async fn org_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<T, AzureError> {
        let url = format!("{}/_apis/{}", self.base_url, path);
        self.send(method, &url, body).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AzureError> {
        self.request(Method::GET, path, None::<&String>).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + ?Sized),
    ) -> Result<T, AzureError> {
        self.request(Method::POST, path, Some(body)).await
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
