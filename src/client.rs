use std::fmt;

use reqwest::blocking::{Client, Response};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Method;

use crate::error::{NeonError, Result};
use crate::models::{self, ApiKeysListResponseItem, CurrentUserInfoResponse, ProjectListItem};
use crate::resource::Resource;
use crate::resources::{ApiKey, Branch, ListBranchesParams, ListProjectsParams, Project, User};

/// Crate version, reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable read by [`NeonClient::from_environ`].
pub const NEON_API_KEY_ENVIRON: &str = "NEON_API_KEY";

/// Default API root. Request paths are appended to it verbatim.
pub const NEON_API_BASE_URL: &str = "https://console.neon.tech/api/v2/";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("neon-client/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Request options
// ---------------------------------------------------------------------------

/// Optional parts of a request passed to [`NeonClient::request`].
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// Query string pairs, sent in order.
    pub query: Vec<(String, String)>,
    /// JSON body. `None` sends no body at all.
    pub json: Option<serde_json::Value>,
    /// Extra headers. The mandatory headers always win over these.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn json(json: serde_json::Value) -> Self {
        Self {
            json: Some(json),
            ..Default::default()
        }
    }
}

/// Drop pairs whose value is absent.
///
/// Every list operation compacts its query this way, so `cursor=None` never
/// reaches the wire.
pub fn compact_query<V: ToString>(pairs: &[(&str, Option<V>)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|(k, v)| v.as_ref().map(|v| (k.to_string(), v.to_string())))
        .collect()
}

/// Join URL path segments with `/`. No encoding or normalization.
pub fn url_join<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// Public client
// ---------------------------------------------------------------------------

/// Main entry point for interacting with the Neon API.
///
/// One client owns one connection session and may be shared across threads;
/// each call is a single blocking round trip with no retries.
///
/// ```no_run
/// use neon_client::NeonClient;
///
/// let client = NeonClient::from_environ().unwrap();
/// let me = client.me().unwrap();
/// println!("{:?}", me.email);
/// for key in client.api_keys().unwrap() {
///     println!("{key}");
/// }
/// ```
pub struct NeonClient {
    base_url: String,
    api_key: String,
    user_agent: String,
    http: Client,
}

impl NeonClient {
    /// Create a new client.
    ///
    /// * `api_key`  – Neon API key, sent as a bearer token
    /// * `base_url` – API root; `None` or `""` selects [`NEON_API_BASE_URL`]
    pub fn new(api_key: &str, base_url: Option<&str>) -> Result<Self> {
        let mut base_url = match base_url {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => NEON_API_BASE_URL.to_string(),
        };
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        // Reject keys that can never form a header before any request is made.
        HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| NeonError::InvalidHeader(format!("API key: {e}")))?;

        let http = Client::builder().build()?;

        Ok(Self {
            base_url,
            api_key: api_key.to_string(),
            user_agent: USER_AGENT.to_string(),
            http,
        })
    }

    /// Create a client from the `NEON_API_KEY` environment variable.
    ///
    /// Fails with [`NeonError::MissingApiKey`] when the variable is unset.
    pub fn from_environ() -> Result<Self> {
        let api_key = std::env::var(NEON_API_KEY_ENVIRON)
            .map_err(|_| NeonError::MissingApiKey(NEON_API_KEY_ENVIRON))?;
        Self::new(&api_key, None)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Join URL path segments with `/`.
    pub fn url_join<S: AsRef<str>>(&self, segments: &[S]) -> String {
        url_join(segments)
    }

    /// Headers sent with every request, overriding caller-supplied values.
    fn mandatory_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| NeonError::InvalidHeader(format!("API key: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let ua = HeaderValue::from_str(&self.user_agent)
            .map_err(|e| NeonError::InvalidHeader(format!("User-Agent: {e}")))?;
        headers.insert(header::USER_AGENT, ua);
        Ok(headers)
    }

    /// Send an authenticated request to `base_url + path` and decode the JSON
    /// response.
    ///
    /// A non-2xx status fails with [`NeonError::Api`] carrying the response
    /// text unchanged. A successful empty body decodes to `Value::Null`.
    pub fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<serde_json::Value> {
        let RequestOptions {
            query,
            json,
            mut headers,
        } = options;

        for (name, value) in self.mandatory_headers()? {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }

        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %url, "sending request");

        let mut req = self.http.request(method, url.as_str()).headers(headers);
        if !query.is_empty() {
            req = req.query(&query);
        }
        if let Some(body) = json {
            req = req.json(&body);
        }

        let resp = req.send()?;
        self.handle_response(resp)
    }

    /// Map status codes to errors and decode successful bodies.
    fn handle_response(&self, response: Response) -> Result<serde_json::Value> {
        let status = response.status();
        tracing::debug!(status = status.as_u16(), "received response");

        let text = response.text()?;

        if !status.is_success() {
            return Err(NeonError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    // -- convenience accessors -----------------------------------------------

    /// Get the current user.
    pub fn me(&self) -> Result<Resource<'_, CurrentUserInfoResponse>> {
        User::get_current_user_info(self)
    }

    /// List the API keys of the current user.
    pub fn api_keys(&self) -> Result<Vec<Resource<'_, ApiKeysListResponseItem>>> {
        ApiKey::list(self)
    }

    /// List projects.
    pub fn projects(
        &self,
        params: &ListProjectsParams,
    ) -> Result<Vec<Resource<'_, ProjectListItem>>> {
        Project::list(self, params)
    }

    /// List the branches of a project.
    pub fn branches(
        &self,
        project_id: &str,
        params: &ListBranchesParams,
    ) -> Result<Vec<Resource<'_, models::Branch>>> {
        Branch::list(self, project_id, params)
    }
}

impl fmt::Debug for NeonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeonClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_uses_single_slash() {
        assert_eq!(url_join(&["projects", "p-1", "branches"]), "projects/p-1/branches");
        assert_eq!(url_join(&["api_keys"]), "api_keys");
    }

    #[test]
    fn url_join_does_not_normalize() {
        assert_eq!(url_join(&["projects/", "x"]), "projects//x");
    }

    #[test]
    fn compact_query_drops_absent_values() {
        let q = compact_query(&[("cursor", None::<String>), ("limit", Some("10".to_string()))]);
        assert_eq!(q, vec![("limit".to_string(), "10".to_string())]);
    }

    #[test]
    fn base_url_defaults_and_gains_trailing_slash() {
        let c = NeonClient::new("k", None).unwrap();
        assert_eq!(c.base_url(), NEON_API_BASE_URL);

        let c = NeonClient::new("k", Some("")).unwrap();
        assert_eq!(c.base_url(), NEON_API_BASE_URL);

        let c = NeonClient::new("k", Some("http://localhost:1/api/v2")).unwrap();
        assert_eq!(c.base_url(), "http://localhost:1/api/v2/");
    }

    #[test]
    fn user_agent_carries_version() {
        let c = NeonClient::new("k", None).unwrap();
        assert_eq!(c.user_agent(), format!("neon-client/{VERSION}"));
    }

    #[test]
    fn debug_hides_api_key() {
        let c = NeonClient::new("super-secret", None).unwrap();
        let s = format!("{c:?}");
        assert!(s.contains(NEON_API_BASE_URL));
        assert!(!s.contains("super-secret"));
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let err = NeonClient::new("bad\nkey", None).unwrap_err();
        assert!(matches!(err, NeonError::InvalidHeader(_)));
    }
}
