//! Remote mod catalog client
//!
//! Thin blocking gateway to the catalog's HTTP API. Every method is a single
//! network round trip returning decoded records; no retries, no caching. A
//! failed or empty response is the caller's problem to report.
//!
//! The catalog wraps every response body in a `{"data": ...}` envelope and
//! uses camelCase field names.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// Default catalog API base URL
const DEFAULT_CATALOG_URL: &str = "https://api.curseforge.com/v1";

/// Catalog game id for Minecraft
const GAME_ID_MINECRAFT: u32 = 432;

/// Game versions the reference deployment supports. Anything else is
/// rejected before a single network call is made.
pub const SUPPORTED_GAME_VERSIONS: [&str; 2] = ["1.17.1", "1.16.5"];

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Get HTTP timeout from environment variable or use default.
/// Cached for performance (only reads env var once).
pub(crate) fn http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("MODFETCH_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        // Clamp to reasonable range (5-300 seconds)
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// A mod as the catalog indexes it. Obtained per query; the installer never
/// mutates or caches these beyond a single command invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModRecord {
    pub id: u64,
    pub name: String,
}

/// A single downloadable file belonging to a mod.
///
/// `game_versions` interleaves game version strings and loader tags
/// ("1.17.1", "Fabric", ...); the selector tests membership for both kinds
/// against the same set.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRecord {
    #[serde(default)]
    pub file_name: Option<String>,
    /// Non-empty whenever `is_available` is true.
    #[serde(default)]
    pub download_url: String,
    /// File size in bytes.
    #[serde(default)]
    pub file_length: u64,
    pub file_date: DateTime<Utc>,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub dependencies: Vec<ArtifactDependency>,
}

fn default_available() -> bool {
    true
}

/// A dependency declared by an artifact. Only the mod id travels on the
/// wire; the full record is looked up lazily at install time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDependency {
    pub mod_id: u64,
}

/// Response envelope wrapping every catalog payload
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Blocking catalog API client
pub struct CatalogClient {
    agent: ureq::Agent,
    base_url: String,
}

impl CatalogClient {
    /// Create a client against the default catalog (or the
    /// `MODFETCH_CATALOG_URL` override).
    pub fn new() -> Self {
        let base = std::env::var("MODFETCH_CATALOG_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());
        Self::with_base(&base)
    }

    /// Create a client against a specific base URL (used by tests)
    pub fn with_base(base_url: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(http_timeout())
            .user_agent(concat!("modfetch/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a mod by its catalog id. `Ok(None)` when the catalog does not
    /// know the id.
    pub fn lookup_by_id(&self, id: u64) -> Result<Option<ModRecord>> {
        let url = format!("{}/mods/{}", self.base_url, id);
        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("catalog lookup failed for mod {}", id)),
        };
        let envelope: Envelope<ModRecord> = response
            .into_json()
            .with_context(|| format!("malformed catalog response for mod {}", id))?;
        Ok(Some(envelope.data))
    }

    /// Free-text search scoped to a game version. Returns the catalog's own
    /// (loose) matches; callers post-filter with [`crate::matcher::matches`].
    pub fn search(&self, game_version: &str, filter: &str) -> Result<Vec<ModRecord>> {
        let url = format!("{}/mods/search", self.base_url);
        let response = self
            .agent
            .get(&url)
            .query("gameId", &GAME_ID_MINECRAFT.to_string())
            .query("gameVersion", game_version)
            .query("searchFilter", filter)
            .call()
            .with_context(|| format!("catalog search failed for '{}'", filter))?;
        let envelope: Envelope<Vec<ModRecord>> = response
            .into_json()
            .context("malformed catalog search response")?;
        Ok(envelope.data)
    }

    /// Fetch the full file list for a mod. One round trip; the selector does
    /// all filtering client-side.
    pub fn files(&self, mod_id: u64) -> Result<Vec<ArtifactRecord>> {
        let url = format!("{}/mods/{}/files", self.base_url, mod_id);
        let response = self
            .agent
            .get(&url)
            .call()
            .with_context(|| format!("catalog file listing failed for mod {}", mod_id))?;
        let envelope: Envelope<Vec<ArtifactRecord>> = response
            .into_json()
            .with_context(|| format!("malformed file listing for mod {}", mod_id))?;
        Ok(envelope.data)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_by_id_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/306612"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": 306612, "name": "Fabric API" }
            })))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        let found = client.lookup_by_id(306612).unwrap();
        let record = found.expect("mod should resolve");
        assert_eq!(record.id, 306612);
        assert_eq!(record.name, "Fabric API");
    }

    #[tokio::test]
    async fn test_lookup_by_id_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        assert!(client.lookup_by_id(999).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_lookup_by_id_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        let result = client.lookup_by_id(1);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("catalog lookup failed"));
    }

    #[tokio::test]
    async fn test_search_passes_version_and_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/search"))
            .and(query_param("gameVersion", "1.17.1"))
            .and(query_param("searchFilter", "fabric api"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": 306612, "name": "Fabric API" },
                    { "id": 5, "name": "Fabric API (Forge)" }
                ]
            })))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        let mods = client.search("1.17.1", "fabric api").unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[0].name, "Fabric API");
    }

    #[tokio::test]
    async fn test_search_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        assert!(client.search("1.17.1", "nothing").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_error_is_err_not_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        assert!(client.search("1.17.1", "sodium").is_err());
    }

    #[tokio::test]
    async fn test_files_decodes_artifacts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/306612/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "fileName": "fabric-api-0.40.1.jar",
                    "downloadUrl": "https://cdn.example/fabric-api-0.40.1.jar",
                    "fileLength": 12345,
                    "fileDate": "2021-09-01T12:00:00Z",
                    "gameVersions": ["1.17.1", "Fabric"],
                    "isAvailable": true,
                    "dependencies": [{ "modId": 42, "relationType": 3 }]
                }]
            })))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        let files = client.files(306612).unwrap();
        assert_eq!(files.len(), 1);
        let file = &files[0];
        assert_eq!(file.file_name.as_deref(), Some("fabric-api-0.40.1.jar"));
        assert_eq!(file.file_length, 12345);
        assert_eq!(file.game_versions, vec!["1.17.1", "Fabric"]);
        assert!(file.is_available);
        assert_eq!(file.dependencies.len(), 1);
        assert_eq!(file.dependencies[0].mod_id, 42);
    }

    #[tokio::test]
    async fn test_files_defaults_for_sparse_records() {
        // Unavailable files may come back without a download URL
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mods/7/files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "fileDate": "2021-09-01T12:00:00Z",
                    "isAvailable": false
                }]
            })))
            .mount(&server)
            .await;

        let client = CatalogClient::with_base(&server.uri());
        let files = client.files(7).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].file_name.is_none());
        assert!(files[0].download_url.is_empty());
        assert!(!files[0].is_available);
        assert!(files[0].dependencies.is_empty());
    }

    #[test]
    fn test_timeout_is_reasonable() {
        let timeout = http_timeout();
        assert!(timeout.as_secs() >= 5);
        assert!(timeout.as_secs() <= 300);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CatalogClient::with_base("http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
