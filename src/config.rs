//! Client configuration: where to send requests and how fast.

use std::num::{NonZeroU32, NonZeroUsize};

use url::Url;

const DEFAULT_API_ENDPOINT: &str = "https://api.airtable.com/v0";
const DEFAULT_RATE_LIMIT: NonZeroU32 = NonZeroU32::new(5).unwrap();
const DEFAULT_DELETE_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(10).unwrap();

/// An error encountered while resolving the configuration into a request.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The API endpoint is not a valid URL.
    #[error("Invalid API endpoint")]
    InvalidEndpoint(#[from] url::ParseError),
    /// The API endpoint is a URL, but not one that can have a path.
    #[error("API endpoint '{0}' cannot be used as a base URL")]
    EndpointCannotBeABase(String),
    /// An operation was called with an empty table name.
    #[error("Table name must not be empty")]
    EmptyTable,
    /// The assembled URL was rejected by the HTTP layer.
    #[error("Invalid URI")]
    InvalidUri(#[from] http::uri::InvalidUri),
    /// The request could not be assembled, usually because the API key is
    /// not a valid header value.
    #[error("Invalid request")]
    InvalidRequest(#[from] http::Error),
}

/// Everything needed to address and authenticate against one base.
#[derive(Clone)]
pub struct Config {
    /// The service root that base IDs are appended to.
    pub api_endpoint: Url,
    /// The bearer token sent with every request.
    pub api_key: String,
    /// The base (database) that all operations target.
    pub base_id: String,
    /// The steady-state number of requests admitted per second.
    pub rate_limit: NonZeroU32,
    /// The maximum number of record IDs sent in a single delete request.
    pub delete_batch_size: NonZeroUsize,
    /// The user-agent used on requests.
    pub user_agent: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_endpoint", &self.api_endpoint.as_str())
            .field("api_key", &"********")
            .field("base_id", &self.base_id)
            .field("rate_limit", &self.rate_limit)
            .field("delete_batch_size", &self.delete_batch_size)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Config {
    /// Create a configuration for the given base with the default endpoint,
    /// a rate limit of 5 requests per second, and delete batches of 10.
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_endpoint: Url::parse(DEFAULT_API_ENDPOINT)
                .expect("default endpoint should be a valid URL"),
            api_key: api_key.into(),
            base_id: base_id.into(),
            rate_limit: DEFAULT_RATE_LIMIT,
            delete_batch_size: DEFAULT_DELETE_BATCH_SIZE,
            user_agent: make_ua(None),
        }
    }

    /// Point the client at a different service root, for example a proxy or
    /// a local test server.
    pub fn with_api_endpoint(self, endpoint: &str) -> Result<Self, Error> {
        let api_endpoint = Url::parse(endpoint)?;
        if api_endpoint.cannot_be_a_base() {
            return Err(Error::EndpointCannotBeABase(endpoint.to_owned()));
        }

        Ok(Self {
            api_endpoint,
            ..self
        })
    }

    /// Change the number of requests admitted per second.
    pub fn with_rate_limit(self, per_second: NonZeroU32) -> Self {
        Self {
            rate_limit: per_second,
            ..self
        }
    }

    /// Change the number of IDs sent per delete request. The service rejects
    /// more than 10.
    pub fn with_delete_batch_size(self, size: NonZeroUsize) -> Self {
        Self {
            delete_batch_size: size,
            ..self
        }
    }

    /// Modifies the user-agent to have a different prefix.
    pub fn with_ua_product(self, ua_product: &str) -> Self {
        Self {
            user_agent: make_ua(Some(ua_product)),
            ..self
        }
    }

    /// The URL of a table, or of a single record within it.
    pub(crate) fn table_url(&self, table: &str, record_id: Option<&str>) -> Result<Url, Error> {
        if table.is_empty() {
            return Err(Error::EmptyTable);
        }

        let mut url = self.api_endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::EndpointCannotBeABase(self.api_endpoint.to_string()))?;
            segments.pop_if_empty().push(&self.base_id).push(table);
            if let Some(id) = record_id {
                segments.push(id);
            }
        }

        Ok(url)
    }
}

fn make_ua(product: Option<&str>) -> String {
    format!(
        "{}/{}",
        product.unwrap_or("airtable-rs"),
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn table_url_joins_segments() -> anyhow::Result<()> {
        let config = Config::new("key", "appXXX").with_api_endpoint("https://api.example.com/v0")?;

        let url = config.table_url("Tasks", None)?;
        assert_eq!(url.path(), "/v0/appXXX/Tasks");

        let url = config.table_url("Tasks", Some("rec123"))?;
        assert_eq!(url.path(), "/v0/appXXX/Tasks/rec123");
        Ok(())
    }

    #[test]
    fn trailing_slash_is_not_doubled() -> anyhow::Result<()> {
        let config = Config::new("key", "appXXX").with_api_endpoint("https://api.example.com/v0/")?;
        let url = config.table_url("Tasks", None)?;
        assert_eq!(url.as_str(), "https://api.example.com/v0/appXXX/Tasks");
        Ok(())
    }

    #[test]
    fn table_names_are_path_encoded() -> anyhow::Result<()> {
        let config = Config::new("key", "appXXX");
        let url = config.table_url("My Tasks", None)?;
        assert_eq!(url.path(), "/v0/appXXX/My%20Tasks");
        Ok(())
    }

    #[test]
    fn empty_table_is_rejected() {
        let config = Config::new("key", "appXXX");
        assert_matches!(config.table_url("", None), Err(Error::EmptyTable));
    }

    #[test]
    fn invalid_endpoint() {
        assert_matches!(
            Config::new("key", "appXXX").with_api_endpoint("not a url"),
            Err(Error::InvalidEndpoint(_))
        );
        assert_matches!(
            Config::new("key", "appXXX").with_api_endpoint("mailto:ops@example.com"),
            Err(Error::EndpointCannotBeABase(_))
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let config = Config::new("keySECRET", "appXXX");
        let debug = format!("{config:?}");
        assert!(!debug.contains("keySECRET"));
        assert!(debug.contains("appXXX"));
    }

    #[test]
    fn defaults() {
        let config = Config::new("key", "appXXX").with_ua_product("sync-job");
        assert_eq!(config.api_endpoint.as_str(), "https://api.airtable.com/v0");
        assert_eq!(config.rate_limit.get(), 5);
        assert_eq!(config.delete_batch_size.get(), 10);
        assert!(config.user_agent.starts_with("sync-job/"));
    }
}
