use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::{Config, Error, config};

mod error;
pub mod record;

pub use error::*;

/// Implemented by types that can be sent as requests to the records API.
pub trait ApiRequest: Sized {
    /// The corresponding response type.
    type Response: ApiResponse;

    /// The table the request addresses.
    fn table(&self) -> &str;

    /// The record the request addresses, if it targets a single one.
    fn record_id(&self) -> Option<&str> {
        None
    }

    /// The method to use.
    fn method(&self) -> http::Method {
        http::Method::GET
    }

    /// The serializable request body.
    fn body(&self) -> Option<impl Serialize> {
        None::<&()>
    }

    /// The serializable query string.
    fn query(&self) -> Option<impl Serialize> {
        None::<&()>
    }

    /// The full URL of the request, including the query string.
    fn url(&self, config: &Config) -> Result<Url, config::Error> {
        let mut url = config.table_url(self.table(), self.record_id())?;
        if let Some(qs) = self.query() {
            let qs =
                serde_qs::to_string(&qs).expect("query string serialization should be infallible");
            if !qs.is_empty() {
                url.set_query(Some(&qs));
            }
        }

        Ok(url)
    }

    /// Consume the request and return an [http::Request] suitable for passing
    /// to a [`Transport`](crate::Transport).
    fn into_request(self, config: &Config) -> Result<http::Request<String>, config::Error> {
        let uri: http::Uri = self.url(config)?.as_str().parse()?;
        let req = http::Request::builder()
            .method(self.method())
            .uri(uri)
            .header(
                http::header::AUTHORIZATION,
                format!("Bearer {}", config.api_key),
            )
            .header(http::header::USER_AGENT, &config.user_agent);

        let req = if let Some(body) = self.body() {
            let body_str =
                serde_json::to_string(&body).expect("JSON serialization should be infallible");
            req.header(http::header::CONTENT_TYPE, "application/json")
                .header(http::header::CONTENT_LENGTH, body_str.len())
                .body(body_str)?
        } else {
            req.body(String::new())?
        };

        Ok(req)
    }
}

/// Implemented by types that can be read as responses from the records API.
pub trait ApiResponse: Sized {
    /// Read the response from an [http::Response] object. Any status other
    /// than 200 is an [`Error::Api`].
    fn from_response(resp: http::Response<Vec<u8>>) -> Result<Self, Error> {
        let (parts, body) = resp.into_parts();
        if parts.status != http::StatusCode::OK {
            return Err(ApiError::new(parts.status, &body).into());
        }

        Self::from_body(parts.status, &body)
    }

    /// Read a successful response body.
    fn from_body(status: http::StatusCode, body: &[u8]) -> Result<Self, Error>;
}

/// A private trait for types that deserialize directly from a JSON body.
pub(crate) trait DataResponse: DeserializeOwned {}

impl<T: DataResponse> ApiResponse for T {
    fn from_body(status: http::StatusCode, body: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::error!("Failed to parse API response: {e:#?}");
            Error::Decode { status, source: e }
        })
    }
}

/// The response to a write whose body is not inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted;

impl ApiResponse for Accepted {
    fn from_body(_status: http::StatusCode, _body: &[u8]) -> Result<Self, Error> {
        Ok(Accepted)
    }
}
