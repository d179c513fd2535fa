use std::sync::Arc;

use crate::{ApiError, Error};

/// Sends a fully built request and collects the response body.
///
/// Implementations must be safe to share between threads if the
/// [`Client`](crate::Client) using them is.
pub trait Transport {
    /// Send the request. Non-200 statuses are not errors at this layer; only
    /// failures to exchange the request are.
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, Error>;
}

/// Build an agent that hands error statuses back as responses, so their
/// bodies can be read.
pub(crate) fn default_agent() -> ureq::Agent {
    ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .http_status_as_error(false)
            .build(),
    )
}

impl Transport for ureq::Agent {
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, Error> {
        let resp = self.run(req).map_err(|e| match e {
            // Only reachable if the agent was configured to treat statuses as
            // errors, in which case the body is gone.
            ureq::Error::StatusCode(code) => match http::StatusCode::from_u16(code) {
                Ok(status) => ApiError::new(status, &[]).into(),
                Err(e) => Error::transport(e),
            },
            e => Error::transport(e),
        })?;

        let (parts, mut body) = resp.into_parts();
        let body = body.read_to_vec().map_err(Error::transport)?;
        Ok(http::Response::from_parts(parts, body))
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, Error> {
        (**self).send(req)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, req: http::Request<String>) -> Result<http::Response<Vec<u8>>, Error> {
        (**self).send(req)
    }
}
