//! HTTP plumbing shared by every API call: error taxonomy, response
//! classification, the retry engine, credential headers and the transport seam.

pub mod auth;
pub mod classify;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod retry;
pub mod transport;


pub use auth::{AuthHeaders, EndpointFamily};
pub use classify::classify;
pub use error::{ApiError, ErrorKind, NetworkFailure, TransportError};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub use retry::{Backoff, RetryPolicy, RetryState};
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport};

use serde::de::DeserializeOwned;

/// One attempt: send, classify anything but 200, decode the body.
pub(crate) async fn get_json<T, R>(transport: &T, request: &HttpRequest) -> Result<R, ApiError>
where
    T: Transport,
    R: DeserializeOwned,
{
    let response = transport.get(request).await?;

    if response.status != 200 {
        return Err(classify(response.status, &response.headers, &response.body));
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}
