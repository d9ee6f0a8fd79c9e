use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::error::WeatherstackError;

pub mod http;

pub use http::HttpTransport;

/// The HTTP side of the client: URL building and GET.
///
/// The historical call only produces a relative path. Implementations turn
/// it into an absolute URL (adding credentials) and fetch the JSON document.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Absolute URL for a path such as `historical?query=Berlin`.
    fn url(&self, path: &str) -> Result<String, WeatherstackError>;

    /// Perform a GET and return the decoded JSON body.
    ///
    /// Transport failures, error statuses and service error envelopes are
    /// reported as errors.
    async fn get(&self, url: &str) -> Result<Value, WeatherstackError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    fn url(&self, path: &str) -> Result<String, WeatherstackError> {
        (**self).url(path)
    }

    async fn get(&self, url: &str) -> Result<Value, WeatherstackError> {
        (**self).get(url).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn url(&self, path: &str) -> Result<String, WeatherstackError> {
        (**self).url(path)
    }

    async fn get(&self, url: &str) -> Result<Value, WeatherstackError> {
        (**self).get(url).await
    }
}
