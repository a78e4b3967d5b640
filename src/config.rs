//! Configuration options for the DrinkRate client

use std::time::Duration;

/// Configuration options for the DrinkRate client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied by the transport. A timeout surfaces as a
    /// network failure; the client imposes no timeout layer of its own.
    pub request_timeout: Option<Duration>,

    /// Page size used by newly created search views
    pub page_size: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            page_size: 10,
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the default search page size
    pub fn with_page_size(mut self, value: usize) -> Self {
        self.page_size = value;
        self
    }
}
