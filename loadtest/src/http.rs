//! Contains a remote implementation using HTTP to reach the dataset service.

use anyhow::{Context, Result, bail};
use reqwest::Client;

use crate::workload::GetRequest;

/// The dataset service under test, reached over HTTP.
#[derive(Debug)]
pub struct HttpRemote {
    base: String,
    client: Client,
}

impl HttpRemote {
    /// Creates a new `HttpRemote` for the given base URL with a default client.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }

        Self {
            base,
            client: Client::new(),
        }
    }

    /// Issues a single GET request and drains the response body.
    ///
    /// Returns the body length in bytes. The body is never inspected beyond
    /// draining it; a transport error or non-success status is an error.
    pub(crate) async fn get(&self, request: &GetRequest) -> Result<u64> {
        let url = format!("{}{}", self.base, request.path);

        let mut builder = self.client.get(&url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("GET {} failed", request.path))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading body of {} failed", request.path))?;

        if !status.is_success() {
            bail!("GET {} returned {status}", request.path);
        }

        Ok(body.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed_from_the_base() {
        let remote = HttpRemote::new("https://api.checklistbank.org/");
        assert_eq!(remote.base, "https://api.checklistbank.org");
    }
}
