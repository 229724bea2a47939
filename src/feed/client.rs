//! Blocking HTTP client for the search service.

use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::error::PullistError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches response bodies over HTTP.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    timeout: Duration,
}

impl FeedClient {
    /// Build a client with the default timeout.
    pub fn new() -> Result<Self, PullistError> {
        let client = Client::builder()
            .user_agent(concat!("pullist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// GET `url` with `params` as the query string and return the body.
    ///
    /// Non-2xx responses are errors.
    pub fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String, PullistError> {
        debug!("fetching {url} with {} parameter(s)", params.len());
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(self.timeout)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PullistError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text()?)
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot local HTTP server for client tests.

    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::{self, Receiver};
    use std::thread;

    use super::{Client, DEFAULT_TIMEOUT, FeedClient};

    /// Client that ignores proxy settings from the environment.
    pub(crate) fn local_client() -> FeedClient {
        FeedClient {
            client: Client::builder().no_proxy().build().unwrap(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Serve a single response; returns the base URL and the request line.
    pub(crate) fn serve_once(status: &str, body: &str) -> (String, Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            // Skip headers
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
            let _ = tx.send(request_line.trim().to_string());
        });

        (format!("http://{addr}/search"), rx)
    }
}

#[cfg(test)]
mod tests {
    use super::test_server::{local_client, serve_once};
    use super::*;

    #[test]
    fn test_client_timeout_builder() {
        let client = FeedClient::new().unwrap();
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        let client = client.with_timeout(Duration::from_secs(3));
        assert_eq!(client.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_get_encodes_query() {
        let (url, request) = serve_once("200 OK", "{}");
        let client = local_client();

        let body = client
            .get(&url, &[("term", "chat app"), ("limit", "5")])
            .unwrap();
        assert_eq!(body, "{}");

        let request_line = request.recv().unwrap();
        assert!(request_line.starts_with("GET /search?"), "{request_line}");
        assert!(request_line.contains("term=chat+app"), "{request_line}");
        assert!(request_line.contains("limit=5"), "{request_line}");
    }

    #[test]
    fn test_get_rejects_error_status() {
        let (url, _request) = serve_once("503 Service Unavailable", "busy");
        let client = local_client();

        let err = client.get(&url, &[]).unwrap_err();
        assert!(matches!(err, PullistError::Status { status: 503, .. }));
    }

    #[test]
    fn test_get_connection_refused() {
        // Bind then drop to find a port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = local_client();

        let err = client
            .get(&format!("http://127.0.0.1:{port}/search"), &[])
            .unwrap_err();
        assert!(matches!(err, PullistError::Http(_)));
    }
}
