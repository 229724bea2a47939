//! App list feed: sources, fetching and background workers.

pub mod client;
pub mod record;
pub mod worker;

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::error::PullistError;

pub use client::FeedClient;
pub use record::{AppList, AppRecord};
pub use worker::{FeedMessage, FeedWorker};

/// Default search endpoint.
pub const DEFAULT_SOURCE: &str = "https://itunes.apple.com/search";

/// Where the app list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    /// Search service queried over HTTP.
    Http { url: String },
    /// JSON response saved on disk.
    File { path: PathBuf },
}

impl FeedSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            FeedSource::Http {
                url: source.to_string(),
            }
        } else {
            FeedSource::File {
                path: PathBuf::from(source),
            }
        }
    }

    /// Short label for the title bar.
    pub fn label(&self) -> String {
        match self {
            FeedSource::Http { url } => url
                .split("://")
                .nth(1)
                .and_then(|rest| rest.split('/').next())
                .unwrap_or(url)
                .to_string(),
            FeedSource::File { path } => path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
        }
    }
}

/// Search parameters sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub term: String,
    pub limit: usize,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            term: "chat".to_string(),
            limit: 50,
        }
    }
}

/// Fetch the app list from `source`.
///
/// File sources ignore the query.
pub fn fetch_app_list(
    client: &FeedClient,
    source: &FeedSource,
    query: &FeedQuery,
) -> Result<AppList, PullistError> {
    let body = match source {
        FeedSource::Http { url } => {
            let limit = query.limit.to_string();
            client.get(
                url,
                &[
                    ("term", query.term.as_str()),
                    ("entity", "software"),
                    ("limit", limit.as_str()),
                ],
            )?
        }
        FeedSource::File { path } => fs::read_to_string(path)?,
    };

    let list = AppList::from_json(&body)?;
    info!(
        "fetched {} app(s) from {} for {:?}",
        list.len(),
        source.label(),
        query.term
    );
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::client::test_server::{local_client, serve_once};
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_source() {
        assert_eq!(
            FeedSource::parse("https://itunes.apple.com/search"),
            FeedSource::Http {
                url: "https://itunes.apple.com/search".to_string()
            }
        );
        assert_eq!(
            FeedSource::parse("apps.json"),
            FeedSource::File {
                path: PathBuf::from("apps.json")
            }
        );
    }

    #[test]
    fn test_source_label() {
        assert_eq!(FeedSource::parse(DEFAULT_SOURCE).label(), "itunes.apple.com");
        assert_eq!(FeedSource::parse("/tmp/data/apps.json").label(), "apps.json");
    }

    #[test]
    fn test_fetch_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"resultCount":1,"results":[{{"trackId":7,"trackName":"Seven"}}]}}"#
        )
        .unwrap();

        let source = FeedSource::File {
            path: file.path().to_path_buf(),
        };
        let list = fetch_app_list(&FeedClient::new().unwrap(), &source, &FeedQuery::default()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.results[0].track_name, "Seven");
    }

    #[test]
    fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FeedSource::File {
            path: dir.path().join("missing.json"),
        };
        let err = fetch_app_list(&FeedClient::new().unwrap(), &source, &FeedQuery::default()).unwrap_err();
        assert!(matches!(err, PullistError::Io(_)));
    }

    #[test]
    fn test_fetch_over_http() {
        let (url, request) = serve_once(
            "200 OK",
            r#"{"resultCount":1,"results":[{"trackId":9,"trackName":"Nine"}]}"#,
        );
        let source = FeedSource::parse(&url);
        let query = FeedQuery {
            term: "notes".to_string(),
            limit: 5,
        };

        let list = fetch_app_list(&local_client(), &source, &query).unwrap();
        assert_eq!(list.results[0].track_name, "Nine");

        let request_line = request.recv().unwrap();
        assert!(request_line.contains("term=notes"), "{request_line}");
        assert!(request_line.contains("entity=software"), "{request_line}");
        assert!(request_line.contains("limit=5"), "{request_line}");
    }

    #[test]
    fn test_fetch_over_http_bad_body() {
        let (url, _request) = serve_once("200 OK", "<html>");
        let source = FeedSource::parse(&url);
        let err = fetch_app_list(&local_client(), &source, &FeedQuery::default()).unwrap_err();
        assert!(matches!(err, PullistError::InvalidFeed(_)));
    }
}
