//! App records as returned by the search service.

use serde::Deserialize;

use crate::error::PullistError;

/// A single app in the feed.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppRecord {
    pub track_id: u64,
    pub track_name: String,
    pub description: String,
    pub artwork_url_60: String,
    pub seller_name: String,
    pub formatted_price: String,
    pub primary_genre_name: String,
    pub average_user_rating: Option<f64>,
}

impl AppRecord {
    /// First non-empty line of the description.
    pub fn summary(&self) -> &str {
        self.description
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }

    /// Rating rendered as stars, e.g. "★★★★☆ 4.3".
    pub fn rating_label(&self) -> Option<String> {
        let rating = self.average_user_rating?;
        let full = rating.round().clamp(0.0, 5.0) as usize;
        Some(format!(
            "{}{} {rating:.1}",
            "★".repeat(full),
            "☆".repeat(5 - full)
        ))
    }
}

/// Search response body.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppList {
    pub result_count: usize,
    pub results: Vec<AppRecord>,
}

impl AppList {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, PullistError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "resultCount": 2,
        "results": [
            {
                "trackId": 1001,
                "trackName": "Chatter",
                "description": "\n  Talk to friends.\nMore text here.",
                "artworkUrl60": "https://example.com/a.png",
                "sellerName": "Chatter Inc.",
                "formattedPrice": "Free",
                "primaryGenreName": "Social Networking",
                "averageUserRating": 4.34,
                "kind": "software"
            },
            {
                "trackId": 1002,
                "trackName": "Minimal"
            }
        ]
    }"#;

    #[test]
    fn test_parse_app_list() {
        let list = AppList::from_json(SAMPLE).unwrap();
        assert_eq!(list.result_count, 2);
        assert_eq!(list.len(), 2);

        let first = &list.results[0];
        assert_eq!(first.track_id, 1001);
        assert_eq!(first.track_name, "Chatter");
        assert_eq!(first.artwork_url_60, "https://example.com/a.png");
        assert_eq!(first.primary_genre_name, "Social Networking");
        assert_eq!(first.average_user_rating, Some(4.34));
    }

    #[test]
    fn test_missing_fields_default() {
        let list = AppList::from_json(SAMPLE).unwrap();
        let second = &list.results[1];
        assert_eq!(second.track_name, "Minimal");
        assert!(second.description.is_empty());
        assert!(second.average_user_rating.is_none());
        assert!(second.rating_label().is_none());
    }

    #[test]
    fn test_empty_object() {
        let list = AppList::from_json("{}").unwrap();
        assert!(list.is_empty());
        assert_eq!(list.result_count, 0);
    }

    #[test]
    fn test_invalid_json() {
        let err = AppList::from_json("<html>").unwrap_err();
        assert!(matches!(err, PullistError::InvalidFeed(_)));
    }

    #[test]
    fn test_summary_skips_blank_lines() {
        let list = AppList::from_json(SAMPLE).unwrap();
        assert_eq!(list.results[0].summary(), "Talk to friends.");
        assert_eq!(list.results[1].summary(), "");
    }

    #[test]
    fn test_rating_label() {
        let record = AppRecord {
            average_user_rating: Some(4.34),
            ..Default::default()
        };
        assert_eq!(record.rating_label().unwrap(), "★★★★☆ 4.3");

        let record = AppRecord {
            average_user_rating: Some(9.0),
            ..Default::default()
        };
        assert_eq!(record.rating_label().unwrap(), "★★★★★ 9.0");
    }
}
