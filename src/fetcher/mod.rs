//! Account lookup by username: the boundary to the external profile source.

mod instagram;

pub use instagram::InstagramFetcher;

use crate::error::FetchError;
use crate::features::RawAccountFeatures;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawAccountFeatures, FetchError>> + Send + 'a>>;

/// Resolves a username to the raw counters the model consumes.
pub trait AccountFetcher: Send + Sync {
    fn fetch<'a>(&'a self, username: &'a str) -> FetchFuture<'a>;
}

/// Public profile metrics as reported by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// Canonical handle as returned by the source (may differ in case from the query)
    pub username: String,
    pub followers: u64,
    pub followees: u64,
    pub media_count: u64,
    pub is_private: bool,
}

impl From<&ProfileSnapshot> for RawAccountFeatures {
    fn from(p: &ProfileSnapshot) -> Self {
        RawAccountFeatures::from_counts(p.followers, p.followees, p.media_count, &p.username)
    }
}

/// Instagram handle syntax: 1 to 30 of ASCII letters, digits, `.` and `_`.
pub fn is_valid_username(username: &str) -> bool {
    (1..=30).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_maps_to_raw_features() {
        let p = ProfileSnapshot {
            username: "jane.doe_2024".to_string(),
            followers: 1500,
            followees: 300,
            media_count: 42,
            is_private: true,
        };
        let raw = RawAccountFeatures::from(&p);
        assert_eq!(raw.follower_count, 1500);
        assert_eq!(raw.following_count, 300);
        assert_eq!(raw.media_count, 42);
        assert_eq!(raw.username_digit_count, 4);
        assert_eq!(raw.username_length, 13);
    }

    #[test]
    fn username_syntax() {
        assert!(is_valid_username("instagram"));
        assert!(is_valid_username("a.b_c9"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("../etc/passwd"));
        assert!(!is_valid_username("ünïcode"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }
}
