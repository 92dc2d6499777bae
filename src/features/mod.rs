//! Account feature engineering: five raw counters → eight model features.
//!
//! This is the only definition of the ratio features. The serving path
//! ([`engineer`]) and the training-data path ([`dataset`]) both call
//! [`ratio`], so the two can never drift apart.

mod columns;
pub mod dataset;

pub use columns::{AlignedRow, FeatureColumns};

use serde::{Deserialize, Serialize};

pub const FOLLOWER_COUNT: &str = "userFollowerCount";
pub const FOLLOWING_COUNT: &str = "userFollowingCount";
pub const MEDIA_COUNT: &str = "userMediaCount";
pub const USERNAME_DIGIT_COUNT: &str = "usernameDigitCount";
pub const USERNAME_LENGTH: &str = "usernameLength";
pub const FOLLOWERS_FOLLOWING_RATIO: &str = "followers_following_ratio";
pub const FOLLOWERS_MEDIA_RATIO: &str = "followers_media_ratio";
pub const USERNAME_DIGIT_RATIO: &str = "username_digit_ratio";

/// Canonical column order of [`EngineeredFeatures::named`].
pub const ENGINEERED_COLUMNS: [&str; 8] = [
    FOLLOWER_COUNT,
    FOLLOWING_COUNT,
    MEDIA_COUNT,
    USERNAME_DIGIT_COUNT,
    USERNAME_LENGTH,
    FOLLOWERS_FOLLOWING_RATIO,
    FOLLOWERS_MEDIA_RATIO,
    USERNAME_DIGIT_RATIO,
];

/// The five directly observed account counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccountFeatures {
    #[serde(rename = "userFollowerCount")]
    pub follower_count: u64,
    #[serde(rename = "userFollowingCount")]
    pub following_count: u64,
    #[serde(rename = "userMediaCount")]
    pub media_count: u64,
    #[serde(rename = "usernameDigitCount")]
    pub username_digit_count: u64,
    #[serde(rename = "usernameLength")]
    pub username_length: u64,
}

impl RawAccountFeatures {
    /// Derive the username counters from a handle. Digits are ASCII decimal
    /// digits; length is in characters.
    pub fn from_counts(follower_count: u64, following_count: u64, media_count: u64, username: &str) -> Self {
        Self {
            follower_count,
            following_count,
            media_count,
            username_digit_count: username.chars().filter(char::is_ascii_digit).count() as u64,
            username_length: username.chars().count() as u64,
        }
    }

    /// Check the record invariants (`username_length >= 1`,
    /// `username_digit_count <= username_length`).
    ///
    /// Prediction does not require this; it is reported for callers that want
    /// to reject inconsistent records.
    pub fn validate(&self) -> Result<(), String> {
        if self.username_length == 0 {
            return Err("usernameLength must be at least 1".to_string());
        }
        if self.username_digit_count > self.username_length {
            return Err(format!(
                "usernameDigitCount ({}) exceeds usernameLength ({})",
                self.username_digit_count, self.username_length
            ));
        }
        Ok(())
    }
}

/// Raw counters plus the three derived ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineeredFeatures {
    #[serde(flatten)]
    pub raw: RawAccountFeatures,
    pub followers_following_ratio: f64,
    pub followers_media_ratio: f64,
    pub username_digit_ratio: f64,
}

impl EngineeredFeatures {
    /// Resolve a feature column by name.
    pub fn get(&self, column: &str) -> Option<f64> {
        let value = match column {
            FOLLOWER_COUNT => self.raw.follower_count as f64,
            FOLLOWING_COUNT => self.raw.following_count as f64,
            MEDIA_COUNT => self.raw.media_count as f64,
            USERNAME_DIGIT_COUNT => self.raw.username_digit_count as f64,
            USERNAME_LENGTH => self.raw.username_length as f64,
            FOLLOWERS_FOLLOWING_RATIO => self.followers_following_ratio,
            FOLLOWERS_MEDIA_RATIO => self.followers_media_ratio,
            USERNAME_DIGIT_RATIO => self.username_digit_ratio,
            _ => return None,
        };
        Some(value)
    }

    /// All eight features in [`ENGINEERED_COLUMNS`] order.
    pub fn named(&self) -> [(&'static str, f64); 8] {
        ENGINEERED_COLUMNS.map(|name| (name, self.get(name).unwrap_or(0.0)))
    }
}

/// `numerator / (denominator + 1)`. The denominator is a count, so the
/// divisor is always at least 1.
#[inline]
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    numerator / (denominator + 1.0)
}

/// Append the three ratio features to the raw counters.
pub fn engineer(raw: &RawAccountFeatures) -> EngineeredFeatures {
    EngineeredFeatures {
        raw: *raw,
        followers_following_ratio: ratio(raw.follower_count as f64, raw.following_count as f64),
        followers_media_ratio: ratio(raw.follower_count as f64, raw.media_count as f64),
        username_digit_ratio: ratio(raw.username_digit_count as f64, raw.username_length as f64),
    }
}
