//! Entity models for the DrinkRate catalog and owner annotations
//!
//! Identifiers are opaque strings assigned by the remote store; entity
//! equality is identifier equality. Drinks and producers are read-only
//! catalog data for the lifetime of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Taste-profile tags offered when writing a review
pub const TASTE_PROFILES: &[&str] = &["Sweet", "Sour", "Bitter", "Malt", "Smoke", "Tart & Funky"];

/// Preferred-style vocabulary for the profile
pub const PREFERRED_STYLES: &[&str] =
    &["Cocktail", "Spirit", "Wine", "Beer", "Liqueur", "Non-alcoholic"];

/// A drink from the read-only catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drink {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<Producer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A producer from the read-only catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Producer {
    pub id: String,
    pub name: String,
    /// Producer type; `type` is reserved in Rust
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
}

/// The owner's review of a drink
///
/// At most one review per (owner, drink) pair is meaningful to callers. The
/// remote store does not enforce that, so lookups treat the most recently
/// loaded matching record as "the" review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Server-assigned identifier; the wire field is `_id`
    #[serde(rename = "_id")]
    pub id: String,
    pub drink_id: String,
    pub rating: u8,
    #[serde(default)]
    pub tastes: Vec<String>,
    /// Free-text body; the wire field is `review`
    #[serde(default, rename = "review")]
    pub text: String,
    /// Drink join attached by the owner-reviews listing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drink: Option<Drink>,
}

/// The owner's review of a producer; same shape as [`Review`] but keyed by
/// producer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProducerReview {
    #[serde(rename = "_id")]
    pub id: String,
    pub producer_id: String,
    pub rating: u8,
    #[serde(default)]
    pub tastes: Vec<String>,
    #[serde(default, rename = "review")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<Producer>,
}

/// Favorite membership record: an (owner, drink) pair with no identity of its
/// own
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Favorite {
    pub drink_id: String,
}

/// The owner's profile. Counters and rank are derived server-side; the whole
/// record is replaced on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub preferred_style: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
    pub rank: String,
}

/// Wholesale profile replacement payload; there is no partial-field patch
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub bio: String,
    pub preferred_style: Option<String>,
}

/// User-entered review content, validated locally before any network call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Star rating, 1 through 5
    pub rating: u8,
    /// Selected taste tags; at least one is required to save
    pub tastes: Vec<String>,
    /// Optional free-text body
    pub text: String,
}

impl ReviewDraft {
    /// Start a draft with a rating
    pub fn new(rating: u8) -> Self {
        Self {
            rating,
            ..Self::default()
        }
    }

    /// Add a taste tag
    pub fn with_taste(mut self, taste: impl Into<String>) -> Self {
        self.tastes.push(taste.into());
        self
    }

    /// Set the free-text body
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(Error::Validation("rating must be between 1 and 5"));
        }
        if self.tastes.is_empty() {
            return Err(Error::Validation("at least one taste profile is required"));
        }
        Ok(())
    }
}

/// Create payload for `POST /reviews`
#[derive(Debug, Serialize)]
pub(crate) struct NewReview<'a> {
    pub drink_id: &'a str,
    pub rating: u8,
    pub review: &'a str,
    pub tastes: &'a [String],
}

/// Create payload for `POST /producer-reviews`
#[derive(Debug, Serialize)]
pub(crate) struct NewProducerReview<'a> {
    pub producer_id: &'a str,
    pub rating: u8,
    pub review: &'a str,
    pub tastes: &'a [String],
}

/// One row of the remote top-rated ranking
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TopRatedRow {
    pub drink: Drink,
    #[serde(default)]
    pub producer: Option<Producer>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

/// Sort key for the top-rated ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopRatedSort {
    /// Mean rating, descending
    #[default]
    AverageRating,
    /// Review count, descending
    ReviewCount,
}

impl TopRatedSort {
    pub(crate) fn as_param(self) -> &'static str {
        match self {
            TopRatedSort::AverageRating => "avg",
            TopRatedSort::ReviewCount => "count",
        }
    }
}

/// Parameters passed through to `GET /top-rated`
///
/// The ranking itself is computed by the remote store; this type only carries
/// the parameters and shares the 1-indexed pagination contract of the view
/// engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopRatedQuery {
    pub page: u32,
    pub per_page: u32,
    pub min_reviews: u32,
    pub sort: TopRatedSort,
}

impl Default for TopRatedQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 6,
            min_reviews: 2,
            sort: TopRatedSort::AverageRating,
        }
    }
}

impl TopRatedQuery {
    /// Set the 1-indexed page
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Only rank drinks with at least this many reviews
    pub fn with_min_reviews(mut self, min_reviews: u32) -> Self {
        self.min_reviews = min_reviews;
        self
    }

    /// Set the sort key
    pub fn with_sort(mut self, sort: TopRatedSort) -> Self {
        self.sort = sort;
        self
    }
}
