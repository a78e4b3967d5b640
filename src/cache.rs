//! Last-known-good snapshot of the remote collections
//!
//! The cache is the single source of truth for every derived view: no
//! component reads a mutation response directly to update presentation
//! state. Collections are replaced wholesale on load, never merged, so a
//! snapshot can't mix stale and fresh entries. Single-entity deltas are
//! crate-private and used only by the mutation coordinator for optimistic
//! edits and rollback.

use crate::models::{Drink, Favorite, Producer, ProducerReview, Profile, Review};

/// Cached entity state for one session
#[derive(Debug, Default)]
pub struct EntityCache {
    drinks: Vec<Drink>,
    producers: Vec<Producer>,
    categories: Vec<String>,
    reviews: Vec<Review>,
    producer_reviews: Vec<ProducerReview>,
    favorites: Vec<String>,
    profile: Option<Profile>,
}

impl EntityCache {
    // ----- wholesale loads -----

    pub(crate) fn load_drinks(&mut self, drinks: Vec<Drink>) {
        self.drinks = drinks;
    }

    pub(crate) fn load_producers(&mut self, producers: Vec<Producer>) {
        self.producers = producers;
    }

    pub(crate) fn load_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    pub(crate) fn load_reviews(&mut self, reviews: Vec<Review>) {
        self.reviews = reviews;
    }

    pub(crate) fn load_producer_reviews(&mut self, reviews: Vec<ProducerReview>) {
        self.producer_reviews = reviews;
    }

    pub(crate) fn load_favorites(&mut self, favorites: Vec<Favorite>) {
        self.favorites = favorites.into_iter().map(|f| f.drink_id).collect();
    }

    pub(crate) fn load_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    // ----- reads -----

    pub fn drinks(&self) -> &[Drink] {
        &self.drinks
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The owner's drink reviews, in load order
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// The owner's producer reviews, in load order
    pub fn producer_reviews(&self) -> &[ProducerReview] {
        &self.producer_reviews
    }

    /// Drink ids of the owner's favorites
    pub fn favorite_ids(&self) -> &[String] {
        &self.favorites
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Favorite membership for one drink
    pub fn is_favorite(&self, drink_id: &str) -> bool {
        self.favorites.iter().any(|id| id == drink_id)
    }

    /// The owner's review for a drink. When the store holds more than one
    /// record for the same drink the most recently loaded one wins; that is a
    /// documented tie-break, not a uniqueness guarantee.
    pub fn find_review(&self, drink_id: &str) -> Option<&Review> {
        self.reviews.iter().rev().find(|r| r.drink_id == drink_id)
    }

    /// The owner's review for a producer; same tie-break as [`find_review`](Self::find_review)
    pub fn find_producer_review(&self, producer_id: &str) -> Option<&ProducerReview> {
        self.producer_reviews
            .iter()
            .rev()
            .find(|r| r.producer_id == producer_id)
    }

    // ----- single-entity deltas (coordinator only, no network) -----

    pub(crate) fn upsert_review(&mut self, review: Review) {
        match self.reviews.iter_mut().find(|r| r.id == review.id) {
            Some(slot) => *slot = review,
            None => self.reviews.push(review),
        }
    }

    pub(crate) fn remove_review(&mut self, review_id: &str) {
        self.reviews.retain(|r| r.id != review_id);
    }

    pub(crate) fn upsert_producer_review(&mut self, review: ProducerReview) {
        match self.producer_reviews.iter_mut().find(|r| r.id == review.id) {
            Some(slot) => *slot = review,
            None => self.producer_reviews.push(review),
        }
    }

    pub(crate) fn remove_producer_review(&mut self, review_id: &str) {
        self.producer_reviews.retain(|r| r.id != review_id);
    }

    pub(crate) fn insert_favorite(&mut self, drink_id: &str) {
        if !self.is_favorite(drink_id) {
            self.favorites.push(drink_id.to_owned());
        }
    }

    pub(crate) fn remove_favorite(&mut self, drink_id: &str) {
        self.favorites.retain(|id| id != drink_id);
    }

    // ----- lifecycle -----

    /// Drop the owner-scoped sub-views, keeping the catalog
    pub(crate) fn clear_owner(&mut self) {
        self.reviews.clear();
        self.producer_reviews.clear();
        self.favorites.clear();
        self.profile = None;
    }

    /// Drop everything (logout)
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, drink_id: &str, rating: u8) -> Review {
        Review {
            id: id.to_owned(),
            drink_id: drink_id.to_owned(),
            rating,
            tastes: vec!["Bitter".to_owned()],
            text: String::new(),
            drink: None,
        }
    }

    #[test]
    fn find_review_prefers_most_recently_loaded_duplicate() {
        let mut cache = EntityCache::default();
        cache.load_reviews(vec![review("a", "42", 2), review("b", "42", 5)]);
        assert_eq!(cache.find_review("42").unwrap().id, "b");
    }

    #[test]
    fn upsert_replaces_by_id_or_appends() {
        let mut cache = EntityCache::default();
        cache.upsert_review(review("a", "42", 2));
        cache.upsert_review(review("a", "42", 4));
        assert_eq!(cache.reviews().len(), 1);
        assert_eq!(cache.reviews()[0].rating, 4);

        cache.upsert_review(review("b", "7", 3));
        assert_eq!(cache.reviews().len(), 2);
    }

    #[test]
    fn loads_replace_wholesale() {
        let mut cache = EntityCache::default();
        cache.load_reviews(vec![review("a", "1", 3), review("b", "2", 4)]);
        cache.load_reviews(vec![review("c", "3", 5)]);
        assert_eq!(cache.reviews().len(), 1);
        assert!(cache.find_review("1").is_none());
    }

    #[test]
    fn favorite_membership_round_trip() {
        let mut cache = EntityCache::default();
        cache.insert_favorite("9");
        cache.insert_favorite("9");
        assert_eq!(cache.favorite_ids(), ["9".to_owned()]);
        assert!(cache.is_favorite("9"));

        cache.remove_favorite("9");
        assert!(!cache.is_favorite("9"));
    }

    #[test]
    fn clear_owner_keeps_catalog() {
        let mut cache = EntityCache::default();
        cache.load_categories(vec!["Beer".to_owned()]);
        cache.insert_favorite("1");
        cache.upsert_review(review("a", "1", 5));
        cache.clear_owner();
        assert_eq!(cache.categories().len(), 1);
        assert!(cache.reviews().is_empty());
        assert!(cache.favorite_ids().is_empty());
    }
}
