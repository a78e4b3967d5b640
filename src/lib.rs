//! DrinkRate Rust Client Library
//!
//! A client for the DrinkRate drinks catalog and review API. The client keeps
//! local copies of the remote collections in an entity cache, applies user
//! mutations optimistically before the remote call resolves, and derives
//! filtered, paginated, tab-scoped views from the cached state.
//!
//! The remote store offers no update primitive for reviews (only create and
//! delete), no atomic favorite toggle, and no server push, so the consistency
//! of the local state is reconstructed entirely client-side with explicit
//! rollback on failure. See [`coordinator::Coordinator`] for the mutation
//! semantics and [`views`] for the pure projections.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod models;
pub mod session;
pub mod views;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use reqwest::Client;
use url::Url;

use crate::cache::EntityCache;
use crate::config::ClientOptions;
use crate::coordinator::Coordinator;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::models::{
    ProducerReview, Profile, ProfileUpdate, Review, ReviewDraft, TopRatedQuery, TopRatedRow,
};
use crate::session::Session;
use crate::views::SearchView;

/// The main entry point for the DrinkRate client
///
/// One instance holds the state of one session: the session context is
/// injected at construction and all cached state is scoped to it.
pub struct DrinkRate {
    gateway: Arc<Gateway>,
    cache: Arc<RwLock<EntityCache>>,
    coordinator: Coordinator,
    options: ClientOptions,
    epoch: Arc<AtomicU64>,
}

impl DrinkRate {
    /// Create an anonymous, read-only client
    ///
    /// # Example
    ///
    /// ```
    /// use drinkrate_client::DrinkRate;
    ///
    /// let client = DrinkRate::new("https://api.drinkrate.example/api").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_session(base_url, Session::Anonymous)
    }

    /// Create a client bound to an injected session context
    ///
    /// # Example
    ///
    /// ```
    /// use drinkrate_client::{DrinkRate, session::Session};
    ///
    /// let session = Session::authenticated("ana", "bearer-token");
    /// let client = DrinkRate::with_session("https://api.drinkrate.example/api", session).unwrap();
    /// ```
    pub fn with_session(base_url: &str, session: Session) -> Result<Self> {
        Self::with_options(base_url, session, ClientOptions::default())
    }

    /// Create a client with custom options
    pub fn with_options(base_url: &str, session: Session, options: ClientOptions) -> Result<Self> {
        let mut url = Url::parse(base_url)?;
        // Url::join treats the last path segment as a file without this
        if !url.path().ends_with('/') {
            url.set_path(&format!("{}/", url.path()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let gateway = Arc::new(Gateway::new(url, http, session));
        let cache = Arc::new(RwLock::new(EntityCache::default()));
        let epoch = Arc::new(AtomicU64::new(0));
        let coordinator = Coordinator::new(gateway.clone(), cache.clone(), epoch.clone());

        Ok(Self {
            gateway,
            cache,
            coordinator,
            options,
            epoch,
        })
    }

    /// The injected session context
    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    /// The client options
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The underlying gateway, for pass-through reads that bypass the cache
    /// (per-entity review listings, scoped producer fetches)
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Read access to the cached entity state
    ///
    /// Derived views consume these snapshots; cache entries cannot be mutated
    /// from outside the crate. Do not hold the guard across an await.
    pub fn cache(&self) -> RwLockReadGuard<'_, EntityCache> {
        self.cache.read().unwrap()
    }

    /// A search view preconfigured with the client's default page size
    pub fn search_view(&self) -> SearchView {
        SearchView::new(self.options.page_size)
    }

    /// Load the read-only catalog collections: drinks, producers, categories.
    ///
    /// Each collection is replaced wholesale as its fetch succeeds; on
    /// failure the previous snapshot stays in place and the error is
    /// surfaced.
    pub async fn load_catalog(&self) -> Result<()> {
        let drinks = self.gateway.drinks().await?;
        self.cache.write().unwrap().load_drinks(drinks);

        let producers = self.gateway.producers().await?;
        self.cache.write().unwrap().load_producers(producers);

        let categories = self.gateway.categories().await?;
        self.cache.write().unwrap().load_categories(categories);

        Ok(())
    }

    /// Load the owner-scoped collections: reviews, favorites, profile,
    /// producer reviews. Requires an authenticated session.
    ///
    /// If the core owner state fails to load, whatever was cached for the
    /// owner is discarded before the error is surfaced. A failing
    /// producer-review listing alone does not take down the rest: the other
    /// collections stay loaded and the error is still returned.
    pub async fn load_owner_state(&self) -> Result<()> {
        self.session().require_token()?;

        let loaded = async {
            let reviews = self.gateway.owner_reviews().await?;
            let favorites = self.gateway.favorites().await?;
            let profile = self.gateway.profile().await?;
            Ok::<_, Error>((reviews, favorites, profile))
        }
        .await;

        let (reviews, favorites, profile) = match loaded {
            Ok(state) => state,
            Err(err) => {
                self.cache.write().unwrap().clear_owner();
                return Err(err);
            }
        };

        let producer_reviews = self.gateway.owner_producer_reviews().await;

        let mut cache = self.cache.write().unwrap();
        cache.load_reviews(reviews);
        cache.load_favorites(favorites);
        cache.load_profile(profile);
        match producer_reviews {
            Ok(reviews) => {
                cache.load_producer_reviews(reviews);
                Ok(())
            }
            Err(err) => {
                cache.load_producer_reviews(Vec::new());
                Err(err)
            }
        }
    }

    /// Drop all cached state and discard the local application of any
    /// still-suspended mutation (logout / session teardown). In-flight remote
    /// requests are allowed to complete on the server side.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.cache.write().unwrap().clear();
    }

    // ----- optimistic mutations -----

    /// Toggle favorite membership for a drink; returns the new membership
    pub async fn toggle_favorite(&self, drink_id: &str) -> Result<bool> {
        self.coordinator.toggle_favorite(drink_id).await
    }

    /// Create or replace the owner's review for a drink
    pub async fn upsert_review(&self, drink_id: &str, draft: &ReviewDraft) -> Result<Review> {
        self.coordinator.upsert_review(drink_id, draft).await
    }

    /// Create or replace the owner's review for a producer
    pub async fn upsert_producer_review(
        &self,
        producer_id: &str,
        draft: &ReviewDraft,
    ) -> Result<ProducerReview> {
        self.coordinator
            .upsert_producer_review(producer_id, draft)
            .await
    }

    /// Delete the owner's review for a drink, if any
    pub async fn delete_review(&self, drink_id: &str) -> Result<bool> {
        self.coordinator.delete_review(drink_id).await
    }

    /// Delete the owner's review for a producer, if any
    pub async fn delete_producer_review(&self, producer_id: &str) -> Result<bool> {
        self.coordinator.delete_producer_review(producer_id).await
    }

    /// Replace the owner's profile wholesale
    pub async fn replace_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        self.coordinator.replace_profile(update).await
    }

    // ----- remote projections -----

    /// The remote top-rated ranking; parameters are passed through and the
    /// result bypasses the cache
    pub async fn top_rated(&self, query: &TopRatedQuery) -> Result<Vec<TopRatedRow>> {
        self.gateway.top_rated(query).await
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::models::{ProfileUpdate, ReviewDraft, TopRatedQuery, TopRatedSort};
    pub use crate::session::Session;
    pub use crate::views::{CatalogTab, DrinkFilter, SearchView, TabSelection};
    pub use crate::DrinkRate;
}
