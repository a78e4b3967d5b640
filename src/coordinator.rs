//! Optimistic mutation coordinator
//!
//! The remote store only supports create and delete for reviews and
//! favorites; there is no update primitive, no atomic toggle, and no
//! transaction across a delete+create pair. The coordinator reconstructs
//! consistency client-side: it applies each mutation to the entity cache
//! optimistically, issues the compensating remote calls, and reconciles or
//! rolls back when they settle.
//!
//! Operations on the same key run in submission order through a per-key FIFO
//! queue; operations on different keys proceed independently. Without that
//! serialization a fast double-toggle can race so that the final remote state
//! contradicts the final cache state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::cache::EntityCache;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::models::{
    NewProducerReview, NewReview, ProducerReview, Profile, ProfileUpdate, Review, ReviewDraft,
};

/// Serialization key of one optimistic operation chain
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MutationKey {
    Favorite(String),
    Review(String),
    ProducerReview(String),
    Profile,
}

/// Per-key operation queues
///
/// Each key maps to a shared async mutex; tokio wakes waiters in FIFO order,
/// so holding the slot across the remote call serializes same-key operations
/// in submission order while unrelated keys never block each other. Slots are
/// tiny and bounded by the number of distinct entities touched in a session.
#[derive(Default)]
struct KeyQueues {
    slots: StdMutex<HashMap<MutationKey, Arc<AsyncMutex<()>>>>,
}

impl KeyQueues {
    async fn acquire(&self, key: MutationKey) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap();
            slots.entry(key).or_default().clone()
        };
        slot.lock_owned().await
    }
}

/// Applies user mutations optimistically and reconciles them with the remote
/// store
pub struct Coordinator {
    gateway: Arc<Gateway>,
    cache: Arc<RwLock<EntityCache>>,
    queues: KeyQueues,
    epoch: Arc<AtomicU64>,
}

impl Coordinator {
    pub(crate) fn new(
        gateway: Arc<Gateway>,
        cache: Arc<RwLock<EntityCache>>,
        epoch: Arc<AtomicU64>,
    ) -> Self {
        Self {
            gateway,
            cache,
            queues: KeyQueues::default(),
            epoch,
        }
    }

    fn epoch_now(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Whether a result observed under `observed` may still be applied to the
    /// cache. A bumped epoch means the session was reset while the call was
    /// suspended; the remote effect stands but the local application is
    /// discarded.
    fn epoch_current(&self, observed: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) == observed
    }

    /// Toggle favorite membership for a drink and return the new membership.
    ///
    /// The cache flips before the remote call is issued; on failure it is
    /// reverted to the exact pre-toggle state. Toggles on the same drink are
    /// serialized in submission order.
    pub async fn toggle_favorite(&self, drink_id: &str) -> Result<bool> {
        if drink_id.is_empty() {
            return Err(Error::Validation("drink id is required"));
        }
        self.gateway.session().require_token()?;

        let _slot = self
            .queues
            .acquire(MutationKey::Favorite(drink_id.to_owned()))
            .await;
        let epoch = self.epoch_now();

        let was_favorite = {
            let mut cache = self.cache.write().unwrap();
            let was = cache.is_favorite(drink_id);
            if was {
                cache.remove_favorite(drink_id);
            } else {
                cache.insert_favorite(drink_id);
            }
            was
        };

        let outcome = if was_favorite {
            self.gateway.remove_favorite(drink_id).await
        } else {
            self.gateway.add_favorite(drink_id).await
        };

        match outcome {
            Ok(()) => Ok(!was_favorite),
            Err(err) => {
                if self.epoch_current(epoch) {
                    let mut cache = self.cache.write().unwrap();
                    if was_favorite {
                        cache.insert_favorite(drink_id);
                    } else {
                        cache.remove_favorite(drink_id);
                    }
                }
                log::warn!("favorite toggle for drink {} rolled back: {}", drink_id, err);
                Err(err)
            }
        }
    }

    /// Create or replace the owner's review for a drink.
    ///
    /// The store has no update primitive, so an edit is emulated as
    /// delete-old-then-create-new. If the delete fails the operation aborts
    /// with cache and store unchanged. If the create fails after the delete
    /// succeeded, the old record is gone remotely and locally and the caller
    /// gets [`Error::PartialUpsert`]; it is never retried here, since a blind
    /// re-create risks duplicates once user-triggered retries race in.
    pub async fn upsert_review(&self, drink_id: &str, draft: &ReviewDraft) -> Result<Review> {
        if drink_id.is_empty() {
            return Err(Error::Validation("drink id is required"));
        }
        draft.validate()?;
        self.gateway.session().require_token()?;

        let _slot = self
            .queues
            .acquire(MutationKey::Review(drink_id.to_owned()))
            .await;
        let epoch = self.epoch_now();

        let existing = self.cache.read().unwrap().find_review(drink_id).cloned();
        if let Some(old) = &existing {
            self.gateway.delete_review(&old.id).await?;
        }

        let payload = NewReview {
            drink_id,
            rating: draft.rating,
            review: &draft.text,
            tastes: &draft.tastes,
        };
        let created = match self.gateway.create_review(&payload).await {
            Ok(review) => review,
            Err(err) => {
                if let Some(old) = &existing {
                    // the delete already took effect remotely
                    if self.epoch_current(epoch) {
                        self.cache.write().unwrap().remove_review(&old.id);
                    }
                    log::warn!(
                        "review replace for drink {} lost the previous review: {}",
                        drink_id,
                        err
                    );
                    return Err(Error::PartialUpsert(Box::new(err)));
                }
                return Err(err);
            }
        };

        if self.epoch_current(epoch) {
            let mut cache = self.cache.write().unwrap();
            if let Some(old) = &existing {
                cache.remove_review(&old.id);
            }
            cache.upsert_review(created.clone());
        }
        Ok(created)
    }

    /// Create or replace the owner's review for a producer; same contract as
    /// [`upsert_review`](Self::upsert_review)
    pub async fn upsert_producer_review(
        &self,
        producer_id: &str,
        draft: &ReviewDraft,
    ) -> Result<ProducerReview> {
        if producer_id.is_empty() {
            return Err(Error::Validation("producer id is required"));
        }
        draft.validate()?;
        self.gateway.session().require_token()?;

        let _slot = self
            .queues
            .acquire(MutationKey::ProducerReview(producer_id.to_owned()))
            .await;
        let epoch = self.epoch_now();

        let existing = self
            .cache
            .read()
            .unwrap()
            .find_producer_review(producer_id)
            .cloned();
        if let Some(old) = &existing {
            self.gateway.delete_producer_review(&old.id).await?;
        }

        let payload = NewProducerReview {
            producer_id,
            rating: draft.rating,
            review: &draft.text,
            tastes: &draft.tastes,
        };
        let created = match self.gateway.create_producer_review(&payload).await {
            Ok(review) => review,
            Err(err) => {
                if let Some(old) = &existing {
                    if self.epoch_current(epoch) {
                        self.cache.write().unwrap().remove_producer_review(&old.id);
                    }
                    log::warn!(
                        "review replace for producer {} lost the previous review: {}",
                        producer_id,
                        err
                    );
                    return Err(Error::PartialUpsert(Box::new(err)));
                }
                return Err(err);
            }
        };

        if self.epoch_current(epoch) {
            let mut cache = self.cache.write().unwrap();
            if let Some(old) = &existing {
                cache.remove_producer_review(&old.id);
            }
            cache.upsert_producer_review(created.clone());
        }
        Ok(created)
    }

    /// Delete the owner's review for a drink, if one exists. Returns whether
    /// a record was deleted. On failure the cache is left untouched.
    pub async fn delete_review(&self, drink_id: &str) -> Result<bool> {
        self.gateway.session().require_token()?;

        let _slot = self
            .queues
            .acquire(MutationKey::Review(drink_id.to_owned()))
            .await;
        let epoch = self.epoch_now();

        let existing = match self.cache.read().unwrap().find_review(drink_id).cloned() {
            Some(review) => review,
            None => return Ok(false),
        };

        self.gateway.delete_review(&existing.id).await?;
        if self.epoch_current(epoch) {
            self.cache.write().unwrap().remove_review(&existing.id);
        }
        Ok(true)
    }

    /// Delete the owner's review for a producer, if one exists
    pub async fn delete_producer_review(&self, producer_id: &str) -> Result<bool> {
        self.gateway.session().require_token()?;

        let _slot = self
            .queues
            .acquire(MutationKey::ProducerReview(producer_id.to_owned()))
            .await;
        let epoch = self.epoch_now();

        let existing = match self
            .cache
            .read()
            .unwrap()
            .find_producer_review(producer_id)
            .cloned()
        {
            Some(review) => review,
            None => return Ok(false),
        };

        self.gateway.delete_producer_review(&existing.id).await?;
        if self.epoch_current(epoch) {
            self.cache.write().unwrap().remove_producer_review(&existing.id);
        }
        Ok(true)
    }

    /// Replace the owner's profile wholesale and cache the server-confirmed
    /// record
    pub async fn replace_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        self.gateway.session().require_token()?;

        let _slot = self.queues.acquire(MutationKey::Profile).await;
        let epoch = self.epoch_now();

        let profile = self.gateway.replace_profile(update).await?;
        if self.epoch_current(epoch) {
            self.cache.write().unwrap().load_profile(profile.clone());
        }
        Ok(profile)
    }
}
