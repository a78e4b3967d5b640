//! Remote entity gateway: typed fetches against the DrinkRate REST API
//!
//! Translates a logical request into a transport call and returns either a
//! decoded value or a classified failure. The gateway never retries; retry
//! policy belongs to callers. Owner-scoped calls require the session to carry
//! a bearer credential and fail locally with [`Error::AuthRequired`] before
//! any network traffic otherwise.

use reqwest::Client;
use url::Url;

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::models::{
    Drink, Favorite, NewProducerReview, NewReview, Producer, ProducerReview, Profile,
    ProfileUpdate, Review, TopRatedQuery, TopRatedRow,
};
use crate::session::Session;

/// Typed client for the DrinkRate REST endpoints
pub struct Gateway {
    base_url: Url,
    http: Client,
    session: Session,
}

impl Gateway {
    pub(crate) fn new(base_url: Url, http: Client, session: Session) -> Self {
        Self {
            base_url,
            http,
            session,
        }
    }

    /// The session context this gateway forwards credentials from
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Error::from)
    }

    // ----- catalog (no auth) -----

    /// `GET /drinks`
    pub async fn drinks(&self) -> Result<Vec<Drink>> {
        log::debug!("fetching drink catalog");
        Fetch::get(&self.http, self.endpoint("drinks")?).execute().await
    }

    /// `GET /drinks/categories`
    pub async fn categories(&self) -> Result<Vec<String>> {
        Fetch::get(&self.http, self.endpoint("drinks/categories")?)
            .execute()
            .await
    }

    /// `GET /producers`
    pub async fn producers(&self) -> Result<Vec<Producer>> {
        log::debug!("fetching producer catalog");
        Fetch::get(&self.http, self.endpoint("producers")?)
            .execute()
            .await
    }

    /// `GET /producers/{id}`
    pub async fn producer(&self, producer_id: &str) -> Result<Producer> {
        Fetch::get(&self.http, self.endpoint(&format!("producers/{}", producer_id))?)
            .execute()
            .await
    }

    /// `GET /reviews/drink/{id}` — everyone's reviews of one drink
    pub async fn drink_reviews(&self, drink_id: &str) -> Result<Vec<Review>> {
        Fetch::get(
            &self.http,
            self.endpoint(&format!("reviews/drink/{}", drink_id))?,
        )
        .execute()
        .await
    }

    /// `GET /reviews/producer/{id}` — everyone's reviews of one producer
    pub async fn producer_reviews_for(&self, producer_id: &str) -> Result<Vec<ProducerReview>> {
        Fetch::get(
            &self.http,
            self.endpoint(&format!("reviews/producer/{}", producer_id))?,
        )
        .execute()
        .await
    }

    /// `GET /top-rated` — remote ranking, parameter pass-through
    pub async fn top_rated(&self, query: &TopRatedQuery) -> Result<Vec<TopRatedRow>> {
        Fetch::get(&self.http, self.endpoint("top-rated")?)
            .query("page", query.page)
            .query("per_page", query.per_page)
            .query("min_reviews", query.min_reviews)
            .query("sort", query.sort.as_param())
            .execute()
            .await
    }

    // ----- owner-scoped (bearer credential required) -----

    /// `GET /reviews` — the owner's drink reviews, drink-joined
    pub async fn owner_reviews(&self) -> Result<Vec<Review>> {
        let token = self.session.require_token()?;
        Fetch::get(&self.http, self.endpoint("reviews")?)
            .bearer_auth(token)
            .execute()
            .await
    }

    /// `POST /reviews`
    pub(crate) async fn create_review(&self, payload: &NewReview<'_>) -> Result<Review> {
        let token = self.session.require_token()?;
        log::debug!("creating review for drink {}", payload.drink_id);
        Fetch::post(&self.http, self.endpoint("reviews")?)
            .bearer_auth(token)
            .json(payload)?
            .execute()
            .await
    }

    /// `DELETE /reviews/{id}`
    pub async fn delete_review(&self, review_id: &str) -> Result<()> {
        let token = self.session.require_token()?;
        log::debug!("deleting review {}", review_id);
        Fetch::delete(&self.http, self.endpoint(&format!("reviews/{}", review_id))?)
            .bearer_auth(token)
            .execute_empty()
            .await
    }

    /// `GET /producer-reviews` — the owner's producer reviews
    pub async fn owner_producer_reviews(&self) -> Result<Vec<ProducerReview>> {
        let token = self.session.require_token()?;
        Fetch::get(&self.http, self.endpoint("producer-reviews")?)
            .bearer_auth(token)
            .execute()
            .await
    }

    /// `POST /producer-reviews`
    pub(crate) async fn create_producer_review(
        &self,
        payload: &NewProducerReview<'_>,
    ) -> Result<ProducerReview> {
        let token = self.session.require_token()?;
        log::debug!("creating review for producer {}", payload.producer_id);
        Fetch::post(&self.http, self.endpoint("producer-reviews")?)
            .bearer_auth(token)
            .json(payload)?
            .execute()
            .await
    }

    /// `DELETE /producer-reviews/{id}`
    pub async fn delete_producer_review(&self, review_id: &str) -> Result<()> {
        let token = self.session.require_token()?;
        log::debug!("deleting producer review {}", review_id);
        Fetch::delete(
            &self.http,
            self.endpoint(&format!("producer-reviews/{}", review_id))?,
        )
        .bearer_auth(token)
        .execute_empty()
        .await
    }

    /// `GET /favorites`
    pub async fn favorites(&self) -> Result<Vec<Favorite>> {
        let token = self.session.require_token()?;
        Fetch::get(&self.http, self.endpoint("favorites")?)
            .bearer_auth(token)
            .execute()
            .await
    }

    /// `POST /favorites`
    pub async fn add_favorite(&self, drink_id: &str) -> Result<()> {
        let token = self.session.require_token()?;
        Fetch::post(&self.http, self.endpoint("favorites")?)
            .bearer_auth(token)
            .json(&Favorite {
                drink_id: drink_id.to_owned(),
            })?
            .execute_empty()
            .await
    }

    /// `DELETE /favorites`
    pub async fn remove_favorite(&self, drink_id: &str) -> Result<()> {
        let token = self.session.require_token()?;
        Fetch::delete(&self.http, self.endpoint("favorites")?)
            .bearer_auth(token)
            .json(&Favorite {
                drink_id: drink_id.to_owned(),
            })?
            .execute_empty()
            .await
    }

    /// `GET /profile`
    pub async fn profile(&self) -> Result<Profile> {
        let token = self.session.require_token()?;
        Fetch::get(&self.http, self.endpoint("profile")?)
            .bearer_auth(token)
            .execute()
            .await
    }

    /// `PUT /profile` — idempotent wholesale replace
    pub async fn replace_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        let token = self.session.require_token()?;
        Fetch::put(&self.http, self.endpoint("profile")?)
            .bearer_auth(token)
            .json(update)?
            .execute()
            .await
    }
}
