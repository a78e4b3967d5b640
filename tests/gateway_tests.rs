use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drinkrate_client::config::ClientOptions;
use drinkrate_client::error::Error;
use drinkrate_client::models::{TopRatedQuery, TopRatedSort};
use drinkrate_client::session::Session;
use drinkrate_client::DrinkRate;

fn catalog_drinks() -> serde_json::Value {
    json!([
        {"id": "1", "name": "IPA Gold", "category": "Beer", "style_name": "IPA", "abv": 5.5},
        {"id": "2", "name": "Merlot Reserve", "category": "Wine", "abv": 13.0}
    ])
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/drinks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_drinks()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/producers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "p1", "name": "Old Mill", "type": "Brewery", "city": "Cluj", "country": "Romania"}
        ])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drinks/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Beer", "Wine"])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn load_catalog_populates_the_cache() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    client.load_catalog().await.unwrap();

    let cache = client.cache();
    assert_eq!(cache.drinks().len(), 2);
    assert_eq!(cache.drinks()[0].name, "IPA Gold");
    assert_eq!(cache.producers()[0].kind, "Brewery");
    assert_eq!(cache.categories(), ["Beer".to_owned(), "Wine".to_owned()]);
}

#[tokio::test]
async fn non_json_payload_surfaces_decode_failure_with_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drinks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway error</html>"))
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let err = client.load_catalog().await.unwrap_err();

    match err {
        Error::Decode(prefix) => assert!(prefix.starts_with("<html>")),
        other => panic!("expected Decode, got {:?}", other),
    }
}

#[tokio::test]
async fn non_2xx_surfaces_http_failure_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drinks"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let err = client.load_catalog().await.unwrap_err();

    assert!(matches!(err, Error::Http(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn failed_reload_keeps_the_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drinks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_drinks()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/producers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drinks/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Beer"])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // every later request fails
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    client.load_catalog().await.unwrap();
    assert!(client.load_catalog().await.is_err());

    assert_eq!(client.cache().drinks().len(), 2);
}

#[tokio::test]
async fn transport_timeout_is_a_network_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drinks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let options = ClientOptions::default().with_request_timeout(Some(Duration::from_millis(50)));
    let client = DrinkRate::with_options(&server.uri(), Session::Anonymous, options).unwrap();
    let err = client.load_catalog().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn owner_reads_forward_the_bearer_credential_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "r1", "drink_id": "1", "rating": 5, "tastes": ["Malt"], "review": "great"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"drink_id": "1"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "ana", "bio": "", "preferred_style": "Beer",
            "last_login": null, "review_count": 1, "rank": "Novice"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/producer-reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client =
        DrinkRate::with_session(&server.uri(), Session::authenticated("ana", "tok-123")).unwrap();
    client.load_owner_state().await.unwrap();

    let cache = client.cache();
    assert_eq!(cache.reviews().len(), 1);
    assert!(cache.is_favorite("1"));
    assert_eq!(cache.profile().unwrap().rank, "Novice");
}

#[tokio::test]
async fn anonymous_owner_read_is_refused_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let err = client.load_owner_state().await.unwrap_err();

    assert!(matches!(err, Error::AuthRequired));
}

#[tokio::test]
async fn failed_producer_review_listing_keeps_the_rest_of_owner_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"drink_id": "7"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "ana", "bio": "", "preferred_style": null,
            "last_login": null, "review_count": 0, "rank": "Novice"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/producer-reviews"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client =
        DrinkRate::with_session(&server.uri(), Session::authenticated("ana", "tok")).unwrap();
    let err = client.load_owner_state().await.unwrap_err();

    assert!(matches!(err, Error::Http(status) if status.as_u16() == 500));
    let cache = client.cache();
    assert!(cache.is_favorite("7"));
    assert!(cache.profile().is_some());
    assert!(cache.producer_reviews().is_empty());
}

#[tokio::test]
async fn top_rated_passes_parameters_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-rated"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "6"))
        .and(query_param("min_reviews", "3"))
        .and(query_param("sort", "count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "drink": {"id": "1", "name": "IPA Gold", "category": "Beer", "abv": 5.5},
                "producer": {"id": "p1", "name": "Old Mill", "type": "Brewery"},
                "avg_rating": 4.5,
                "review_count": 12
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let query = TopRatedQuery::default()
        .with_page(2)
        .with_min_reviews(3)
        .with_sort(TopRatedSort::ReviewCount);
    let rows = client.top_rated(&query).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].drink.name, "IPA Gold");
    assert_eq!(rows[0].review_count, 12);
    // pass-through only: nothing lands in the cache
    assert!(client.cache().drinks().is_empty());
}

#[tokio::test]
async fn drink_review_listing_decodes_everyones_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/drink/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "r1", "drink_id": "42", "rating": 5, "tastes": ["Malt"], "review": "great"},
            {"_id": "r2", "drink_id": "42", "rating": 3, "tastes": ["Bitter"], "review": ""}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let reviews = client.gateway().drink_reviews("42").await.unwrap();

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].id, "r1");
    assert_eq!(reviews[1].rating, 3);
}

#[tokio::test]
async fn producer_review_listing_decodes_everyones_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/producer/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "pr1", "producer_id": "p1", "rating": 4, "tastes": ["Smoke"], "review": "solid"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let reviews = client.gateway().producer_reviews_for("p1").await.unwrap();

    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].producer_id, "p1");
    assert_eq!(reviews[0].text, "solid");
}

#[tokio::test]
async fn scoped_producer_fetch_decodes_a_single_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/producers/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": "p1", "name": "Old Mill", "type": "Brewery", "city": "Cluj", "country": "Romania"}
        )))
        .mount(&server)
        .await;

    let client = DrinkRate::new(&server.uri()).unwrap();
    let producer = client.gateway().producer("p1").await.unwrap();

    assert_eq!(producer.name, "Old Mill");
}
