//! Google clients against a local mock server.

use agence_google::{
    GoogleApiError, GoogleConfig, OAuthCredentials, PlacesClient, SearchConsoleClient, TokenProvider,
};
use assert_matches::assert_matches;
use mockito::{Matcher, Server};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn credentials() -> OAuthCredentials {
    OAuthCredentials {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        refresh_token: "refresh-token".to_string(),
    }
}

fn token_provider(server: &Server) -> TokenProvider {
    TokenProvider::new(
        reqwest::Client::new(),
        format!("{}/token", server.url()),
        credentials(),
    )
}

async fn mock_token(server: &mut Server, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
            Matcher::UrlEncoded("refresh_token".into(), "refresh-token".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"access_token": "ya29.token", "expires_in": 3599, "token_type": "Bearer"}).to_string())
        .expect(hits)
        .create_async()
        .await
}

fn date(s: &str) -> chrono::NaiveDate {
    s.parse().unwrap()
}

// ---------------------------------------------------------------------------
// OAuth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn access_token_is_cached() {
    let mut server = Server::new_async().await;
    let token_mock = mock_token(&mut server, 1).await;

    let provider = token_provider(&server);
    assert_eq!(provider.access_token().await.unwrap(), "ya29.token");
    assert_eq!(provider.access_token().await.unwrap(), "ya29.token");

    token_mock.assert_async().await;
}

#[tokio::test]
async fn rejected_refresh_token_is_an_api_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create_async()
        .await;

    let err = token_provider(&server).access_token().await.unwrap_err();
    assert_matches!(err, GoogleApiError::ApiError { status: 400, ref body } if body.contains("invalid_grant"));
}

// ---------------------------------------------------------------------------
// Search Console
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_analytics_rows_are_mapped() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, 1).await;
    let query_mock = server
        .mock("POST", "/webmasters/v3/sites/sc-domain:example.fr/searchAnalytics/query")
        .match_header("authorization", "Bearer ya29.token")
        .match_body(Matcher::PartialJson(json!({
            "startDate": "2026-09-19",
            "endDate": "2026-10-16",
            "dimensions": ["query"],
            "rowLimit": 1000
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "rows": [
                    {"keys": ["création site web"], "clicks": 3, "impressions": 100, "ctr": 0.03, "position": 8.2},
                    {"keys": [], "clicks": 1, "impressions": 1, "ctr": 1.0, "position": 1.0}
                ],
                "responseAggregationType": "byProperty"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = SearchConsoleClient::new(
        reqwest::Client::new(),
        server.url(),
        "sc-domain:example.fr".to_string(),
        token_provider(&server),
    );
    let rows = client
        .query_rows(date("2026-09-19"), date("2026-10-16"), 1000)
        .await
        .unwrap();

    query_mock.assert_async().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].query, "création site web");
    assert_eq!(rows[0].impressions, 100.0);
    assert_eq!(rows[0].position, 8.2);
}

#[tokio::test]
async fn empty_window_has_no_rows() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, 1).await;
    let _mock = server
        .mock("POST", Matcher::Regex(r"^/webmasters/v3/sites/.+/searchAnalytics/query$".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"responseAggregationType": "byProperty"}"#)
        .create_async()
        .await;

    let client = SearchConsoleClient::new(
        reqwest::Client::new(),
        server.url(),
        "https://example.fr/".to_string(),
        token_provider(&server),
    );
    let rows = client
        .query_rows(date("2026-09-19"), date("2026-10-16"), 1000)
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn search_console_http_error_is_reported() {
    let mut server = Server::new_async().await;
    let _token = mock_token(&mut server, 1).await;
    let _mock = server
        .mock("POST", Matcher::Regex(r"^/webmasters/".to_string()))
        .with_status(403)
        .with_body("User does not have sufficient permission")
        .create_async()
        .await;

    let client = SearchConsoleClient::new(
        reqwest::Client::new(),
        server.url(),
        "sc-domain:example.fr".to_string(),
        token_provider(&server),
    );
    let err = client
        .query_rows(date("2026-09-19"), date("2026-10-16"), 10)
        .await
        .unwrap_err();
    assert_matches!(err, GoogleApiError::ApiError { status: 403, .. });
    assert!(!err.is_config_error());
}

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

fn places_client(server: &Server) -> PlacesClient {
    PlacesClient::new(
        reqwest::Client::new(),
        server.url(),
        "api-key".to_string(),
        "ChIJplace".to_string(),
        "fr".to_string(),
    )
}

#[tokio::test]
async fn place_reviews_are_mapped() {
    let mut server = Server::new_async().await;
    let details_mock = server
        .mock("GET", "/maps/api/place/details/json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("place_id".into(), "ChIJplace".into()),
            Matcher::UrlEncoded("fields".into(), "reviews".into()),
            Matcher::UrlEncoded("key".into(), "api-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "status": "OK",
                "result": {
                    "reviews": [{
                        "author_name": "Camille D.",
                        "author_url": "https://www.google.com/maps/contrib/1",
                        "profile_photo_url": "https://lh3.googleusercontent.com/a/photo",
                        "rating": 5,
                        "relative_time_description": "il y a 2 mois",
                        "text": "Très bon travail",
                        "language": "fr",
                        "time": 1777714200
                    }]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let reviews = places_client(&server).fetch_reviews().await.unwrap();

    details_mock.assert_async().await;
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].author_name, "Camille D.");
    assert_eq!(reviews[0].rating, 5);
    assert_eq!(reviews[0].published_at.timestamp(), 1_777_714_200);
}

#[tokio::test]
async fn place_without_reviews_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/maps/api/place/details/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "OK", "result": {}}"#)
        .create_async()
        .await;

    assert!(places_client(&server).fetch_reviews().await.unwrap().is_empty());
}

#[tokio::test]
async fn places_error_status_is_reported() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/maps/api/place/details/json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#)
        .create_async()
        .await;

    let err = places_client(&server).fetch_reviews().await.unwrap_err();
    assert_matches!(
        err,
        GoogleApiError::ApiStatus { ref status, .. } if status == "REQUEST_DENIED"
    );
}

#[tokio::test]
async fn client_debug_output_hides_secrets() {
    let server = Server::new_async().await;

    let places = format!("{:?}", places_client(&server));
    assert!(places.contains("ChIJplace"));
    assert!(!places.contains("api-key"));

    let search_console = SearchConsoleClient::new(
        reqwest::Client::new(),
        server.url(),
        "sc-domain:example.fr".to_string(),
        token_provider(&server),
    );
    let debug = format!("{search_console:?}");
    assert!(debug.contains("sc-domain:example.fr"));
    assert!(!debug.contains("client-secret"));
    assert!(!debug.contains("refresh-token"));

    let credentials = format!("{:?}", credentials());
    assert!(!credentials.contains("client-secret"));
    assert!(!credentials.contains("refresh-token"));

    let config = GoogleConfig {
        client_secret: Some("client-secret".to_string()),
        places_api_key: Some("api-key".to_string()),
        ..GoogleConfig::default()
    };
    let config = format!("{config:?}");
    assert!(config.contains("<redacted>"));
    assert!(!config.contains("client-secret"));
    assert!(!config.contains("api-key"));
}
