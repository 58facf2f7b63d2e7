//! Integration tests for the bar API client
//!
//! These tests use wiremock to stand in for the GraphQL and places
//! endpoints and exercise the full request/response cycle, error mapping,
//! and retry behavior.

use bar_api::{
    BarApiClient, BarApiConfig, CreateBarMemberInput, Error, PlacesClient, PlacesConfig,
    RetryConfig, UpdateBarInput,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn bar_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "phone": "020 7946 0000",
        "location": "1 High St",
        "lat": "51.5072",
        "lng": "-0.1276",
        "url": "https://maps.example/bar",
        "website": "https://bar.example",
        "addedBy": "user-1",
        "createdAt": "2018-06-01T20:15:00.000Z",
        "favoriteCount": 2
    })
}

fn client_for(server: &MockServer) -> BarApiClient {
    let config = BarApiConfig::new(format!("{}/graphql", server.uri()))
        .with_api_key("da2-test")
        .with_retry(RetryConfig::new(2).with_initial_delay(Duration::from_millis(1)));
    BarApiClient::new(config).unwrap()
}

// =============================================================================
// Successful Request Tests
// =============================================================================

#[tokio::test]
async fn test_list_bars_sends_api_key_and_operation_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("x-api-key", "da2-test"))
        .and(body_partial_json(json!({ "operationName": "ListBars" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "listBars": { "items": [bar_json("bar-1", "The Crown")], "nextToken": null } }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client.list_bars(None, None).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "The Crown");
    assert_eq!(page.items[0].favorite_count, Some(2));
    assert!(page.next_token.is_none());
}

#[tokio::test]
async fn test_list_all_bars_follows_next_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "nextToken": "page-2" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "listBars": { "items": [bar_json("bar-2", "The Anchor")], "nextToken": null } }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "variables": { "nextToken": null } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "listBars": { "items": [bar_json("bar-1", "The Crown")], "nextToken": "page-2" } }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let bars = client.list_all_bars().await.unwrap();

    let ids: Vec<_> = bars.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["bar-1", "bar-2"]);
}

#[tokio::test]
async fn test_get_bar_member_returns_none_for_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "GetBarMember",
            "variables": { "userId": "user-1", "barId": "bar-1" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "getBarMember": null } })),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let member = client.get_bar_member("user-1", "bar-1").await.unwrap();

    assert!(member.is_none());
}

#[tokio::test]
async fn test_create_bar_member_and_update_bar() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": "CreateBarMember" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "createBarMember": { "id": "m-1", "userId": "user-1", "barId": "bar-1" } }
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "operationName": "UpdateBar",
            "variables": { "input": { "id": "bar-1", "favoriteCount": 3 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "updateBar": bar_json("bar-1", "The Crown") }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let member = client
        .create_bar_member(&CreateBarMemberInput {
            user_id: "user-1".to_string(),
            bar_id: "bar-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(member.id.as_deref(), Some("m-1"));

    let updated = client
        .update_bar(&UpdateBarInput {
            id: "bar-1".to_string(),
            name: "The Crown".to_string(),
            phone: None,
            location: None,
            lat: "51.5072".to_string(),
            lng: "-0.1276".to_string(),
            url: None,
            website: None,
            added_by: None,
            favorite_count: 3,
        })
        .await
        .unwrap();
    assert_eq!(updated.id, "bar-1");
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_graphql_errors_are_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "createBarMember": null },
            "errors": [{ "message": "The conditional request failed", "errorType": "DynamoDB:ConditionalCheckFailedException" }]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .create_bar_member(&CreateBarMemberInput {
            user_id: "user-1".to_string(),
            bar_id: "bar-1".to_string(),
        })
        .await;

    match result {
        Err(Error::GraphQl(messages)) => {
            assert_eq!(messages, vec!["The conditional request failed".to_string()]);
        }
        other => panic!("expected GraphQL error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.get_bar_member("user-1", "bar-1").await;

    assert!(matches!(result, Err(Error::Api { status: 401, .. })));
}

#[tokio::test]
async fn test_service_unavailable_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.list_bars(None, None).await;

    assert!(matches!(result, Err(Error::Api { status: 503, .. })));
}

#[tokio::test]
async fn test_create_bar_member_is_sent_once_on_503() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": "CreateBarMember" })))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .create_bar_member(&CreateBarMemberInput {
            user_id: "user-1".to_string(),
            bar_id: "bar-1".to_string(),
        })
        .await;

    assert!(matches!(result, Err(Error::Api { status: 503, .. })));
}

#[tokio::test]
async fn test_update_bar_is_sent_once_on_504() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": "UpdateBar" })))
        .respond_with(ResponseTemplate::new(504))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .update_bar(&UpdateBarInput {
            id: "bar-1".to_string(),
            name: "The Crown".to_string(),
            phone: None,
            location: None,
            lat: "51.5072".to_string(),
            lng: "-0.1276".to_string(),
            url: None,
            website: None,
            added_by: None,
            favorite_count: 3,
        })
        .await;

    assert!(matches!(result, Err(Error::Api { status: 504, .. })));
}

// =============================================================================
// Places Tests
// =============================================================================

#[tokio::test]
async fn test_place_details_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "ChIJ123"))
        .and(query_param("key", "places-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "place_id": "ChIJ123",
                "name": "The Crown",
                "formatted_address": "1 High St, London",
                "formatted_phone_number": "020 7946 0000",
                "website": "https://thecrown.example",
                "geometry": { "location": { "lat": 51.5, "lng": -0.12 } }
            }
        })))
        .mount(&mock_server)
        .await;

    let config =
        PlacesConfig::new("places-key").with_base_url(format!("{}/place", mock_server.uri()));
    let client = PlacesClient::new(config).unwrap();

    let details = client.place_details("ChIJ123").await.unwrap();
    assert_eq!(details.name, "The Crown");
    assert_eq!(details.website.as_deref(), Some("https://thecrown.example"));
}

#[tokio::test]
async fn test_place_details_not_found_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "NOT_FOUND" })))
        .mount(&mock_server)
        .await;

    let config =
        PlacesConfig::new("places-key").with_base_url(format!("{}/place", mock_server.uri()));
    let client = PlacesClient::new(config).unwrap();

    let result = client.place_details("missing").await;
    match result {
        Err(Error::Api { message, .. }) => assert!(message.contains("NOT_FOUND")),
        other => panic!("expected API error, got {:?}", other),
    }
}
