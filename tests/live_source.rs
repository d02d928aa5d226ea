//! Integration tests for the live forecast API client
//!
//! Runs the HTTP client against a wiremock server and checks the requests it
//! sends and how it reads responses.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riskglobe::config::ServiceConfig;
use riskglobe::data::normalize::normalize_location_list;
use riskglobe::data::{
    FetchFailure, ForecastApiClient, ForecastVariable, LiveWeatherSource, TimeWindow,
};

fn window() -> TimeWindow {
    let start = NaiveDate::from_ymd_opt(2026, 1, 23)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap();
    TimeWindow {
        start,
        end: start + chrono::Duration::hours(24),
    }
}

fn client_for(server: &MockServer, api_key: Option<&str>) -> ForecastApiClient {
    let config = ServiceConfig {
        endpoint: format!("{}/forecast", server.uri()),
        locations_endpoint: Some(format!("{}/locations", server.uri())),
        api_key: api_key.map(str::to_string),
        ..Default::default()
    };
    ForecastApiClient::new(&config)
}

#[tokio::test]
async fn variable_request_carries_query_and_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "40.71"))
        .and(query_param("longitude", "-74.01"))
        .and(query_param("variable", "2m_temperature"))
        .and(query_param("start_time", "2026-01-23T07:00:00"))
        .and(query_param("end_time", "2026-01-24T07:00:00"))
        .and(header("authorization", "Bearer secret-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [288.15, 289.15],
            "unit": "K",
            "time": { "data": ["2026-01-23 07:00:00+00:00", "2026-01-23 08:00:00+00:00"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret-key"));
    let series = client
        .fetch_variable(ForecastVariable::Temperature, 40.71, -74.01, &window())
        .await
        .unwrap();

    assert_eq!(series.variable, ForecastVariable::Temperature);
    assert_eq!(series.values, vec![Some(288.15), Some(289.15)]);
    assert_eq!(series.unit.as_deref(), Some("K"));
    assert_eq!(series.time.len(), 2);
}

#[tokio::test]
async fn nested_variable_response_is_read() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("variable", "surface_pressure"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "surface_pressure": { "data": [101325.0, null], "unit": "Pa" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let series = client
        .fetch_variable(ForecastVariable::SurfacePressure, 0.0, 0.0, &window())
        .await
        .unwrap();

    assert_eq!(series.values, vec![Some(101325.0), None]);
    assert!(series.time.is_empty());
}

#[tokio::test]
async fn error_status_keeps_body_for_diagnostics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client
        .fetch_variable(ForecastVariable::WindU, 1.0, 2.0, &window())
        .await
        .unwrap_err();

    match err {
        FetchFailure::Status {
            status,
            target,
            body,
        } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(target, "100m_u_component_of_wind");
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn invalid_json_is_a_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client
        .fetch_variable(ForecastVariable::Dewpoint, 1.0, 2.0, &window())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchFailure::Json(_)));
}

#[tokio::test]
async fn location_list_is_fetched_from_its_own_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 7,
                "city": "Reykjavik",
                "country": "Iceland",
                "lat": "64.15",
                "lng": -21.94,
                "forecast": [
                    { "temp": -2.4, "windSpeed": 40, "condition": "Snow", "riskScore": 0.61 },
                    { "temp": -3.0, "windSpeed": 35, "condition": "Snow", "riskScore": 0.55 }
                ]
            },
            { "name": "Nowhere", "latitude": 120.0, "longitude": 0.0, "forecast": [{}] }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let payload = client.fetch_location_list().await.unwrap();
    assert_eq!(payload.entries.len(), 2);

    let locations = normalize_location_list(&payload);
    assert_eq!(locations.len(), 1);
    let reykjavik = &locations[0];
    assert_eq!(reykjavik.id, "7");
    assert_eq!(reykjavik.name, "Reykjavik");
    assert_eq!(reykjavik.latitude, 64.15);
    assert_eq!(reykjavik.forecast.len(), 2);
    assert_eq!(reykjavik.current.temperature, -2.0);
    assert_eq!(reykjavik.current.description, "Snow");
}

#[tokio::test]
async fn location_list_object_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.fetch_location_list().await.unwrap_err();
    assert!(matches!(err, FetchFailure::Malformed(_)));
}
