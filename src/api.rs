//! Reverse-geocoding client for the Google Maps Geocoding API.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, warn};

use crate::config::GeocodingConfig;
use crate::error::LookupError;
use crate::models::{Coordinate, GeocodeResponse, PlaceName};

/// Responses are always requested in Japanese.
pub const RESPONSE_LANGUAGE: &str = "ja";
const STATUS_OK: &str = "OK";

pub struct GeocodingClient {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
}

impl GeocodingClient {
    /// `api_key` of `None` leaves the client unconfigured; [`resolve`](Self::resolve)
    /// then fails without touching the network.
    pub fn new(api_key: Option<String>, endpoint: &str, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn from_config(config: &GeocodingConfig) -> reqwest::Result<Self> {
        Self::new(
            config.api_key(),
            &config.endpoint,
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolves `coord` to city and sub-locality names with one GET request.
    ///
    /// The HTTP status code is ignored; the body's `status` field decides
    /// success. Anything but `"OK"` becomes [`LookupError::RemoteLookupFailed`]
    /// carrying that status. Network failures, bodies that do not decode
    /// (including results missing their components) and an `OK` body without
    /// results are [`LookupError::RequestFailed`].
    pub async fn resolve(&self, coord: Coordinate) -> Result<PlaceName, LookupError> {
        let Some(key) = self.api_key.as_deref() else {
            warn!("Geocoding skipped: no API key configured");
            return Err(LookupError::ServiceMisconfigured);
        };

        let latlng = coord.to_query();
        debug!("Reverse geocoding {}", latlng);

        let res = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("latlng", latlng.as_str()),
                ("key", key),
                ("language", RESPONSE_LANGUAGE),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("API request error: {}", e);
                LookupError::request_failed(e)
            })?
            .json::<GeocodeResponse>()
            .await
            .map_err(|e| {
                error!("API response could not be decoded: {}", e);
                LookupError::request_failed(e)
            })?;

        if res.status != STATUS_OK {
            warn!(
                "Geocoding returned status {} ({})",
                res.status,
                res.error_message.as_deref().unwrap_or("no message")
            );
            return Err(LookupError::RemoteLookupFailed(res.status));
        }

        let first = res.results.first().ok_or_else(|| {
            error!("Geocoding returned OK with no results");
            LookupError::request_failed("OK status without results")
        })?;

        Ok(PlaceName::from_components(&first.address_components))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHIBUYA: Coordinate = Coordinate {
        latitude: 35.6580339,
        longitude: 139.7016358,
    };

    fn client(server: &MockServer, key: Option<&str>) -> GeocodingClient {
        GeocodingClient::new(
            key.map(str::to_string),
            &format!("{}/maps/api/geocode/json", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sends_coordinates_key_and_language() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/maps/api/geocode/json"))
            .and(query_param("latlng", "35.6580339,139.7016358"))
            .and(query_param("key", "test-key"))
            .and(query_param("language", "ja"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [{
                    "address_components": [
                        {"long_name": "神南", "types": ["sublocality_level_1", "sublocality", "political"]},
                        {"long_name": "渋谷区", "types": ["locality", "political"]}
                    ]
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let place = client(&server, Some("test-key")).resolve(SHIBUYA).await.unwrap();
        assert_eq!(place.city.as_deref(), Some("渋谷区"));
        assert_eq!(place.sub_locality.as_deref(), Some("神南"));
    }

    #[tokio::test]
    async fn only_first_result_is_used() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [
                    {"address_components": [{"long_name": "Shibuya", "types": ["locality"]}]},
                    {"address_components": [{"long_name": "Minato", "types": ["locality"]},
                                            {"long_name": "Roppongi", "types": ["sublocality_level_1"]}]}
                ]
            })))
            .mount(&server)
            .await;

        let place = client(&server, Some("k")).resolve(SHIBUYA).await.unwrap();
        assert_eq!(place.city.as_deref(), Some("Shibuya"));
        assert_eq!(place.sub_locality, None);
    }

    #[tokio::test]
    async fn non_ok_status_is_a_remote_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": "ZERO_RESULTS", "results": []})),
            )
            .mount(&server)
            .await;

        let err = client(&server, Some("k")).resolve(SHIBUYA).await.unwrap_err();
        assert_eq!(err, LookupError::RemoteLookupFailed("ZERO_RESULTS".into()));
    }

    #[tokio::test]
    async fn error_status_code_with_json_body_uses_body_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid."
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("bad")).resolve(SHIBUYA).await.unwrap_err();
        assert_eq!(err.to_string(), "address retrieval failed: REQUEST_DENIED");
    }

    #[tokio::test]
    async fn unparseable_body_is_a_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server, Some("k")).resolve(SHIBUYA).await.unwrap_err();
        assert!(matches!(err, LookupError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn ok_without_results_is_a_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "OK", "results": []})),
            )
            .mount(&server)
            .await;

        let err = client(&server, Some("k")).resolve(SHIBUYA).await.unwrap_err();
        assert!(matches!(err, LookupError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn ok_with_malformed_components_is_a_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "OK",
                "results": [{"address_components": [{"long_name": "Shibuya"}]}]
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("k")).resolve(SHIBUYA).await.unwrap_err();
        assert!(matches!(err, LookupError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_request_failure() {
        let client = GeocodingClient::new(
            Some("k".into()),
            "http://127.0.0.1:9/geocode/json",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.resolve(SHIBUYA).await.unwrap_err();
        assert_eq!(err.to_string(), "an error occurred during the request to the API");
    }

    #[tokio::test]
    async fn missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server, None);
        assert!(!client.is_configured());
        let err = client.resolve(SHIBUYA).await.unwrap_err();
        assert_eq!(err, LookupError::ServiceMisconfigured);
    }
}
