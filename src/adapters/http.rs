use crate::domain::model::MsisdnQuery;
use crate::utils::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;

/// Thin wrapper around the remote availability endpoint.
#[derive(Debug, Clone)]
pub struct AvailabilityClient {
    client: Client,
    endpoint: String,
    brand: String,
    sim_category: String,
}

impl AvailabilityClient {
    pub fn new(
        endpoint: impl Into<String>,
        brand: impl Into<String>,
        sim_category: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            brand: brand.into(),
            sim_category: sim_category.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn payload(&self, number: &str) -> MsisdnQuery {
        MsisdnQuery {
            msisdn: number.to_string(),
            brand: self.brand.clone(),
            sim_category: self.sim_category.clone(),
        }
    }

    /// One POST for `number`.
    ///
    /// `Ok(true)` only when the body is a JSON object whose `available` field
    /// is the boolean `true`; any other object is `Ok(false)`. Non-200
    /// statuses, transport failures and non-object bodies are transient errors.
    pub async fn query(&self, number: &str) -> Result<bool> {
        tracing::debug!("POST {} for {}", self.endpoint, number);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.payload(number))
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScanError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let data: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| ScanError::MalformedResponse {
                message: e.to_string(),
            })?;

        match data {
            serde_json::Value::Object(obj) => {
                Ok(matches!(obj.get("available"), Some(serde_json::Value::Bool(true))))
            }
            other => Err(ScanError::MalformedResponse {
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> AvailabilityClient {
        AvailabilityClient::new(
            server.url("/free-msisdn"),
            "ROBI",
            "PREPAID",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_query_sends_expected_payload() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/free-msisdn")
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "msisdn": "8801886000000",
                    "brand": "ROBI",
                    "simCategory": "PREPAID"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"available": true}));
        });

        let available = client(&server).query("8801886000000").await.unwrap();

        api_mock.assert();
        assert!(available);
    }

    #[tokio::test]
    async fn test_query_treats_non_true_flag_as_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/free-msisdn");
            then.status(200)
                .json_body(serde_json::json!({"available": "true", "msisdn": "x"}));
        });

        assert!(!client(&server).query("8801886000000").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_missing_flag_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/free-msisdn");
            then.status(200).json_body(serde_json::json!({}));
        });

        assert!(!client(&server).query("8801886000000").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_non_200_is_transient() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/free-msisdn");
            then.status(429);
        });

        let err = client(&server).query("8801886000000").await.unwrap_err();
        assert!(matches!(err, ScanError::UnexpectedStatus { status: 429 }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_query_malformed_body_is_transient() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/free-msisdn");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = client(&server).query("8801886000000").await.unwrap_err();
        assert!(matches!(err, ScanError::MalformedResponse { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_query_array_body_is_transient() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/free-msisdn");
            then.status(200).json_body(serde_json::json!([{"available": true}]));
        });

        let err = client(&server).query("8801886000000").await.unwrap_err();
        assert!(matches!(err, ScanError::MalformedResponse { .. }));
    }
}
