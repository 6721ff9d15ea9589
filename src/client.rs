use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{Config, Endpoint};
use crate::error::{HubError, Result};
use crate::queries::Query;
use crate::tier::Tier;

/// Status and undecoded body of an HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP operations the client needs. Swapped out in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<RawResponse>;

    async fn put_bytes(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, String)],
    ) -> Result<RawResponse>;
}

pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<RawResponse> {
        let response = self
            .http
            .post(url)
            .bearer_auth(bearer)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());

        Ok(RawResponse { status, body })
    }

    async fn put_bytes(
        &self,
        url: &str,
        body: Vec<u8>,
        headers: &[(&str, String)],
    ) -> Result<RawResponse> {
        let mut request = self.http.put(url).body(body);
        for (key, value) in headers {
            request = request.header(*key, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read response body>".to_string());

        Ok(RawResponse { status, body })
    }
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
}

pub struct HubClient {
    endpoint: Endpoint,
    transport: Arc<dyn Transport>,
}

impl HubClient {
    pub fn new(endpoint: Endpoint, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// Resolve the tier and its credential, then build a client.
    ///
    /// Configuration problems are reported here, before the transport is
    /// ever touched.
    pub fn connect(config: &Config, tier: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let tier: Tier = tier.parse()?;
        let endpoint = config.endpoint_from_env(tier)?;
        Ok(Self::new(endpoint, transport))
    }

    pub fn tier(&self) -> Tier {
        self.endpoint.tier
    }

    /// Run a query and return the decoded body as-is.
    ///
    /// A 200 response may still carry a GraphQL `errors` array; callers
    /// decide what that means for them.
    pub async fn execute(&self, query: &Query, variables: Option<Value>) -> Result<Value> {
        let request = GraphQLRequest {
            query: query.document,
            variables,
        };
        let body = serde_json::to_value(&request).map_err(HubError::Decode)?;

        debug!(tier = %self.endpoint.tier, query = query.name, "sending request");
        let started = Instant::now();

        let response = match self
            .transport
            .post_json(&self.endpoint.url, self.endpoint.token(), &body)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(tier = %self.endpoint.tier, query = query.name, error = %e, "request failed");
                return Err(e);
            }
        };

        info!(
            tier = %self.endpoint.tier,
            query = query.name,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request complete"
        );

        if response.status != 200 {
            return Err(HubError::Api {
                status: response.status,
                body: response.body,
            });
        }

        serde_json::from_str(&response.body).map_err(HubError::Decode)
    }

    /// Run a query and deserialize its `data`, treating GraphQL errors as failures.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &Query,
        variables: Option<Value>,
    ) -> Result<T> {
        let raw = self.execute(query, variables).await?;
        let gql_response: GraphQLResponse<T> =
            serde_json::from_value(raw).map_err(HubError::Decode)?;

        if let Some(errors) = gql_response.errors.filter(|e| !e.is_empty()) {
            return Err(HubError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql_response.data.ok_or(HubError::EmptyResponse)
    }

    /// PUT a file body to a pre-signed storage URL.
    pub async fn upload(&self, url: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let size = body.len();
        let headers = [
            ("Content-Type", content_type.to_string()),
            ("Content-Length", size.to_string()),
        ];

        let response = self.transport.put_bytes(url, body, &headers).await?;
        debug!(status = response.status, bytes = size, "upload complete");

        if !(200..300).contains(&response.status) {
            return Err(HubError::UploadFailed {
                status: response.status,
                message: response.body,
            });
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{client_with, FakeTransport};
    use super::*;
    use crate::queries;
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_posts_query_and_bearer() {
        let transport = Arc::new(FakeTransport::new().respond_json(json!({"data": {"ok": true}})));
        let client = client_with(transport.clone());

        let body = client
            .execute(&queries::GET_SUBMISSION, Some(json!({"id": "abc"})))
            .await
            .unwrap();
        assert_eq!(body, json!({"data": {"ok": true}}));

        let posted = transport.posted.lock().unwrap();
        let (url, bearer, sent) = &posted[0];
        assert_eq!(url, Tier::Stage.default_url());
        assert_eq!(bearer, "test-token");
        assert_eq!(sent["query"], json!(queries::GET_SUBMISSION.document));
        assert_eq!(sent["variables"], json!({"id": "abc"}));
    }

    #[tokio::test]
    async fn test_execute_omits_variables_when_none() {
        let transport = Arc::new(FakeTransport::new().respond_json(json!({"data": {}})));
        let client = client_with(transport.clone());

        client.execute(&queries::MY_STUDIES, None).await.unwrap();

        let posted = transport.posted.lock().unwrap();
        assert!(posted[0].2.get("variables").is_none());
    }

    #[tokio::test]
    async fn test_execute_returns_graphql_errors_verbatim() {
        let payload = json!({"errors": [{"message": "boom"}], "data": null});
        let transport = Arc::new(FakeTransport::new().respond_json(payload.clone()));
        let client = client_with(transport);

        let body = client.execute(&queries::MY_STUDIES, None).await.unwrap();
        assert_eq!(body, payload);
    }

    #[tokio::test]
    async fn test_non_200_is_api_error_with_body() {
        let transport = Arc::new(FakeTransport::new().respond(503, "maintenance"));
        let client = client_with(transport);

        match client.execute(&queries::MY_STUDIES, None).await {
            Err(HubError::Api { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_returned() {
        let transport = Arc::new(FakeTransport::new().fail(HubError::EmptyResponse));
        let client = client_with(transport);
        assert!(client.execute(&queries::MY_STUDIES, None).await.is_err());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let transport = Arc::new(FakeTransport::new().respond(200, "<html>"));
        let client = client_with(transport);
        assert!(matches!(
            client.execute(&queries::MY_STUDIES, None).await,
            Err(HubError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_typed_query_surfaces_graphql_errors() {
        let transport = Arc::new(
            FakeTransport::new().respond_json(json!({"errors": [{"message": "not allowed"}]})),
        );
        let client = client_with(transport);

        let result: Result<Value> = client.query(&queries::MY_STUDIES, None).await;
        match result {
            Err(HubError::GraphQL { messages }) => assert_eq!(messages, vec!["not allowed"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_typed_query_without_data_is_empty_response() {
        let transport = Arc::new(FakeTransport::new().respond_json(json!({"data": null})));
        let client = client_with(transport);

        let result: Result<Value> = client.query(&queries::MY_STUDIES, None).await;
        assert!(matches!(result, Err(HubError::EmptyResponse)));
    }

    #[test]
    fn test_unknown_tier_makes_no_requests() {
        let transport = Arc::new(FakeTransport::new());
        let result = HubClient::connect(&Config::default(), "QA", transport.clone());

        assert!(matches!(result, Err(HubError::UnknownTier(ref t)) if t == "QA"));
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_missing_tier_makes_no_requests() {
        let transport = Arc::new(FakeTransport::new());
        let result = HubClient::connect(&Config::default(), "", transport.clone());

        let err = result.err().unwrap();
        assert!(err.is_configuration());
        assert!(err.to_string().starts_with("No tier specified"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_success_status() {
        let transport = Arc::new(FakeTransport::new().respond(403, "expired"));
        let client = client_with(transport.clone());

        let result = client
            .upload("https://bucket.example/file", b"a\tb\n".to_vec(), "text/tab-separated-values")
            .await;
        assert!(matches!(result, Err(HubError::UploadFailed { status: 403, .. })));
        assert_eq!(transport.uploaded.lock().unwrap()[0].1, 4);
    }
}
