//! Cloud pipeline client.
//!
//! Every translation is two POSTs: a discovery call that returns a service
//! id, a callback URL and a per-call auth header, then a compute call to
//! that callback carrying the text.

use crate::config::Config;
use crate::engine::TranslationEngine;
use crate::error::EngineError;
use crate::retry::{with_retry_if, RetryConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ENGINE: &str = "cloud";

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LanguagePair<'a> {
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskConfig<'a> {
    language: LanguagePair<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineTask<'a> {
    task_type: &'static str,
    config: TaskConfig<'a>,
}

impl<'a> PipelineTask<'a> {
    fn translation(from: &'a str, to: &'a str, service_id: Option<&'a str>) -> Self {
        Self {
            task_type: "translation",
            config: TaskConfig {
                language: LanguagePair {
                    source_language: from,
                    target_language: to,
                },
                service_id,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PipelineRequestConfig<'a> {
    pipeline_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveryRequest<'a> {
    pipeline_tasks: Vec<PipelineTask<'a>>,
    pipeline_request_config: PipelineRequestConfig<'a>,
}

#[derive(Debug, Serialize)]
struct SourceText<'a> {
    source: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioContent {
    audio_content: Option<String>,
}

#[derive(Debug, Serialize)]
struct InputData<'a> {
    input: Vec<SourceText<'a>>,
    audio: Vec<AudioContent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRequest<'a> {
    pipeline_tasks: Vec<PipelineTask<'a>>,
    input_data: InputData<'a>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoveryResponse {
    #[serde(default)]
    pipeline_response_config: Vec<ResponseConfig>,
    #[serde(rename = "pipelineInferenceAPIEndPoint")]
    inference_endpoint: InferenceEndpoint,
}

#[derive(Debug, Deserialize)]
struct ResponseConfig {
    #[serde(default)]
    config: Vec<ServiceConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceConfig {
    service_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InferenceEndpoint {
    callback_url: String,
    inference_api_key: HeaderPair,
}

#[derive(Debug, Deserialize)]
struct HeaderPair {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeResponse {
    #[serde(default)]
    pipeline_response: Vec<TaskOutput>,
}

#[derive(Debug, Deserialize)]
struct TaskOutput {
    #[serde(default)]
    output: Vec<OutputText>,
}

#[derive(Debug, Deserialize)]
struct OutputText {
    target: String,
}

/// Where and how to send the compute call, as returned by discovery.
#[derive(Debug)]
struct Inference {
    service_id: String,
    callback_url: String,
    auth: HeaderPair,
}

// ==================== Client ====================

pub struct CloudPipelineClient {
    client: reqwest::Client,
    discovery_url: String,
    pipeline_id: String,
    user_id: String,
    api_key: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl CloudPipelineClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            discovery_url: config.cloud_pipeline_url.clone(),
            pipeline_id: config.cloud_pipeline_id.clone(),
            user_id: config.cloud_user_id.clone(),
            api_key: config.cloud_api_key.clone(),
            timeout: config.request_timeout(),
            retry: RetryConfig::cloud_pipeline(),
        }
    }

    /// Per-request timeout, applied to each phase separately.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn discover(&self, from: &str, to: &str) -> Result<Inference, EngineError> {
        let request = DiscoveryRequest {
            pipeline_tasks: vec![PipelineTask::translation(from, to, None)],
            pipeline_request_config: PipelineRequestConfig {
                pipeline_id: &self.pipeline_id,
            },
        };

        let response = self
            .client
            .post(&self.discovery_url)
            .header("userID", &self.user_id)
            .header("ulcaApiKey", &self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body: DiscoveryResponse = read_json(response).await?;

        let service_id = body
            .pipeline_response_config
            .into_iter()
            .next()
            .and_then(|c| c.config.into_iter().next())
            .map(|c| c.service_id)
            .ok_or_else(|| malformed("discovery response has no serviceId"))?;

        Ok(Inference {
            service_id,
            callback_url: body.inference_endpoint.callback_url,
            auth: body.inference_endpoint.inference_api_key,
        })
    }

    async fn compute(
        &self,
        inference: &Inference,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, EngineError> {
        let request = ComputeRequest {
            pipeline_tasks: vec![PipelineTask::translation(
                from,
                to,
                Some(&inference.service_id),
            )],
            input_data: InputData {
                input: vec![SourceText { source: text }],
                audio: vec![AudioContent {
                    audio_content: None,
                }],
            },
        };

        let response = self
            .client
            .post(&inference.callback_url)
            .header(inference.auth.name.as_str(), inference.auth.value.as_str())
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body: ComputeResponse = read_json(response).await?;

        body.pipeline_response
            .into_iter()
            .next()
            .and_then(|task| task.output.into_iter().next())
            .map(|output| output.target)
            .ok_or_else(|| malformed("compute response has no output target"))
    }

    fn transport_error(&self, error: reqwest::Error) -> EngineError {
        if error.is_timeout() {
            EngineError::Timeout {
                engine: ENGINE,
                after: self.timeout,
            }
        } else {
            EngineError::Transport {
                engine: ENGINE,
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl TranslationEngine for CloudPipelineClient {
    fn name(&self) -> &'static str {
        ENGINE
    }

    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, EngineError> {
        with_retry_if(
            &self.retry,
            &format!("Cloud translation {}->{}", from, to),
            || async {
                let inference = self.discover(from, to).await?;
                debug!("Cloud pipeline service {} for {}->{}", inference.service_id, from, to);
                self.compute(&inference, text, from, to).await
            },
            EngineError::is_transient,
        )
        .await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, EngineError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
        return Err(EngineError::Status {
            engine: ENGINE,
            status,
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|e| malformed(&e.to_string()))
}

fn malformed(detail: &str) -> EngineError {
    EngineError::MalformedResponse {
        engine: ENGINE,
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helpers ====================

    fn create_test_config(discovery_url: &str) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            api_key: None,
            cloud_pipeline_url: discovery_url.to_string(),
            cloud_pipeline_id: "pipeline-1".to_string(),
            cloud_user_id: "user-1".to_string(),
            cloud_api_key: "ulca-key".to_string(),
            argos_translate_bin: "argos-translate".to_string(),
            argospm_bin: "argospm".to_string(),
            request_timeout_secs: 5,
            install_timeout_secs: 5,
            translation_cache_capacity: 128,
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(3, Duration::from_millis(10))
    }

    fn client_for(server: &MockServer) -> CloudPipelineClient {
        let config = create_test_config(&format!("{}/discover", server.uri()));
        CloudPipelineClient::new(reqwest::Client::new(), &config).with_retry(fast_retry())
    }

    fn discovery_body(server: &MockServer) -> serde_json::Value {
        serde_json::json!({
            "pipelineResponseConfig": [
                {"taskType": "translation", "config": [{"serviceId": "svc-42"}]}
            ],
            "pipelineInferenceAPIEndPoint": {
                "callbackUrl": format!("{}/compute", server.uri()),
                "inferenceApiKey": {"name": "Authorization", "value": "inference-key"}
            }
        })
    }

    fn compute_body(target: &str) -> serde_json::Value {
        serde_json::json!({
            "pipelineResponse": [
                {"taskType": "translation", "output": [{"source": "hello", "target": target}]}
            ]
        })
    }

    async fn mount_discovery(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/discover"))
            .respond_with(ResponseTemplate::new(200).set_body_json(discovery_body(server)))
            .mount(server)
            .await;
    }

    // ==================== Success ====================

    #[tokio::test]
    async fn test_two_phase_translation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/discover"))
            .and(header("userID", "user-1"))
            .and(header("ulcaApiKey", "ulca-key"))
            .and(body_partial_json(serde_json::json!({
                "pipelineTasks": [{"taskType": "translation", "config": {
                    "language": {"sourceLanguage": "en", "targetLanguage": "hi"}
                }}],
                "pipelineRequestConfig": {"pipelineId": "pipeline-1"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(discovery_body(&server)))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/compute"))
            .and(header("Authorization", "inference-key"))
            .and(body_partial_json(serde_json::json!({
                "pipelineTasks": [{"config": {"serviceId": "svc-42"}}],
                "inputData": {"input": [{"source": "hello"}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(compute_body("नमस्ते")))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .translate("hello", "en", "hi")
            .await
            .expect("Should succeed");
        assert_eq!(result, "नमस्ते");
    }

    // ==================== Failures ====================

    #[tokio::test]
    async fn test_discovery_client_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/discover"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .translate("hello", "en", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_compute_server_error_is_retried() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;

        Mock::given(method("POST"))
            .and(path("/compute"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/compute"))
            .respond_with(ResponseTemplate::new(200).set_body_json(compute_body("ok")))
            .mount(&server)
            .await;

        let result = client_for(&server).translate("hello", "en", "hi").await;
        assert_eq!(result.expect("Should succeed after retry"), "ok");
    }

    #[tokio::test]
    async fn test_persistent_server_error_exhausts_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/discover"))
            .respond_with(ResponseTemplate::new(500).set_body_string("down"))
            .expect(3)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .translate("hello", "en", "hi")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_missing_service_id_is_malformed() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "pipelineResponseConfig": [],
            "pipelineInferenceAPIEndPoint": {
                "callbackUrl": format!("{}/compute", server.uri()),
                "inferenceApiKey": {"name": "Authorization", "value": "k"}
            }
        });
        Mock::given(method("POST"))
            .and(path("/discover"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .translate("hello", "en", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse { .. }));
        assert!(err.to_string().contains("serviceId"));
    }

    #[tokio::test]
    async fn test_empty_compute_output_is_malformed() {
        let server = MockServer::start().await;
        mount_discovery(&server).await;

        Mock::given(method("POST"))
            .and(path("/compute"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"pipelineResponse": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .translate("hello", "en", "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_slow_pipeline_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/discover"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(discovery_body(&server))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server)
            .with_timeout(Duration::from_millis(200))
            .with_retry(RetryConfig::none());

        let err = client.translate("hello", "en", "hi").await.unwrap_err();
        assert!(matches!(err, EngineError::Timeout { .. }));
        assert!(err.to_string().contains("200ms"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let config = create_test_config("http://127.0.0.1:9/discover");
        let client = CloudPipelineClient::new(reqwest::Client::new(), &config)
            .with_retry(RetryConfig::none());

        let err = client.translate("hello", "en", "hi").await.unwrap_err();
        assert!(matches!(err, EngineError::Transport { .. }));
        assert!(err.is_transient());
    }

    // ==================== Request Structure ====================

    #[test]
    fn test_compute_request_serialization() {
        let request = ComputeRequest {
            pipeline_tasks: vec![PipelineTask::translation("en", "hi", Some("svc"))],
            input_data: InputData {
                input: vec![SourceText { source: "hello" }],
                audio: vec![AudioContent {
                    audio_content: None,
                }],
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pipelineTasks"][0]["config"]["serviceId"], "svc");
        assert_eq!(json["inputData"]["input"][0]["source"], "hello");
        assert!(json["inputData"]["audio"][0]["audioContent"].is_null());
    }

    #[test]
    fn test_discovery_request_omits_service_id() {
        let request = DiscoveryRequest {
            pipeline_tasks: vec![PipelineTask::translation("en", "hi", None)],
            pipeline_request_config: PipelineRequestConfig { pipeline_id: "p" },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("serviceId"));
        assert!(json.contains("\"pipelineId\":\"p\""));
    }
}
