//! Pose service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use tracing::{debug, warn};

use topspin_models::{Pose, POSE_LANDMARK_COUNT};

use crate::error::{PoseError, PoseResult};
use crate::source::PoseSource;
use crate::types::{DetectRequest, DetectResponse, DetectionMode, HealthResponse};

/// Configuration for the pose client.
#[derive(Debug, Clone)]
pub struct PoseClientConfig {
    /// Base URL of the pose service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for PoseClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            timeout: Duration::from_secs(30), // single-frame detection
            max_retries: 2,
        }
    }
}

impl PoseClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("POSE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8002".to_string()),
            timeout: Duration::from_secs(
                std::env::var("POSE_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: std::env::var("POSE_SERVICE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the pose-estimation sidecar.
pub struct HttpPoseClient {
    http: Client,
    config: PoseClientConfig,
}

impl HttpPoseClient {
    /// Create a new pose client.
    pub fn new(config: PoseClientConfig) -> PoseResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PoseError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PoseResult<Self> {
        Self::new(PoseClientConfig::from_env())
    }

    /// Check if the pose service is healthy.
    pub async fn health_check(&self) -> PoseResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Pose service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Pose service health check error: {}", e);
                Ok(false)
            }
        }
    }

    async fn post_detect(&self, request: &DetectRequest) -> PoseResult<DetectResponse> {
        let url = format!("{}/detect", self.config.base_url);

        debug!("Sending pose detection request to {}", url);

        let response = self.with_retry(|| async {
            self.http
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(PoseError::Network)
        })
        .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PoseError::RequestFailed(format!(
                "Pose service returned {}: {}",
                status, body
            )));
        }

        let detect_response: DetectResponse = response.json().await?;
        Ok(detect_response)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> PoseResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = PoseResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Pose request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(PoseError::RequestFailed("Unknown error".to_string())))
    }
}

#[async_trait]
impl PoseSource for HttpPoseClient {
    async fn detect(&self, jpeg: &[u8], mode: DetectionMode) -> PoseResult<Option<Pose>> {
        let request = DetectRequest {
            image: BASE64.encode(jpeg),
            mode,
        };

        let response = self.post_detect(&request).await?;

        match response.landmarks {
            Some(landmarks) if landmarks.len() == POSE_LANDMARK_COUNT => {
                Ok(Some(Pose(landmarks)))
            }
            Some(landmarks) => {
                warn!(
                    "Pose service returned {} landmarks, expected {}; treating as no detection",
                    landmarks.len(),
                    POSE_LANDMARK_COUNT
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topspin_models::Landmark;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpPoseClient {
        HttpPoseClient::new(PoseClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
        })
        .unwrap()
    }

    fn full_landmarks() -> Vec<Landmark> {
        vec![Landmark::new(0.5, 0.5, 0.0, 0.9); POSE_LANDMARK_COUNT]
    }

    #[test]
    fn test_config_defaults() {
        let config = PoseClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8002");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 2);
    }

    #[tokio::test]
    async fn test_detect_returns_pose() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(DetectResponse {
                landmarks: Some(full_landmarks()),
            }))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pose = client.detect(b"jpeg", DetectionMode::Fast).await.unwrap();
        assert_eq!(pose.unwrap().len(), POSE_LANDMARK_COUNT);
    }

    #[tokio::test]
    async fn test_detect_no_person_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(DetectResponse { landmarks: None }),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pose = client.detect(b"jpeg", DetectionMode::Fast).await.unwrap();
        assert!(pose.is_none());
    }

    #[tokio::test]
    async fn test_detect_wrong_landmark_count_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(DetectResponse {
                landmarks: Some(vec![Landmark::new(0.5, 0.5, 0.0, 0.9); 5]),
            }))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pose = client.detect(b"jpeg", DetectionMode::Accurate).await.unwrap();
        assert!(pose.is_none());
    }

    #[tokio::test]
    async fn test_detect_server_error_is_request_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.detect(b"jpeg", DetectionMode::Fast).await.unwrap_err();
        assert!(matches!(err, PoseError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_health_check_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(HealthResponse {
                status: "ok".to_string(),
                version: Some("1.0.0".to_string()),
            }))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_health_check_degraded_is_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(!client.health_check().await.unwrap());
    }
}
