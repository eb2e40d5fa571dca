// Core client implementation

use crate::analyzer::ConversationAnalyzer;
use crate::classifier::HostedClassifier;
use crate::types::*;
use crate::utils::{validate, StringValidator};
use reqwest::{header, Client as HttpClient};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

/// Default endpoint of the hosted inference service
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default timeout applied to every classification request
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Type aliases to simplify complex types
/// Result of a single inference operation, as a raw JSON body
type InferenceOp = dyn Future<Output = MoodResult<String>> + Send;

/// Future returned by an inference handler
pub type InferenceFuture = Pin<Box<InferenceOp>>;

/// Function that processes an inference request and returns a future
type InferenceHandlerFn = dyn Fn(String, InferenceRequest) -> InferenceFuture + Send + Sync + 'static;

/// Trait for mocking the inference service for testing purposes
pub trait InferenceHandler: Send + Sync {
    /// Process one classification request and return the raw response body
    fn process_request(&self, model: String, request: InferenceRequest) -> InferenceFuture;
}

#[derive(Clone)]
pub struct HfInference {
    pub(crate) http_client: HttpClient,
    pub(crate) api_token: SecureApiToken,
    pub base_url: String, // Made public for testing
    pub model: EmotionModel, // Made public for testing
    pub(crate) options: InferenceOptions,
    classifier_cell: Arc<OnceLock<Arc<HostedClassifier>>>,
    analyzer_cell: Arc<OnceLock<Arc<ConversationAnalyzer>>>,
    pub(crate) inference_handler: Arc<Mutex<Option<Arc<InferenceHandlerFn>>>>,
}

// Manual impl: the inference handler is a closure trait object, which
// rules out derive(Debug)
impl std::fmt::Debug for HfInference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfInference")
            .field("api_token", &self.api_token)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Build the underlying HTTP client with shared defaults
fn build_http_client(timeout: Duration) -> HttpClient {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    HttpClient::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client")
}

impl HfInference {
    /// Create a new inference client with the specified API token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http_client: build_http_client(DEFAULT_TIMEOUT),
            api_token: SecureApiToken::new(api_token),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: EmotionModel::default(),
            options: InferenceOptions::default(),
            classifier_cell: Arc::new(OnceLock::new()),
            analyzer_cell: Arc::new(OnceLock::new()),
            inference_handler: Arc::new(Mutex::new(None)),
        }
    }

    /// Set custom inference handler for this client
    /// This is useful for testing
    pub fn set_inference_handler<F>(&self, handler: Box<F>)
    where
        F: Fn(String, InferenceRequest) -> InferenceFuture + Send + Sync + 'static,
    {
        if let Ok(mut guard) = self.inference_handler.lock() {
            *guard = Some(Arc::new(move |model, request| handler(model, request)));
        }
    }

    /// Set the classification model to use for requests
    pub fn with_model(mut self, model: EmotionModel) -> Self {
        self.model = model;
        self
    }

    /// Set a custom base URL for the inference service
    pub fn with_base_url(mut self, url: impl Into<String>) -> MoodResult<Self> {
        self.base_url = StringValidator::not_empty(url, "base_url")?;
        Ok(self)
    }

    /// Ask the service to hold the request until a cold model has loaded
    /// instead of answering 503
    pub fn with_wait_for_model(mut self, wait_for_model: bool) -> Self {
        self.options.wait_for_model = wait_for_model;
        self
    }

    /// Control whether the service may answer from its inference cache
    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.options.use_cache = use_cache;
        self
    }

    /// Set a custom request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> MoodResult<Self> {
        let timeout = validate(
            timeout,
            |t| !t.is_zero(),
            "timeout must be greater than zero",
        )?;
        self.http_client = build_http_client(timeout);
        Ok(self)
    }

    /// Get the emotion classifier backed by this client
    pub fn classifier(&self) -> Arc<HostedClassifier> {
        self.classifier_cell
            .get_or_init(|| Arc::new(HostedClassifier::new(Arc::new(self.clone()))))
            .clone()
    }

    /// Get the conversation analyzer backed by this client
    pub fn analyzer(&self) -> Arc<ConversationAnalyzer> {
        self.analyzer_cell
            .get_or_init(|| Arc::new(ConversationAnalyzer::new(self.classifier())))
            .clone()
    }

    /// Create a new inference client with a mock handler for testing
    /// This is a helper method for testing purposes
    pub fn with_mock_inference<T>(api_token: impl Into<String>, mock: T) -> Self
    where
        T: Into<Arc<dyn InferenceHandler>> + Send + Sync + 'static,
    {
        let client = Self::new(api_token);

        // Convert to Arc<dyn InferenceHandler>
        let mock_handler = mock.into();

        // Route every request through the mock
        client.set_inference_handler(Box::new(move |model, request| {
            let mock = mock_handler.clone();
            mock.process_request(model, request)
        }));

        client
    }

    /// Send one classification request and return the raw response body.
    ///
    /// Goes through the configured mock handler when one is installed,
    /// otherwise posts to `{base_url}/models/{model_id}`.
    pub(crate) async fn send_inference(&self, text: &str) -> MoodResult<String> {
        let request = InferenceRequest {
            inputs: text.to_string(),
            options: self.options.clone(),
        };
        let model_id = self.model.as_str().to_string();

        // First, check if we have a custom inference handler from a mock
        let handler_opt = {
            if let Ok(guard) = self.inference_handler.lock() {
                (*guard).as_ref().cloned()
            } else {
                None
            }
        };

        if let Some(handler) = handler_opt {
            return handler(model_id, request).await;
        }

        // If we reach here, use the regular HTTP client
        let endpoint = format!("{}/models/{}", self.base_url, model_id);
        tracing::debug!("Dispatching classification request to model {}", model_id);

        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(self.api_token.as_str())
            .json(&request)
            .send()
            .await?;

        // Check for errors
        let response = self.handle_error_response(response).await?;

        response.text().await.map_err(|e| {
            MoodError::request_error(
                e.to_string(),
                None,
                Some(e),
                Some(concat!(file!(), ":", line!())),
            )
        })
    }

    /// Handle error responses from the inference service
    ///
    /// This method checks for error status codes and formats appropriate error values.
    async fn handle_error_response(
        &self,
        response: reqwest::Response,
    ) -> MoodResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if status == 429 {
            // Rate limit handling
            let retry_after = headers
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(MoodError::rate_limited(
                retry_after,
                Some(concat!(file!(), ":", line!())),
            ));
        }

        if status == 503 {
            // A cold model answers 503 with an estimated_time while it loads
            if let Ok(body) = serde_json::from_str::<InferenceErrorBody>(&error_text) {
                return Err(MoodError::model_loading(
                    body.estimated_time,
                    Some(concat!(file!(), ":", line!())),
                ));
            }
        }

        // Sanitize error message before returning
        let sanitized_error = sanitize_error_message(&error_text);

        Err(MoodError::api_error(
            sanitized_error,
            Some(status),
            None,
            Some(concat!(file!(), ":", line!())),
        ))
    }
}
