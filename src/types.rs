// Core types, errors and wire formats

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// The result type used throughout the crate
pub type MoodResult<T> = Result<T, MoodError>;

/// Convert reqwest::Error to our MoodError
impl From<reqwest::Error> for MoodError {
    fn from(err: reqwest::Error) -> Self {
        MoodError::RequestError {
            message: err.to_string(),
            details: None,
            location: None,
            source: Some(Arc::new(err) as Arc<dyn std::error::Error + Send + Sync>),
        }
    }
}

/// A secure container for API tokens that automatically zeroes memory when dropped
pub struct SecureApiToken {
    token: String,
}

impl SecureApiToken {
    /// Create a new secure API token
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        Self { token }
    }

    /// Get a reference to the underlying token
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

// Implement Deref for convenience in passing to reqwest headers
impl Deref for SecureApiToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

// Implement Drop to zero memory when the token is dropped
impl Drop for SecureApiToken {
    fn drop(&mut self) {
        // Overwrite the string with zeros to remove sensitive data from memory
        unsafe {
            let bytes = self.token.as_bytes_mut();
            bytes.iter_mut().for_each(|b| *b = 0);
        }
    }
}

// Prevent accidental printing of API tokens in logs/debug output
impl fmt::Debug for SecureApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecureApiToken([REDACTED])")
    }
}

// Display implementation also redacts the token
impl fmt::Display for SecureApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED API TOKEN]")
    }
}

// Clone implementation for SecureApiToken
impl Clone for SecureApiToken {
    fn clone(&self) -> Self {
        Self {
            token: self.token.clone(),
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum MoodError {
    #[error("API request failed: {message}")]
    RequestError {
        message: String,
        details: Option<String>,
        location: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to parse inference response: {message}")]
    ParseError {
        message: String,
        source_text: Option<String>,
        location: Option<String>,
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Rate limited by API: retry after {retry_after:?}")]
    RateLimited {
        retry_after: Option<Duration>,
        details: Option<String>,
        location: Option<String>,
    },

    #[error("Model is still loading: estimated time {estimated_time:?}s")]
    ModelLoading {
        estimated_time: Option<f64>,
        location: Option<String>,
    },

    #[error("API token not provided")]
    MissingApiToken { location: Option<String> },

    #[error("API returned error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        response_body: Option<String>,
        location: Option<String>,
    },

    #[error("Conversation contains no analyzable messages")]
    EmptyConversation { location: Option<String> },

    #[error("Invalid model specified: {0}")]
    InvalidModel(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Emotion classification model identifiers on the inference service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionModel {
    /// DistilRoBERTa fine-tuned for English emotion classification
    #[serde(rename = "j-hartmann/emotion-english-distilroberta-base")]
    DistilRobertaBase,
    /// Use a custom model identifier
    Custom(String),
}

impl EmotionModel {
    pub fn as_str(&self) -> &str {
        match self {
            EmotionModel::DistilRobertaBase => "j-hartmann/emotion-english-distilroberta-base",
            EmotionModel::Custom(id) => id,
        }
    }

    /// Create a custom model from a repository identifier
    pub fn custom(id: impl Into<String>) -> MoodResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(MoodError::InvalidModel(
                "model identifier cannot be empty".to_string(),
            ));
        }
        Ok(EmotionModel::Custom(id))
    }
}

impl Default for EmotionModel {
    fn default() -> Self {
        EmotionModel::DistilRobertaBase
    }
}

/// Extra options forwarded to the inference service with each request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceOptions {
    pub use_cache: bool,
    pub wait_for_model: bool,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            wait_for_model: false,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct InferenceRequest {
    pub inputs: String,
    pub options: InferenceOptions,
}

/// One ranked prediction as returned by a text-classification model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Prediction payload of a single-input classification call.
///
/// The service answers `[[{label, score}, ...]]` for text-classification
/// pipelines, but some models and older deployments answer the flat
/// `[{label, score}, ...]` shape instead. Both deserialize here and
/// normalize through [`Predictions::into_ranked`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Predictions {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl Predictions {
    /// Normalize either response shape into one ranked prediction list.
    ///
    /// For the nested shape this keeps the first inner list, which holds
    /// the predictions for the single submitted input.
    pub fn into_ranked(self) -> Vec<LabelScore> {
        match self {
            Predictions::Nested(mut groups) => {
                if groups.is_empty() {
                    Vec::new()
                } else {
                    groups.swap_remove(0)
                }
            }
            Predictions::Flat(list) => list,
        }
    }
}

/// Error body the inference service attaches to non-2xx answers,
/// notably the 503 returned while a cold model is loading
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceErrorBody {
    pub error: String,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

// Implementation of helper methods for MoodError
impl MoodError {
    // Error helpers with location and source tracking
    pub fn request_error<T: Into<String>>(
        message: T,
        details: Option<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::RequestError {
            message: message.into(),
            details,
            location: location.map(String::from),
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };

        // Optional logging integration
        if let Some(loc) = &error.location() {
            log::error!("{} at {}", error, loc);
        } else {
            log::error!("{}", error);
        }

        error
    }

    pub fn parse_error<T: Into<String>>(
        message: T,
        source_text: Option<String>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::ParseError {
            message: message.into(),
            source_text,
            location: location.map(String::from),
            source: source.map(|e| Arc::new(e) as Arc<dyn std::error::Error + Send + Sync>),
        };

        // Optional logging integration
        if let Some(loc) = &error.location() {
            log::error!("{} at {}", error, loc);
        } else {
            log::error!("{}", error);
        }

        error
    }

    pub fn api_error<T: Into<String>>(
        message: T,
        status: Option<u16>,
        response_body: Option<String>,
        location: Option<&str>,
    ) -> Self {
        let error = Self::ApiError {
            message: message.into(),
            status: status.unwrap_or(500),
            response_body,
            location: location.map(String::from),
        };

        // Optional logging integration
        if let Some(loc) = &error.location() {
            log::error!("{} at {}", error, loc);
        } else {
            log::error!("{}", error);
        }

        error
    }

    pub fn rate_limited(retry_after: Option<Duration>, location: Option<&str>) -> Self {
        let error = Self::RateLimited {
            retry_after,
            details: None,
            location: location.map(String::from),
        };
        log::error!("{}", error);
        error
    }

    pub fn model_loading(estimated_time: Option<f64>, location: Option<&str>) -> Self {
        let error = Self::ModelLoading {
            estimated_time,
            location: location.map(String::from),
        };
        log::error!("{}", error);
        error
    }

    pub fn empty_conversation(location: Option<&str>) -> Self {
        let error = Self::EmptyConversation {
            location: location.map(String::from),
        };
        log::error!("{}", error);
        error
    }

    pub fn missing_api_token(location: Option<&str>) -> Self {
        let error = Self::MissingApiToken {
            location: location.map(String::from),
        };
        log::error!("{}", error);
        error
    }

    // Simpler overloads for constructing errors without call context
    pub fn simple_request_error<T: Into<String>>(message: T) -> Self {
        Self::request_error(message, None, None::<reqwest::Error>, None)
    }

    pub fn simple_parse_error<T: Into<String>>(message: T) -> Self {
        Self::parse_error(message, None, None::<reqwest::Error>, None)
    }

    pub fn simple_api_error<T: Into<String>>(message: T, status: u16) -> Self {
        Self::api_error(message, Some(status), None, None)
    }

    // Location and source information accessors
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::RequestError { location, .. } => location.as_deref(),
            Self::ParseError { location, .. } => location.as_deref(),
            Self::RateLimited { location, .. } => location.as_deref(),
            Self::ModelLoading { location, .. } => location.as_deref(),
            Self::MissingApiToken { location } => location.as_deref(),
            Self::ApiError { location, .. } => location.as_deref(),
            Self::EmptyConversation { location } => location.as_deref(),
            _ => None,
        }
    }

    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        match self {
            Self::RequestError { source, .. } => source.as_ref().map(|s| s.as_ref()),
            Self::ParseError { source, .. } => source.as_ref().map(|s| s.as_ref()),
            _ => None,
        }
    }
}

/// Create a parse error that captures file and line location information
#[macro_export]
macro_rules! parse_error {
    ($message:expr) => {
        $crate::MoodError::parse_error(
            $message,
            None,
            None::<reqwest::Error>,
            Some(concat!(file!(), ":", line!())),
        )
    };
    ($message:expr, $source_text:expr) => {
        $crate::MoodError::parse_error(
            $message,
            Some($source_text),
            None::<reqwest::Error>,
            Some(concat!(file!(), ":", line!())),
        )
    };
    ($message:expr, $source_text:expr, $source:expr) => {
        $crate::MoodError::parse_error(
            $message,
            Some($source_text),
            Some($source),
            Some(concat!(file!(), ":", line!())),
        )
    };
}

/// Create an API error with location info
#[macro_export]
macro_rules! api_error {
    ($message:expr, $status:expr) => {
        $crate::MoodError::api_error(
            $message,
            Some($status),
            None,
            Some(concat!(file!(), ":", line!())),
        )
    };
    ($message:expr, $status:expr, $body:expr) => {
        $crate::MoodError::api_error(
            $message,
            Some($status),
            Some($body),
            Some(concat!(file!(), ":", line!())),
        )
    };
}

/// Create an empty-conversation error with location info
#[macro_export]
macro_rules! empty_conversation {
    () => {
        $crate::MoodError::empty_conversation(Some(concat!(file!(), ":", line!())))
    };
}

lazy_static! {
    // Long opaque character runs are treated as credentials
    static ref TOKEN_PATTERN: Regex = Regex::new(r"[A-Za-z0-9_-]{20,}").unwrap();
}

/// Helper function to sanitize error messages to prevent leaking sensitive information
pub fn sanitize_error_message(message: &str) -> String {
    // Remove any potential API tokens
    TOKEN_PATTERN.replace_all(message, "[REDACTED]").into_owned()
}
