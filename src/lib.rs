//! # moodscope: conversation emotion and sentiment analysis
//!
//! This crate classifies the emotion of every message in a conversation
//! transcript with a hosted text-classification model, then derives
//! aggregate mood facts: the first and last emotion, the dominant
//! emotion across the whole conversation, a binary overall sentiment
//! and a matching coping suggestion.
//!
//! ## Key Features
//!
//! - Async client for the Hugging Face Inference API
//! - Pluggable [`EmotionClassifier`] trait for deterministic tests
//! - Conversation-level aggregation with stable tie-breaking
//! - Secure API token handling with memory zeroing
//!
//! ## Basic Usage
//!
//! ```no_run
//! use moodscope::from_env;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a client from environment variable
//!     let client = from_env()?;
//!
//!     let report = client
//!         .analyzer()
//!         .analyze("I got the job today!\nI can hardly believe it.")
//!         .await?;
//!
//!     println!("{}", report);
//!
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod classifier;
pub mod client;
pub mod emotion;
pub mod types;
pub mod utils;

// Re-export core components
pub use analyzer::{AnalysisReport, ConversationAnalyzer, MessageAnalysis};
pub use classifier::{EmotionClassifier, EmotionResult, HostedClassifier};
pub use client::{HfInference, InferenceFuture, InferenceHandler, DEFAULT_BASE_URL};
pub use emotion::{sentiment_of, suggestion_for, title_case, Sentiment, DEFAULT_SUGGESTION};
pub use types::{
    sanitize_error_message, EmotionModel, InferenceOptions, InferenceRequest, LabelScore,
    MoodError, MoodResult, Predictions, SecureApiToken,
};

pub mod prelude {
    //! Convenient imports for commonly used types and functions
    pub use crate::analyzer::{AnalysisReport, ConversationAnalyzer, MessageAnalysis};
    pub use crate::classifier::{EmotionClassifier, EmotionResult, HostedClassifier};
    pub use crate::client::{HfInference, InferenceHandler};
    pub use crate::emotion::{sentiment_of, suggestion_for, Sentiment};
    pub use crate::types::{EmotionModel, MoodError, MoodResult, SecureApiToken};
    pub use crate::{from_env, new_client};
}

// Entry point functions
pub fn new_client(api_token: impl Into<String>) -> HfInference {
    HfInference::new(api_token)
}

pub fn from_env() -> Result<HfInference, MoodError> {
    match std::env::var("HF_API_TOKEN") {
        Ok(token) if !token.trim().is_empty() => Ok(HfInference::new(token)),
        _ => Err(MoodError::MissingApiToken { location: None }),
    }
}
