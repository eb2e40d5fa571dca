// Emotion classification over the hosted inference service

use crate::client::HfInference;
use crate::emotion::{self, Sentiment};
use crate::parse_error;
use crate::types::*;
use crate::utils::StringValidator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Emotion detected for one piece of text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmotionResult {
    /// Lowercase emotion label, e.g. "joy" or "anger"
    pub label: String,
    /// Model confidence for the label, between 0.0 and 1.0
    pub confidence: f64,
}

impl EmotionResult {
    /// Sentiment polarity of this emotion
    pub fn sentiment(&self) -> Sentiment {
        emotion::sentiment_of(&self.label)
    }

    /// Coping suggestion matching this emotion
    pub fn suggestion(&self) -> &'static str {
        emotion::suggestion_for(&self.label)
    }
}

/// A text-to-emotion classifier.
///
/// [`crate::analyzer::ConversationAnalyzer`] depends only on this trait,
/// so tests can swap the hosted model for a local deterministic one.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify one message and return its top-ranked emotion
    async fn classify(&self, text: &str) -> MoodResult<EmotionResult>;
}

/// Classifier backed by the hosted inference service
pub struct HostedClassifier {
    client: Arc<HfInference>,
}

impl HostedClassifier {
    pub(crate) fn new(client: Arc<HfInference>) -> Self {
        Self { client }
    }

    /// Model identifier this classifier sends requests to
    pub fn model_id(&self) -> &str {
        self.client.model.as_str()
    }
}

#[async_trait]
impl EmotionClassifier for HostedClassifier {
    async fn classify(&self, text: &str) -> MoodResult<EmotionResult> {
        let text = StringValidator::not_blank(text, "text")?;

        let body = self.client.send_inference(&text).await?;

        // The service answers [[{label, score}, ...]] for single inputs,
        // some deployments answer the flat [{label, score}, ...] instead
        let predictions: Predictions = serde_json::from_str(&body).map_err(|e| {
            parse_error!(
                format!("Unexpected classification payload: {}", e),
                body.clone(),
                e
            )
        })?;

        let top = predictions
            .into_ranked()
            .into_iter()
            .next()
            .ok_or_else(|| parse_error!("Classification returned no predictions", body.clone()))?;

        tracing::debug!(
            "Classified message as {} (score: {:.4})",
            top.label,
            top.score
        );

        // Labels vary in casing between models, comparisons downstream
        // expect lowercase
        Ok(EmotionResult {
            label: top.label.to_lowercase(),
            confidence: top.score,
        })
    }
}
