// Conversation analysis built on top of an emotion classifier

use crate::classifier::{EmotionClassifier, EmotionResult};
use crate::emotion::{self, Sentiment};
use crate::empty_conversation;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Emotion assigned to one message of a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageAnalysis {
    pub text: String,
    pub emotion: EmotionResult,
}

/// Aggregate outcome of analyzing a whole conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    /// Per-message classifications, in input order
    pub messages: Vec<MessageAnalysis>,
    pub message_count: usize,
    /// Emotion of the first message
    pub first_emotion: EmotionResult,
    pub first_sentiment: Sentiment,
    pub first_suggestion: String,
    /// Emotion of the last message
    pub last_emotion: EmotionResult,
    pub last_sentiment: Sentiment,
    pub last_suggestion: String,
    /// Most frequent label; ties keep the label seen earliest
    pub dominant_emotion: String,
    pub overall_sentiment: Sentiment,
    pub positive_count: usize,
    pub negative_count: usize,
    /// Label frequencies, ordered by first appearance
    pub emotion_counts: Vec<(String, usize)>,
    /// Coping suggestion for the dominant emotion
    pub suggestion: String,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conversation mood report ({} messages)",
            self.message_count
        )?;
        writeln!(f)?;
        writeln!(f, "First message")?;
        writeln!(
            f,
            "  Emotion:    {} ({:.2})",
            emotion::title_case(&self.first_emotion.label),
            self.first_emotion.confidence
        )?;
        writeln!(f, "  Sentiment:  {}", self.first_sentiment)?;
        writeln!(f, "  Suggestion: {}", self.first_suggestion)?;
        writeln!(f)?;
        writeln!(f, "Last message")?;
        writeln!(
            f,
            "  Emotion:    {} ({:.2})",
            emotion::title_case(&self.last_emotion.label),
            self.last_emotion.confidence
        )?;
        writeln!(f, "  Sentiment:  {}", self.last_sentiment)?;
        writeln!(f, "  Suggestion: {}", self.last_suggestion)?;
        writeln!(f)?;
        writeln!(f, "Overall summary")?;
        writeln!(
            f,
            "  Dominant emotion:  {}",
            emotion::title_case(&self.dominant_emotion)
        )?;
        writeln!(f, "  Overall sentiment: {}", self.overall_sentiment)?;
        write!(f, "  Suggestion:        {}", self.suggestion)
    }
}

/// Analyzes whole conversations with a pluggable emotion classifier
pub struct ConversationAnalyzer {
    classifier: Arc<dyn EmotionClassifier>,
}

impl ConversationAnalyzer {
    /// Create an analyzer over any classifier implementation
    pub fn new(classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self { classifier }
    }

    /// Split a transcript into trimmed, non-empty messages, one per line
    pub fn split_messages(conversation: &str) -> Vec<&str> {
        conversation
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Analyze a conversation transcript, one message per line.
    ///
    /// Classifies the first and last message, then every message in
    /// input order, and derives the aggregate mood facts from the label
    /// frequencies. The first classification error aborts the analysis.
    pub async fn analyze(&self, conversation: &str) -> MoodResult<AnalysisReport> {
        let messages = Self::split_messages(conversation);
        if messages.is_empty() {
            return Err(empty_conversation!());
        }

        // First and last are classified up front. A single-message
        // conversation still issues two independent requests here.
        let first_emotion = self.classifier.classify(messages[0]).await?;
        let last_emotion = self
            .classifier
            .classify(messages[messages.len() - 1])
            .await?;

        let first_sentiment = first_emotion.sentiment();
        let first_suggestion = first_emotion.suggestion().to_string();
        let last_sentiment = last_emotion.sentiment();
        let last_suggestion = last_emotion.suggestion().to_string();

        // Overall pass over every message, one request in flight at a time
        let mut analyses = Vec::with_capacity(messages.len());
        let mut counts: Vec<(String, usize)> = Vec::new();
        for text in &messages {
            let emotion = self.classifier.classify(text).await?;

            match counts.iter_mut().find(|(label, _)| *label == emotion.label) {
                Some(entry) => entry.1 += 1,
                None => counts.push((emotion.label.clone(), 1)),
            }

            analyses.push(MessageAnalysis {
                text: (*text).to_string(),
                emotion,
            });
        }

        // Strict comparison keeps the earliest-seen label on ties
        let mut dominant = &counts[0];
        for entry in &counts[1..] {
            if entry.1 > dominant.1 {
                dominant = entry;
            }
        }
        let dominant_emotion = dominant.0.clone();

        let mut positive_count = 0;
        let mut negative_count = 0;
        for (label, count) in &counts {
            match emotion::sentiment_of(label) {
                Sentiment::Positive => positive_count += *count,
                Sentiment::Negative => negative_count += *count,
            }
        }

        // An even split counts as positive
        let overall_sentiment = if positive_count >= negative_count {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };

        let suggestion = emotion::suggestion_for(&dominant_emotion).to_string();

        tracing::debug!(
            "Analyzed {} messages, dominant emotion {}",
            messages.len(),
            dominant_emotion
        );

        Ok(AnalysisReport {
            message_count: messages.len(),
            messages: analyses,
            first_emotion,
            first_sentiment,
            first_suggestion,
            last_emotion,
            last_sentiment,
            last_suggestion,
            dominant_emotion,
            overall_sentiment,
            positive_count,
            negative_count,
            emotion_counts: counts,
            suggestion,
        })
    }
}
