// Sentiment polarity and coping suggestion lookup tables

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Binary sentiment polarity derived from an emotion label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => f.write_str("Positive"),
            Sentiment::Negative => f.write_str("Negative"),
        }
    }
}

/// Suggestion returned for labels without a dedicated entry
pub const DEFAULT_SUGGESTION: &str = "Stay balanced and reflect.";

lazy_static! {
    static ref SUGGESTIONS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("joy", "Keep spreading positivity and enjoy the moment!");
        m.insert("love", "Share your love and gratitude with someone today.");
        m.insert("surprise", "Be open to new experiences and stay curious!");
        m.insert("anger", "Take a deep breath and step away to cool down.");
        m.insert("sadness", "Talk to someone you trust and practice self-care.");
        m.insert("fear", "Face your fears slowly and be kind to yourself.");
        m.insert("neutral", "Maintain balance and mindfulness in your thoughts.");
        m
    };
}

/// Map a lowercase emotion label to its sentiment polarity.
///
/// Joy, love and surprise count as positive; every other label,
/// including ones this crate has never seen, counts as negative.
pub fn sentiment_of(label: &str) -> Sentiment {
    match label {
        "joy" | "love" | "surprise" => Sentiment::Positive,
        _ => Sentiment::Negative,
    }
}

/// Look up the coping suggestion for a lowercase emotion label.
///
/// Unknown labels fall back to [`DEFAULT_SUGGESTION`]. Total over all
/// inputs so aggregation never fails on an unexpected model vocabulary.
pub fn suggestion_for(label: &str) -> &'static str {
    SUGGESTIONS.get(label).copied().unwrap_or(DEFAULT_SUGGESTION)
}

/// Uppercase the first character of a label for display.
///
/// Lookup keys stay lowercase; this is presentation only.
pub fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
