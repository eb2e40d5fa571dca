use moodscope::analyzer::ConversationAnalyzer;
use moodscope::emotion::DEFAULT_SUGGESTION;
use moodscope::{EmotionModel, HfInference, MoodError, Sentiment};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tokio::test;

use mock_inference::{emotion_body, mock_to_handler, MockInference};
use test_helpers::{keyword_tester, scripted_tester};

#[test]
async fn test_single_message_classifies_first_and_last_independently() {
    let tester = keyword_tester();

    let report = tester.analyzer.analyze("I am so happy today").await.unwrap();

    assert_eq!(report.message_count, 1);
    assert_eq!(report.first_emotion, report.last_emotion);
    assert_eq!(report.first_sentiment, report.last_sentiment);
    assert_eq!(report.first_suggestion, report.last_suggestion);
    assert_eq!(report.first_emotion.label, "joy");
    assert_eq!(report.dominant_emotion, "joy");

    // First, last and the overall pass each issue their own request
    let calls = tester.classifier.calls();
    assert_eq!(
        calls,
        vec![
            "I am so happy today".to_string(),
            "I am so happy today".to_string(),
            "I am so happy today".to_string(),
        ]
    );
}

#[test]
async fn test_identical_transcripts_produce_identical_reports() {
    let transcript = "I am so happy today\nI am furious about the delay\nStill happy overall";

    let first_run = keyword_tester().analyzer.analyze(transcript).await.unwrap();
    let second_run = keyword_tester().analyzer.analyze(transcript).await.unwrap();

    assert_eq!(first_run, second_run);
}

#[test]
async fn test_dominant_emotion_requires_strictly_higher_count() {
    let tester = scripted_tester();
    tester
        .classifier
        .on("a", "joy", 0.9)
        .on("b", "anger", 0.8)
        .on("c", "joy", 0.85);

    let report = tester.analyzer.analyze("a\nb\nc").await.unwrap();

    assert_eq!(report.dominant_emotion, "joy");
    assert_eq!(
        report.emotion_counts,
        vec![("joy".to_string(), 2), ("anger".to_string(), 1)]
    );
}

#[test]
async fn test_tie_break_keeps_earliest_seen_label() {
    // joy appears first, then anger catches up to 2-2
    let tester = scripted_tester();
    tester
        .classifier
        .on("a", "joy", 0.9)
        .on("b", "anger", 0.8)
        .on("c", "anger", 0.7)
        .on("d", "joy", 0.6);

    let report = tester.analyzer.analyze("a\nb\nc\nd").await.unwrap();
    assert_eq!(report.dominant_emotion, "joy");

    // Same counts with anger seen first resolves the other way, so the
    // tie-break tracks insertion order rather than anything alphabetical
    let tester = scripted_tester();
    tester
        .classifier
        .on("a", "anger", 0.9)
        .on("b", "joy", 0.8)
        .on("c", "joy", 0.7)
        .on("d", "anger", 0.6);

    let report = tester.analyzer.analyze("a\nb\nc\nd").await.unwrap();
    assert_eq!(report.dominant_emotion, "anger");
}

#[test]
async fn test_blank_conversation_is_rejected_before_any_classification() {
    let tester = keyword_tester();

    let result = tester.analyzer.analyze("\n   \n\t\n").await;

    assert!(matches!(result, Err(MoodError::EmptyConversation { .. })));
    assert_eq!(tester.classifier.call_count(), 0);
}

#[test]
async fn test_even_sentiment_split_counts_as_positive() {
    let tester = scripted_tester();
    tester
        .classifier
        .on("good news", "joy", 0.9)
        .on("bad news", "anger", 0.9);

    let report = tester.analyzer.analyze("good news\nbad news").await.unwrap();

    assert_eq!(report.positive_count, 1);
    assert_eq!(report.negative_count, 1);
    assert_eq!(report.overall_sentiment, Sentiment::Positive);
}

#[test]
async fn test_happy_conversation_scenario() {
    let tester = keyword_tester();

    let report = tester
        .analyzer
        .analyze("I am so happy today\nThis is wonderful news\nWow, that was unexpected")
        .await
        .unwrap();

    assert_eq!(report.message_count, 3);
    assert_eq!(report.first_emotion.label, "joy");
    assert_eq!(report.first_sentiment, Sentiment::Positive);
    assert_eq!(
        report.first_suggestion,
        "Keep spreading positivity and enjoy the moment!"
    );
    assert_eq!(report.last_emotion.label, "surprise");
    assert_eq!(report.last_sentiment, Sentiment::Positive);
    assert_eq!(
        report.last_suggestion,
        "Be open to new experiences and stay curious!"
    );
    assert_eq!(report.dominant_emotion, "joy");
    assert_eq!(report.overall_sentiment, Sentiment::Positive);
    assert_eq!(report.positive_count, 3);
    assert_eq!(report.negative_count, 0);
    assert_eq!(
        report.suggestion,
        "Keep spreading positivity and enjoy the moment!"
    );
}

#[test]
async fn test_distressed_conversation_scenario() {
    let tester = keyword_tester();

    let report = tester
        .analyzer
        .analyze("I am furious about this\nHonestly I am terrified now\nStill so angry")
        .await
        .unwrap();

    assert_eq!(report.first_sentiment, Sentiment::Negative);
    assert_eq!(report.last_sentiment, Sentiment::Negative);
    assert_eq!(report.dominant_emotion, "anger");
    assert_eq!(report.overall_sentiment, Sentiment::Negative);
    assert_eq!(
        report.suggestion,
        "Take a deep breath and step away to cool down."
    );
}

#[test]
async fn test_classification_failure_aborts_the_analysis() {
    let tester = scripted_tester();
    tester
        .classifier
        .on("first", "joy", 0.9)
        .on("last", "joy", 0.9);
    tester
        .classifier
        .fail_on("broken", MoodError::simple_api_error("upstream failure", 500));

    let result = tester.analyzer.analyze("first\nbroken\nlast").await;

    assert!(matches!(result, Err(MoodError::ApiError { status: 500, .. })));

    // first and last succeed up front, the overall pass stops at the
    // failing message and never reaches the one after it
    assert_eq!(
        tester.classifier.calls(),
        vec![
            "first".to_string(),
            "last".to_string(),
            "first".to_string(),
            "broken".to_string(),
        ]
    );
}

#[test]
async fn test_unknown_label_falls_back_to_defaults() {
    let tester = scripted_tester();
    tester.classifier.on("meh", "boredom", 0.7);

    let report = tester.analyzer.analyze("meh").await.unwrap();

    assert_eq!(report.dominant_emotion, "boredom");
    assert_eq!(report.overall_sentiment, Sentiment::Negative);
    assert_eq!(report.suggestion, DEFAULT_SUGGESTION);
}

#[test]
async fn test_messages_are_trimmed_and_blank_lines_dropped() {
    assert_eq!(
        ConversationAnalyzer::split_messages("  first \r\nsecond\r\n\r\n   \nthird  "),
        vec!["first", "second", "third"]
    );

    let tester = keyword_tester();
    let report = tester
        .analyzer
        .analyze("  I am happy  \n\n   wonderful   \n")
        .await
        .unwrap();

    assert_eq!(report.message_count, 2);
    assert_eq!(report.messages[0].text, "I am happy");
    assert_eq!(report.messages[1].text, "wonderful");
}

#[test]
async fn test_report_display_uses_title_case_labels() {
    let tester = keyword_tester();
    let report = tester.analyzer.analyze("I am so happy today").await.unwrap();

    let rendered = report.to_string();
    assert!(rendered.contains("First message"), "got: {}", rendered);
    assert!(rendered.contains("Last message"));
    assert!(rendered.contains("Overall summary"));
    assert!(rendered.contains("Joy (0.95)"));
    assert!(rendered.contains("Sentiment:  Positive"));
    assert!(rendered.contains("Overall sentiment: Positive"));
    assert!(rendered.contains("Keep spreading positivity and enjoy the moment!"));
}

#[test]
async fn test_analyzer_through_client_records_expected_requests() {
    let mock = Arc::new(MockInference::new());
    mock.add_mock(EmotionModel::DistilRobertaBase, emotion_body("JOY", 0.93));

    let client = HfInference::with_mock_inference("test-api-token", mock_to_handler(mock.clone()));
    let report = client
        .analyzer()
        .analyze("all good\nstill good")
        .await
        .unwrap();

    assert_eq!(report.message_count, 2);
    // Labels arrive uppercase from this model and come out lowercase
    assert_eq!(report.dominant_emotion, "joy");

    // first + last + one request per message in the overall pass
    let history = mock.get_request_history();
    assert_eq!(history.len(), 4);
    let inputs: Vec<&str> = history.iter().map(|(_, req)| req.inputs.as_str()).collect();
    assert_eq!(inputs, vec!["all good", "still good", "all good", "still good"]);
}

#[test]
async fn test_empty_conversation_never_reaches_the_service() {
    let mock = Arc::new(MockInference::new());
    let client = HfInference::with_mock_inference("test-api-token", mock_to_handler(mock.clone()));

    let result = client.analyzer().analyze(" \n\n  ").await;

    assert!(matches!(result, Err(MoodError::EmptyConversation { .. })));
    assert_eq!(mock.request_count(), 0);
}
