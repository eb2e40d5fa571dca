// Import the main modules using prelude for convenience
use moodscope::prelude::*;

/// Basic usage example showing conversation analysis and error handling
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Route crate logs to stderr, filtered by RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Conversation Mood Analysis Example");
    println!("==================================\n");

    // Create client from environment variable
    let client = match from_env() {
        Ok(client) => client,
        Err(e) => {
            println!("Note: HF_API_TOKEN not set, the request below will fail.");
            println!("Error: {}\n", e);
            // For demonstration purposes only, we'll continue even though the API calls will fail
            new_client("dummy_token_for_demo")
        }
    };

    // Hold the request while the model loads instead of failing with 503
    let client = client.with_wait_for_model(true);

    let transcript = "\
I finally finished the database migration today!
Honestly I was terrified it would take everything down.
But the cutover went smoothly and the whole team was thrilled.";

    println!("Transcript:\n{}\n", transcript);

    match client.analyzer().analyze(transcript).await {
        Ok(report) => {
            println!("{}\n", report);

            println!("Per-message breakdown:");
            for message in &report.messages {
                println!(
                    "  [{}] {} ({:.2}): {}",
                    message.emotion.sentiment(),
                    message.emotion.label,
                    message.emotion.confidence,
                    message.text
                );
            }
        }
        Err(e) => {
            // Service conditions worth handling separately
            match &e {
                MoodError::RateLimited { retry_after, .. } => {
                    println!("Rate limited, retry after: {:?}", retry_after);
                }
                MoodError::ModelLoading { estimated_time, .. } => {
                    println!("Model still loading, estimated time: {:?}s", estimated_time);
                }
                _ => println!("Analysis failed: {}", e),
            }
            if let Some(location) = e.location() {
                println!("Location: {}", location);
            }
        }
    }

    Ok(())
}
