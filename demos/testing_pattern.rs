// Shows the mocking pattern the test suite uses: every request goes
// through an InferenceHandler closure installed on the client, so this
// runs fully offline without an API token.
// For real implementations, see the tests directory.

use moodscope::prelude::*;
use moodscope::types::InferenceRequest;
use moodscope::InferenceFuture;

// Pick a canned prediction body by looking at the message text
fn scripted_body(inputs: &str) -> String {
    let (label, score) = if inputs.contains("thrilled") || inputs.contains("finished") {
        ("joy", 0.97)
    } else if inputs.contains("terrified") {
        ("fear", 0.91)
    } else {
        ("neutral", 0.62)
    };
    format!(r#"[[{{"label":"{}","score":{}}}]]"#, label, score)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Inference Mocking Pattern Example");
    println!("=================================\n");

    // No real token needed, nothing below touches the network
    let client = new_client("dummy_token_for_demo");

    client.set_inference_handler(Box::new(|model, request: InferenceRequest| -> InferenceFuture {
        println!("  (mock) {} classifying {:?}", model, request.inputs);
        let body = scripted_body(&request.inputs);
        Box::pin(async move { Ok(body) })
    }));

    let transcript = "\
I finally finished the migration!
I was terrified something would break.
The team is thrilled with the result.";

    println!("Classifying through the mock handler:\n");
    let report = client.analyzer().analyze(transcript).await?;
    println!("\n{}\n", report);

    // Errors injected by the handler propagate like real service errors
    let failing = new_client("dummy_token_for_demo");
    failing.set_inference_handler(Box::new(|_model, _request| -> InferenceFuture {
        Box::pin(async { Err(MoodError::simple_api_error("Injected failure", 500)) })
    }));

    match failing.analyzer().analyze("any message").await {
        Ok(_) => println!("This should not happen"),
        Err(e) => println!("Propagated error: {}", e),
    }

    Ok(())
}
