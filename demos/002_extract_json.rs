//! Example 002: Parsing tool calls out of mixed text
//!
//! Tool-calling prompts ask for a JSON action, but models usually think out
//! loud first. This example separates the thought from the action and checks
//! that the tool name is safe to use in generated code.

use blobkit::extract::JsonExtractor;
use blobkit::names::validate_name;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let answer = r#"Thought: I should look up the weather first.
Action: {"name": "get_weather", "arguments": {"location": "Paris"}}
Let me know if you need anything else."#;

    let blob = JsonExtractor::new().extract(answer)?;
    println!("thought: {}", blob.prefix.trim());
    println!("action:  {}", serde_json::to_string_pretty(&blob.value)?);

    let tool_name = blob.value["name"].as_str().unwrap_or_default();
    match validate_name(tool_name) {
        Ok(()) => println!("'{}' can be used as a tool name", tool_name),
        Err(error) => println!("rejected tool name: {}", error),
    }

    let broken = r#"Action: {"name": "get_weather", "arguments": {"location": "Paris"}"#;
    if let Err(error) = JsonExtractor::new().extract(broken) {
        println!("\nfeedback for the model:\n{}", error);
    }

    Ok(())
}
