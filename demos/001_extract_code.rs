//! Example 001: Extracting code from agent steps
//!
//! This example runs a code extractor over a few typical model answers and
//! shows which ones yield code and which ones produce corrective feedback.

use blobkit::extract::{BlobExtractor, DelimiterPair, FallbackPolicy};
use blobkit::telemetry::{init_logging, LoggingConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = init_logging(LoggingConfig::default().with_level("blobkit=info"))?;

    let extractor = BlobExtractor::new(DelimiterPair::code_tags())?;
    let lenient = extractor.clone().with_fallback(FallbackPolicy::lenient());

    let answers = [
        "Thought: compute it.\n<code>\nresult = sum(range(10))\nprint(result)\n</code>",
        "Sure! Here you go:\n```python\nfinal_answer(45)\n```",
        "result = sum(range(10))",
        "The final answer is 45.",
    ];

    for answer in answers {
        println!("--- model answer ---\n{}\n", answer);
        match extractor.extract(answer) {
            Ok(code) => println!("extracted:\n{}\n", code),
            Err(error) => match lenient.extract(answer) {
                Ok(code) => println!("extracted with raw-code fallback:\n{}\n", code),
                Err(_) => println!("feedback for the model:\n{}\n", error),
            },
        }
    }

    Ok(())
}
