//! Fallback strategies for model output that ignores the requested markers.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{capture_segments, DelimiterPair};

/// Markdown python fence; the closing fence must start a line.
static MARKDOWN_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:python|py)(.*?)\n```").expect("markdown fence regex"));

/// First line of something that reads like a Python statement.
static CODE_STATEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^(?:
            import\s+[A-Za-z_][\w.]*
          | from\s+[\w.]+\s+import\s
          | (?:async\s+)?def\s+[A-Za-z_]\w*\s*\(
          | class\s+[A-Za-z_]\w*\s*[:(]
          | (?:if|elif|else|while|for|with|try|except|finally)\b.*:\s*$
          | (?:return|raise|assert|del|global|nonlocal|yield|await)\b
          | pass\s*$
          | @[A-Za-z_][\w.]*
          | \#
          | [A-Za-z_]\w*(?:\s*,\s*[A-Za-z_]\w*)+\s*=[^=]
          | [A-Za-z_][\w.]*(?:\[[^\]]*\])?\s*(?:\*\*|//|<<|>>|[-+*/%|&^@])?=[^=]
          | [A-Za-z_][\w.]*\(.*\)\s*$
        )",
    )
    .expect("code statement regex")
});

/// Payloads of markdown python fences, trimmed, in source order
pub fn markdown_segments(text: &str) -> Vec<String> {
    capture_segments(&MARKDOWN_FENCE, text)
}

/// Whether un-delimited `text` plausibly is code on its own.
///
/// Text containing any fence or either marker is never raw code: the model
/// tried to delimit it and got the markers wrong, which should be reported.
pub fn looks_like_raw_code(text: &str, delimiters: &DelimiterPair) -> bool {
    if text.contains("```") || text.contains(delimiters.open()) || text.contains(delimiters.close())
    {
        return false;
    }

    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| CODE_STATEMENT.is_match(line))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> DelimiterPair {
        DelimiterPair::code_tags()
    }

    #[test]
    fn test_markdown_segments() {
        let text = "```python\na = 1\n```\ntext\n```py\nb = 2\n```";
        assert_eq!(markdown_segments(text), vec!["a = 1", "b = 2"]);
        assert!(markdown_segments("```rust\nfn main() {}\n```").is_empty());
    }

    #[test]
    fn test_code_like_first_lines() {
        for code in [
            "import numpy as np",
            "from math import sqrt",
            "def solve(x):\n    return x",
            "async def run():",
            "class Tool(Base):",
            "for i in range(3):\n    print(i)",
            "x = 1",
            "a, b = 1, 2",
            "total += 3",
            "data['key'] = value",
            "print('hello')",
            "plt.savefig('out.png')  ",
            "result = final_answer(42)",
            "@tool\ndef f(): ...",
            "# compute the result\nx = 2",
            "return result",
        ] {
            assert!(looks_like_raw_code(code, &tags()), "{:?} should look like code", code);
        }
    }

    #[test]
    fn test_prose_is_not_code() {
        for prose in [
            "",
            "   \n  ",
            "Wrong blob!",
            "Here is how to solve the problem:",
            "Thought: I should compute the square root.",
            "if you want, I can help",
            "x == 1 is what I expect",
            "Sure (here is my reasoning) the answer is 4.",
            "Note (see above) that this works",
            "print (the result) later",
        ] {
            assert!(!looks_like_raw_code(prose, &tags()), "{:?} should not look like code", prose);
        }
    }

    #[test]
    fn test_partial_markers_disqualify_raw_code() {
        assert!(!looks_like_raw_code("x = 1\n</code>", &tags()));
        assert!(!looks_like_raw_code("<code>\nx = 1", &tags()));
        assert!(!looks_like_raw_code("x = 1\n```", &tags()));
    }
}
