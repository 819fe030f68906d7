//! Locate the candidate payload inside generated text
//!
//! Generators wrap their answer in prose or Markdown fences more often than
//! not. Candidates are tried in order and the first non-empty one wins:
//!
//! 1. the body of the first fence labelled `json`
//! 2. the body of the first fence of any kind
//! 3. the whole text, trimmed

use crate::error::ExtractionFailed;

const FENCE: &str = "```";

#[derive(Debug, PartialEq, Eq)]
struct Fence<'a> {
    label: &'a str,
    body: &'a str,
}

/// Extract the candidate payload from `text`
///
/// # Examples
///
/// ```
/// use sift_extractor::extract_payload;
///
/// let reply = "Here you go:\n```json\n{\"name\": \"Ada\"}\n```";
/// assert_eq!(extract_payload(reply).unwrap(), "{\"name\": \"Ada\"}");
/// assert!(extract_payload("   ").is_err());
/// ```
pub fn extract_payload(text: &str) -> Result<&str, ExtractionFailed> {
    let fences = fenced_blocks(text);

    let labelled = fences
        .iter()
        .filter(|fence| fence.label.eq_ignore_ascii_case("json"))
        .map(|fence| fence.body)
        .find(|body| !body.is_empty());
    if let Some(body) = labelled {
        return Ok(body);
    }

    if let Some(body) = fences.iter().map(|fence| fence.body).find(|body| !body.is_empty()) {
        return Ok(body);
    }

    let whole = text.trim();
    if whole.is_empty() {
        Err(ExtractionFailed)
    } else {
        Ok(whole)
    }
}

/// Every closed fence in `text`, in order of appearance
fn fenced_blocks(text: &str) -> Vec<Fence<'_>> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after = &rest[open + FENCE.len()..];
        let Some(close) = after.find(FENCE) else {
            break;
        };
        blocks.push(split_label(&after[..close]));
        rest = &after[close + FENCE.len()..];
    }

    blocks
}

/// Separate an info string such as `json` from the fence body
///
/// A leading word is a label only when it ends its line, or when it is `json`
/// directly followed by a JSON value. In ```` ```John Smith``` ```` the first
/// word is content.
fn split_label(inner: &str) -> Fence<'_> {
    let label_len = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(inner.len());
    let (label, body) = inner.split_at(label_len);

    let ends_line = body
        .find('\n')
        .is_some_and(|newline| body[..newline].trim().is_empty());
    let inline_json = label.eq_ignore_ascii_case("json") && body.trim_start().starts_with(['{', '[']);
    let labelled = label_len > 0 && (ends_line || inline_json);

    if labelled {
        Fence {
            label,
            body: body.trim(),
        }
    } else {
        Fence {
            label: "",
            body: inner.trim(),
        }
    }
}
