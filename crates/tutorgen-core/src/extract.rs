//! Resilient JSON extraction from model replies.
//!
//! Models wrap structured replies in prose, fenced blocks, or partial
//! noise. Extraction runs an ordered table of pure strategies and takes
//! the first one whose candidate actually parses — finding a candidate is
//! not enough, it must round-trip through the JSON parser before it wins.

use serde_json::Value;

use crate::error::AiError;

type Strategy = fn(&str) -> Option<Value>;

/// Ordered extraction strategies. Order is part of the contract.
const STRATEGIES: [(&str, Strategy); 5] = [
    ("direct", direct),
    ("tagged-fence", tagged_fence),
    ("any-fence", any_fence),
    ("balanced-braces", balanced_braces),
    ("line-scan", line_scan),
];

/// Recover a JSON value from arbitrary reply text.
///
/// Returns `AiError::Parse` carrying the original text when no strategy
/// produces parseable content.
pub fn extract_json(text: &str) -> Result<Value, AiError> {
    for (name, strategy) in STRATEGIES {
        if let Some(value) = strategy(text) {
            tracing::trace!(strategy = name, "recovered structured content");
            return Ok(value);
        }
    }
    Err(AiError::Parse {
        raw: text.to_string(),
    })
}

/// Strategy 1: the whole text is already JSON.
fn direct(text: &str) -> Option<Value> {
    serde_json::from_str(text.trim()).ok()
}

/// Strategy 2: first ```json fenced block that parses.
fn tagged_fence(text: &str) -> Option<Value> {
    fenced_blocks(text)
        .into_iter()
        .filter(|b| b.tagged_json)
        .find_map(|b| serde_json::from_str(b.content.trim()).ok())
}

/// Strategy 3: first untagged fenced block that parses.
fn any_fence(text: &str) -> Option<Value> {
    fenced_blocks(text)
        .into_iter()
        .filter(|b| !b.tagged_json)
        .find_map(|b| serde_json::from_str(b.content.trim()).ok())
}

/// Strategy 4: first substring bounded by a balanced outermost brace pair.
fn balanced_braces(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + offset + ch.len_utf8()];
                    return serde_json::from_str(candidate).ok();
                }
            }
            _ => {}
        }
    }
    None
}

/// Strategy 5: accumulate whole lines from the first line that opens a
/// brace-delimited block until the line that closes it at top level.
fn line_scan(text: &str) -> Option<Value> {
    let mut accumulated = String::new();
    let mut depth = 0isize;
    let mut in_block = false;
    let mut in_string = false;
    let mut escaped = false;

    for line in text.lines() {
        if !in_block {
            if !line.trim_start().starts_with('{') {
                continue;
            }
            in_block = true;
        }

        if !accumulated.is_empty() {
            accumulated.push('\n');
        }
        accumulated.push_str(line);

        for ch in line.chars() {
            if in_string {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }
            match ch {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
        }

        if depth <= 0 {
            return serde_json::from_str(&accumulated).ok();
        }
    }
    None
}

struct FencedBlock {
    content: String,
    tagged_json: bool,
}

/// Collect fenced blocks in document order. An unclosed trailing fence is
/// treated as running to end of input (truncated replies).
fn fenced_blocks(text: &str) -> Vec<FencedBlock> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut tagged_json = false;
    let mut current = String::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let tag = trimmed.trim_start_matches('`').trim().to_lowercase();
            tagged_json = tag == "json";
            current.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            blocks.push(FencedBlock {
                content: current.clone(),
                tagged_json,
            });
            current.clear();
            continue;
        }

        if in_block {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    if in_block && !current.is_empty() {
        blocks.push(FencedBlock {
            content: current,
            tagged_json,
        });
    }

    blocks
}
