use csl_core::ScriptError;

/// A balanced brace block located in an input string. `content` is the
/// text strictly between the braces; `end_pos` is the byte offset just
/// past the closing brace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub content: String,
    pub end_pos: usize,
}

/// Find the first `{` at or after `start_pos` and return the balanced
/// block it opens. Braces inside quoted substrings are inert, and a
/// backslash escapes the following character. Returns `Ok(None)` when
/// no opening brace exists.
pub fn extract_block(input: &str, start_pos: usize) -> Result<Option<Block>, ScriptError> {
    let Some(found) = input[start_pos..].find('{') else {
        return Ok(None);
    };
    let open = start_pos + found;

    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escape_next = false;

    for (offset, ch) in input[open..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '"' | '\'' => match in_string {
                None => in_string = Some(ch),
                Some(quote) if quote == ch => in_string = None,
                Some(_) => {}
            },
            _ if in_string.is_some() => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let at = open + offset;
                    return Ok(Some(Block {
                        content: input[open + 1..at].to_string(),
                        end_pos: at + 1,
                    }));
                }
            }
            _ => {}
        }
    }

    Err(ScriptError::new("PARSE_UNMATCHED_BRACES", "Unmatched braces"))
}

/// Split a block's interior into top-level statements on `;` or
/// newline. Nested blocks stay intact as single statements; quoted
/// separators are inert. Segments are trimmed and empties dropped.
pub fn split_statements(body: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0i64;
    let mut in_string: Option<char> = None;
    let mut escape_next = false;

    for ch in body.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => {
                current.push(ch);
                escape_next = true;
                continue;
            }
            '"' | '\'' => {
                match in_string {
                    None => in_string = Some(ch),
                    Some(quote) if quote == ch => in_string = None,
                    Some(_) => {}
                }
                current.push(ch);
                continue;
            }
            _ if in_string.is_some() => {
                current.push(ch);
                continue;
            }
            '{' => depth += 1,
            '}' => depth -= 1,
            _ => {}
        }

        if depth == 0 && (ch == ';' || ch == '\n') {
            push_trimmed(&mut statements, &current);
            current.clear();
            continue;
        }
        current.push(ch);
    }

    push_trimmed(&mut statements, &current);
    statements
}

fn push_trimmed(statements: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}
