/// Split an argument list (or list literal) on top-level commas.
/// Commas nested inside `(`, `{`, `[` or quoted substrings are inert.
/// Each argument is trimmed; empty arguments are dropped.
pub fn split_arguments(args_str: &str) -> Vec<String> {
    if args_str.trim().is_empty() {
        return Vec::new();
    }

    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0i64;
    let mut in_string: Option<char> = None;
    let mut escape_next = false;

    for ch in args_str.chars() {
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
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth -= 1,
            _ => {}
        }

        if ch == ',' && depth == 0 {
            push_trimmed(&mut args, &current);
            current.clear();
            continue;
        }
        current.push(ch);
    }

    push_trimmed(&mut args, &current);
    args
}

fn push_trimmed(args: &mut Vec<String>, segment: &str) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        args.push(trimmed.to_string());
    }
}
