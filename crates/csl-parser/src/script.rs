use csl_core::ScriptError;

/// Turn a multi-line script source into a flat ordered statement list.
///
/// A trailing backslash merges the next line with a single separating
/// space. Lines accumulate while a brace block is open, so control
/// structures may span lines without continuation markers. A trailing
/// `;` terminator is stripped from each emitted statement. Every
/// statement must begin with the `/` command marker; segments that are
/// purely brace characters are continuation artifacts and are dropped.
pub fn preprocess(source: &str) -> Result<Vec<String>, ScriptError> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for raw_line in source.lines() {
        let line = raw_line.trim();
        if line.is_empty() && current.is_empty() {
            continue;
        }

        if let Some(prefix) = current.strip_suffix('\\') {
            current = format!("{} {}", prefix.trim_end(), line);
        } else if current.is_empty() {
            current = line.to_string();
        } else {
            current.push('\n');
            current.push_str(line);
        }

        if current.ends_with('\\') || open_brace_depth(&current) > 0 {
            continue;
        }
        emit(&mut statements, &current)?;
        current.clear();
    }

    if let Some(prefix) = current.strip_suffix('\\') {
        current = prefix.trim_end().to_string();
    }
    if !current.is_empty() {
        if open_brace_depth(&current) > 0 {
            return Err(ScriptError::new("PARSE_UNMATCHED_BRACES", "Unmatched braces"));
        }
        emit(&mut statements, &current)?;
    }

    Ok(statements)
}

fn emit(statements: &mut Vec<String>, accumulated: &str) -> Result<(), ScriptError> {
    let statement = accumulated
        .strip_suffix(';')
        .unwrap_or(accumulated)
        .trim()
        .to_string();
    if statement.is_empty() {
        return Ok(());
    }
    if statement.chars().all(|ch| ch == '{' || ch == '}' || ch.is_whitespace()) {
        return Ok(());
    }
    if !statement.starts_with('/') {
        return Err(ScriptError::new(
            "PARSE_INVALID_SCRIPT_LINE",
            format!("Invalid script line: {}", statement),
        ));
    }
    statements.push(statement);
    Ok(())
}

/// Count of unclosed braces in `text`, ignoring quoted and escaped
/// brace characters. Never negative.
fn open_brace_depth(text: &str) -> i64 {
    let mut depth = 0i64;
    let mut in_string: Option<char> = None;
    let mut escape_next = false;

    for ch in text.chars() {
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
            '}' => depth -= 1,
            _ => {}
        }
    }
    depth.max(0)
}
