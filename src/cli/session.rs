//! Interactive session line handling: tokenizing typed command lines.

/// What the session loop does after one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    Reply(String),
    Quit(String),
}

/// Split a typed line into arguments. Single and double quotes group words, a
/// backslash escapes the next character outside single quotes.
pub fn split_command_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => current.push(c),
            (_, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("Line ends with a dangling backslash".to_string()),
            },
            (Some(_), _) => current.push(c),
            (None, '\'') | (None, '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        return Err(format!("Unclosed {} quote", open));
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}
