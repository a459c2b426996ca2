//! Tool Paths
//!
//! The command source of the post processor: typed operation trees (usually
//! deserialized from JSON) and a plain-text listing notation for commands.

pub mod ast;
pub mod lexer;

pub use ast::{Command, CoolantMode, Node, Operation, MESSAGE};
pub use lexer::{tokenize_line, Token, TokenKind};

/// Parse one listing line into a command
///
/// The first word is the mnemonic, following words are `<letter><number>`
/// parameters. A line holding only a comment becomes a comment command named
/// `(text)`. Returns `None` for blank lines.
pub fn parse_command(line: &str) -> Option<Command> {
    let tokens = tokenize_line(line);
    let mut words = tokens.iter().filter(|t| t.kind == TokenKind::Word);

    let Some(mnemonic) = words.next() else {
        return tokens
            .iter()
            .find(|t| t.kind == TokenKind::Comment)
            .map(|t| Command::new(comment_name(&t.text)));
    };

    let mut command = Command::new(mnemonic.text.to_ascii_uppercase());
    if command.name.eq_ignore_ascii_case(MESSAGE) {
        command.name = MESSAGE.to_string();
    }

    for word in words {
        let mut chars = word.text.chars();
        let Some(letter) = chars.next() else {
            continue;
        };
        match chars.as_str().parse::<f64>() {
            Ok(value) => {
                command.parameters.insert(letter.to_ascii_uppercase(), value);
            }
            Err(_) => log::warn!(
                "Skipping malformed parameter '{}' in '{}'",
                word.text,
                line.trim()
            ),
        }
    }

    Some(command)
}

/// Parse a whole listing, one command per non-blank line
pub fn parse_listing(text: &str) -> Vec<Command> {
    text.lines().filter_map(parse_command).collect()
}

/// Normalize `; text` and `(text)` to the `(text)` form
fn comment_name(text: &str) -> String {
    match text.strip_prefix(';') {
        Some(rest) => format!("({})", rest.trim()),
        None if text.ends_with(')') => text.to_string(),
        None => format!("{})", text),
    }
}
