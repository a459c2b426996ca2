//! Listing Lexer
//!
//! Splits one line of a command listing into words and comments.

/// Token types in a listing line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Mnemonic or parameter word like "G1", "X10", "message"
    Word,
    /// Comment (semicolon or parenthetical)
    Comment,
}

/// A token with its text content
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Tokenize a line of a command listing
pub fn tokenize_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        match ch {
            ' ' | '\t' | '\r' | '\n' => continue,

            // Semicolon comment: consume rest of line
            ';' => {
                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: line[start_idx..].trim_end().to_string(),
                });
                break;
            }

            '(' => {
                let mut end_idx = line.len();
                for (idx, ch) in chars.by_ref() {
                    if ch == ')' {
                        end_idx = idx + 1;
                        break;
                    }
                }

                tokens.push(Token {
                    kind: TokenKind::Comment,
                    text: line[start_idx..end_idx].to_string(),
                });
            }

            // Letter starts a word; a letter after a number starts the next
            // one, so packed words like "G1X10F300" split
            c if c.is_ascii_alphabetic() => {
                let mut end_idx = start_idx + 1;
                let mut prev = c;

                while let Some(&(idx, next_ch)) = chars.peek() {
                    if next_ch.is_ascii_alphabetic() && (prev.is_ascii_digit() || prev == '.') {
                        break;
                    }
                    if next_ch.is_ascii_alphanumeric()
                        || next_ch == '.'
                        || next_ch == '-'
                        || next_ch == '+'
                        || next_ch == '_'
                    {
                        end_idx = idx + 1;
                        prev = next_ch;
                        chars.next();
                    } else {
                        break;
                    }
                }

                tokens.push(Token {
                    kind: TokenKind::Word,
                    text: line[start_idx..end_idx].to_string(),
                });
            }

            // Skip other characters (malformed input)
            _ => continue,
        }
    }

    tokens
}
