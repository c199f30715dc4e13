use crate::error::{ResiError, ResiResult};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub position: usize,
}

pub fn tokenize(text: &str) -> ResiResult<Vec<Token>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)) {
            i = scan_number(bytes, i);
            let literal = &text[start..i];
            let value = literal.parse::<f64>().map_err(|_| ResiError::Syntax {
                position: start,
                message: format!("invalid number `{literal}`"),
            })?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                position: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(text[start..i].to_string()),
                position: start,
            });
            continue;
        }

        let kind = match c {
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'^' => TokenKind::Caret,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            _ => {
                let ch = text[start..].chars().next().unwrap_or('?');
                return Err(ResiError::Syntax {
                    position: start,
                    message: format!("unexpected character `{ch}`"),
                });
            }
        };
        tokens.push(Token {
            kind,
            position: start,
        });
        i += 1;
    }

    Ok(tokens)
}

/// Returns the end offset of the number literal starting at `start`:
/// digits, an optional fraction, and an optional exponent (`1e5`, `2.5E-3`).
/// A trailing `e` not followed by digits is left for the next token.
pub(crate) fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_operators_and_parens() {
        assert_eq!(
            kinds("(1+z)*2/3^-4"),
            vec![
                TokenKind::LParen,
                TokenKind::Number(1.0),
                TokenKind::Plus,
                TokenKind::Ident("z".into()),
                TokenKind::RParen,
                TokenKind::Star,
                TokenKind::Number(2.0),
                TokenKind::Slash,
                TokenKind::Number(3.0),
                TokenKind::Caret,
                TokenKind::Minus,
                TokenKind::Number(4.0),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("0.25"), vec![TokenKind::Number(0.25)]);
        assert_eq!(kinds(".5"), vec![TokenKind::Number(0.5)]);
        assert_eq!(kinds("2e-3"), vec![TokenKind::Number(0.002)]);
        assert_eq!(kinds("1.5E2"), vec![TokenKind::Number(150.0)]);
        // `e` without exponent digits is the constant
        assert_eq!(
            kinds("2e"),
            vec![TokenKind::Number(2.0), TokenKind::Ident("e".into())]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("  sin (z)").unwrap();
        assert_eq!(tokens[0].position, 2);
        assert_eq!(tokens[1].position, 6);
        assert_eq!(tokens[2].position, 7);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("1 + $z").unwrap_err();
        match err {
            ResiError::Syntax { position, .. } => assert_eq!(position, 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_dot_number() {
        assert_eq!(kinds("3."), vec![TokenKind::Number(3.0)]);
    }
}
