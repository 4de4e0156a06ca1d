//! Formula lexer
//!
//! Turns formula text into an ordered list of [`Token`]s. Whitespace separates tokens and
//! is otherwise dropped.

use crate::error::{FormulaError, FormulaResult};
use crate::token::{Token, TokenKind};

/// Split formula source into tokens
///
/// # Example
/// ```rust
/// use gridcalc_formula::{lex, TokenKind};
///
/// let tokens = lex("SUM(A1:B2) * 2").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Identifier);
/// assert_eq!(tokens[2].value, "A1");
/// assert_eq!(tokens.len(), 8);
/// ```
pub fn lex(source: &str) -> FormulaResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }

    tracing::trace!(count = tokens.len(), "lexed formula");
    Ok(tokens)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_token(&mut self) -> FormulaResult<Option<Token>> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(None),
        };
        let start = self.pos;

        let token = match c {
            '+' | '-' | '*' | '/' => {
                self.advance();
                Token::new(TokenKind::Operator, c, start)
            }
            '(' | ')' | ',' | ':' => {
                self.advance();
                Token::new(TokenKind::Punctuation, c, start)
            }
            '"' => self.scan_string()?,
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_ascii_alphabetic() => self.scan_word(),
            other => {
                return Err(FormulaError::Lex {
                    character: other,
                    position: start,
                })
            }
        };

        Ok(Some(token))
    }

    fn scan_string(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        self.advance(); // Opening quote

        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some(_) => self.advance(),
                None => return Err(FormulaError::UnterminatedString { position: start }),
            }
        }

        Ok(Token::new(
            TokenKind::StringLiteral,
            &self.input[start..self.pos],
            start,
        ))
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;
        self.skip_digits();

        // A single decimal point; a second one is left for the next scan.
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        Token::new(TokenKind::NumberLiteral, &self.input[start..self.pos], start)
    }

    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }

        if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.skip_digits();
            return Token::new(TokenKind::CellLiteral, &self.input[start..self.pos], start);
        }

        Token::new(TokenKind::Identifier, &self.input[start..self.pos], start)
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds_and_values(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .unwrap()
            .into_iter()
            .map(|t| (t.kind, t.value))
            .collect()
    }

    #[test]
    fn test_lex_empty() {
        assert!(lex("").unwrap().is_empty());
        assert!(lex("   \t").unwrap().is_empty());
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(
            kinds_and_values("42 3.14 7."),
            vec![
                (TokenKind::NumberLiteral, "42".to_string()),
                (TokenKind::NumberLiteral, "3.14".to_string()),
                (TokenKind::NumberLiteral, "7.".to_string()),
            ]
        );
    }

    #[test]
    fn test_lex_second_decimal_point_is_rejected() {
        assert_eq!(
            lex("1.2.3"),
            Err(FormulaError::Lex {
                character: '.',
                position: 3
            })
        );
    }

    #[test]
    fn test_lex_string_keeps_quotes() {
        let tokens = lex("\"hello world\"").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].value, "\"hello world\"");
    }

    #[test]
    fn test_lex_unterminated_string() {
        assert_eq!(
            lex("1 + \"abc"),
            Err(FormulaError::UnterminatedString { position: 4 })
        );
    }

    #[test]
    fn test_lex_cells_and_identifiers() {
        assert_eq!(
            kinds_and_values("sum(AB12:c3)"),
            vec![
                (TokenKind::Identifier, "sum".to_string()),
                (TokenKind::Punctuation, "(".to_string()),
                (TokenKind::CellLiteral, "AB12".to_string()),
                (TokenKind::Punctuation, ":".to_string()),
                (TokenKind::CellLiteral, "c3".to_string()),
                (TokenKind::Punctuation, ")".to_string()),
            ]
        );
    }

    #[test]
    fn test_lex_operators_and_positions() {
        let tokens = lex("A1 + 2*B2 - 3/4").unwrap();
        let ops: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Operator)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(ops, vec!["+", "*", "-", "/"]);
        assert_eq!(tokens[1].position, 3);
        assert_eq!(tokens[3].position, 6);
    }

    #[test]
    fn test_lex_unrecognized_character() {
        assert_eq!(
            lex("1 ^ 2"),
            Err(FormulaError::Lex {
                character: '^',
                position: 2
            })
        );
        assert!(matches!(lex("=1"), Err(FormulaError::Lex { character: '=', .. })));
    }
}
