use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
    Illegal(char),
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Identifier(name) => write!(f, "identifier '{name}'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::Caret => f.write_str("'^'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Comma => f.write_str("','"),
            Token::Illegal(ch) => write!(f, "'{ch}'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Turns an expression string into tokens.
///
/// Column names that are not plain identifiers can be written between single
/// quotes (`'mean energy' * 2`); a doubled quote escapes a literal one.
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.input.next() {
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => match self.input.peek() {
                Some('*') => {
                    self.input.next();
                    Token::Caret
                }
                _ => Token::Star,
            },
            Some('/') => Token::Slash,
            Some('%') => Token::Percent,
            Some('^') => Token::Caret,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some(',') => Token::Comma,
            Some('\'') => self.read_quoted_identifier(),
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number(ch),
            Some(ch) if is_identifier_start(ch) => self.read_identifier(ch),
            Some(ch) => Token::Illegal(ch),
            None => Token::Eof,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.input.peek().is_some_and(|ch| ch.is_whitespace()) {
            self.input.next();
        }
    }

    fn read_number(&mut self, first: char) -> Token {
        let mut text = String::from(first);
        let mut has_dot = first == '.';

        while let Some(&ch) = self.input.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
            } else if ch == '.' && !has_dot {
                has_dot = true;
                text.push(ch);
            } else {
                break;
            }
            self.input.next();
        }

        // Exponent: only consumed when digits actually follow, so `2e` stays
        // a number followed by the identifier `e`.
        if matches!(self.input.peek(), Some('e' | 'E')) {
            let mut lookahead = self.input.clone();
            lookahead.next();
            let mut exponent = String::from("e");
            if let Some(&sign @ ('+' | '-')) = lookahead.peek() {
                exponent.push(sign);
                lookahead.next();
            }
            if lookahead.peek().is_some_and(|ch| ch.is_ascii_digit()) {
                while let Some(&ch) = lookahead.peek() {
                    if !ch.is_ascii_digit() {
                        break;
                    }
                    exponent.push(ch);
                    lookahead.next();
                }
                text.push_str(&exponent);
                self.input = lookahead;
            }
        }

        text.parse::<f64>()
            .map(Token::Number)
            .unwrap_or(Token::Illegal(first))
    }

    fn read_identifier(&mut self, first: char) -> Token {
        let mut name = String::from(first);
        while let Some(&ch) = self.input.peek() {
            if !is_identifier_continue(ch) {
                break;
            }
            name.push(ch);
            self.input.next();
        }
        Token::Identifier(name)
    }

    fn read_quoted_identifier(&mut self) -> Token {
        let mut name = String::new();
        while let Some(ch) = self.input.next() {
            if ch == '\'' {
                if self.input.peek() == Some(&'\'') {
                    name.push('\'');
                    self.input.next();
                } else {
                    return Token::Identifier(name);
                }
            } else {
                name.push(ch);
            }
        }
        // Unterminated: keep what was read.
        Token::Identifier(name)
    }
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}
