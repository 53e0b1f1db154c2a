//! Lexer (tokenizer) for the C subset
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! String literals are taken verbatim: there is no escape processing, the
//! content runs until the next `"`.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i32, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Int(SourceLocation),
    Char(SourceLocation),
    Void(SourceLocation),
    Return(SourceLocation),
    Print(SourceLocation),
    Debug(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),  // +
    Minus(SourceLocation), // -
    Star(SourceLocation),  // *
    Slash(SourceLocation), // /

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Gt(SourceLocation),    // >

    Amp(SourceLocation), // &
    Eq(SourceLocation),  // =

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Int(loc)
            | Token::Char(loc)
            | Token::Void(loc)
            | Token::Return(loc)
            | Token::Print(loc)
            | Token::Debug(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Gt(loc)
            | Token::Amp(loc)
            | Token::Eq(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::StringLiteral(s, _) => write!(f, "string literal \"{}\"", s),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Int(_) => write!(f, "'int'"),
            Token::Char(_) => write!(f, "'char'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::Print(_) => write!(f, "'print'"),
            Token::Debug(_) => write!(f, "'debug'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for the C subset
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '"' => self.string_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(ch, loc)),

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::EqEq(loc))
                } else {
                    Ok(Token::Eq(loc))
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Ok(Token::NotEq(loc))
                } else {
                    Err(LexError {
                        message: "Unexpected character: '!' (only '!=' is supported)"
                            .to_string(),
                        location: loc,
                    })
                }
            }
            '+' => Ok(Token::Plus(loc)),
            '-' => Ok(Token::Minus(loc)),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '<' => Ok(Token::Lt(loc)),
            '>' => Ok(Token::Gt(loc)),
            '&' => Ok(Token::Amp(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal; the opening quote is already consumed
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Ok(Token::StringLiteral(string, loc));
            }
            string.push(ch);
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal (decimal integers only)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let value = num_str.parse::<i32>().map_err(|_| LexError {
            message: format!("Invalid integer literal: {}", num_str),
            location: loc,
        })?;

        Ok(Token::IntLiteral(value, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "int" => Token::Int(loc),
            "char" => Token::Char(loc),
            "void" => Token::Void(loc),
            "return" => Token::Return(loc),
            "print" => Token::Print(loc),
            "debug" => Token::Debug(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment();
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    ///
    /// An unterminated block comment swallows the rest of the input.
    fn skip_block_comment(&mut self) {
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = lex("int main() { return 0; }");

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "main"));
        assert!(matches!(tokens[2], Token::LParen(_)));
        assert!(matches!(tokens[3], Token::RParen(_)));
        assert!(matches!(tokens[4], Token::LBrace(_)));
        assert!(matches!(tokens[5], Token::Return(_)));
        assert!(matches!(tokens[6], Token::IntLiteral(0, _)));
        assert!(matches!(tokens[7], Token::Semicolon(_)));
        assert!(matches!(tokens[8], Token::RBrace(_)));
        assert!(matches!(tokens[9], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let tokens = lex("+ - * / = == != < > &");

        assert!(matches!(tokens[0], Token::Plus(_)));
        assert!(matches!(tokens[1], Token::Minus(_)));
        assert!(matches!(tokens[2], Token::Star(_)));
        assert!(matches!(tokens[3], Token::Slash(_)));
        assert!(matches!(tokens[4], Token::Eq(_)));
        assert!(matches!(tokens[5], Token::EqEq(_)));
        assert!(matches!(tokens[6], Token::NotEq(_)));
        assert!(matches!(tokens[7], Token::Lt(_)));
        assert!(matches!(tokens[8], Token::Gt(_)));
        assert!(matches!(tokens[9], Token::Amp(_)));
    }

    #[test]
    fn test_keywords() {
        let tokens = lex("print debug if else void char");

        assert!(matches!(tokens[0], Token::Print(_)));
        assert!(matches!(tokens[1], Token::Debug(_)));
        assert!(matches!(tokens[2], Token::If(_)));
        assert!(matches!(tokens[3], Token::Else(_)));
        assert!(matches!(tokens[4], Token::Void(_)));
        assert!(matches!(tokens[5], Token::Char(_)));
    }

    #[test]
    fn test_comments() {
        let tokens = lex("int x; // comment\nint y; /* block\ncomment */ int z;");

        assert!(matches!(tokens[0], Token::Int(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert!(matches!(tokens[3], Token::Int(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
        assert!(matches!(tokens[5], Token::Semicolon(_)));
        assert!(matches!(tokens[6], Token::Int(_)));
        assert!(matches!(tokens[7], Token::Ident(ref s, _) if s == "z"));
        assert_eq!(tokens[6].location(), SourceLocation::new(3, 12));
    }

    #[test]
    fn test_string_literal_is_verbatim() {
        let tokens = lex(r#""hello\nworld""#);

        match &tokens[0] {
            Token::StringLiteral(s, _) => assert_eq!(s, "hello\\nworld"),
            _ => panic!("Expected string literal"),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("char *s; \"abc").tokenize().unwrap_err();
        assert!(err.message.contains("Unterminated"));
        assert_eq!(err.location, SourceLocation::new(1, 10));
    }

    #[test]
    fn test_lone_bang_is_rejected() {
        let err = Lexer::new("x ! y").tokenize().unwrap_err();
        assert!(err.message.contains('!'));
    }

    #[test]
    fn test_unknown_character() {
        let err = Lexer::new("int x = 1 % 2;").tokenize().unwrap_err();
        assert!(err.message.contains("'%'"));
        assert_eq!(err.location.column, 11);
    }
}
