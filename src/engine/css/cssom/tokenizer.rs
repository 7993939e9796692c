/// CSS token definitions produced by the tokenizer.
///
/// 空白とコメントはトークン化の段階で読み飛ばす。
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),         // Identifiers: color, margin, div
    Number(String),        // Numbers with their unit suffix: 10px, 50%, 1.5em, 00ff00
    StringLiteral(String), // Quoted strings, quotes stripped
    LeftBrace,             // {
    RightBrace,            // }
    Colon,                 // :
    Semicolon,             // ;
    Dot,                   // .
    Hash,                  // #
    Delim(char),           // Any other delimiter: , ( ) ! @ > ...
    End,
}

impl Token {
    /// 識別子・数値・文字列は「語」として扱い、値の再構成時に空白で区切る
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            Token::Ident(_) | Token::Number(_) | Token::StringLiteral(_)
        )
    }

    /// Convert a token back into its textual representation.
    pub fn lexeme(&self) -> String {
        match self {
            Token::Ident(s) | Token::Number(s) => s.clone(),
            Token::StringLiteral(s) => format!("\"{s}\""),
            Token::LeftBrace => "{".into(),
            Token::RightBrace => "}".into(),
            Token::Colon => ":".into(),
            Token::Semicolon => ";".into(),
            Token::Dot => ".".into(),
            Token::Hash => "#".into(),
            Token::Delim(c) => c.to_string(),
            Token::End => String::new(),
        }
    }
}

/// CSS tokenizer that converts a character stream into tokens.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer from an input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Read the next UTF-8 character and advance the cursor.
    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume input and return the next token. Returns `End` forever once exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let Some(c) = self.peek_char() else {
            return Token::End;
        };

        let token = match c {
            '{' => self.single(Token::LeftBrace),
            '}' => self.single(Token::RightBrace),
            ':' => self.single(Token::Colon),
            ';' => self.single(Token::Semicolon),
            '#' => self.single(Token::Hash),
            '"' | '\'' => self.consume_string(),
            '.' if self.peek_second().is_some_and(|n| n.is_ascii_digit()) => {
                self.consume_number()
            }
            '.' => self.single(Token::Dot),
            c if c.is_ascii_digit() => self.consume_number(),
            '-' if self
                .peek_second()
                .is_some_and(|n| n.is_ascii_digit() || n == '.') =>
            {
                self.consume_number()
            }
            c if is_ident_start(c) => self.consume_ident(),
            _ => {
                self.next_char();
                Token::Delim(c)
            }
        };

        log::debug!(target: "CssTokenizer", "Tokenized token: {:?}", token);
        token
    }

    fn single(&mut self, token: Token) -> Token {
        self.next_char();
        token
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.next_char();
                }
                Some('/') if self.input[self.pos..].starts_with("/*") => {
                    self.pos += 2;
                    match self.input[self.pos..].find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => self.pos = self.input.len(),
                    }
                }
                _ => return,
            }
        }
    }

    fn consume_while(&mut self, buf: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            buf.push(c);
            self.next_char();
        }
    }

    fn consume_ident(&mut self) -> Token {
        let mut buf = String::new();
        self.consume_while(&mut buf, |c| {
            c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
        });
        Token::Ident(buf)
    }

    /// 数値に続く単位（px, em, %）や 16 進カラーの残りまで 1 語として読む
    fn consume_number(&mut self) -> Token {
        let mut buf = String::new();
        if self.peek_char() == Some('-') {
            buf.push('-');
            self.next_char();
        }
        self.consume_while(&mut buf, |c| c.is_ascii_digit() || c == '.');
        self.consume_while(&mut buf, |c| c.is_ascii_alphanumeric() || c == '%');
        Token::Number(buf)
    }

    fn consume_string(&mut self) -> Token {
        let quote = self.next_char().unwrap_or('"');
        let mut buf = String::new();
        while let Some(c) = self.next_char() {
            if c == quote {
                break;
            }
            buf.push(c);
        }
        Token::StringLiteral(buf)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        let mut t = Tokenizer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = t.next_token();
            let end = token == Token::End;
            tokens.push(token);
            if end {
                break;
            }
        }
        tokens
    }

    #[test]
    fn test_css_tokenize_basic() {
        assert_eq!(
            tokenize("body { color: red; }"),
            vec![
                Token::Ident("body".into()),
                Token::LeftBrace,
                Token::Ident("color".into()),
                Token::Colon,
                Token::Ident("red".into()),
                Token::Semicolon,
                Token::RightBrace,
                Token::End,
            ]
        );
    }

    #[test]
    fn test_tokenize_dimension_and_percent() {
        assert_eq!(
            tokenize("margin: 10px 50% -2em .5em;"),
            vec![
                Token::Ident("margin".into()),
                Token::Colon,
                Token::Number("10px".into()),
                Token::Number("50%".into()),
                Token::Number("-2em".into()),
                Token::Number(".5em".into()),
                Token::Semicolon,
                Token::End,
            ]
        );
    }

    #[test]
    fn test_class_id_and_comment() {
        assert_eq!(
            tokenize("/* x */ .box #main #00ff00"),
            vec![
                Token::Dot,
                Token::Ident("box".into()),
                Token::Hash,
                Token::Ident("main".into()),
                Token::Hash,
                Token::Number("00ff00".into()),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_end_is_sticky() {
        let mut t = Tokenizer::new("a");
        assert_eq!(t.next_token(), Token::Ident("a".into()));
        assert_eq!(t.next_token(), Token::End);
        assert_eq!(t.next_token(), Token::End);
    }
}
