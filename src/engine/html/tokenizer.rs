use crate::engine::dom::Attribute;

/// 1 タグあたりに保持する属性の最大数。超過分は読み進めるが捨てる。
pub const MAX_ATTRIBUTES: usize = 8;

/// HTML tokens emitted by the tokenizer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    CharacterData(String),
    EndOfFile,
    Error(String),
}

/// Represents the internal state of the tokenizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenizerState {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueQuoted(char),
    AttributeValueUnquoted,
    SelfClosingStartTag,
    /// `<!-- ... -->`
    Comment,
    /// `<!...>` / `<?...?>`
    BogusComment,
    /// `<style>` / `<script>` の中身
    RawText,
}

impl TokenizerState {
    /// タグの途中（ここで入力が尽きたらエラー）
    fn is_inside_tag(&self) -> bool {
        matches!(
            self,
            TokenizerState::TagName
                | TokenizerState::BeforeAttributeName
                | TokenizerState::AttributeName
                | TokenizerState::AfterAttributeName
                | TokenizerState::BeforeAttributeValue
                | TokenizerState::AttributeValueQuoted(_)
                | TokenizerState::AttributeValueUnquoted
                | TokenizerState::SelfClosingStartTag
        )
    }
}

/// HTML tokenizer implementation
///
/// Comments and `<!...>` constructs are skipped without leaving the data state,
/// so text on both sides of a comment comes out as one `CharacterData` token.
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    state: TokenizerState,
    text: String,
    current_tag: Option<Token>,
    current_attribute: Option<Attribute>,
    raw_text_tag: Option<String>,
    token: Option<Token>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: TokenizerState::Data,
            text: String::new(),
            current_tag: None,
            current_attribute: None,
            raw_text_tag: None,
            token: None,
            finished: false,
        }
    }

    /// Returns the next character from input and advances the position
    fn next_char(&mut self) -> Option<char> {
        let c = self.input[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Moves pending character data into the output slot
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.token = Some(Token::CharacterData(std::mem::take(&mut self.text)));
        }
    }

    /// Pushes the current attribute to the start tag if exists
    fn push_current_attribute(&mut self) {
        let Some(attr) = self.current_attribute.take() else {
            return;
        };
        if let Some(Token::StartTag { name, attributes, .. }) = &mut self.current_tag {
            if attributes.iter().any(|a| a.name == attr.name) {
                log::debug!(target:"HtmlTokenizer::Attribute", "Duplicate attribute `{}` on <{name}> ignored", attr.name);
            } else if attributes.len() >= MAX_ATTRIBUTES {
                log::debug!(target:"HtmlTokenizer::Attribute", "Attribute limit reached on <{name}>, dropping `{}`", attr.name);
            } else {
                attributes.push(attr);
            }
        }
    }

    fn start_attribute(&mut self, c: char) {
        self.current_attribute = Some(Attribute {
            name: c.to_ascii_lowercase().to_string(),
            value: String::new(),
        });
        self.state = TokenizerState::AttributeName;
    }

    /// Emits the current tag token and decides the next state
    fn emit_tag(&mut self) {
        self.push_current_attribute();
        let Some(tag) = self.current_tag.take() else {
            self.state = TokenizerState::Data;
            return;
        };

        self.state = TokenizerState::Data;
        if let Token::StartTag {
            name, self_closing, ..
        } = &tag
            && !*self_closing
            && matches!(name.as_str(), "style" | "script")
        {
            self.raw_text_tag = Some(name.clone());
            self.state = TokenizerState::RawText;
        }
        self.token = Some(tag);
    }

    /// Debug log for emitted tokens
    fn debug_emit(&self, token: &Token) {
        #[cfg(debug_assertions)]
        match token {
            Token::StartTag { name, .. } => {
                log::debug!(target:"HtmlTokenizer::EmitToken::TagStart", "Emitting token: {name}, Pos: {}", self.pos)
            }
            Token::EndTag { name } => {
                log::debug!(target:"HtmlTokenizer::EmitToken::TagEnd", "Emitting token: {name}, Pos: {}", self.pos)
            }
            Token::CharacterData(text) => {
                log::debug!(target:"HtmlTokenizer::EmitToken::Text", "Emitting token: `{text}`, Pos: {}", self.pos)
            }
            _ => {}
        }
    }

    /// Returns the next token. After the input is exhausted (or after an
    /// `Error`) this keeps returning `EndOfFile`.
    pub fn next_token(&mut self) -> Token {
        if self.finished {
            return Token::EndOfFile;
        }

        if self.state == TokenizerState::RawText
            && let Some(token) = self.consume_raw_text()
        {
            self.debug_emit(&token);
            return token;
        }

        while self.token.is_none() {
            let Some(c) = self.next_char() else {
                return self.finish();
            };

            match self.state {
                TokenizerState::Data => self.state_data(c),
                TokenizerState::TagOpen => self.state_tag_open(c),
                TokenizerState::EndTagOpen => self.state_end_tag_open(c),
                TokenizerState::TagName => self.state_tag_name(c),
                TokenizerState::BeforeAttributeName => self.state_before_attribute_name(c),
                TokenizerState::AttributeName => self.state_attribute_name(c),
                TokenizerState::AfterAttributeName => self.state_after_attribute_name(c),
                TokenizerState::BeforeAttributeValue => self.state_before_attribute_value(c),
                TokenizerState::AttributeValueQuoted(quote) => {
                    self.state_attribute_value_quoted(c, quote)
                }
                TokenizerState::AttributeValueUnquoted => self.state_attribute_value_unquoted(c),
                TokenizerState::SelfClosingStartTag => self.state_self_closing_start_tag(c),
                TokenizerState::Comment => self.state_comment(c),
                TokenizerState::BogusComment => self.state_bogus_comment(c),
                TokenizerState::RawText => self.state_data(c),
            }
        }

        match self.token.take() {
            Some(token) => {
                self.debug_emit(&token);
                token
            }
            None => Token::EndOfFile,
        }
    }

    /// End of input
    fn finish(&mut self) -> Token {
        match self.state {
            TokenizerState::TagOpen => self.text.push('<'),
            TokenizerState::EndTagOpen => self.text.push_str("</"),
            state if state.is_inside_tag() => {
                self.finished = true;
                self.current_tag = None;
                self.current_attribute = None;
                let message = format!("unexpected end of input inside a tag (pos {})", self.pos);
                log::warn!(target:"HtmlTokenizer::Error", "{message}");
                return Token::Error(message);
            }
            _ => {}
        }
        self.state = TokenizerState::Data;

        if !self.text.is_empty() {
            let token = Token::CharacterData(std::mem::take(&mut self.text));
            self.debug_emit(&token);
            return token;
        }

        self.finished = true;
        Token::EndOfFile
    }

    /// `</style>` などの対応する終了タグまでを 1 つのテキストとして読む
    fn consume_raw_text(&mut self) -> Option<Token> {
        let tag = self.raw_text_tag.take().unwrap_or_default();
        let rest = &self.input[self.pos..];
        let closing = format!("</{tag}");
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());

        let text = rest[..end].to_string();
        self.pos += end;
        self.state = TokenizerState::Data;

        (!text.is_empty()).then_some(Token::CharacterData(text))
    }

    // --- State handlers ---
    fn state_data(&mut self, c: char) {
        match c {
            '<' => self.state = TokenizerState::TagOpen,
            _ => self.text.push(c),
        }
    }

    fn state_tag_open(&mut self, c: char) {
        match c {
            '/' => self.state = TokenizerState::EndTagOpen,
            '!' => {
                if self.input[self.pos..].starts_with("--") {
                    self.pos += 2;
                    self.state = TokenizerState::Comment;
                } else {
                    self.state = TokenizerState::BogusComment;
                }
            }
            '?' => self.state = TokenizerState::BogusComment,
            c if c.is_ascii_alphabetic() => {
                self.flush_text();
                self.current_tag = Some(Token::StartTag {
                    name: c.to_ascii_lowercase().to_string(),
                    attributes: Vec::new(),
                    self_closing: false,
                });
                self.state = TokenizerState::TagName;
            }
            _ => {
                // ただの '<' として扱う
                self.text.push('<');
                self.state = TokenizerState::Data;
                self.state_data(c);
            }
        }
    }

    fn state_end_tag_open(&mut self, c: char) {
        match c {
            c if c.is_ascii_alphabetic() => {
                self.flush_text();
                self.current_tag = Some(Token::EndTag {
                    name: c.to_ascii_lowercase().to_string(),
                });
                self.state = TokenizerState::TagName;
            }
            '>' => self.state = TokenizerState::Data,
            _ => self.state = TokenizerState::BogusComment,
        }
    }

    fn state_tag_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => self.state = TokenizerState::BeforeAttributeName,
            '/' => self.state = TokenizerState::SelfClosingStartTag,
            '>' => self.emit_tag(),
            c if c.is_ascii_alphanumeric() || c == ':' || c == '-' => match &mut self.current_tag {
                Some(Token::StartTag { name, .. }) | Some(Token::EndTag { name }) => {
                    name.push(c.to_ascii_lowercase())
                }
                _ => {}
            },
            _ => self.state = TokenizerState::BeforeAttributeName,
        }
    }

    fn state_before_attribute_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {}
            '/' => self.state = TokenizerState::SelfClosingStartTag,
            '>' => self.emit_tag(),
            _ => self.start_attribute(c),
        }
    }

    fn state_attribute_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => self.state = TokenizerState::AfterAttributeName,
            '=' => self.state = TokenizerState::BeforeAttributeValue,
            '/' => {
                self.push_current_attribute();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            '>' => self.emit_tag(),
            _ => {
                if let Some(attr) = &mut self.current_attribute {
                    attr.name.push(c.to_ascii_lowercase());
                }
            }
        }
    }

    fn state_after_attribute_name(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {}
            '=' => self.state = TokenizerState::BeforeAttributeValue,
            '/' => {
                self.push_current_attribute();
                self.state = TokenizerState::SelfClosingStartTag;
            }
            '>' => self.emit_tag(),
            _ => {
                self.push_current_attribute();
                self.start_attribute(c);
            }
        }
    }

    fn state_before_attribute_value(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {}
            '"' | '\'' => self.state = TokenizerState::AttributeValueQuoted(c),
            '>' => self.emit_tag(),
            _ => {
                if let Some(attr) = &mut self.current_attribute {
                    attr.value.push(c);
                }
                self.state = TokenizerState::AttributeValueUnquoted;
            }
        }
    }

    fn state_attribute_value_quoted(&mut self, c: char, quote: char) {
        if c == quote {
            self.push_current_attribute();
            self.state = TokenizerState::BeforeAttributeName;
        } else if let Some(attr) = &mut self.current_attribute {
            attr.value.push(c);
        }
    }

    fn state_attribute_value_unquoted(&mut self, c: char) {
        match c {
            c if c.is_whitespace() => {
                self.push_current_attribute();
                self.state = TokenizerState::BeforeAttributeName;
            }
            '>' => self.emit_tag(),
            _ => {
                if let Some(attr) = &mut self.current_attribute {
                    attr.value.push(c);
                }
            }
        }
    }

    fn state_self_closing_start_tag(&mut self, c: char) {
        match c {
            '>' => {
                if let Some(Token::StartTag { self_closing, .. }) = &mut self.current_tag {
                    *self_closing = true;
                }
                self.emit_tag();
            }
            _ => {
                self.state = TokenizerState::BeforeAttributeName;
                self.state_before_attribute_name(c);
            }
        }
    }

    fn state_comment(&mut self, c: char) {
        if c == '-' && self.input[self.pos..].starts_with("->") {
            self.pos += 2;
            self.state = TokenizerState::Data;
        }
    }

    fn state_bogus_comment(&mut self, c: char) {
        if c == '>' {
            self.state = TokenizerState::Data;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token == Token::EndOfFile {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    fn attr(name: &str, value: &str) -> Attribute {
        Attribute {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_text_node() {
        let tokens = collect_tokens("Hello, world!");
        assert_eq!(tokens, vec![Token::CharacterData("Hello, world!".to_string())]);
    }

    #[test]
    fn test_simple_tag() {
        let tokens = collect_tokens("<DIV></div>");
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "div".to_string(),
                    attributes: vec![],
                    self_closing: false
                },
                Token::EndTag {
                    name: "div".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_tag_with_attributes() {
        let input = r#"<a HREF="https://example.com" target='_blank' data-x=1 hidden>Link</a>"#;
        let tokens = collect_tokens(input);
        assert_eq!(
            tokens,
            vec![
                Token::StartTag {
                    name: "a".to_string(),
                    attributes: vec![
                        attr("href", "https://example.com"),
                        attr("target", "_blank"),
                        attr("data-x", "1"),
                        attr("hidden", ""),
                    ],
                    self_closing: false
                },
                Token::CharacterData("Link".to_string()),
                Token::EndTag {
                    name: "a".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_self_closing_tag() {
        let tokens = collect_tokens("<img src='image.png'/>");
        assert_eq!(
            tokens,
            vec![Token::StartTag {
                name: "img".to_string(),
                attributes: vec![attr("src", "image.png")],
                self_closing: true
            }]
        );
    }

    #[test]
    fn test_attribute_limit_keeps_cursor() {
        let tokens = collect_tokens("<p a=1 b=2 c=3 d=4 e=5 f=6 g=7 h=8 i=9 j=10>x</p>");
        let Token::StartTag { attributes, .. } = &tokens[0] else {
            panic!("expected start tag, got {:?}", tokens[0]);
        };
        assert_eq!(attributes.len(), MAX_ATTRIBUTES);
        assert_eq!(attributes[7], attr("h", "8"));
        assert_eq!(tokens[1], Token::CharacterData("x".to_string()));
    }

    #[test]
    fn test_duplicate_attribute_first_wins() {
        let tokens = collect_tokens("<p id=a id=b>");
        assert_eq!(
            tokens,
            vec![Token::StartTag {
                name: "p".to_string(),
                attributes: vec![attr("id", "a")],
                self_closing: false
            }]
        );
    }

    #[test]
    fn test_comment_does_not_split_text() {
        let tokens = collect_tokens("Hello <!--x-->World<!DOCTYPE html><?xml?>!");
        assert_eq!(tokens, vec![Token::CharacterData("Hello World!".to_string())]);
    }

    #[test]
    fn test_raw_text_style() {
        let tokens = collect_tokens("<style>a > b { color: red }</STYLE><p>");
        assert_eq!(
            tokens[1],
            Token::CharacterData("a > b { color: red }".to_string())
        );
        assert_eq!(
            tokens[2],
            Token::EndTag {
                name: "style".to_string()
            }
        );
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        let tokens = collect_tokens("1 < 2 <");
        assert_eq!(tokens, vec![Token::CharacterData("1 < 2 <".to_string())]);
    }

    #[test]
    fn test_eof_inside_tag_is_error() {
        let mut tokenizer = Tokenizer::new("text<div class=");
        assert_eq!(
            tokenizer.next_token(),
            Token::CharacterData("text".to_string())
        );
        assert!(matches!(tokenizer.next_token(), Token::Error(_)));
        assert_eq!(tokenizer.next_token(), Token::EndOfFile);
        assert_eq!(tokenizer.next_token(), Token::EndOfFile);
    }
}
