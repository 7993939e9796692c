use super::tokenizer::{Token, Tokenizer};
use super::{Declaration, Rule, Selector, Stylesheet};

/// CSS parser consuming tokens and producing a [`Stylesheet`].
///
/// Parsing is total: malformed fragments are skipped token by token and never
/// abort the whole sheet.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    peeked: Option<Token>,
}

impl<'a> Parser<'a> {
    /// Create a new CSS parser.
    pub fn new(input: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            peeked: None,
        }
    }

    fn peek(&mut self) -> &Token {
        self.peeked
            .get_or_insert_with(|| self.tokenizer.next_token())
    }

    fn bump(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.tokenizer.next_token(),
        }
    }

    /// Parse the entire stylesheet.
    pub fn parse(&mut self) -> Stylesheet {
        let mut sheet = Stylesheet::new();

        loop {
            match self.peek() {
                Token::End => break,
                Token::Delim('@') => self.skip_at_rule(),
                Token::RightBrace | Token::Semicolon => {
                    let stray = self.bump();
                    log::debug!(target: "CssParser", "Skipping stray token: {stray:?}");
                }
                _ => self.parse_rule(&mut sheet),
            }
        }

        sheet
    }

    /// Parse a qualified rule (`selector, selector { ... }`).
    fn parse_rule(&mut self, sheet: &mut Stylesheet) {
        let mut groups: Vec<Vec<Token>> = vec![Vec::new()];

        loop {
            match self.bump() {
                Token::LeftBrace => break,
                Token::End => {
                    log::debug!(target: "CssParser", "Unexpected end of input in selector");
                    return;
                }
                Token::Delim(',') => groups.push(Vec::new()),
                token => {
                    if let Some(group) = groups.last_mut() {
                        group.push(token);
                    }
                }
            }
        }

        let declarations = self.parse_declarations();

        for group in groups {
            match parse_selector(&group) {
                Some(selector) => sheet.rules.push(Rule {
                    selector,
                    declarations: declarations.clone(),
                }),
                None => {
                    log::debug!(target: "CssParser", "Dropping rule with unsupported selector: {group:?}");
                }
            }
        }
    }

    /// Parse a declaration block. The opening `{` has already been consumed;
    /// consumes through the matching `}`.
    fn parse_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        loop {
            match self.bump() {
                Token::RightBrace | Token::End => break,
                Token::Semicolon => continue,
                Token::Ident(name) if *self.peek() == Token::Colon => {
                    self.bump();
                    let value = self.collect_value();
                    if value.is_empty() {
                        log::debug!(target: "CssParser", "Dropping empty declaration: {name}");
                    } else {
                        declarations.push(Declaration {
                            name: name.to_ascii_lowercase(),
                            value,
                        });
                    }
                }
                Token::LeftBrace => self.skip_block(),
                token => {
                    log::debug!(target: "CssParser", "Unexpected token in declaration block: {token:?}");
                    self.skip_declaration();
                }
            }
        }

        declarations
    }

    /// Collect a property value until `;` or `}` (the `}` is left unconsumed).
    ///
    /// 語（識別子・数値・文字列）同士は空白 1 つで区切り、記号は詰めて連結する。
    fn collect_value(&mut self) -> String {
        let mut value = String::new();
        let mut prev_was_word = false;

        loop {
            match self.peek() {
                Token::Semicolon => {
                    self.bump();
                    break;
                }
                Token::RightBrace | Token::End => break,
                _ => {}
            }

            let token = self.bump();
            if token == Token::LeftBrace {
                self.skip_block();
                continue;
            }
            if token.is_word() && prev_was_word {
                value.push(' ');
            }
            prev_was_word = token.is_word();
            value.push_str(&token.lexeme());
        }

        strip_important(value.trim()).to_string()
    }

    /// 壊れた宣言を `;` または `}` の手前まで読み飛ばす
    fn skip_declaration(&mut self) {
        loop {
            match self.peek() {
                Token::Semicolon => {
                    self.bump();
                    return;
                }
                Token::RightBrace | Token::End => return,
                Token::LeftBrace => {
                    self.bump();
                    self.skip_block();
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// `{` の直後から対応する `}` までを読み飛ばす
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Token::LeftBrace => depth += 1,
                Token::RightBrace => depth -= 1,
                Token::End => return,
                _ => {}
            }
        }
    }

    /// Skip an at-rule (`@media ... { ... }`, `@import ...;`).
    fn skip_at_rule(&mut self) {
        self.bump();
        loop {
            match self.bump() {
                Token::Semicolon | Token::End => return,
                Token::LeftBrace => {
                    self.skip_block();
                    log::debug!(target: "CssParser", "Skipped at-rule block");
                    return;
                }
                _ => {}
            }
        }
    }
}

/// Parse a single compound selector: `tag`, `.class` or `#id`.
fn parse_selector(tokens: &[Token]) -> Option<Selector> {
    match tokens {
        [Token::Ident(tag)] => Some(Selector::Tag(tag.to_ascii_lowercase())),
        [Token::Dot, Token::Ident(class)] => Some(Selector::Class(class.clone())),
        [Token::Hash, Token::Ident(id) | Token::Number(id)] => Some(Selector::Id(id.clone())),
        _ => None,
    }
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.strip_suffix("!important") {
        Some(rest) => value[..rest.len()].trim_end(),
        None => value,
    }
}
