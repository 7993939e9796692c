use std::collections::BTreeSet;

use crate::engine::arena::{Arena, ArenaError};
use crate::engine::dom::{Dom, Node, NodeId};
use crate::engine::html::tokenizer::{Token, Tokenizer};
use crate::engine::html::util as html_util;

/// 木構築の結果
#[derive(Debug)]
pub struct HtmlDocument {
    pub dom: Dom,
    /// `<style>` の中身（出現順）
    pub style_blocks: Vec<String>,
    /// 意味を知らないタグ名（診断用）
    pub unsupported_tags: BTreeSet<String>,
}

/// HTML tree builder
///
/// Keeps a stack of open elements seeded with the implicit `root` element.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    dom: Dom,
    stack: Vec<NodeId>,
    style_blocks: Vec<String>,
    unsupported_tags: BTreeSet<String>,
    /// `<pre>` 直後の改行を 1 つ捨てる
    skip_leading_newline: bool,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, arena: Arena<Node>) -> Result<Self, ArenaError> {
        let dom = Dom::new(arena)?;
        let root = dom.root();
        Ok(Self {
            tokenizer: Tokenizer::new(input),
            dom,
            stack: vec![root],
            style_blocks: Vec::new(),
            unsupported_tags: BTreeSet::new(),
            skip_leading_newline: false,
        })
    }

    /// Consume every token and build the document.
    ///
    /// Malformed markup never fails; only arena exhaustion does.
    pub fn parse(mut self) -> Result<HtmlDocument, ArenaError> {
        loop {
            let token = self.tokenizer.next_token();
            let skip_newline = std::mem::take(&mut self.skip_leading_newline);

            match token {
                Token::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => self.handle_start_tag(&name, attributes, self_closing)?,
                Token::EndTag { name } => self.handle_end_tag(&name),
                Token::CharacterData(text) => {
                    let text = if skip_newline {
                        text.strip_prefix("\r\n")
                            .or_else(|| text.strip_prefix('\n'))
                            .unwrap_or(text.as_str())
                    } else {
                        text.as_str()
                    };
                    self.handle_text(text)?;
                }
                Token::Error(message) => {
                    log::warn!(target: "HtmlParser::Error", "Tokenizer error, keeping partial tree: {message}");
                    break;
                }
                Token::EndOfFile => break,
            }
        }

        Ok(HtmlDocument {
            dom: self.dom,
            style_blocks: self.style_blocks,
            unsupported_tags: self.unsupported_tags,
        })
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.dom.root())
    }

    fn current_tag(&self) -> Option<&str> {
        self.dom.tag_name(self.current())
    }

    fn handle_start_tag(
        &mut self,
        name: &str,
        attributes: Vec<crate::engine::dom::Attribute>,
        self_closing: bool,
    ) -> Result<(), ArenaError> {
        if !html_util::is_supported_tag(name) && self.unsupported_tags.insert(name.to_string()) {
            log::info!(target: "HtmlParser::Unsupported", "Unsupported tag: <{name}>");
        }

        // <head> が閉じられないまま <body> が来たら head を閉じる
        if name == "body" && self.current_tag() == Some("head") && self.stack.len() > 1 {
            self.stack.pop();
            log::debug!(target: "HtmlParser::Stack", "Implicitly closed <head> before <body>");
        }

        let parent = self.current();
        let element = self.dom.create_element(name, attributes)?;
        self.dom.append_child(parent, element);

        if html_util::is_void_element(name) {
            return Ok(());
        }
        if self_closing {
            log::debug!(target: "HtmlParser::Stack", "Self-closing syntax on non-void <{name}> ignored");
        }

        self.stack.push(element);
        log::debug!(target: "HtmlParser::Stack", "Pushed <{name}>, depth {}", self.stack.len());

        if name == "pre" {
            self.skip_leading_newline = true;
        }
        Ok(())
    }

    /// 終了タグはタグ名に関係なくスタックの先頭を 1 つ外す。root は決して外さない。
    fn handle_end_tag(&mut self, name: &str) {
        if self.stack.len() <= 1 {
            log::debug!(target: "HtmlParser::Stack", "Ignoring </{name}> at the root");
            return;
        }
        if let Some(open) = self.stack.pop()
            && self.dom.tag_name(open) != Some(name)
        {
            log::debug!(
                target: "HtmlParser::Stack",
                "</{name}> closed <{}>",
                self.dom.tag_name(open).unwrap_or_default()
            );
        }
    }

    fn handle_text(&mut self, text: &str) -> Result<(), ArenaError> {
        if text.is_empty() {
            return Ok(());
        }
        match self.current_tag() {
            Some("style") => {
                self.style_blocks.push(text.to_string());
                Ok(())
            }
            Some("script") => Ok(()),
            _ => {
                // コメントを挟んだテキストはトークナイザが 1 つにまとめて渡してくる
                let parent = self.current();
                let id = self.dom.create_text(text)?;
                self.dom.append_child(parent, id);
                Ok(())
            }
        }
    }
}

/// Parse an HTML document into a fresh arena of `capacity` bytes.
pub fn parse_html(bytes: &[u8], capacity: usize) -> Result<HtmlDocument, ArenaError> {
    parse_html_in(bytes, Arena::with_capacity(capacity))
}

/// Parse an HTML document reusing an existing (already reset) arena.
pub fn parse_html_in(bytes: &[u8], arena: Arena<Node>) -> Result<HtmlDocument, ArenaError> {
    let input = String::from_utf8_lossy(bytes);
    Parser::new(&input, arena)?.parse()
}
