//! RenderBox と RenderTree
//!
//! DOM をフィルタした形の、レイアウト用のボックスツリー。
//! ボックスの種類は閉じた列挙で表し、レイアウトは種類ごとに分岐する。

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::types::Rect;
use crate::engine::css::values::{Display, Length};
use crate::engine::dom::NodeId;
use crate::engine::styler::ComputedStyle;
use crate::engine::tree::{TreeView, fmt_tree};

/// 1 行に置かれたテキストの断片。矩形は所属する TextBox の原点からの相対位置。
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub rect: Rect,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    Block,
    /// 子のインライン要素を親の行にそのまま流す（padding/border があれば不可分）
    Inline,
    InlineBlock,
    Text {
        text: String,
        fragments: Vec<TextFragment>,
    },
    /// `<br>`
    Break,
    /// `<hr>`
    Rule,
    /// `<img>`（属性の width / height を保持）
    Image {
        attr_width: Option<f32>,
        attr_height: Option<f32>,
    },
    /// マーカーの矩形はリスト項目の原点からの相対位置
    ListItem {
        marker: Rect,
    },
    Table {
        attr_width: Option<Length>,
    },
    TableSection,
    TableRow,
    TableCell {
        colspan: usize,
    },
}

impl BoxKind {
    pub fn name(&self) -> &'static str {
        match self {
            BoxKind::Block => "Block",
            BoxKind::Inline => "Inline",
            BoxKind::InlineBlock => "InlineBlock",
            BoxKind::Text { .. } => "Text",
            BoxKind::Break => "Break",
            BoxKind::Rule => "Rule",
            BoxKind::Image { .. } => "Image",
            BoxKind::ListItem { .. } => "ListItem",
            BoxKind::Table { .. } => "Table",
            BoxKind::TableSection => "TableSection",
            BoxKind::TableRow => "TableRow",
            BoxKind::TableCell { .. } => "TableCell",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderBox {
    pub kind: BoxKind,
    /// 元になった DOM ノード（非所有）
    pub node: NodeId,
    pub tag_name: Option<String>,
    pub style: Rc<ComputedStyle>,
    /// 親ボックスの原点からの相対位置。レイアウト時にのみ書き換わる。
    pub rect: Rect,
    pub children: Vec<RenderBox>,
}

impl RenderBox {
    pub fn new(kind: BoxKind, node: NodeId, style: Rc<ComputedStyle>) -> Self {
        Self {
            kind,
            node,
            tag_name: None,
            style,
            rect: Rect::default(),
            children: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag_name: &str) -> Self {
        self.tag_name = Some(tag_name.to_string());
        self
    }

    /// 行内に並ぶボックスかどうか（インライン整形コンテキストの参加者）
    pub fn is_inline_participant(&self) -> bool {
        match self.kind {
            BoxKind::Text { .. } | BoxKind::Inline | BoxKind::InlineBlock | BoxKind::Break => true,
            BoxKind::Image { .. } => {
                matches!(self.style.display, Display::Inline | Display::InlineBlock)
            }
            _ => false,
        }
    }

    pub fn is_table_row(&self) -> bool {
        matches!(self.kind, BoxKind::TableRow)
    }

    pub fn is_table_cell(&self) -> bool {
        matches!(self.kind, BoxKind::TableCell { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            BoxKind::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn fragments(&self) -> &[TextFragment] {
        match &self.kind {
            BoxKind::Text { fragments, .. } => fragments,
            _ => &[],
        }
    }

    /// 先行順で全子孫を訪れる
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a RenderBox)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    /// 添字のパスで子孫を辿る
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut RenderBox> {
        let mut current = self;
        for &i in path {
            current = current.children.get_mut(i)?;
        }
        Some(current)
    }

    fn label(&self) -> String {
        let mut label = self.kind.name().to_string();
        if let Some(tag) = &self.tag_name {
            label.push_str(&format!(" <{tag}>"));
        }
        match &self.kind {
            BoxKind::Text { text, fragments } => {
                label.push_str(&format!(" {text:?} [{} fragments]", fragments.len()));
            }
            BoxKind::TableCell { colspan } if *colspan > 1 => {
                label.push_str(&format!(" colspan={colspan}"));
            }
            _ => {}
        }
        label.push_str(&format!(" {}", self.rect));
        label
    }
}

/// The box tree of one document. Always has a root box.
#[derive(Debug, Clone)]
pub struct RenderTree {
    pub root: RenderBox,
}

impl RenderTree {
    pub fn new(root: RenderBox) -> Self {
        Self { root }
    }

    /// 先行順で全ボックスを集める
    pub fn boxes(&self) -> Vec<&RenderBox> {
        let mut out = Vec::new();
        self.root.walk(&mut |b| out.push(b));
        out
    }

    /// 指定 DOM ノードから作られたボックス
    pub fn find_by_node(&self, node: NodeId) -> Option<&RenderBox> {
        self.boxes().into_iter().find(|b| b.node == node)
    }
}

struct BoxView<'a>(PhantomData<&'a RenderBox>);

impl<'a> TreeView for BoxView<'a> {
    type Node = &'a RenderBox;

    fn label(&self, node: &'a RenderBox) -> String {
        node.label()
    }

    fn children(&self, node: &'a RenderBox) -> Vec<&'a RenderBox> {
        node.children.iter().collect()
    }
}

impl fmt::Display for RenderTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_tree(&BoxView(PhantomData), &self.root, f)
    }
}
