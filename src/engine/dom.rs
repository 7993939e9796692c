//! DOM ツリー
//!
//! ノードはアリーナに確保し、親子関係はすべて [`NodeId`]（世代付きハンドル）で持つ。
//! 親は子のリストを所有し、子から親へは ID による非所有参照のみ。

use std::fmt;
use std::rc::Rc;

use crate::engine::arena::{Arena, ArenaError, ArenaId};
use crate::engine::styler::ComputedStyle;
use crate::engine::tree::{TreeView, fmt_tree};

pub type NodeId = ArenaId;

/// Represents a single HTML attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: Vec<Attribute>,
}

impl ElementData {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn class(&self) -> Option<&str> {
        self.attr("class")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub data: NodeData,
    style: Option<Rc<ComputedStyle>>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data,
            style: None,
        }
    }

    pub fn element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.element().map(|el| el.tag_name.as_str())
    }

    pub fn style(&self) -> Option<&Rc<ComputedStyle>> {
        self.style.as_ref()
    }
}

/// A document tree whose nodes live in an [`Arena`].
#[derive(Debug)]
pub struct Dom {
    arena: Arena<Node>,
    root: NodeId,
}

impl Dom {
    /// 暗黙の `root` 要素を持つ空の文書を作る
    pub fn new(mut arena: Arena<Node>) -> Result<Self, ArenaError> {
        let root = arena.alloc(Node::new(NodeData::Element(ElementData {
            tag_name: "root".to_string(),
            attributes: Vec::new(),
        })))?;
        Ok(Self { arena, root })
    }

    pub fn with_capacity(bytes: usize) -> Result<Self, ArenaError> {
        Self::new(Arena::with_capacity(bytes))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn create_element(
        &mut self,
        tag_name: &str,
        attributes: Vec<Attribute>,
    ) -> Result<NodeId, ArenaError> {
        self.arena.alloc(Node::new(NodeData::Element(ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            attributes,
        })))
    }

    pub fn create_text(&mut self, text: &str) -> Result<NodeId, ArenaError> {
        self.arena.alloc(Node::new(NodeData::Text(text.to_string())))
    }

    /// `child` を `parent` の末尾に追加する。既に親を持つノードは追加しない。
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.arena.contains(parent) {
            return;
        }
        match self.arena.get_mut(child) {
            Some(node) if node.parent.is_none() => node.parent = Some(parent),
            Some(_) => {
                log::warn!(target: "Dom::Append", "Node {child} already has a parent; ignored");
                return;
            }
            None => return,
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// テキストノードの末尾に追記する。テキストでなければ false。
    pub fn append_to_text(&mut self, id: NodeId, text: &str) -> bool {
        match self.arena.get_mut(id) {
            Some(Node {
                data: NodeData::Text(existing),
                ..
            }) => {
                existing.push_str(text);
                true
            }
            _ => false,
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.arena.get(id).and_then(Node::element)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).and_then(Node::tag_name)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.arena.get(id).and_then(Node::text)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attr(name))
    }

    pub fn style(&self, id: NodeId) -> Option<&Rc<ComputedStyle>> {
        self.arena.get(id).and_then(Node::style)
    }

    /// スタイルは丸ごと差し替える（中身を書き換えることはない）
    pub fn set_style(&mut self, id: NodeId, style: Rc<ComputedStyle>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.style = Some(style);
        }
    }

    /// 先行順（親 → 子）でノード ID を並べる
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.arena.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// 指定したタグ名の要素のテキストノードをすべて集める
    pub fn collect_text_by_tag(&self, tag_name: &str) -> Vec<String> {
        self.traverse()
            .into_iter()
            .filter(|&id| self.tag_name(id) == Some(tag_name))
            .map(|id| {
                self.children(id)
                    .iter()
                    .filter_map(|&child| self.text(child))
                    .collect::<String>()
            })
            .collect()
    }

    /// 文書を破棄し、アリーナをリセットして返す（以前の ID はすべて無効になる）
    pub fn into_arena(self) -> Arena<Node> {
        self.arena.reset()
    }
}

impl TreeView for Dom {
    type Node = NodeId;

    fn label(&self, node: NodeId) -> String {
        match self.get(node).map(|n| &n.data) {
            Some(NodeData::Element(el)) => {
                let mut label = format!("<{}", el.tag_name);
                for attr in &el.attributes {
                    label.push_str(&format!(" {}=\"{}\"", attr.name, attr.value));
                }
                label.push('>');
                label
            }
            Some(NodeData::Text(text)) => format!("{text:?}"),
            None => "<stale>".to_string(),
        }
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        Dom::children(self, node).to_vec()
    }
}

impl fmt::Display for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_tree(self, self.root, f)
    }
}
