use std::rc::Rc;

use super::render_node::{BoxKind, RenderBox, RenderTree};
use crate::engine::css::values::{Display, Length};
use crate::engine::dom::{Dom, NodeData, NodeId};
use crate::engine::html::util as html_util;
use crate::engine::styler::ComputedStyle;

/// colspan の上限（HTML と同じ）
pub const MAX_COLSPAN: usize = 1000;

/// Builds the box tree from a styled DOM.
pub struct TreeBuilder;

impl TreeBuilder {
    /// DOM ルートから描画ツリーを作る。
    ///
    /// ルート自体がボックスにならない場合でもブロックを合成するので、
    /// ルートが有効な限り必ず `Some` を返す。
    pub fn build(dom: &Dom) -> Option<RenderTree> {
        let root_id = dom.root();
        let root_node = dom.get(root_id)?;

        let root = match Self::build_box(dom, root_id) {
            Some(root) => root,
            None => {
                log::debug!(target: "RenderTree::Build", "Root produced no box; synthesizing a block");
                let style = root_node.style().cloned().unwrap_or_default();
                let mut root = RenderBox::new(BoxKind::Block, root_id, style);
                root.tag_name = root_node.tag_name().map(str::to_string);
                root
            }
        };

        Some(RenderTree::new(root))
    }

    fn build_box(dom: &Dom, id: NodeId) -> Option<RenderBox> {
        let node = dom.get(id)?;

        let element = match &node.data {
            NodeData::Text(text) => {
                // テキストは親要素のスタイルで描く
                let style = dom
                    .parent(id)
                    .and_then(|p| dom.style(p))
                    .cloned()
                    .unwrap_or_else(|| Rc::new(ComputedStyle::default()));
                return Some(RenderBox::new(
                    BoxKind::Text {
                        text: text.clone(),
                        fragments: Vec::new(),
                    },
                    id,
                    style,
                ));
            }
            NodeData::Element(element) => element,
        };

        let tag = element.tag_name.as_str();
        let style = node.style().cloned().unwrap_or_default();

        if style.display.is_none() {
            log::debug!(target: "RenderTree::Build", "Pruned display:none subtree <{tag}>");
            return None;
        }
        if html_util::is_non_visual_element(tag) {
            return None;
        }

        let kind = match tag {
            "br" => BoxKind::Break,
            "hr" => BoxKind::Rule,
            "img" => BoxKind::Image {
                attr_width: element.attr("width").and_then(parse_pixels),
                attr_height: element.attr("height").and_then(parse_pixels),
            },
            "table" => BoxKind::Table {
                attr_width: element
                    .attr("width")
                    .and_then(Length::from_css)
                    .filter(|l| !l.is_auto()),
            },
            "thead" | "tbody" | "tfoot" => BoxKind::TableSection,
            "tr" => BoxKind::TableRow,
            "td" | "th" => BoxKind::TableCell {
                colspan: element.attr("colspan").map_or(1, parse_colspan),
            },
            _ => match style.display {
                Display::ListItem => BoxKind::ListItem {
                    marker: Default::default(),
                },
                Display::InlineBlock => BoxKind::InlineBlock,
                Display::Inline => BoxKind::Inline,
                Display::Block | Display::None => BoxKind::Block,
            },
        };

        let mut render_box = RenderBox::new(kind, id, style).with_tag(tag);
        render_box.children = Self::build_children(dom, id);

        Some(render_box)
    }

    /// 子のボックスを文書順に作る。
    ///
    /// `<hr>` は空要素として扱われないので後続の兄弟を子に持つことがある。
    /// Rule ボックスは子を持たず、その子はすぐ後ろの兄弟として並べる。
    fn build_children(dom: &Dom, id: NodeId) -> Vec<RenderBox> {
        let mut children = Vec::new();
        for &child in dom.children(id) {
            let Some(mut child_box) = Self::build_box(dom, child) else {
                continue;
            };
            if child_box.kind == BoxKind::Rule && !child_box.children.is_empty() {
                let following = std::mem::take(&mut child_box.children);
                log::debug!(
                    target: "RenderTree::Build",
                    "Moved {} boxes out of <hr>",
                    following.len()
                );
                children.push(child_box);
                children.extend(following);
            } else {
                children.push(child_box);
            }
        }
        children
    }
}

/// 1..=MAX_COLSPAN に収める。数字だけで範囲を超える値は上限とみなす。
fn parse_colspan(value: &str) -> usize {
    let value = value.trim();
    match value.parse::<usize>() {
        Ok(span) => span.clamp(1, MAX_COLSPAN),
        Err(_) if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => MAX_COLSPAN,
        Err(_) => 1,
    }
}

/// `"120"` / `"120px"` → 120.0
fn parse_pixels(value: &str) -> Option<f32> {
    let value = value.trim();
    let value = value.strip_suffix("px").unwrap_or(value);
    value.parse::<f32>().ok().filter(|v| *v >= 0.0)
}
