//! DOM/CSSOM を統合し、各ノードの最終スタイル（ComputedStyle）を決定する。

use std::rc::Rc;

use crate::engine::css::cssom::Stylesheet;
use crate::engine::dom::{Dom, NodeData, NodeId};

pub mod cascade;
pub mod computed;
pub mod style;
pub mod ua;

pub use computed::{ComputedStyle, Edges, FontStyle, FontWeight, TextAlign, WhiteSpace};
pub use style::Style;

/// Resolves one [`ComputedStyle`] per DOM node from a stylesheet.
pub struct StyleEngine<'a> {
    stylesheet: &'a Stylesheet,
}

impl<'a> StyleEngine<'a> {
    pub fn new(stylesheet: &'a Stylesheet) -> Self {
        Self { stylesheet }
    }

    /// 文書中の全ノードにスタイルを付ける（親 → 子の順）。
    /// 既存のスタイルは丸ごと置き換える。
    pub fn apply(&self, dom: &mut Dom) {
        let mut styled = 0usize;
        for id in dom.traverse() {
            let parent = dom.parent(id).and_then(|p| dom.style(p)).cloned();
            let style = self.compute(dom, id, parent.as_deref());
            dom.set_style(id, Rc::new(style));
            styled += 1;
        }
        log::debug!(target: "Styler::Apply", "Styled {styled} nodes with {} rules", self.stylesheet.len());
    }

    /// 1 ノード分の計算値
    pub fn compute(&self, dom: &Dom, id: NodeId, parent: Option<&ComputedStyle>) -> ComputedStyle {
        let Some(node) = dom.get(id) else {
            return ComputedStyle::default();
        };

        match &node.data {
            // テキストはカスケードしない
            NodeData::Text(_) => ComputedStyle::default(),
            NodeData::Element(element) => {
                let winners = cascade::collect_winners(self.stylesheet, element);
                let mut specified = cascade::specified_style(&winners);

                let mut defaults = ua::default_style_for(element);
                if element.tag_name == "pre" && specified.white_space.is_some() {
                    defaults.monospace = None;
                }
                specified.fill_missing(&defaults);

                specified.to_computed(parent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::css::parse_css;
    use crate::engine::css::values::{Color, Display};
    use crate::engine::html::parse_html;

    fn styled(html: &str, css: &str) -> Dom {
        let mut dom = parse_html(html.as_bytes(), 1 << 20).unwrap().dom;
        let sheet = parse_css(css);
        StyleEngine::new(&sheet).apply(&mut dom);
        dom
    }

    fn first_child(dom: &Dom, id: NodeId) -> NodeId {
        dom.children(id)[0]
    }

    #[test]
    fn every_node_gets_a_style() {
        let dom = styled("<div>text<span>x</span></div>", "");
        for id in dom.traverse() {
            assert!(dom.style(id).is_some());
        }
    }

    #[test]
    fn text_nodes_use_defaults() {
        let dom = styled("<p>hi</p>", "p { color: red }");
        let p = first_child(&dom, dom.root());
        let text = first_child(&dom, p);
        assert_eq!(dom.style(p).unwrap().color, Color::rgb(255, 0, 0));
        assert_eq!(**dom.style(text).unwrap(), ComputedStyle::default());
    }

    #[test]
    fn ua_defaults_do_not_override_rules() {
        let dom = styled(
            "<ul></ul><pre></pre><a></a><pre></pre>",
            "a { color: green } pre { white-space: normal }",
        );
        let ids = dom.children(dom.root()).to_vec();
        let ul = dom.style(ids[0]).unwrap();
        assert_eq!(ul.padding.left, 20.0);

        let pre = dom.style(ids[1]).unwrap();
        assert_eq!(pre.white_space, WhiteSpace::Normal);
        assert!(!pre.monospace);

        let a = dom.style(ids[2]).unwrap();
        assert_eq!(a.color, Color::rgb(0, 128, 0));
        assert!(a.underline);
        assert_eq!(a.display, Display::Inline);
    }

    #[test]
    fn documented_ua_defaults() {
        let dom = styled(
            "<code></code><blockquote></blockquote><h1></h1><pre></pre><a></a><hr>",
            "",
        );
        let ids = dom.children(dom.root()).to_vec();
        let code = dom.style(ids[0]).unwrap();
        assert!(code.background.is_some());
        assert!(code.padding.left > 0.0);
        assert!(code.monospace);

        assert_eq!(dom.style(ids[1]).unwrap().margin.left, 40.0);

        let h1 = dom.style(ids[2]).unwrap();
        assert!(h1.font_size > 16.0);
        assert_eq!(h1.font_weight, FontWeight::Bold);

        let pre = dom.style(ids[3]).unwrap();
        assert_eq!(pre.white_space, WhiteSpace::Preserve);
        assert!(pre.monospace);

        let hr = dom.style(ids[5]).unwrap();
        assert!(hr.height.is_some_and(|h| h.to_px(16.0, 0.0) > 0.0));

        let a = dom.style(ids[4]).unwrap();
        assert_eq!(a.color, Color::BLUE);
        assert!(a.underline);
    }

    #[test]
    fn restyle_replaces_snapshot() {
        let mut dom = styled("<div class=box></div>", ".box { margin: 4px }");
        let div = first_child(&dom, dom.root());
        let before = Rc::clone(dom.style(div).unwrap());

        let sheet = parse_css(".box { margin: 9px }");
        StyleEngine::new(&sheet).apply(&mut dom);
        let after = dom.style(div).unwrap();

        assert_eq!(before.margin.top, 4.0);
        assert_eq!(after.margin.top, 9.0);
        assert!(!Rc::ptr_eq(&before, after));
    }
}
