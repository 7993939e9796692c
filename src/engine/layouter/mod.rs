//! Layout engine
//!
//! 各ボックスは `layout(graphics, bounds)` で自分の矩形（親からの相対位置）を決め、
//! 子を再帰的に配置する。1 パス・深さ優先で、再レイアウトのループは持たない。
//!
//! ```text
//! RenderTree ─ layout ─┬─ block   : 縦積み、インライン参加者の連続はまとめて IFC へ
//!                      ├─ inline  : run 収集 → 貪欲な行分割 → 断片の書き戻し → 仕上げ
//!                      ├─ list    : マーカー + 内容
//!                      ├─ table   : 2 パスの列幅決定
//!                      └─ replaced: img / br / hr
//! ```

pub mod block;
pub mod inline;
pub mod list;
pub mod replaced;
pub mod table;
pub mod text;

use crate::engine::bridge::graphics::Graphics;
use crate::engine::css::values::Length;
use crate::engine::renderer::render_node::{BoxKind, RenderBox, RenderTree};
use crate::engine::renderer::types::Rect;

/// 内在幅を測るときの仮の利用可能幅
pub const PROBE_WIDTH: f32 = 100_000.0;

/// レイアウト全体で共有する設定
#[derive(Debug, Clone, Default)]
pub struct LayoutContext {
    /// `measure_text` にそのまま渡すフォント
    pub font_path: Option<String>,
    /// 内在幅の計測中（行揃えを行わない）
    pub probing: bool,
}

impl LayoutContext {
    pub fn new(font_path: Option<String>) -> Self {
        Self {
            font_path,
            probing: false,
        }
    }

    pub fn probe(&self) -> Self {
        Self {
            font_path: self.font_path.clone(),
            probing: true,
        }
    }
}

impl RenderBox {
    /// ボックスの種類ごとのレイアウトへ振り分ける
    pub fn layout(&mut self, graphics: &dyn Graphics, bounds: Rect, ctx: &LayoutContext) {
        match self.kind {
            BoxKind::Block
            | BoxKind::Inline
            | BoxKind::InlineBlock
            | BoxKind::TableSection
            | BoxKind::TableRow
            | BoxKind::TableCell { .. } => block::layout_block(self, graphics, bounds, ctx),
            BoxKind::ListItem { .. } => list::layout_list_item(self, graphics, bounds, ctx),
            BoxKind::Table { .. } => table::layout_table(self, graphics, bounds, ctx),
            BoxKind::Image { .. } => replaced::layout_image(self, bounds),
            BoxKind::Rule => replaced::layout_rule(self, bounds),
            BoxKind::Break => replaced::layout_break(self, bounds),
            BoxKind::Text { .. } => inline::layout_standalone(self, graphics, bounds, ctx),
        }
    }
}

impl RenderTree {
    /// ビューポートに合わせてツリー全体を配置する。同じ入力なら何度呼んでも同じ結果になる。
    pub fn layout(&mut self, graphics: &dyn Graphics, viewport: Rect) {
        self.layout_with(graphics, viewport, &LayoutContext::default());
    }

    pub fn layout_with(&mut self, graphics: &dyn Graphics, viewport: Rect, ctx: &LayoutContext) {
        let bounds = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        self.root.layout(graphics, bounds, ctx);
        log::debug!(target: "Layouter", "Laid out document: {}", self.root.rect);
    }
}

/// 内在幅: 十分広い幅で仮に配置し、内容の右端 + 右側の inset を測る。
///
/// 固定幅（px / em）が指定されていればそれを使う。
pub fn intrinsic_width(b: &mut RenderBox, graphics: &dyn Graphics, ctx: &LayoutContext) -> f32 {
    if let Some(width) = b.style.width
        && !matches!(width, Length::Percent(_) | Length::Auto)
    {
        let width = b.style.resolve_length(width, 0.0);
        b.layout(graphics, Rect::new(0.0, 0.0, width, 0.0), &ctx.probe());
        return width;
    }

    b.layout(graphics, Rect::new(0.0, 0.0, PROBE_WIDTH, 0.0), &ctx.probe());
    match b.kind {
        BoxKind::Image { .. } | BoxKind::Table { .. } | BoxKind::Text { .. } => b.rect.width,
        _ => content_right(b) + b.style.insets().right,
    }
}

/// 子の内容が届く右端（ボックス自身の原点基準）
pub fn content_right(b: &RenderBox) -> f32 {
    let mut right = b.style.insets().left;

    for child in &b.children {
        let child_right = match child.kind {
            BoxKind::Text { .. } if child.fragments().is_empty() => continue,
            BoxKind::Block
            | BoxKind::ListItem { .. }
            | BoxKind::TableCell { .. }
            | BoxKind::TableSection
            | BoxKind::TableRow
            | BoxKind::Rule
                if child.style.width.is_none() =>
            {
                child.rect.x + content_right(child) + child.style.insets().right
            }
            _ => child.rect.right(),
        };
        right = right.max(child_right);
    }

    right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bridge::graphics::FallbackGraphics;
    use crate::engine::css::parse_css;
    use crate::engine::html::parse_html;
    use crate::engine::renderer::render_tree::TreeBuilder;
    use crate::engine::styler::StyleEngine;

    pub(crate) fn laid_out(html: &str, css: &str, width: f32) -> RenderTree {
        let mut dom = parse_html(html.as_bytes(), 1 << 20).unwrap().dom;
        let sheet = parse_css(css);
        StyleEngine::new(&sheet).apply(&mut dom);
        let mut tree = TreeBuilder::build(&dom).unwrap();
        tree.layout(&FallbackGraphics::new(), Rect::new(0.0, 0.0, width, 600.0));
        tree
    }

    #[test]
    fn intrinsic_width_of_nested_blocks() {
        let mut tree = laid_out("<div><div><p>abcd</p></div></div>", "p { margin: 0 }", 800.0);
        let g = FallbackGraphics::new();
        let outer = &mut tree.root.children[0];
        assert_eq!(intrinsic_width(outer, &g, &LayoutContext::default()), 32.0);
    }

    #[test]
    fn intrinsic_width_includes_insets() {
        let mut tree = laid_out("<div>ab</div>", "div { padding: 1px 3px }", 800.0);
        let g = FallbackGraphics::new();
        let div = &mut tree.root.children[0];
        assert_eq!(intrinsic_width(div, &g, &LayoutContext::default()), 22.0);
    }
}
