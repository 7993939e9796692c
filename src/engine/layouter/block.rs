use std::rc::Rc;

use super::LayoutContext;
use super::inline;
use crate::engine::bridge::graphics::Graphics;
use crate::engine::renderer::render_node::RenderBox;
use crate::engine::renderer::types::Rect;
use crate::engine::styler::{ComputedStyle, TextAlign};

/// フローの最初に置かれた内容（リストマーカーの縦位置に使う）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirstContent {
    Line { y: f32, height: f32 },
    Block { y: f32, inset_top: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowResult {
    /// 子が使った高さ（`top` から）
    pub height: f32,
    pub first: Option<FirstContent>,
}

/// 利用可能幅と `width` の小さい方
pub(crate) fn block_width(style: &ComputedStyle, available: f32) -> f32 {
    match style.width {
        Some(width) if !width.is_auto() => style.resolve_length(width, available).min(available),
        _ => available,
    }
}

pub(crate) fn block_height(style: &ComputedStyle, content_height: f32, available: f32) -> f32 {
    match style.height {
        Some(height) if !height.is_auto() => style.resolve_length(height, available),
        _ => content_height,
    }
}

pub fn layout_block(
    b: &mut RenderBox,
    graphics: &dyn Graphics,
    bounds: Rect,
    ctx: &LayoutContext,
) {
    let style = Rc::clone(&b.style);
    let width = block_width(&style, bounds.width);
    let insets = style.insets();
    let content_width = (width - insets.horizontal()).max(0.0);

    let flow = layout_flow(
        &mut b.children,
        graphics,
        ctx,
        insets.left,
        insets.top,
        content_width,
        style.text_align,
    );

    let height = block_height(&style, flow.height + insets.vertical(), bounds.height);
    b.rect = Rect::new(bounds.x, bounds.y, width, height);
}

/// 子を上から順に積む。連続するインライン参加者は 1 つのインライン整形コンテキストにまとめる。
pub(crate) fn layout_flow(
    children: &mut [RenderBox],
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    content_x: f32,
    top: f32,
    content_width: f32,
    align: TextAlign,
) -> FlowResult {
    let mut y = top;
    let mut first = None;
    let mut i = 0;

    while i < children.len() {
        if children[i].is_inline_participant() {
            let end = i + children[i..]
                .iter()
                .take_while(|c| c.is_inline_participant())
                .count();
            let flow = inline::layout_inline_group(
                &mut children[i..end],
                graphics,
                ctx,
                content_x,
                y,
                content_width,
                align,
            );
            if first.is_none()
                && let Some(height) = flow.first_line_height
            {
                first = Some(FirstContent::Line { y, height });
            }
            y += flow.height;
            i = end;
            continue;
        }

        let child = &mut children[i];
        let margin = child.style.margin;
        let child_bounds = Rect::new(
            content_x + margin.left,
            y + margin.top,
            (content_width - margin.horizontal()).max(0.0),
            0.0,
        );
        child.layout(graphics, child_bounds, ctx);

        if first.is_none() {
            first = Some(FirstContent::Block {
                y: child.rect.y,
                inset_top: child.style.insets().top,
            });
        }
        y += margin.top + child.rect.height + margin.bottom;
        i += 1;
    }

    FlowResult {
        height: y - top,
        first,
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::bridge::graphics::FallbackGraphics;
    use crate::engine::layouter::tests::laid_out;
    use crate::engine::renderer::types::Rect;

    #[test]
    fn blocks_stack_with_margins() {
        let tree = laid_out(
            "<div class=a>x</div><div class=b>y</div>",
            ".a { margin: 5px; height: 20px } .b { padding: 3px }",
            200.0,
        );
        let a = &tree.root.children[0];
        let b = &tree.root.children[1];
        assert_eq!(a.rect, Rect::new(5.0, 5.0, 190.0, 20.0));
        assert_eq!(b.rect, Rect::new(0.0, 30.0, 200.0, 22.0));
        assert_eq!(tree.root.rect.height, 52.0);
    }

    #[test]
    fn width_is_clamped_to_available() {
        let tree = laid_out("<div>x</div>", "div { width: 500px }", 200.0);
        assert_eq!(tree.root.children[0].rect.width, 200.0);
        let tree = laid_out("<div>x</div>", "div { width: 50% }", 200.0);
        assert_eq!(tree.root.children[0].rect.width, 100.0);
    }

    #[test]
    fn text_wraps_inside_block() {
        let tree = laid_out("<div>Hello Hello</div>", "div { width: 60px }", 800.0);
        let div = &tree.root.children[0];
        assert_eq!(div.rect.height, 32.0);
        let text = &div.children[0];
        assert_eq!(text.fragments().len(), 2);
        assert_eq!(text.fragments()[1].rect.y, 16.0);
    }

    #[test]
    fn inline_runs_between_blocks_form_their_own_line() {
        let tree = laid_out("<div>a<p>b</p>c</div>", "p { margin: 0 }", 800.0);
        let div = &tree.root.children[0];
        assert_eq!(div.children[1].rect.y, 16.0);
        assert_eq!(div.children[2].rect.y, 32.0);
        assert_eq!(div.rect.height, 48.0);
    }

    #[test]
    fn relayout_is_idempotent() {
        let mut tree = laid_out(
            "<div>one two <b>three</b> four<ul><li>x</li></ul></div>",
            "",
            120.0,
        );
        let before = tree.to_string();
        tree.layout(&FallbackGraphics::new(), Rect::new(0.0, 0.0, 120.0, 600.0));
        assert_eq!(tree.to_string(), before);
    }

    #[test]
    fn transparent_inline_wraps_its_children() {
        let tree = laid_out("<div>ab <span>cd</span></div>", "", 800.0);
        let div = &tree.root.children[0];
        let span = &div.children[1];
        assert_eq!(span.rect, Rect::new(24.0, 0.0, 16.0, 16.0));
        assert_eq!(span.children[0].rect, Rect::new(0.0, 0.0, 16.0, 16.0));
    }
}
