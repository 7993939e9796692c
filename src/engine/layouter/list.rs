use std::rc::Rc;

use super::LayoutContext;
use super::block::{FirstContent, block_height, block_width, layout_flow};
use crate::engine::bridge::graphics::Graphics;
use crate::engine::renderer::render_node::{BoxKind, RenderBox};
use crate::engine::renderer::types::Rect;

/// 四角いマーカーの一辺
pub const MARKER_SIZE: f32 = 6.0;
/// マーカーと内容の間隔
pub const MARKER_GAP: f32 = 8.0;

/// リスト項目: 内容をマーカー分だけ右へずらしてブロックとして積む。
///
/// マーカーは最初の行の中央、または最初のブロック子の内容上端に揃える。
pub fn layout_list_item(
    b: &mut RenderBox,
    graphics: &dyn Graphics,
    bounds: Rect,
    ctx: &LayoutContext,
) {
    let style = Rc::clone(&b.style);
    let width = block_width(&style, bounds.width);
    let insets = style.insets();
    let offset = MARKER_SIZE + MARKER_GAP;
    let content_width = (width - insets.horizontal() - offset).max(0.0);

    let flow = layout_flow(
        &mut b.children,
        graphics,
        ctx,
        insets.left + offset,
        insets.top,
        content_width,
        style.text_align,
    );

    let marker_y = match flow.first {
        Some(FirstContent::Block { y, inset_top }) => y + inset_top,
        Some(FirstContent::Line { y, height }) => y + (height - MARKER_SIZE) / 2.0,
        None => insets.top,
    };
    let marker = Rect::new(insets.left, marker_y, MARKER_SIZE, MARKER_SIZE);

    let height = block_height(&style, flow.height + insets.vertical(), bounds.height);
    b.rect = Rect::new(bounds.x, bounds.y, width, height);
    b.kind = BoxKind::ListItem { marker };
}
