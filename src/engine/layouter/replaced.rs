use crate::engine::renderer::render_node::{BoxKind, RenderBox};
use crate::engine::renderer::types::Rect;

pub const DEFAULT_IMAGE_WIDTH: f32 = 300.0;
pub const DEFAULT_IMAGE_HEIGHT: f32 = 150.0;
pub const DEFAULT_RULE_HEIGHT: f32 = 2.0;

/// `<img>`: CSS の寸法 → 属性 → 既定値 (300x150) の順
pub fn layout_image(b: &mut RenderBox, bounds: Rect) {
    let (attr_width, attr_height) = match b.kind {
        BoxKind::Image {
            attr_width,
            attr_height,
        } => (attr_width, attr_height),
        _ => (None, None),
    };

    let style = &b.style;
    let width = style
        .width
        .filter(|w| !w.is_auto())
        .map(|w| style.resolve_length(w, bounds.width))
        .or(attr_width)
        .unwrap_or(DEFAULT_IMAGE_WIDTH);
    let height = style
        .height
        .filter(|h| !h.is_auto())
        .map(|h| style.resolve_length(h, bounds.height))
        .or(attr_height)
        .unwrap_or(DEFAULT_IMAGE_HEIGHT);

    let insets = style.insets();
    b.rect = Rect::new(
        bounds.x,
        bounds.y,
        width + insets.horizontal(),
        height + insets.vertical(),
    );
}

/// `<hr>`: 利用可能幅いっぱい
pub fn layout_rule(b: &mut RenderBox, bounds: Rect) {
    let style = &b.style;
    let height = style
        .height
        .filter(|h| !h.is_auto())
        .map(|h| style.resolve_length(h, bounds.height))
        .unwrap_or(DEFAULT_RULE_HEIGHT);
    b.rect = Rect::new(bounds.x, bounds.y, bounds.width, height);
}

/// `<br>`: 幅 0、高さは 1 行分
pub fn layout_break(b: &mut RenderBox, bounds: Rect) {
    b.rect = Rect::new(bounds.x, bounds.y, 0.0, b.style.font_size);
}
