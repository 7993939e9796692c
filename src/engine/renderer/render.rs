//! RenderTree を Graphics への描画呼び出しに変換する Renderer

use super::render_node::{BoxKind, RenderBox, RenderTree};
use super::types::Rect;
use crate::engine::bridge::graphics::{DrawCommand, FallbackGraphics, Graphics, TextStyle};
use crate::engine::css::values::Color;
use crate::engine::styler::ComputedStyle;

const RULE_COLOR: Color = Color::rgb(128, 128, 128);
const IMAGE_PLACEHOLDER: Color = Color::rgb(204, 204, 204);

pub struct Renderer;

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// 先行順（背景 → ボーダー → 内容 → 子）で描画する。座標は絶対値に直して渡す。
    pub fn paint(&self, tree: &RenderTree, graphics: &mut dyn Graphics, viewport: Rect) {
        graphics.set_viewport(viewport);
        graphics.clear(Color::WHITE);
        self.traverse_tree(&tree.root, 0.0, 0.0, false, graphics);
        graphics.present();
    }

    /// 記録用バックエンドで描画し、コマンド列を返す
    pub fn generate_draw_commands(&self, tree: &RenderTree, viewport: Rect) -> Vec<DrawCommand> {
        let mut graphics = FallbackGraphics::new();
        self.paint(tree, &mut graphics, viewport);
        graphics.take_commands()
    }

    fn traverse_tree(
        &self,
        node: &RenderBox,
        offset_x: f32,
        offset_y: f32,
        inside_inline: bool,
        graphics: &mut dyn Graphics,
    ) {
        let abs = node.rect.translate(offset_x, offset_y);
        let style = &node.style;
        let transparent_inline = node.kind == BoxKind::Inline && !style.has_insets();

        match &node.kind {
            BoxKind::Text { fragments, .. } => {
                let text_style = text_style(style);
                for fragment in fragments {
                    let rect = fragment.rect.translate(abs.x, abs.y);
                    // 透過インラインの背景は行ごとの断片に塗る
                    if inside_inline && let Some(bg) = style.background {
                        graphics.fill_rect(rect, bg);
                    }
                    graphics.draw_text(&fragment.text, rect.x, rect.y, &text_style);
                    if style.underline {
                        let line = Rect::new(rect.x, rect.bottom() - 2.0, rect.width, 1.0);
                        graphics.fill_rect(line, style.color);
                    }
                }
                return;
            }
            BoxKind::Rule => {
                graphics.fill_rect(abs, style.background.unwrap_or(RULE_COLOR));
                return;
            }
            BoxKind::Break => return,
            _ => {}
        }

        if !transparent_inline {
            if let Some(bg) = style.background {
                graphics.fill_rect(abs, bg);
            }
            paint_border(style, abs, graphics);
        }

        match &node.kind {
            BoxKind::ListItem { marker } => {
                graphics.fill_rect(marker.translate(abs.x, abs.y), style.color);
            }
            BoxKind::Image { .. } => {
                let insets = style.insets();
                let content = Rect::new(
                    abs.x + insets.left,
                    abs.y + insets.top,
                    (abs.width - insets.horizontal()).max(0.0),
                    (abs.height - insets.vertical()).max(0.0),
                );
                graphics.fill_rect(content, IMAGE_PLACEHOLDER);
            }
            _ => {}
        }

        for child in &node.children {
            self.traverse_tree(child, abs.x, abs.y, transparent_inline, graphics);
        }
    }
}

fn text_style(style: &ComputedStyle) -> TextStyle {
    TextStyle {
        font_size: style.font_size,
        color: style.color,
        bold: style.is_bold(),
        italic: style.is_italic(),
        monospace: style.monospace,
    }
}

/// 4 辺を塗りつぶし矩形で描く
fn paint_border(style: &ComputedStyle, rect: Rect, graphics: &mut dyn Graphics) {
    let border = style.border();
    if border.is_zero() {
        return;
    }
    let color = style.border_color;
    let inner_height = (rect.height - border.vertical()).max(0.0);

    let sides = [
        Rect::new(rect.x, rect.y, rect.width, border.top),
        Rect::new(rect.x, rect.bottom() - border.bottom, rect.width, border.bottom),
        Rect::new(rect.x, rect.y + border.top, border.left, inner_height),
        Rect::new(
            rect.right() - border.right,
            rect.y + border.top,
            border.right,
            inner_height,
        ),
    ];
    for side in sides {
        if side.width > 0.0 && side.height > 0.0 {
            graphics.fill_rect(side, color);
        }
    }
}
