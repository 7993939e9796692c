use super::{DrawCommand, Graphics, TextMeasureError, TextMeasureRequest, TextMetrics, TextStyle};
use crate::engine::css::values::Color;
use crate::engine::renderer::types::Rect;

/// 1 文字あたりの幅 (px)
pub const CHAR_WIDTH: f32 = 8.0;
/// 1 行の高さ (px)
pub const LINE_HEIGHT: f32 = 16.0;

/// Fallback graphics backend.
///
/// This implementation does not rely on any font engine: every character is
/// exactly 8px wide and every line 16px tall, regardless of font size.
/// Draw calls are recorded instead of rasterized.
/// Intended for testing, bring-up, and environments without font support.
#[derive(Debug, Default)]
pub struct FallbackGraphics {
    commands: Vec<DrawCommand>,
    font_unavailable: bool,
}

impl FallbackGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 計測が常に `FontUnavailable` を返すバックエンド
    pub fn without_font() -> Self {
        Self {
            commands: Vec::new(),
            font_unavailable: true,
        }
    }

    /// 記録済みの描画コマンド
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Graphics for FallbackGraphics {
    fn measure_text(
        &self,
        request: &TextMeasureRequest<'_>,
    ) -> Result<TextMetrics, TextMeasureError> {
        if self.font_unavailable {
            return Err(TextMeasureError::FontUnavailable);
        }

        let mut max_chars = 0usize;
        let mut line_count = 0usize;
        for line in request.text.split('\n') {
            max_chars = max_chars.max(line.chars().count());
            line_count += 1;
        }

        Ok(TextMetrics {
            width: max_chars as f32 * CHAR_WIDTH,
            height: line_count as f32 * LINE_HEIGHT,
            baseline: LINE_HEIGHT * 0.8,
        })
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.commands.push(DrawCommand::DrawText {
            x,
            y,
            text: text.to_string(),
            style: *style,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::SetViewport(rect));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> TextMeasureRequest<'_> {
        TextMeasureRequest {
            text,
            font_path: None,
            font_size: 32.0,
            bold: true,
            italic: false,
            monospace: false,
        }
    }

    #[test]
    fn measures_eight_px_per_char() {
        let g = FallbackGraphics::new();
        let m = g.measure_text(&request("Hello")).unwrap();
        assert_eq!(m.width, 40.0);
        assert_eq!(m.height, 16.0);

        let m = g.measure_text(&request("ab\nabcd")).unwrap();
        assert_eq!(m.width, 32.0);
        assert_eq!(m.height, 32.0);
    }

    #[test]
    fn records_draw_calls() {
        let mut g = FallbackGraphics::new();
        g.clear(Color::WHITE);
        g.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK);
        g.present();
        assert_eq!(g.commands().len(), 3);
        assert_eq!(g.take_commands()[2], DrawCommand::Present);
        assert!(g.commands().is_empty());
    }

    #[test]
    fn missing_font_is_an_error() {
        let g = FallbackGraphics::without_font();
        assert_eq!(
            g.measure_text(&request("x")),
            Err(TextMeasureError::FontUnavailable)
        );
    }
}
