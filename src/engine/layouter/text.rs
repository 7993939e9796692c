//! テキストの分割と計測

use super::LayoutContext;
use crate::engine::bridge::graphics::{Graphics, TextMeasureRequest};
use crate::engine::styler::{ComputedStyle, WhiteSpace};

/// 行分割の単位になるテキスト片
#[derive(Debug, Clone, PartialEq)]
pub enum TextPiece {
    Word(String),
    /// 保持された改行（white-space: pre）
    Newline,
}

/// 連続する空白を 1 つのスペースに畳む
pub fn normalize_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    result
}

/// white-space モードに従ってテキストを run 単位に分ける。
///
/// normal では各単語が直後のスペースを含む（`"Hello Hello"` → `"Hello "`, `"Hello"`）。
pub fn split_pieces(text: &str, mode: WhiteSpace) -> Vec<TextPiece> {
    match mode {
        WhiteSpace::Normal => {
            let normalized = normalize_whitespace(text);
            let mut pieces = Vec::new();
            let mut current = String::new();
            for c in normalized.chars() {
                current.push(c);
                if c == ' ' {
                    pieces.push(TextPiece::Word(std::mem::take(&mut current)));
                }
            }
            if !current.is_empty() {
                pieces.push(TextPiece::Word(current));
            }
            pieces
        }
        WhiteSpace::NoWrap => {
            let normalized = normalize_whitespace(text);
            if normalized.is_empty() {
                Vec::new()
            } else {
                vec![TextPiece::Word(normalized)]
            }
        }
        WhiteSpace::Preserve => {
            let mut pieces = Vec::new();
            for (i, line) in text.split('\n').enumerate() {
                if i > 0 {
                    pieces.push(TextPiece::Newline);
                }
                let line = line.strip_suffix('\r').unwrap_or(line);
                if !line.is_empty() {
                    pieces.push(TextPiece::Word(line.to_string()));
                }
            }
            pieces
        }
    }
}

/// スペースだけの run（行頭では捨てられる）
pub fn is_collapsible_space(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == ' ')
}

/// テキストを計測する。失敗した場合は警告を出してサイズ 0 として扱う。
pub fn measure_text(
    graphics: &dyn Graphics,
    ctx: &LayoutContext,
    style: &ComputedStyle,
    text: &str,
) -> (f32, f32) {
    let request = TextMeasureRequest {
        text,
        font_path: ctx.font_path.as_deref(),
        font_size: style.font_size,
        bold: style.is_bold(),
        italic: style.is_italic(),
        monospace: style.monospace,
    };

    match graphics.measure_text(&request) {
        Ok(metrics) => {
            if metrics.width <= 0.0 && !text.is_empty() {
                log::warn!(target: "Layouter::Text", "Zero-width measurement for {text:?}");
            }
            (metrics.width, metrics.height)
        }
        Err(e) => {
            log::warn!(target: "Layouter::Text", "Failed to measure {text:?}: {e}");
            (0.0, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(pieces: &[TextPiece]) -> Vec<&str> {
        pieces
            .iter()
            .map(|p| match p {
                TextPiece::Word(w) => w.as_str(),
                TextPiece::Newline => "\\n",
            })
            .collect()
    }

    #[test]
    fn normal_mode_splits_after_spaces() {
        let pieces = split_pieces("Hello   Hello\n world", WhiteSpace::Normal);
        assert_eq!(words(&pieces), vec!["Hello ", "Hello ", "world"]);
    }

    #[test]
    fn leading_space_is_its_own_piece() {
        let pieces = split_pieces("  x", WhiteSpace::Normal);
        assert_eq!(words(&pieces), vec![" ", "x"]);
        assert!(is_collapsible_space(" "));
        assert!(!is_collapsible_space(""));
    }

    #[test]
    fn nowrap_keeps_one_run() {
        let pieces = split_pieces("a  b c", WhiteSpace::NoWrap);
        assert_eq!(words(&pieces), vec!["a b c"]);
    }

    #[test]
    fn preserve_keeps_spaces_and_newlines() {
        let pieces = split_pieces("  a\n\nb ", WhiteSpace::Preserve);
        assert_eq!(words(&pieces), vec!["  a", "\\n", "\\n", "b "]);
    }
}
