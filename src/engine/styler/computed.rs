//! 計算済みスタイル（ComputedStyle）
//!
//! ノードごとに 1 つだけ作られ、作成後は変更しない。
//! 継承は未実装で、各ノードは一致したルールと UA デフォルトだけから決まる。

use crate::engine::css::values::{BorderStyle, Color, Display, Length};

/// 既定のフォントサイズ (px)
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn from_keyword(keyword: &str) -> Option<TextAlign> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "left" | "start" | "justify" => Some(TextAlign::Left),
            "center" | "middle" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn from_keyword(keyword: &str) -> Option<FontWeight> {
        let keyword = keyword.trim().to_ascii_lowercase();
        match keyword.as_str() {
            "normal" | "lighter" => Some(FontWeight::Normal),
            "bold" | "bolder" => Some(FontWeight::Bold),
            _ => keyword.parse::<u16>().ok().map(|w| {
                if w >= 600 {
                    FontWeight::Bold
                } else {
                    FontWeight::Normal
                }
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn from_keyword(keyword: &str) -> Option<FontStyle> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(FontStyle::Normal),
            "italic" | "oblique" => Some(FontStyle::Italic),
            _ => None,
        }
    }
}

/// white-space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhiteSpace {
    /// 連続する空白を 1 つに畳み、行を折り返す
    #[default]
    Normal,
    /// 空白と改行をそのまま保持する (`pre`)
    Preserve,
    /// 空白は畳むが折り返さない
    NoWrap,
}

impl WhiteSpace {
    pub fn from_keyword(keyword: &str) -> Option<WhiteSpace> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "normal" | "pre-line" => Some(WhiteSpace::Normal),
            "pre" | "pre-wrap" | "break-spaces" => Some(WhiteSpace::Preserve),
            "nowrap" => Some(WhiteSpace::NoWrap),
            _ => None,
        }
    }
}

/// 上下左右の辺の大きさ (px)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Edges = Edges::uniform(0.0);

    pub const fn uniform(v: f32) -> Edges {
        Edges {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

impl std::ops::Add for Edges {
    type Output = Edges;

    fn add(self, rhs: Edges) -> Edges {
        Edges {
            top: self.top + rhs.top,
            right: self.right + rhs.right,
            bottom: self.bottom + rhs.bottom,
            left: self.left + rhs.left,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,
    pub text_align: TextAlign,

    pub border_style: BorderStyle,
    pub border_width: f32,
    pub border_color: Color,

    pub margin: Edges,
    pub padding: Edges,

    /// % は包含ブロックの幅に対して layout 時に解決する
    pub width: Option<Length>,
    pub height: Option<Length>,

    pub color: Color,
    pub background: Option<Color>,

    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub monospace: bool,
    pub white_space: WhiteSpace,
    pub underline: bool,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Inline,
            text_align: TextAlign::Left,
            border_style: BorderStyle::None,
            border_width: 0.0,
            border_color: Color::BLACK,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            width: None,
            height: None,
            color: Color::BLACK,
            background: None,
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            monospace: false,
            white_space: WhiteSpace::Normal,
            underline: false,
        }
    }
}

impl ComputedStyle {
    /// 実際に描かれるボーダーの幅（style が none なら 0）
    pub fn border(&self) -> Edges {
        if self.border_style == BorderStyle::None {
            Edges::ZERO
        } else {
            Edges::uniform(self.border_width)
        }
    }

    /// padding + border
    pub fn insets(&self) -> Edges {
        self.padding + self.border()
    }

    pub fn has_insets(&self) -> bool {
        !self.insets().is_zero()
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }

    /// `Length` を px に解決する（em はこの要素のフォントサイズ基準）
    pub fn resolve_length(&self, length: Length, percent_base: f32) -> f32 {
        length.to_px(self.font_size, percent_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insets_ignore_border_without_style() {
        let mut style = ComputedStyle {
            padding: Edges::uniform(2.0),
            border_width: 3.0,
            ..Default::default()
        };
        assert_eq!(style.insets(), Edges::uniform(2.0));

        style.border_style = BorderStyle::Solid;
        assert_eq!(style.insets(), Edges::uniform(5.0));
        assert!(style.has_insets());
        assert!(!ComputedStyle::default().has_insets());
    }

    #[test]
    fn keywords() {
        assert_eq!(FontWeight::from_keyword("700"), Some(FontWeight::Bold));
        assert_eq!(WhiteSpace::from_keyword("pre"), Some(WhiteSpace::Preserve));
        assert_eq!(TextAlign::from_keyword("CENTER"), Some(TextAlign::Center));
    }
}
