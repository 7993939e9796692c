//! CSS length values (px, em, %, etc.)
//! Used in margin, padding, border-width, width, height.

use std::fmt;

/// CSSの長さ単位を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// 絶対値 (px)
    Px(f32),
    /// フォントサイズ相対 (em)
    Em(f32),
    /// パーセンテージ (%)
    Percent(f32),
    /// 自動 (auto)
    Auto,
}

impl Length {
    /// ピクセル値として評価する。
    /// `font_size` は em の基準、`percent_base` は % の基準。
    pub fn to_px(&self, font_size: f32, percent_base: f32) -> f32 {
        match *self {
            Length::Px(px) => px,
            Length::Em(em) => em * font_size,
            Length::Percent(p) => percent_base * (p / 100.0),
            Length::Auto => 0.0,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// CSS文字列からLength
    ///
    /// 単位なしの数値は px として扱う（`0` を含む）。
    pub fn from_css(value: &str) -> Option<Length> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Some(Length::Auto);
        }

        let lower = value.to_ascii_lowercase();
        if let Some(num) = lower.strip_suffix("px") {
            return num.parse::<f32>().ok().map(Length::Px);
        }
        if let Some(num) = lower.strip_suffix("em") {
            return num.parse::<f32>().ok().map(Length::Em);
        }
        if let Some(num) = lower.strip_suffix('%') {
            return num.parse::<f32>().ok().map(Length::Percent);
        }
        lower.parse::<f32>().ok().map(Length::Px)
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Em(v) => write!(f, "{}em", v),
            Length::Percent(v) => write!(f, "{}%", v),
            Length::Auto => write!(f, "auto"),
        }
    }
}
