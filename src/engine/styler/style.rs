//! 指定値スタイル（Style）
//!
//! カスケードで勝った宣言をプロパティごとに保持する。`None` は「どのルールも指定しなかった」。
//! UA デフォルトは `None` の項目だけを埋める。

use super::computed::{
    ComputedStyle, DEFAULT_FONT_SIZE, Edges, FontStyle, FontWeight, TextAlign, WhiteSpace,
};
use crate::engine::css::values::border::parse_border_width;
use crate::engine::css::values::{
    BorderShorthand, BorderStyle, Color, Display, Length, split_components,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub display: Option<Display>,
    pub width: Option<Length>,
    pub height: Option<Length>,

    pub margin_top: Option<Length>,
    pub margin_right: Option<Length>,
    pub margin_bottom: Option<Length>,
    pub margin_left: Option<Length>,

    pub padding_top: Option<Length>,
    pub padding_right: Option<Length>,
    pub padding_bottom: Option<Length>,
    pub padding_left: Option<Length>,

    pub border_style: Option<BorderStyle>,
    pub border_width: Option<Length>,
    pub border_color: Option<Color>,

    pub color: Option<Color>,
    pub background_color: Option<Color>,

    pub font_size: Option<Length>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub monospace: Option<bool>,
    pub white_space: Option<WhiteSpace>,
    pub text_align: Option<TextAlign>,
    pub underline: Option<bool>,
}

impl Style {
    /// 1 つの宣言を反映する。対応していないプロパティや値なら false。
    pub fn apply_declaration(&mut self, name: &str, value: &str) -> bool {
        match name {
            "display" => set(&mut self.display, Display::from_keyword(value)),
            "width" => set(&mut self.width, Length::from_css(value)),
            "height" => set(&mut self.height, Length::from_css(value)),

            "margin" => match expand_box(value) {
                Some([t, r, b, l]) => {
                    self.margin_top = Some(t);
                    self.margin_right = Some(r);
                    self.margin_bottom = Some(b);
                    self.margin_left = Some(l);
                    true
                }
                None => false,
            },
            "margin-top" => set(&mut self.margin_top, Length::from_css(value)),
            "margin-right" => set(&mut self.margin_right, Length::from_css(value)),
            "margin-bottom" => set(&mut self.margin_bottom, Length::from_css(value)),
            "margin-left" => set(&mut self.margin_left, Length::from_css(value)),

            "padding" => match expand_box(value) {
                Some([t, r, b, l]) => {
                    self.padding_top = Some(t);
                    self.padding_right = Some(r);
                    self.padding_bottom = Some(b);
                    self.padding_left = Some(l);
                    true
                }
                None => false,
            },
            "padding-top" => set(&mut self.padding_top, Length::from_css(value)),
            "padding-right" => set(&mut self.padding_right, Length::from_css(value)),
            "padding-bottom" => set(&mut self.padding_bottom, Length::from_css(value)),
            "padding-left" => set(&mut self.padding_left, Length::from_css(value)),

            "border" => {
                let shorthand = BorderShorthand::parse(value);
                if shorthand == BorderShorthand::default() {
                    return false;
                }
                // 省略された成分は初期値に戻る
                self.border_width = Some(shorthand.width.unwrap_or(Length::Px(3.0)));
                self.border_style = Some(shorthand.style.unwrap_or(BorderStyle::None));
                self.border_color = shorthand.color.or(self.color).or(Some(Color::BLACK));
                true
            }
            "border-width" => set(&mut self.border_width, parse_border_width(value)),
            "border-style" => set(&mut self.border_style, BorderStyle::from_keyword(value)),
            "border-color" => set(&mut self.border_color, Color::parse(value)),

            "color" => set(&mut self.color, Color::parse(value)),
            "background-color" => set(&mut self.background_color, Color::parse(value)),
            "background" => set(
                &mut self.background_color,
                split_components(value).find_map(Color::parse),
            ),

            "font-size" => set(&mut self.font_size, parse_font_size(value)),
            "font-weight" => set(&mut self.font_weight, FontWeight::from_keyword(value)),
            "font-style" => set(&mut self.font_style, FontStyle::from_keyword(value)),
            "font-family" => {
                let lower = value.to_ascii_lowercase();
                self.monospace = Some(lower.contains("monospace") || lower.contains("courier"));
                true
            }
            "white-space" => set(&mut self.white_space, WhiteSpace::from_keyword(value)),
            "text-align" => set(&mut self.text_align, TextAlign::from_keyword(value)),
            "text-decoration" | "text-decoration-line" => {
                let lower = value.to_ascii_lowercase();
                self.underline = Some(lower.split_whitespace().any(|v| v == "underline"));
                true
            }
            _ => false,
        }
    }

    /// 未指定（None）の項目だけを `fallback` で埋める
    pub fn fill_missing(&mut self, fallback: &Style) {
        fill(&mut self.display, fallback.display);
        fill(&mut self.width, fallback.width);
        fill(&mut self.height, fallback.height);
        fill(&mut self.margin_top, fallback.margin_top);
        fill(&mut self.margin_right, fallback.margin_right);
        fill(&mut self.margin_bottom, fallback.margin_bottom);
        fill(&mut self.margin_left, fallback.margin_left);
        fill(&mut self.padding_top, fallback.padding_top);
        fill(&mut self.padding_right, fallback.padding_right);
        fill(&mut self.padding_bottom, fallback.padding_bottom);
        fill(&mut self.padding_left, fallback.padding_left);
        fill(&mut self.border_style, fallback.border_style);
        fill(&mut self.border_width, fallback.border_width);
        fill(&mut self.border_color, fallback.border_color);
        fill(&mut self.color, fallback.color);
        fill(&mut self.background_color, fallback.background_color);
        fill(&mut self.font_size, fallback.font_size);
        fill(&mut self.font_weight, fallback.font_weight);
        fill(&mut self.font_style, fallback.font_style);
        fill(&mut self.monospace, fallback.monospace);
        fill(&mut self.white_space, fallback.white_space);
        fill(&mut self.text_align, fallback.text_align);
        fill(&mut self.underline, fallback.underline);
    }

    /// 計算値に変換する。
    ///
    /// `_parent` は将来の継承プロパティ用。font-size を最初に解決し、em はそれを基準にする。
    pub fn to_computed(&self, _parent: Option<&ComputedStyle>) -> ComputedStyle {
        let font_size = self
            .font_size
            .map(|l| l.to_px(DEFAULT_FONT_SIZE, DEFAULT_FONT_SIZE))
            .unwrap_or(DEFAULT_FONT_SIZE);

        // margin / padding の % は包含ブロックが分からないため 0 として扱う
        let px = |l: Option<Length>| l.map(|l| l.to_px(font_size, 0.0)).unwrap_or(0.0);

        let background = self.background_color.filter(|c| !c.is_transparent());

        ComputedStyle {
            display: self.display.unwrap_or_default(),
            text_align: self.text_align.unwrap_or_default(),
            border_style: self.border_style.unwrap_or_default(),
            border_width: px(self.border_width),
            border_color: self.border_color.or(self.color).unwrap_or(Color::BLACK),
            margin: Edges {
                top: px(self.margin_top),
                right: px(self.margin_right),
                bottom: px(self.margin_bottom),
                left: px(self.margin_left),
            },
            padding: Edges {
                top: px(self.padding_top),
                right: px(self.padding_right),
                bottom: px(self.padding_bottom),
                left: px(self.padding_left),
            },
            width: self.width.filter(|l| !l.is_auto()),
            height: self.height.filter(|l| !l.is_auto()),
            color: self.color.unwrap_or(Color::BLACK),
            background,
            font_size,
            font_weight: self.font_weight.unwrap_or_default(),
            font_style: self.font_style.unwrap_or_default(),
            monospace: self.monospace.unwrap_or(false),
            white_space: self.white_space.unwrap_or_default(),
            underline: self.underline.unwrap_or(false),
        }
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = Some(v);
            true
        }
        None => false,
    }
}

fn fill<T: Copy>(slot: &mut Option<T>, fallback: Option<T>) {
    if slot.is_none() {
        *slot = fallback;
    }
}

/// `margin: 1px 2px` などの 1〜4 値を上・右・下・左に展開する
pub fn expand_box(value: &str) -> Option<[Length; 4]> {
    let vals: Vec<Length> = value
        .split_whitespace()
        .map(Length::from_css)
        .collect::<Option<_>>()?;

    match vals.as_slice() {
        [a] => Some([*a, *a, *a, *a]),
        [v, h] => Some([*v, *h, *v, *h]),
        [t, h, b] => Some([*t, *h, *b, *h]),
        [t, r, b, l] => Some([*t, *r, *b, *l]),
        _ => None,
    }
}

fn parse_font_size(value: &str) -> Option<Length> {
    match value.trim().to_ascii_lowercase().as_str() {
        "xx-small" => Some(Length::Px(9.0)),
        "x-small" => Some(Length::Px(10.0)),
        "small" => Some(Length::Px(13.0)),
        "medium" => Some(Length::Px(16.0)),
        "large" => Some(Length::Px(18.0)),
        "x-large" => Some(Length::Px(24.0)),
        "xx-large" => Some(Length::Px(32.0)),
        _ => Length::from_css(value).filter(|l| !l.is_auto()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_box_values() {
        let px = Length::Px;
        assert_eq!(expand_box("4px"), Some([px(4.0); 4]));
        assert_eq!(
            expand_box("1px 2px"),
            Some([px(1.0), px(2.0), px(1.0), px(2.0)])
        );
        assert_eq!(
            expand_box("1px 2px 3px"),
            Some([px(1.0), px(2.0), px(3.0), px(2.0)])
        );
        assert_eq!(expand_box("1px solid"), None);
    }

    #[test]
    fn em_resolves_against_own_font_size() {
        let mut style = Style::default();
        style.apply_declaration("font-size", "20px");
        style.apply_declaration("margin-left", "2em");
        let computed = style.to_computed(None);
        assert_eq!(computed.font_size, 20.0);
        assert_eq!(computed.margin.left, 40.0);
    }

    #[test]
    fn border_shorthand_resets_missing_parts() {
        let mut style = Style::default();
        style.apply_declaration("border", "2px solid red");
        let computed = style.to_computed(None);
        assert_eq!(computed.border_width, 2.0);
        assert_eq!(computed.border_style, BorderStyle::Solid);
        assert_eq!(computed.border_color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn fill_missing_keeps_specified() {
        let mut style = Style::default();
        style.apply_declaration("color", "red");
        let ua = Style {
            color: Some(Color::BLUE),
            underline: Some(true),
            ..Default::default()
        };
        style.fill_missing(&ua);
        assert_eq!(style.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(style.underline, Some(true));
    }

    #[test]
    fn unknown_property_is_rejected() {
        let mut style = Style::default();
        assert!(!style.apply_declaration("float", "left"));
        assert!(!style.apply_declaration("margin", "wide"));
    }
}
