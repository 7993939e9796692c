//! CSS border values
//! (border-width, border-style, border-color, `border` shorthand)

use super::color::Color;
use super::length::Length;
use super::split_components;

/// CSSのborder-styleプロパティで使われる値
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
}

impl BorderStyle {
    pub fn from_keyword(keyword: &str) -> Option<BorderStyle> {
        match keyword.to_ascii_lowercase().as_str() {
            "none" | "hidden" => Some(BorderStyle::None),
            "solid" => Some(BorderStyle::Solid),
            "dashed" => Some(BorderStyle::Dashed),
            "dotted" => Some(BorderStyle::Dotted),
            _ => None,
        }
    }
}

/// `border: 1px solid black` を分解した結果。指定のない成分は None。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderShorthand {
    pub width: Option<Length>,
    pub style: Option<BorderStyle>,
    pub color: Option<Color>,
}

impl BorderShorthand {
    pub fn parse(value: &str) -> BorderShorthand {
        let mut out = BorderShorthand::default();

        for token in split_components(value) {
            if out.width.is_none() {
                if let Some(width) = parse_border_width(token) {
                    out.width = Some(width);
                    continue;
                }
            }

            if out.style.is_none() {
                if let Some(style) = BorderStyle::from_keyword(token) {
                    out.style = Some(style);
                    continue;
                }
            }

            if out.color.is_none() {
                if let Some(color) = Color::parse(token) {
                    out.color = Some(color);
                    continue;
                }
            }

            log::debug!(target: "Css::Border", "Ignoring border component: {token}");
        }

        out
    }
}

/// 長さ、または thin/medium/thick
pub fn parse_border_width(token: &str) -> Option<Length> {
    match token.to_ascii_lowercase().as_str() {
        "thin" => Some(Length::Px(1.0)),
        "medium" => Some(Length::Px(3.0)),
        "thick" => Some(Length::Px(5.0)),
        _ => Length::from_css(token).filter(|l| !l.is_auto()),
    }
}
