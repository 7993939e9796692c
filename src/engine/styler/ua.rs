//! UA（User-Agent）デフォルトスタイル
//!
//! html要素ごとの最小限の display / margin / padding などを定義する。
//! ここで返す値はどのルールにも指定されなかったプロパティだけに適用される。

use super::computed::{FontStyle, FontWeight, TextAlign, WhiteSpace};
use super::style::Style;
use crate::engine::css::values::{Color, Display, Length};
use crate::engine::dom::ElementData;
use crate::engine::html::util;

/// `<code>` の背景色
pub const CODE_BACKGROUND: Color = Color::rgb(238, 238, 238);

/// 要素に対するデフォルト Style を返す
pub fn default_style_for(element: &ElementData) -> Style {
    let mut s = Style {
        display: Some(Display::Block),
        ..Default::default()
    };

    let tag_name = element.tag_name.as_str();

    match tag_name {
        "body" => {
            // ブラウザのデフォルト body margin は一般に 8px 前後
            s.margin_top = Some(Length::Px(8.0));
            s.margin_right = Some(Length::Px(8.0));
            s.margin_bottom = Some(Length::Px(8.0));
            s.margin_left = Some(Length::Px(8.0));
        }

        // 見出しはブロックで上下に余白、太字
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let (size, top, bottom) = match tag_name {
                "h1" => (32.0, 21.0, 14.0),
                "h2" => (24.0, 18.0, 12.0),
                "h3" => (18.0, 16.0, 10.0),
                "h4" => (16.0, 12.0, 6.0),
                "h5" => (14.0, 12.0, 6.0),
                _ => (12.0, 12.0, 6.0),
            };
            s.font_size = Some(Length::Px(size));
            s.margin_top = Some(Length::Px(top));
            s.margin_bottom = Some(Length::Px(bottom));
            s.font_weight = Some(FontWeight::Bold);
        }

        "p" => {
            s.margin_top = Some(Length::Px(16.0));
            s.margin_bottom = Some(Length::Px(16.0));
        }

        // リスト
        "ul" | "ol" => {
            s.padding_left = Some(Length::Px(20.0));
        }
        "li" => {
            s.display = Some(Display::ListItem);
        }

        "blockquote" => {
            s.margin_left = Some(Length::Px(40.0));
        }
        "hr" => {
            s.height = Some(Length::Px(2.0));
            s.margin_top = Some(Length::Px(8.0));
            s.margin_bottom = Some(Length::Px(8.0));
            s.background_color = Some(Color::rgb(128, 128, 128));
        }

        // code / pre
        "pre" => {
            s.white_space = Some(WhiteSpace::Preserve);
            s.monospace = Some(true);
        }
        "code" => {
            s.display = Some(Display::Inline);
            s.background_color = Some(CODE_BACKGROUND);
            s.padding_left = Some(Length::Px(4.0));
            s.monospace = Some(true);
        }

        // インライン要素群
        "a" => {
            s.display = Some(Display::Inline);
            s.color = Some(Color::BLUE);
            s.underline = Some(true);
        }
        "b" | "strong" => {
            s.display = Some(Display::Inline);
            s.font_weight = Some(FontWeight::Bold);
        }
        "i" | "em" => {
            s.display = Some(Display::Inline);
            s.font_style = Some(FontStyle::Italic);
        }
        "th" => {
            s.font_weight = Some(FontWeight::Bold);
            s.text_align = Some(TextAlign::Center);
        }

        // 置換要素・フォームはインラインに並ぶ
        "img" | "input" => {
            s.display = Some(Display::Inline);
        }

        _ if util::is_inline_element(tag_name) => {
            s.display = Some(Display::Inline);
        }

        _ => {
            // その他（未知の要素を含む）はブロック
        }
    }

    // 表示属性（presentational hints）
    if matches!(tag_name, "td" | "th" | "p" | "div")
        && let Some(align) = element.attr("align").and_then(TextAlign::from_keyword)
    {
        s.text_align = Some(align);
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::dom::Attribute;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        ElementData {
            tag_name: tag.to_string(),
            attributes: attrs
                .iter()
                .map(|(n, v)| Attribute {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn inline_and_block_defaults() {
        assert_eq!(
            default_style_for(&element("span", &[])).display,
            Some(Display::Inline)
        );
        assert_eq!(
            default_style_for(&element("div", &[])).display,
            Some(Display::Block)
        );
        assert_eq!(
            default_style_for(&element("custom-thing", &[])).display,
            Some(Display::Block)
        );
        assert_eq!(
            default_style_for(&element("li", &[])).display,
            Some(Display::ListItem)
        );
    }

    #[test]
    fn align_attribute_becomes_text_align() {
        let s = default_style_for(&element("td", &[("align", "center")]));
        assert_eq!(s.text_align, Some(TextAlign::Center));
        let s = default_style_for(&element("span", &[("align", "center")]));
        assert_eq!(s.text_align, None);
    }
}
