//! カスケード: 一致したルールからプロパティごとの勝者を決める

use std::collections::BTreeMap;

use super::style::Style;
use crate::engine::css::cssom::Stylesheet;
use crate::engine::dom::ElementData;

/// あるプロパティに対する現在の勝者
#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub specificity: u32,
    /// シート全体で通しの宣言順
    pub order: usize,
    pub value: String,
}

/// 要素に一致する全宣言から、プロパティ名ごとの勝者を集める。
///
/// 詳細度が大きいもの、同じなら後に出たもの（`>=`）が勝つ。
pub fn collect_winners(stylesheet: &Stylesheet, element: &ElementData) -> BTreeMap<String, Winner> {
    let mut winners: BTreeMap<String, Winner> = BTreeMap::new();
    let mut order = 0usize;

    for rule in &stylesheet.rules {
        let matched =
            rule.selector
                .matches(&element.tag_name, element.id(), element.class());
        let specificity = rule.selector.specificity();

        for decl in &rule.declarations {
            order += 1;
            if !matched {
                continue;
            }

            let replace = match winners.get(&decl.name) {
                Some(current) => {
                    specificity > current.specificity
                        || (specificity == current.specificity && order >= current.order)
                }
                None => true,
            };

            if replace {
                winners.insert(
                    decl.name.clone(),
                    Winner {
                        specificity,
                        order,
                        value: decl.value.clone(),
                    },
                );
            }
        }
    }

    winners
}

/// ショートハンド（margin / padding / border）は個別指定より先に適用する
fn is_shorthand(name: &str) -> bool {
    matches!(name, "margin" | "padding" | "border")
}

/// 勝者の集合を指定値スタイルに変換する
pub fn specified_style(winners: &BTreeMap<String, Winner>) -> Style {
    let mut style = Style::default();

    let shorthands = winners.iter().filter(|(name, _)| is_shorthand(name));
    let longhands = winners.iter().filter(|(name, _)| !is_shorthand(name));

    for (name, winner) in shorthands.chain(longhands) {
        if !style.apply_declaration(name, &winner.value) {
            log::debug!(target: "Styler::Cascade", "Ignoring unsupported declaration `{name}: {}`", winner.value);
        }
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::css::parse_css;
    use crate::engine::css::values::Length;
    use crate::engine::dom::Attribute;

    fn div(id: Option<&str>, class: Option<&str>) -> ElementData {
        let mut attributes = Vec::new();
        if let Some(id) = id {
            attributes.push(Attribute {
                name: "id".into(),
                value: id.into(),
            });
        }
        if let Some(class) = class {
            attributes.push(Attribute {
                name: "class".into(),
                value: class.into(),
            });
        }
        ElementData {
            tag_name: "div".into(),
            attributes,
        }
    }

    #[test]
    fn later_rule_wins_on_equal_specificity() {
        let sheet = parse_css(".box{margin:4px} .box{margin:9px}");
        let winners = collect_winners(&sheet, &div(None, Some("box")));
        assert_eq!(winners["margin"].value, "9px");
    }

    #[test]
    fn specificity_beats_order() {
        let sheet = parse_css("#a { color: red } .b { color: green } div { color: blue }");
        let winners = collect_winners(&sheet, &div(Some("a"), Some("b")));
        assert_eq!(winners["color"].value, "red");

        let winners = collect_winners(&sheet, &div(None, Some("b")));
        assert_eq!(winners["color"].value, "green");
    }

    #[test]
    fn longhand_overrides_shorthand() {
        let sheet = parse_css("div { margin-left: 1px } div { margin: 5px }");
        let style = specified_style(&collect_winners(&sheet, &div(None, None)));
        assert_eq!(style.margin_left, Some(Length::Px(1.0)));
        assert_eq!(style.margin_top, Some(Length::Px(5.0)));
    }
}
