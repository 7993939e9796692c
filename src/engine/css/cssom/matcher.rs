use super::Selector;

impl Selector {
    /// Simple selector matcher (tag / class / id)
    ///
    /// `class_attr` は class 属性の生の値（空白区切り）。
    pub fn matches(&self, tag_name: &str, id: Option<&str>, class_attr: Option<&str>) -> bool {
        match self {
            Selector::Tag(tag) => tag.eq_ignore_ascii_case(tag_name),
            Selector::Id(expected) => id.is_some_and(|actual| actual == expected),
            Selector::Class(expected) => class_attr
                .is_some_and(|classes| classes.split_whitespace().any(|c| c == expected)),
        }
    }
}
