//! CSS `display` プロパティ値
//!
//! ブロックフロー・インライン整形・リスト項目に必要な値のみを持つ。
//! テーブル系はタグ名で判定する。

/// display: ~~
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    Block,
    #[default]
    Inline,
    InlineBlock,
    ListItem,
    None,
}

impl Display {
    pub fn from_keyword(keyword: &str) -> Option<Display> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "block" => Some(Display::Block),
            "inline" => Some(Display::Inline),
            "inline-block" => Some(Display::InlineBlock),
            "list-item" => Some(Display::ListItem),
            "none" => Some(Display::None),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Display::None)
    }

    /// インライン整形コンテキストに参加するか
    pub fn is_inline_level(&self) -> bool {
        matches!(self, Display::Inline | Display::InlineBlock)
    }
}
