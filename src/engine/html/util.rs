//!HTML関連のユーティリティ関数群
//!
//! タグ名はトークナイザで小文字化済みのものを渡すこと。

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// 子を持たない要素。非自己終了タグで書かれてもスタックに積まない。
pub fn is_void_element(tag_name: &str) -> bool {
    matches!(tag_name, "meta" | "link" | "br" | "img" | "input")
}

/// 描画に関与しない要素（子孫ごと描画ツリーから外す）
pub fn is_non_visual_element(tag_name: &str) -> bool {
    matches!(tag_name, "head" | "style" | "title" | "script")
}

/// デフォルトでインラインボックスになる要素
pub fn is_inline_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "a" | "span" | "strong" | "em" | "b" | "i" | "code"
    )
}

/// テーブル関連の要素
pub fn is_table_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "table" | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th"
    )
}

static SUPPORTED_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // 文書構造
        "root", "html", "head", "body", "title", "meta", "link", "style", "script",
        // セクショナル要素
        "main", "header", "footer", "section", "nav", "article", "aside",
        // 見出し
        "h1", "h2", "h3", "h4", "h5", "h6",
        // テキスト／段落系
        "p", "pre", "blockquote", "hr", "br", "div", "span", "a", "strong", "em", "b", "i",
        "code",
        // リスト
        "ul", "ol", "li",
        // 表組み
        "table", "thead", "tbody", "tfoot", "tr", "td", "th",
        // 置換要素・フォーム
        "img", "input",
    ]
    .into_iter()
    .collect()
});

/// is_supported_tag - この実装が意味を知っているタグかどうか
///
/// 未対応タグも DOM には入る（描画ツリーでは汎用ブロック扱い）。
pub fn is_supported_tag(tag_name: &str) -> bool {
    SUPPORTED_TAGS.contains(tag_name)
}
