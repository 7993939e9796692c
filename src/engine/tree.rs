//! DomやRenderTreeで共有するツリー表示ヘルパー
//!
//! # 概要
//! ノードの持ち方（アリーナ ID / 所有ツリー）に依存しないよう、
//! ラベルと子ノードの取得を `TreeView` で抽象化し、
//! `├──` / `└──` 形式で書き出します。

use std::fmt::{self, Formatter};

/// ツリーを表示するための最小限のビュー
pub trait TreeView {
    type Node: Copy;

    fn label(&self, node: Self::Node) -> String;
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;
}

/// `root` 以下をインデント付きで書き出す
pub fn fmt_tree<V: TreeView>(view: &V, root: V::Node, f: &mut Formatter<'_>) -> fmt::Result {
    fmt_tree_node(view, root, f, &[])
}

/// 再帰的にツリーを表示するヘルパー関数
fn fmt_tree_node<V: TreeView>(
    view: &V,
    node: V::Node,
    f: &mut Formatter<'_>,
    ancestors_last: &[bool],
) -> fmt::Result {
    let is_last = *ancestors_last.last().unwrap_or(&true);
    let connector = if ancestors_last.is_empty() {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let mut prefix = String::new();
    for &ancestor_last in &ancestors_last[..ancestors_last.len().saturating_sub(1)] {
        prefix.push_str(if ancestor_last { "    " } else { "│   " });
    }

    writeln!(f, "{}{}{}", prefix, connector, view.label(node))?;

    let children = view.children(node);
    let child_count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        let mut new_ancestors = ancestors_last.to_vec();
        new_ancestors.push(i + 1 == child_count);
        fmt_tree_node(view, child, f, &new_ancestors)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nested;

    impl TreeView for Nested {
        type Node = u8;

        fn label(&self, node: u8) -> String {
            format!("n{node}")
        }

        fn children(&self, node: u8) -> Vec<u8> {
            match node {
                0 => vec![1, 2],
                1 => vec![3],
                _ => vec![],
            }
        }
    }

    struct Show;

    impl fmt::Display for Show {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            fmt_tree(&Nested, 0, f)
        }
    }

    #[test]
    fn draws_connectors() {
        let out = Show.to_string();
        assert_eq!(out, "n0\n├── n1\n│   └── n3\n└── n2\n");
    }
}
