pub mod border;
pub mod color;
pub mod display;
pub mod length;

pub use border::{BorderShorthand, BorderStyle};
pub use color::Color;
pub use display::Display;
pub use length::Length;

/// 値を成分に分ける。値の再構成では `#` の前に空白が入らないので
/// `solid#f00` は `solid` と `#f00` に分ける。
pub fn split_components(value: &str) -> impl Iterator<Item = &str> {
    value.split_whitespace().flat_map(|word| {
        let mut parts = Vec::new();
        let mut start = 0;
        for (i, _) in word.match_indices('#') {
            if i > start {
                parts.push(&word[start..i]);
            }
            start = i;
        }
        parts.push(&word[start..]);
        parts
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_starts_a_new_component() {
        let parts: Vec<_> = split_components("2px solid#ff0000").collect();
        assert_eq!(parts, vec!["2px", "solid", "#ff0000"]);

        let parts: Vec<_> = split_components("#fff  #000").collect();
        assert_eq!(parts, vec!["#fff", "#000"]);
    }
}
