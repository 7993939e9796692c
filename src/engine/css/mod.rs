pub mod cssom;
pub mod values;

pub use cssom::{Declaration, Rule, Selector, Stylesheet};

/// Parse a stylesheet string. Never fails; malformed input yields fewer rules.
pub fn parse_css(text: &str) -> Stylesheet {
    let sheet = cssom::Parser::new(text).parse();
    log::debug!(target: "CssParser", "Parsed stylesheet with {} rules", sheet.len());
    sheet
}
