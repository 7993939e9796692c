pub mod parser;
pub mod tokenizer;
pub mod util;

pub use parser::{HtmlDocument, Parser, parse_html, parse_html_in};
