pub mod browser;
pub mod engine;
pub mod platform;

pub use engine::bridge::graphics::{FallbackGraphics, Graphics};
pub use engine::config::EngineConfig;
pub use engine::css::parse_css;
pub use engine::html::parse_html;
pub use engine::renderer::{RenderTree, Renderer, TreeBuilder};
pub use engine::styler::StyleEngine;
