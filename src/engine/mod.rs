//! Document pipeline
//!
//! ```text
//! bytes ─ html ─> Dom ─ styler(css) ─> styled Dom ─ renderer ─> RenderTree ─ layouter ─> painter
//! ```

pub mod arena;
pub mod bridge;
pub mod config;
pub mod css;
pub mod dom;
pub mod html;
pub mod layouter;
pub mod renderer;
pub mod styler;
pub mod tree;
