pub mod render;
pub mod render_node;
pub mod render_tree;
pub mod types;

pub use render::Renderer;
pub use render_node::{BoxKind, RenderBox, RenderTree, TextFragment};
pub use render_tree::TreeBuilder;
pub use types::Rect;
