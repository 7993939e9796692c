pub mod webview;

pub use webview::{Document, NavigationError, WebView};
