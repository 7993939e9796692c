use crate::engine::renderer::types::Rect;

/// 1 文書あたりのアリーナ容量の既定値 (8 MiB)
pub const DEFAULT_ARENA_CAPACITY: usize = 8 * 1024 * 1024;

pub const DEFAULT_FALLBACK_HTML: &str = "<html><head><title>Error</title></head>\
<body><h1>Page failed to load</h1><p>The document could not be fetched or parsed.</p></body></html>";

/// Settings shared by every document a [`WebView`](crate::browser::WebView) loads.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// DOM アリーナの容量（バイト）
    pub arena_capacity: usize,
    /// `measure_text` にそのまま渡す
    pub font_path: Option<String>,
    pub viewport: Rect,
    /// `load_text` で読むリソース ID
    pub user_agent_stylesheet: Option<String>,
    /// 取得や構築に失敗したときに表示する文書
    pub fallback_html: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            arena_capacity: DEFAULT_ARENA_CAPACITY,
            font_path: None,
            viewport: Rect::new(0.0, 0.0, 800.0, 600.0),
            user_agent_stylesheet: Some("ua.css".to_string()),
            fallback_html: DEFAULT_FALLBACK_HTML.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_arena_capacity(mut self, bytes: usize) -> Self {
        self.arena_capacity = bytes;
        self
    }

    pub fn with_font_path(mut self, path: impl Into<String>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Rect::new(0.0, 0.0, width, height);
        self
    }

    pub fn with_user_agent_stylesheet(mut self, resource_id: Option<String>) -> Self {
        self.user_agent_stylesheet = resource_id;
        self
    }

    pub fn with_fallback_html(mut self, html: impl Into<String>) -> Self {
        self.fallback_html = html.into();
        self
    }
}
