use std::collections::BTreeSet;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::Context;
use url::Url;

use crate::engine::arena::Arena;
use crate::engine::bridge::graphics::{FallbackGraphics, Graphics};
use crate::engine::config::EngineConfig;
use crate::engine::css::{Stylesheet, parse_css};
use crate::engine::dom::{Dom, Node};
use crate::engine::html::{HtmlDocument, parse_html_in};
use crate::engine::layouter::LayoutContext;
use crate::engine::layouter::text::normalize_whitespace;
use crate::engine::renderer::{RenderTree, Renderer, TreeBuilder};
use crate::engine::styler::StyleEngine;
use crate::platform::io::{FsResourceLoader, ResourceLoader};
use crate::platform::network::{Fetcher, ThreadFetcher};

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    InvalidUrl(String),
    NoDocument,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(s) => write!(f, "Invalid URL: {s}"),
            Self::NoDocument => write!(f, "No document loaded"),
        }
    }
}

impl std::error::Error for NavigationError {}

/// 読み込み済みの 1 文書
#[derive(Debug)]
pub struct Document {
    pub dom: Dom,
    /// UA スタイルシート + `<style>` ブロック
    pub stylesheet: Stylesheet,
    pub render_tree: RenderTree,
    pub unsupported_tags: BTreeSet<String>,
    pub title: Option<String>,
}

/// ワーカースレッドから届く取得結果
struct FetchResult {
    navigation_id: u64,
    body: Vec<u8>,
}

/// WebView は 1 つのページの読み込み・レイアウト・描画を管理する。
///
/// - `navigate` で取得を開始し、結果はチャネルに入る
/// - `poll` が 1 回につき高々 1 件を取り出して文書を作る（古いナビゲーションの結果は捨てる）
/// - `resize` は作り直さずに再レイアウトだけを行う
pub struct WebView {
    config: EngineConfig,
    fetcher: Box<dyn Fetcher>,
    graphics: Box<dyn Graphics>,
    ua_stylesheet: Stylesheet,

    active_navigation: u64,
    sender: Sender<FetchResult>,
    receiver: Receiver<FetchResult>,

    pub url: Option<Url>,
    document: Option<Document>,
    pub needs_redraw: bool,
}

impl WebView {
    pub fn new(
        config: EngineConfig,
        fetcher: Box<dyn Fetcher>,
        loader: &dyn ResourceLoader,
        graphics: Box<dyn Graphics>,
    ) -> Self {
        let ua_stylesheet = match &config.user_agent_stylesheet {
            Some(id) => match loader.load_text(id) {
                Some(text) => parse_css(&text),
                None => {
                    log::warn!(target: "Navigation", "User-agent stylesheet {id:?} not found");
                    Stylesheet::default()
                }
            },
            None => Stylesheet::default(),
        };

        let (sender, receiver) = mpsc::channel();
        Self {
            config,
            fetcher,
            graphics,
            ua_stylesheet,
            active_navigation: 0,
            sender,
            receiver,
            url: None,
            document: None,
            needs_redraw: false,
        }
    }

    /// ファイルシステム上のリソースと `file://` 取得、計測用のフォールバック描画を使う
    pub fn with_defaults(config: EngineConfig) -> Self {
        Self::new(
            config,
            Box::new(ThreadFetcher::new()),
            &FsResourceLoader::new(),
            Box::new(FallbackGraphics::new()),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn active_navigation(&self) -> u64 {
        self.active_navigation
    }

    pub fn graphics(&self) -> &dyn Graphics {
        self.graphics.as_ref()
    }

    /// 取得を開始し、新しいナビゲーション ID を返す。それより前の取得結果は以後すべて捨てられる。
    pub fn navigate(&mut self, url: &str) -> Result<u64, NavigationError> {
        let url = Url::parse(url).map_err(|e| NavigationError::InvalidUrl(format!("{url}: {e}")))?;

        self.active_navigation += 1;
        let navigation_id = self.active_navigation;
        log::info!(target: "Navigation", "#{navigation_id} {url}");

        let sender = self.sender.clone();
        self.fetcher.get(
            &url,
            Box::new(move |body| {
                // 受け手が既にいなければ何もしない
                let _ = sender.send(FetchResult {
                    navigation_id,
                    body,
                });
            }),
        );
        self.url = Some(url);

        Ok(navigation_id)
    }

    /// 届いている取得結果を 1 件だけ処理する。文書を読み込んだら `true`。
    pub fn poll(&mut self) -> anyhow::Result<bool> {
        let Ok(result) = self.receiver.try_recv() else {
            return Ok(false);
        };

        if result.navigation_id != self.active_navigation {
            log::debug!(
                target: "Navigation",
                "Dropped stale result #{} (active #{})",
                result.navigation_id,
                self.active_navigation
            );
            return Ok(false);
        }

        if result.body.is_empty() {
            log::warn!(target: "Navigation", "Empty body for #{}; showing fallback page", result.navigation_id);
            let fallback = self.config.fallback_html.clone();
            self.load_html(fallback.as_bytes())?;
        } else {
            self.load_html(&result.body)?;
        }

        Ok(true)
    }

    /// HTML から文書を作り、現在の文書と置き換える。前の文書のアリーナは再利用する。
    pub fn load_html(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let arena = self.take_arena();

        let parsed = match parse_html_in(bytes, arena) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::error!(target: "Navigation", "Document build failed: {e}; showing fallback page");
                let arena = Arena::with_capacity(self.config.arena_capacity);
                parse_html_in(self.config.fallback_html.as_bytes(), arena)
                    .context("Failed to build the fallback document")?
            }
        };

        let document = self.build_document(parsed)?;
        log::info!(
            target: "Navigation",
            "Loaded {:?}: {} nodes, {} rules",
            document.title.as_deref().unwrap_or(""),
            document.dom.len(),
            document.stylesheet.len()
        );
        self.document = Some(document);
        self.needs_redraw = true;

        Ok(())
    }

    fn take_arena(&mut self) -> Arena<Node> {
        match self.document.take() {
            Some(old) => old.dom.into_arena(),
            None => Arena::with_capacity(self.config.arena_capacity),
        }
    }

    fn layout_context(&self) -> LayoutContext {
        LayoutContext::new(self.config.font_path.clone())
    }

    fn build_document(&self, parsed: HtmlDocument) -> anyhow::Result<Document> {
        let HtmlDocument {
            mut dom,
            style_blocks,
            unsupported_tags,
        } = parsed;

        let mut stylesheet = self.ua_stylesheet.clone();
        for block in &style_blocks {
            stylesheet.extend(parse_css(block));
        }

        StyleEngine::new(&stylesheet).apply(&mut dom);

        let mut render_tree = TreeBuilder::build(&dom).ok_or(NavigationError::NoDocument)?;
        render_tree.layout_with(self.graphics.as_ref(), self.config.viewport, &self.layout_context());

        let title = dom
            .collect_text_by_tag("title")
            .first()
            .map(|t| normalize_whitespace(t).trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Document {
            dom,
            stylesheet,
            render_tree,
            unsupported_tags,
            title,
        })
    }

    /// ビューポートを変えて再レイアウトする（ツリーは作り直さない）
    pub fn resize(&mut self, width: f32, height: f32) {
        self.config.viewport.width = width;
        self.config.viewport.height = height;

        let ctx = self.layout_context();
        if let Some(document) = self.document.as_mut() {
            document
                .render_tree
                .layout_with(self.graphics.as_ref(), self.config.viewport, &ctx);
            self.needs_redraw = true;
        }
    }

    pub fn paint(&mut self) -> Result<(), NavigationError> {
        let document = self.document.as_ref().ok_or(NavigationError::NoDocument)?;
        Renderer::new().paint(&document.render_tree, self.graphics.as_mut(), self.config.viewport);
        self.needs_redraw = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::network::FetchCallback;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    /// 呼び出し側が好きな順序で完了させられるフェッチャー
    #[derive(Clone, Default)]
    struct ManualFetcher {
        pending: Rc<RefCell<Vec<(String, FetchCallback)>>>,
    }

    impl ManualFetcher {
        fn complete(&self, url: &str, body: &str) {
            let mut pending = self.pending.borrow_mut();
            let index = pending.iter().position(|(u, _)| u == url).unwrap();
            let (_, callback) = pending.remove(index);
            callback(body.as_bytes().to_vec());
        }
    }

    impl Fetcher for ManualFetcher {
        fn get(&self, url: &Url, callback: FetchCallback) {
            self.pending.borrow_mut().push((url.to_string(), callback));
        }
    }

    struct MapLoader(HashMap<&'static str, &'static str>);

    impl ResourceLoader for MapLoader {
        fn load_text(&self, resource_id: &str) -> Option<String> {
            self.0.get(resource_id).map(|s| s.to_string())
        }
    }

    fn webview(fetcher: &ManualFetcher) -> WebView {
        let loader = MapLoader(HashMap::from([("ua.css", "h1 { color: red }")]));
        WebView::new(
            EngineConfig::default(),
            Box::new(fetcher.clone()),
            &loader,
            Box::new(FallbackGraphics::new()),
        )
    }

    #[test]
    fn stale_results_are_dropped() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);

        let first = view.navigate("file:///a.html").unwrap();
        let second = view.navigate("file:///b.html").unwrap();
        assert!(second > first);

        fetcher.complete("file:///a.html", "<title>A</title>");
        assert!(!view.poll().unwrap());
        assert!(view.document().is_none());

        fetcher.complete("file:///b.html", "<title>B</title>");
        assert!(view.poll().unwrap());
        assert_eq!(view.document().unwrap().title.as_deref(), Some("B"));
    }

    #[test]
    fn poll_drains_one_message_at_a_time() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);

        view.navigate("file:///a.html").unwrap();
        fetcher.complete("file:///a.html", "<p>x</p>");
        assert!(view.poll().unwrap());
        assert!(!view.poll().unwrap());
    }

    #[test]
    fn empty_body_shows_fallback() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);

        view.navigate("file:///missing.html").unwrap();
        fetcher.complete("file:///missing.html", "");
        assert!(view.poll().unwrap());
        assert_eq!(view.document().unwrap().title.as_deref(), Some("Error"));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);
        assert!(matches!(
            view.navigate("not a url"),
            Err(NavigationError::InvalidUrl(_))
        ));
        assert_eq!(view.active_navigation(), 0);
    }

    #[test]
    fn user_agent_sheet_comes_first() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);
        view.load_html(b"<style>h1 { color: blue }</style><h1>x</h1>")
            .unwrap();

        let document = view.document().unwrap();
        assert_eq!(document.stylesheet.len(), 2);
        let h1 = &document.render_tree.root.children[0];
        assert_eq!(h1.style.color, crate::engine::css::values::Color::BLUE);
    }

    #[test]
    fn arena_too_small_falls_back() {
        let fetcher = ManualFetcher::default();
        let loader = MapLoader(HashMap::new());
        let mut view = WebView::new(
            EngineConfig::default().with_arena_capacity(4096),
            Box::new(fetcher.clone()),
            &loader,
            Box::new(FallbackGraphics::new()),
        );
        let big = "<div>x</div>".repeat(10_000);
        view.load_html(big.as_bytes()).unwrap();
        assert_eq!(view.document().unwrap().title.as_deref(), Some("Error"));
    }

    #[test]
    fn resize_relayouts_without_rebuilding() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);
        view.load_html(b"<div>Hello Hello</div>").unwrap();
        let root = view.document().unwrap().render_tree.root.rect;
        assert_eq!(root.width, 800.0);
        assert_eq!(root.height, 16.0);

        view.resize(60.0, 100.0);
        let root = view.document().unwrap().render_tree.root.rect;
        assert_eq!(root.width, 60.0);
        assert_eq!(root.height, 32.0);
    }

    #[test]
    fn paint_requires_a_document() {
        let fetcher = ManualFetcher::default();
        let mut view = webview(&fetcher);
        assert_eq!(view.paint(), Err(NavigationError::NoDocument));
        view.load_html(b"<p>x</p>").unwrap();
        assert!(view.paint().is_ok());
        assert!(!view.needs_redraw);
    }
}
