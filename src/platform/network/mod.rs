//! Fetch collaborator
//!
//! 本体は一度だけコールバックで渡す。空の本体は失敗を意味する。

use std::thread;

use url::Url;

use crate::platform::io::{block_on, load_local_file};

/// 取得完了時に一度だけ呼ばれる
pub type FetchCallback = Box<dyn FnOnce(Vec<u8>) + Send + 'static>;

pub trait Fetcher {
    /// 非同期に取得し、完了したら `callback` を（高々）一度呼ぶ
    fn get(&self, url: &Url, callback: FetchCallback);
}

/// `file://` をワーカースレッドで読むフェッチャー。他のスキームは空の本体を返す。
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadFetcher;

impl ThreadFetcher {
    pub fn new() -> Self {
        Self
    }
}

fn fetch_blocking(url: &Url) -> Vec<u8> {
    if url.scheme() != "file" {
        log::warn!(target: "Network::Fetch", "Unsupported scheme: {}", url.scheme());
        return Vec::new();
    }

    let Ok(path) = url.to_file_path() else {
        log::warn!(target: "Network::Fetch", "Not a local path: {url}");
        return Vec::new();
    };

    match block_on(load_local_file(&path)).and_then(|r| r) {
        Ok(body) => body,
        Err(e) => {
            log::warn!(target: "Network::Fetch", "{e:#}");
            Vec::new()
        }
    }
}

impl Fetcher for ThreadFetcher {
    fn get(&self, url: &Url, callback: FetchCallback) {
        let url = url.clone();
        thread::spawn(move || {
            log::debug!(target: "Network::Fetch", "Fetching {url}");
            let body = fetch_blocking(&url);
            callback(body);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn fetch(url: &Url) -> Vec<u8> {
        let (tx, rx) = mpsc::channel();
        ThreadFetcher::new().get(
            url,
            Box::new(move |body| {
                let _ = tx.send(body);
            }),
        );
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn reads_local_files() {
        let path = std::env::temp_dir().join(format!("orinium_pipeline_fetch_{}.html", std::process::id()));
        std::fs::write(&path, "<p>hi</p>").unwrap();
        let url = Url::from_file_path(&path).unwrap();
        assert_eq!(fetch(&url), b"<p>hi</p>");
    }

    #[test]
    fn other_schemes_yield_empty_body() {
        let url = Url::parse("https://example.com/").unwrap();
        assert!(fetch(&url).is_empty());
    }
}
