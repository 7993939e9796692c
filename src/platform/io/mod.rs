use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Local asset text, such as the user-agent stylesheet.
pub trait ResourceLoader {
    /// 見つからなければ `None`
    fn load_text(&self, resource_id: &str) -> Option<String>;
}

/// 同期コンテキストから非同期 I/O を 1 つ走らせる（tokio::fs は実行時が必要）
pub fn block_on<F: Future>(future: F) -> Result<F::Output, anyhow::Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start I/O runtime")?;
    Ok(runtime.block_on(future))
}

pub async fn load_local_file(path: impl AsRef<Path>) -> Result<Vec<u8>, anyhow::Error> {
    use tokio::fs::File;
    use tokio::io::AsyncReadExt;

    let path = path.as_ref();
    let mut file = File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .await
        .context("Failed to read file")?;
    Ok(contents)
}

/// リソースの候補パス。順序は以下の通り：
/// - <root>/<rel_path>（ルートを指定した場合はそこだけ）
/// - ./resource/<rel_path>
/// - 実行ファイルのあるディレクトリ/resource/<rel_path>
/// - カレントディレクトリ/resource/<rel_path>
fn candidates(root: Option<&Path>, rel_path: &str) -> Vec<PathBuf> {
    if let Some(root) = root {
        return vec![root.join(rel_path)];
    }

    let mut candidates = vec![PathBuf::from("resource").join(rel_path)];

    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        candidates.push(dir.join("resource").join(rel_path));
    }

    if let Ok(cd) = std::env::current_dir() {
        candidates.push(cd.join("resource").join(rel_path));
    }

    candidates
}

/// リソースファイルを探して読み込む
pub async fn load_resource(root: Option<&Path>, rel_path: &str) -> Result<Vec<u8>, anyhow::Error> {
    for cand in candidates(root, rel_path) {
        if cand.is_file() {
            return load_local_file(&cand).await;
        }
    }

    Err(anyhow::anyhow!("Resource not found: {}", rel_path))
}

/// `resource/` ディレクトリから読むローダー
#[derive(Debug, Clone, Default)]
pub struct FsResourceLoader {
    root: Option<PathBuf>,
}

impl FsResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 探索せずに指定ディレクトリだけを見る
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl ResourceLoader for FsResourceLoader {
    fn load_text(&self, resource_id: &str) -> Option<String> {
        let rel_path = resource_id.trim_start_matches("resource:///");
        match block_on(load_resource(self.root.as_deref(), rel_path)).and_then(|r| r) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                log::warn!(target: "Resource::Load", "{e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("orinium_pipeline_{name}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_text_from_root() {
        let dir = scratch_dir("io");
        std::fs::write(dir.join("ua.css"), "p { margin: 0 }").unwrap();

        let loader = FsResourceLoader::with_root(&dir);
        assert_eq!(loader.load_text("ua.css").as_deref(), Some("p { margin: 0 }"));
        assert_eq!(
            loader.load_text("resource:///ua.css").as_deref(),
            Some("p { margin: 0 }")
        );
        assert_eq!(loader.load_text("missing.css"), None);
    }
}
