//! `resource/`（UA スタイルシートとフォールバックページ）を target/{profile}/resource に同期する

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

fn main() {
    let out_dir = profile_dir();
    clear_build_log(&out_dir);

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let src_root = Path::new(&manifest_dir).join("resource");
    println!("cargo:rerun-if-changed={}", src_root.display());

    if !src_root.exists() {
        build_log(
            &out_dir,
            format_args!("[BUILD] resource directory not found at {}", src_root.display()),
        );
        return;
    }

    if let Err(e) = visit_files(&src_root, &|p| {
        println!("cargo:rerun-if-changed={}", p.display())
    }) {
        build_log(&out_dir, format_args!("[BUILD] failed reading resource tree: {e}"));
    }

    let dest_root = out_dir.join("resource");
    match copy_dir_if_newer(&src_root, &src_root, &dest_root, &out_dir) {
        Ok(copied) => build_log(
            &out_dir,
            format_args!("[BUILD] resource sync completed ({copied} copied) -> {}", dest_root.display()),
        ),
        Err(e) => build_log(&out_dir, format_args!("[BUILD] failed copying resources: {e}")),
    }
}

/// target/{profile}
fn profile_dir() -> PathBuf {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "debug".into());
    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| Path::new(&manifest_dir).join("target"));
    target_dir.join(profile)
}

fn visit_files<F: Fn(&Path)>(dir: &Path, cb: &F) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            visit_files(&path, cb)?;
        } else if path.is_file() {
            cb(&path);
        }
    }
    Ok(())
}

/// コピー先が存在しないか、ソースの方が新しければコピーする
fn copy_dir_if_newer(root: &Path, current: &Path, dst_root: &Path, log_dir: &Path) -> io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(current)? {
        let src_path = entry?.path();
        if src_path.is_dir() {
            copied += copy_dir_if_newer(root, &src_path, dst_root, log_dir)?;
            continue;
        }
        let Ok(rel) = src_path.strip_prefix(root) else {
            continue;
        };
        let dst_path = dst_root.join(rel);

        let need_copy = match (src_path.metadata(), dst_path.metadata()) {
            (Ok(src_meta), Ok(dst_meta)) => match (src_meta.modified(), dst_meta.modified()) {
                (Ok(sm), Ok(dm)) => sm > dm,
                _ => true,
            },
            _ => true,
        };

        if need_copy {
            if let Some(p) = dst_path.parent() {
                fs::create_dir_all(p)?;
            }
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
            build_log(
                log_dir,
                format_args!("[BUILD] copied resource: {} -> {}", src_path.display(), dst_path.display()),
            );
        }
    }
    Ok(copied)
}

/// target/{profile}/build.log にビルドログを書き込む
fn build_log(dir: &Path, args: std::fmt::Arguments) {
    use std::io::Write;

    if let Err(e) = fs::create_dir_all(dir) {
        println!("cargo:warning=failed creating log dir: {e}");
        return;
    }

    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("build.log"))
    {
        Ok(mut f) => {
            if let Err(e) = writeln!(f, "[{secs}] {args}") {
                println!("cargo:warning=failed writing build log: {e}");
            }
        }
        Err(e) => println!("cargo:warning=failed opening build log: {e}"),
    }
}

fn clear_build_log(dir: &Path) {
    let log_path = dir.join("build.log");
    if log_path.exists()
        && let Err(e) = fs::remove_file(&log_path)
    {
        println!("cargo:warning=failed removing old build log: {e}");
    }
}
