use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use orinium_pipeline::EngineConfig;
use orinium_pipeline::browser::WebView;
use orinium_pipeline::platform::io::{FsResourceLoader, ResourceLoader};

const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

struct Args {
    path: String,
    width: f32,
    height: f32,
    font_path: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut path = None;
    let mut width = 800.0;
    let mut height = 600.0;
    let mut font_path = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--width" => width = args.next().context("--width needs a value")?.parse()?,
            "--height" => height = args.next().context("--height needs a value")?.parse()?,
            "--font" => font_path = Some(args.next().context("--font needs a value")?),
            _ if path.is_none() => path = Some(arg),
            _ => bail!("unexpected argument: {arg}"),
        }
    }

    Ok(Args {
        path: path.context("usage: orinium_pipeline <file.html> [--width W] [--height H] [--font PATH]")?,
        width,
        height,
        font_path,
    })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;

    let mut config = EngineConfig::default().with_viewport(args.width, args.height);
    if let Some(font) = args.font_path {
        config = config.with_font_path(font);
    }
    if let Some(html) = FsResourceLoader::new().load_text("error.html") {
        config = config.with_fallback_html(html);
    }

    let path = Path::new(&args.path);
    let absolute = path
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let url = url::Url::from_file_path(&absolute)
        .map_err(|_| anyhow::anyhow!("Not a local path: {}", absolute.display()))?;

    let mut view = WebView::with_defaults(config);
    view.navigate(url.as_str())?;

    let started = Instant::now();
    while !view.poll()? {
        if started.elapsed() > LOAD_TIMEOUT {
            bail!("Timed out loading {url}");
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    let document = view.document().context("No document after load")?;
    if let Some(title) = &document.title {
        println!("Title: {title}");
    }
    if !document.unsupported_tags.is_empty() {
        println!("Unsupported tags: {:?}", document.unsupported_tags);
    }
    println!("{}", document.render_tree);

    view.paint()?;

    Ok(())
}
