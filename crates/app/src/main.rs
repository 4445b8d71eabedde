use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use folio_motion_core::{
    content, AppConfig, CarouselAdapter, CarouselConfig, CarouselItem, CarouselRenderer,
    FileContentSource, Page, PageEvent,
};
use tracing_subscriber::EnvFilter;

/// Pixels scrolled per simulated scroll event.
const SCROLL_STEP: f32 = 120.0;
/// Milliseconds between simulated scroll events.
const FRAME_MS: f64 = 16.0;

fn main() -> folio_motion_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            public,
            config,
            scroll,
            at,
            width,
            height,
            pointer,
        } => run_render(RenderArgs {
            public,
            config,
            scroll,
            at,
            width,
            height,
            pointer,
        }),
        Commands::CheckContent { path } => run_check_content(&path),
        Commands::Carousel { public, config } => run_carousel(&public, config.as_deref()),
    }
}

struct RenderArgs {
    public: PathBuf,
    config: Option<PathBuf>,
    scroll: f32,
    at: f64,
    width: f32,
    height: f32,
    pointer: Option<Vec<f32>>,
}

fn run_render(args: RenderArgs) -> folio_motion_core::Result<()> {
    let config = load_config(args.config.as_deref())?;
    tracing::info!(public = ?args.public, scroll = args.scroll, at = args.at, "rendering page frame");

    let source = FileContentSource::new(&args.public);
    let mut page = Page::mount(config, args.width, args.height, 0.0);
    page.load_from(&source, 0.0);

    // Scroll down in steps, like a wheel, so every section in between gets
    // an intersection pass.
    let mut now = 0.0;
    let mut offset = 0.0_f32;
    while offset < args.scroll {
        offset = (offset + SCROLL_STEP).min(args.scroll);
        now += FRAME_MS;
        page.handle(PageEvent::Scroll { offset }, now);
    }

    if let Some([x, y]) = args.pointer.as_deref().and_then(|p| <[f32; 2]>::try_from(p).ok()) {
        page.handle(PageEvent::PointerMove { x, y }, now);
    }

    let frame = page.frame(now.max(args.at));
    println!("{}", serde_json::to_string_pretty(&frame)?);
    page.unmount();
    Ok(())
}

fn run_check_content(path: &Path) -> folio_motion_core::Result<()> {
    tracing::info!(?path, "checking content document");
    let text = std::fs::read_to_string(path)?;
    let projects = content::parse_document(&text)?;
    for (index, project) in projects.iter().enumerate() {
        println!(
            "{:02} {} [{}] {}",
            index + 1,
            project.name,
            project.tools.join(", "),
            project.external_url.as_deref().unwrap_or("-")
        );
    }
    println!("{} project(s) kept", projects.len());
    Ok(())
}

fn run_carousel(public: &Path, config: Option<&Path>) -> folio_motion_core::Result<()> {
    let config = load_config(config)?;
    let source = FileContentSource::new(public);
    // Same silent degradation as the page: a broken document yields no slides.
    let projects = content::load(&source, &config.content.path).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "carousel content unavailable");
        Vec::new()
    });

    let adapter = CarouselAdapter::from_projects(&projects, config.carousel);
    let mut renderer = JsonCarouselRenderer::default();
    adapter.render(&mut renderer);
    println!("{}", renderer.output);
    Ok(())
}

/// Prints slides as JSON in place of a real slide widget.
#[derive(Default)]
struct JsonCarouselRenderer {
    output: String,
}

impl CarouselRenderer for JsonCarouselRenderer {
    fn render(&mut self, items: &[CarouselItem], config: &CarouselConfig) {
        let document = serde_json::json!({ "config": config, "items": items });
        self.output = serde_json::to_string_pretty(&document).unwrap_or_default();
    }
}

fn load_config(path: Option<&Path>) -> folio_motion_core::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => Ok(AppConfig::default()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless preview of the portfolio motion layer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load content, simulate scrolling and print the resulting page frame.
    Render {
        /// Directory served as the site root; the content path resolves under it.
        #[arg(long, default_value = "public")]
        public: PathBuf,
        /// Optional JSON configuration overriding the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Final scroll offset in pixels.
        #[arg(long, default_value_t = 0.0)]
        scroll: f32,
        /// Timestamp of the printed frame in milliseconds since mount.
        #[arg(long, default_value_t = 2000.0)]
        at: f64,
        #[arg(long, default_value_t = 1280.0)]
        width: f32,
        #[arg(long, default_value_t = 800.0)]
        height: f32,
        /// Last pointer position as `x,y`.
        #[arg(long, value_delimiter = ',', num_args = 2)]
        pointer: Option<Vec<f32>>,
    },
    /// Validate a content document and list the projects that survive.
    CheckContent {
        /// Path to the projects JSON document.
        path: PathBuf,
    },
    /// Print the carousel slides built from the content document.
    Carousel {
        #[arg(long, default_value = "public")]
        public: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_reads_content_from_public_dir() {
        let cli = Cli::try_parse_from([
            "folio-motion-app",
            "render",
            "--public",
            "site",
            "--scroll",
            "900",
            "--pointer",
            "10,20",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                public,
                scroll,
                at,
                pointer,
                ..
            } => {
                assert_eq!(public, PathBuf::from("site"));
                assert_eq!(scroll, 900.0);
                assert_eq!(at, 2000.0);
                assert_eq!(pointer, Some(vec![10.0, 20.0]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn render_defaults_to_public_folder() {
        let cli = Cli::try_parse_from(["folio-motion-app", "render"]).unwrap();
        assert!(matches!(cli.command, Commands::Render { public, .. } if public == Path::new("public")));
    }
}
