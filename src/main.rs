use clap::{Parser, Subcommand};
use snippet_image::{
    Defaults, DiskStorage, OverlayOverride, RenderOverrides, RustBackend, SaveOutcome,
    SnippetImages, SnippetSource, TrueTypeFace,
};
use std::path::PathBuf;
use std::sync::Arc;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "snippet-image")]
#[command(about = "Generate social-share snippet images from record text and photos")]
#[command(long_about = "\
Generate social-share snippet images from record text and photos

Composites a fixed-size preview image from a text string, an optional
background photo, and an optional overlay layer, then stores it under a
slot derived from the record identity. Re-running with unchanged inputs
is a no-op; the stored image is only rewritten when text or background
change.

Layer order (bottom to top):

  1. Solid fill            (canvas.fill, default #333333)
  2. Background photo      (cover-fit: scaled and center-cropped)
  3. Overlay               (alpha-blended branding/gradient layer)
  4. Text                  (word-wrapped, centered in the safe region)

Run 'snippet-image gen-config' to generate a documented snippet-image.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Path to a snippet-image.toml with global defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one snippet image into the output directory
    Render(RenderArgs),
    /// Print a stock snippet-image.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Text composited onto the snippet
    #[arg(long)]
    text: String,

    /// Background photo (JPEG or PNG)
    #[arg(long)]
    background: Option<PathBuf>,

    /// TrueType/OpenType font file for the text layer
    #[arg(long)]
    font: PathBuf,

    /// Record identity the storage slot is derived from
    #[arg(long, default_value = "cli")]
    id: String,

    /// Canvas size as WIDTHxHEIGHT, e.g. 1200x630
    #[arg(long)]
    size: Option<String>,

    /// Overlay raster replacing the configured default
    #[arg(long, conflicts_with = "no_overlay")]
    overlay: Option<PathBuf>,

    /// Suppress the overlay layer entirely
    #[arg(long)]
    no_overlay: bool,

    /// Output directory for stored images and the snapshot ledger
    #[arg(long, default_value = "snippets")]
    out: PathBuf,

    /// Treat the record as a draft: no image is produced
    #[arg(long)]
    draft: bool,
}

/// One-off record fed to the lifecycle manager. Mirrors the usual model
/// shape: text and background answer only the default snippet type.
struct OneShotRecord {
    id: String,
    text: String,
    background: Option<PathBuf>,
    publishable: bool,
    reference: Option<String>,
}

impl SnippetSource for OneShotRecord {
    fn identity(&self) -> &str {
        &self.id
    }

    fn text_for(&self, snippet_type: &str) -> String {
        if snippet_type == "default" {
            self.text.clone()
        } else {
            String::new()
        }
    }

    fn background_for(&self, snippet_type: &str) -> Option<PathBuf> {
        if snippet_type == "default" {
            self.background.clone()
        } else {
            None
        }
    }

    fn is_publishable(&self) -> bool {
        self.publishable
    }

    fn image_reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn set_image_reference(&mut self, reference: String) {
        self.reference = Some(reference);
    }
}

/// Parse "1200x630" into (1200, 630).
fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse().map_err(|_| format!("bad width '{w}'"))?;
    let height = h.trim().parse().map_err(|_| format!("bad height '{h}'"))?;
    Ok((width, height))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let defaults = match &cli.config {
        Some(path) => Defaults::load(path)?,
        None => Defaults::default(),
    };

    match cli.command {
        Command::Render(args) => {
            let overrides = RenderOverrides {
                size: args.size.as_deref().map(parse_size).transpose()?,
                overlay: if args.no_overlay {
                    OverlayOverride::Disabled
                } else if let Some(path) = &args.overlay {
                    OverlayOverride::Path(path.clone())
                } else {
                    OverlayOverride::Inherit
                },
                max_lines: None,
            };

            let typeface = Arc::new(TrueTypeFace::load(&args.font)?);
            let manager = SnippetImages::new(
                defaults,
                RustBackend::new(),
                DiskStorage::new(&args.out),
                typeface,
            )
            .with_ledger_dir(&args.out);

            let mut record = OneShotRecord {
                id: args.id,
                text: args.text,
                background: args.background,
                publishable: !args.draft,
                reference: None,
            };

            // Rehydrate the reference from a previous run so an unchanged
            // re-render is the same no-op it would be for a live record
            let slot = format!(
                "{}.{}",
                snippet_image::slot_key(&record.id, "default"),
                snippet_image::SnippetFormat::Jpeg.extension()
            );
            if args.out.join(&slot).exists() {
                record.reference = Some(slot);
            }

            match manager.on_save_with(&mut record, "default", &overrides)? {
                SaveOutcome::Regenerated(reference) => {
                    println!("{}", args.out.join(reference).display());
                }
                SaveOutcome::Unchanged => match record.image_reference() {
                    Some(reference) => {
                        println!("Up to date: {}", args.out.join(reference).display());
                    }
                    None => println!("No image produced (draft record)"),
                },
            }
        }
        Command::GenConfig => {
            print!("{}", snippet_image::config::stock_config_toml());
        }
    }

    Ok(())
}
