use clap::{Parser, Subcommand};
use env_logger::Env;
use overlay_composer::channel::{Composer, Dispatcher, serve};
use overlay_composer::config::{self, ComposerConfig};
use overlay_composer::gallery::DirectoryGallery;
use overlay_composer::imaging::{self, Quality, RustBackend};
use overlay_composer::output;
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Called once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "overlay-composer")]
#[command(about = "Stamp a branding overlay onto photos and file them in a gallery")]
#[command(long_about = "\
Stamp a branding overlay onto photos and file them in a gallery

The photo's EXIF orientation is applied first, then the overlay is stretched
to the photo's full width (keeping its aspect ratio) and drawn along the
bottom edge. The result replaces the photo as a JPEG.

Commands mirror the two channel methods:

  add-overlay  addOverlayToImage(imagePath, overlayPath)
  save         saveImage(imagePath)
  serve        both, as JSON lines on stdin/stdout:

    → {\"id\":1,\"method\":\"saveImage\",\"arguments\":{\"imagePath\":\"a.jpg\"}}
    ← {\"id\":1,\"status\":\"success\",\"result\":\"a.jpg\"}

Set RUST_LOG=debug to see resolved rotations and overlay placement.

Run 'overlay-composer gen-config' to generate a documented composer.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./composer.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Composite an overlay onto a photo, replacing the photo in place
    AddOverlay {
        /// Photo to stamp (overwritten with the JPEG result)
        image: PathBuf,
        /// Overlay image drawn across the bottom edge
        overlay: PathBuf,
    },
    /// Insert an upright copy of a photo into the gallery
    Save {
        /// Photo to save
        image: PathBuf,
    },
    /// Answer JSON-line requests on stdin until EOF
    Serve,
    /// Print a photo's EXIF orientation and the rotation it implies
    Orientation {
        /// Photo to inspect
        image: PathBuf,
    },
    /// Print a stock composer.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::AddOverlay { image, overlay } => {
            let config = config::load_config(cli.config.as_deref())?;
            let outcome = imaging::add_overlay_to_image(
                &RustBackend::new(),
                &image,
                &overlay,
                &config.compose_config(),
            )?;
            output::print_compose_output(&outcome);
        }
        Command::Save { image } => {
            let config = config::load_config(cli.config.as_deref())?;
            let gallery = gallery_for(&config);
            let entry =
                imaging::save_image(&RustBackend::new(), &gallery, &image, &config.save_config())?;
            output::print_save_output(&image, &gallery.path_of(&entry), &entry);
        }
        Command::Serve => {
            let config = config::load_config(cli.config.as_deref())?;
            let gallery = gallery_for(&config);
            let dispatcher = Dispatcher::spawn(Composer::new(RustBackend::new(), gallery, config))?;
            let stats = serve(&dispatcher, std::io::stdin().lock(), std::io::stdout().lock())?;
            dispatcher.shutdown();
            output::print_serve_summary(&stats);
        }
        Command::Orientation { image } => {
            let orientation = read_orientation(&image)?;
            output::print_orientation_output(&image, orientation);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn gallery_for(config: &ComposerConfig) -> DirectoryGallery {
    DirectoryGallery::new(
        config.gallery.directory.clone(),
        Quality::new(config.gallery.quality),
    )
}

fn read_orientation(path: &Path) -> Result<imaging::Orientation, imaging::BackendError> {
    let (orientation, _) = imaging::operations::resolve_rotation(&RustBackend::new(), path)?;
    Ok(orientation)
}
