//! Bordered Atlas CLI
//!
//! Build atlas pages and a UV layout from a JSON manifest.

use bordered_atlas::{AtlasManifest, LayoutReport};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bordered-atlas")]
#[command(author, version, about = "Pack deduplicated, bordered textures into atlas pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build atlas pages and a layout file
    Build {
        /// Manifest describing source pages and texture references
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output directory for page_N.png and layout.json
        #[arg(short, long)]
        output: PathBuf,

        /// Override the border width from the manifest
        #[arg(long)]
        border: Option<u32>,

        /// Round page heights up to powers of two
        #[arg(long)]
        power_of_two: bool,
    },

    /// Show layout statistics for a manifest
    Info {
        /// Manifest describing source pages and texture references
        #[arg(short, long)]
        manifest: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            border,
            power_of_two,
        } => {
            build_atlas(&manifest, &output, border, power_of_two)?;
        }
        Commands::Info { manifest } => {
            show_info(&manifest)?;
        }
    }

    Ok(())
}

fn build_atlas(
    manifest_path: &Path,
    output: &Path,
    border: Option<u32>,
    power_of_two: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Loading manifest from {:?}...", manifest_path);
    let mut manifest = AtlasManifest::from_path(manifest_path)?;
    if let Some(border) = border {
        manifest.config = manifest.config.with_border_width(border);
    }
    if power_of_two {
        manifest.config = manifest.config.with_non_power_of_two(false);
    }

    let pages = manifest.load_source_pages()?;
    log::info!("  Loaded {} source pages", pages.len());

    let mut atlas = manifest.build(&pages)?;
    let baked = atlas.bake_pages()?;

    fs::create_dir_all(output)?;
    for (index, page) in baked.iter().enumerate() {
        let path = output.join(format!("page_{}.png", index));
        page.save_png(&path)?;
        log::info!("  Wrote {:?} ({}x{})", path, page.width, page.height);
    }

    let report = LayoutReport::from_atlas(&mut atlas)?;
    let layout_path = output.join("layout.json");
    report.save(&layout_path)?;
    log::info!("  Wrote {:?}", layout_path);

    Ok(())
}

fn show_info(manifest_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = AtlasManifest::from_path(manifest_path)?;
    let pages = manifest.load_source_pages()?;
    let mut atlas = manifest.build(&pages)?;

    println!("Source pages:       {}", atlas.num_source_pages());
    println!("File textures:      {}", atlas.num_file_textures());
    println!("Sprite textures:    {}", atlas.num_sprite_textures());
    println!("Canonical textures: {}", atlas.num_canonical_textures());

    let page_count = atlas.num_pages()?;
    println!("Atlas pages:        {} (width {})", page_count, atlas.page_width());
    for index in 0..page_count {
        let info = atlas.page_info(index)?;
        println!("  page {}: {}x{}", index, info.width, info.height);
    }

    Ok(())
}
