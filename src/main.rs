mod assets;
mod data;
mod fonts;
mod layout;
mod naming;
mod render;
mod rules;
mod style;
mod xml;

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

use crate::assets::RenderAssets;
use crate::data::{GuestList, TableSet};
use crate::render::{BackgroundPlacement, RenderRequest, SeatMapRenderer};
use crate::style::Style;

/// Render a wedding seat-map image highlighting one guest's table
#[derive(Parser, Debug)]
#[command(name = "seatmap")]
#[command(about = "Render a seat map for a guest's table assignment", long_about = None)]
struct Args {
    /// Table layout JSON (a list of records with tableId fields, or a map of id to record)
    #[arg(value_name = "TABLES")]
    tables: PathBuf,

    /// Table id to highlight (e.g. T5)
    #[arg(short, long)]
    seat: String,

    /// Guest display name for the bottom caption
    #[arg(short, long)]
    guest: String,

    /// Output file path (extension determines format: .svg or .png)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Guest roster JSON; enables ambiguity-aware storage-key derivation
    #[arg(long)]
    guests: Option<PathBuf>,

    /// Guest category, used in storage-key derivation
    #[arg(long, default_value = "")]
    category: String,

    /// Style TOML overriding the built-in drawing constants
    #[arg(long, value_name = "STYLE")]
    style: Option<PathBuf>,

    /// Directory holding logo.png, background.png and font-*.ttf files
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// Background placement: "stretch" or an anchor such as "bottom-right"
    #[arg(long, default_value = "stretch")]
    background: String,

    /// Raster scale multiplier for PNG output (e.g. 2.0 for sharper output)
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Print the derived storage key for the rendered image
    #[arg(long)]
    print_key: bool,
}

fn main() -> Result<(), String> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to install tracing subscriber: {}", e))?;

    let args = Args::parse();

    let style = if let Some(ref style_path) = args.style {
        let content = std::fs::read_to_string(style_path)
            .map_err(|e| format!("Failed to read style file: {}", e))?;
        Style::from_toml(&content)?
    } else {
        Style::default()
    };

    let tables = TableSet::load(&args.tables)?;
    if tables.is_empty() {
        warn!("table set is empty; rendering the minimum-size canvas");
    }
    if let Some(record) = tables.get(&args.seat) {
        tracing::info!(
            seat = %args.seat.to_uppercase(),
            capacity = record.capacity,
            "target table found"
        );
    }

    let assets = match &args.assets_dir {
        Some(dir) => RenderAssets::load_dir(dir),
        None => RenderAssets::none(),
    };

    let background = BackgroundPlacement::from_name(&args.background).unwrap_or_else(|| {
        warn!(
            "unknown background placement '{}', using bottom-right",
            args.background
        );
        BackgroundPlacement::BottomRight
    });

    let mut renderer = SeatMapRenderer::new(style, assets);
    let request = RenderRequest {
        tables: &tables,
        target_table_id: &args.seat,
        guest_name: &args.guest,
        background,
    };

    let output_ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .ok_or("Output file has no extension")?
        .to_ascii_lowercase();

    match output_ext.as_str() {
        "svg" => {
            let svg = renderer.render_svg(&request);
            std::fs::write(&args.output, svg).map_err(|e| format!("Failed to write SVG: {}", e))?;
            eprintln!("SVG saved to: {}", args.output.display());
        }
        "png" => {
            let png_data = renderer
                .render_png(&request, args.png_scale)
                .map_err(|e| e.to_string())?;
            std::fs::write(&args.output, png_data)
                .map_err(|e| format!("Failed to write PNG: {}", e))?;
            eprintln!("PNG saved to: {}", args.output.display());
        }
        _ => {
            return Err(format!(
                "Unsupported output format: .{} (use .svg or .png)",
                output_ext
            ));
        }
    }

    if args.print_key {
        let (name_counts, category) = match &args.guests {
            Some(path) => {
                let roster = GuestList::load(path)?;
                let category = if args.category.is_empty() {
                    roster.category_of(&args.guest).unwrap_or("").to_string()
                } else {
                    args.category.clone()
                };
                (roster.name_counts(), category)
            }
            None => (HashMap::new(), args.category.clone()),
        };
        println!(
            "{}",
            naming::image_object_key(&args.guest, &category, &name_counts)
        );
    }

    Ok(())
}
