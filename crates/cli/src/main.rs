use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use image::imageops::FilterType;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use picview_core::browse::{self, Direction};
use picview_core::config::GridDefaults;
use picview_core::geometry::{fit_scale, Size};
use picview_core::grid::GridLayout;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Image viewer/editor toolkit: crop, resize, rotate, border and photo-grid composition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display image information
    Info(InfoArgs),
    /// Crop a region out of an image
    Crop(CropArgs),
    /// Resize an image
    Resize(ResizeArgs),
    /// Rotate an image by 90, 180 or 270 degrees
    Rotate(RotateArgs),
    /// Draw a black border inside the image edge
    Border(BorderArgs),
    /// Print the neighboring image file in the same directory
    Neighbor(NeighborArgs),
    /// Compose photos onto a printable grid sheet
    Grid(GridArgs),
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Input image
    input: PathBuf,

    /// Viewport width for the reported fit scale
    #[arg(long, default_value_t = 1920)]
    max_width: u32,

    /// Viewport height for the reported fit scale
    #[arg(long, default_value_t = 1080)]
    max_height: u32,
}

#[derive(Args, Debug)]
struct CropArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Left edge of the crop, in original-image pixels
    #[arg(short, long)]
    x: u32,

    /// Top edge of the crop, in original-image pixels
    #[arg(short, long)]
    y: u32,

    /// Crop width
    #[arg(short, long)]
    width: u32,

    /// Crop height
    #[arg(short = 'H', long)]
    height: u32,
}

#[derive(Args, Debug)]
struct ResizeArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Target width; height follows the aspect ratio unless also given
    #[arg(short, long)]
    width: Option<u32>,

    /// Target height; width follows the aspect ratio unless also given
    #[arg(short = 'H', long)]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct RotateArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Clockwise rotation: 90, 180 or 270
    #[arg(short, long)]
    degrees: u32,
}

#[derive(Args, Debug)]
struct BorderArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Border thickness in pixels
    #[arg(short, long, default_value_t = 2)]
    width: u32,
}

#[derive(Args, Debug)]
struct NeighborArgs {
    /// Currently open image
    input: PathBuf,

    /// Step backwards instead of forwards
    #[arg(short, long)]
    previous: bool,
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Photos to place, cycled across the cells in order
    #[arg(required = true)]
    photos: Vec<PathBuf>,

    /// Output sheet image
    #[arg(short, long)]
    output: PathBuf,

    /// Paper size override as WxH pixels at the configured DPI
    #[arg(long, value_parser = parse_dims)]
    paper: Option<(u32, u32)>,

    /// Cell size override as WxH pixels at the configured DPI
    #[arg(long, value_parser = parse_dims)]
    cell: Option<(u32, u32)>,

    /// Print resolution override
    #[arg(long)]
    dpi: Option<u32>,

    /// Draw a rule around each placed photo
    #[arg(short, long)]
    border: bool,

    /// Persist the effective paper/cell/DPI as the new defaults
    #[arg(long)]
    save_defaults: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => run_info(args),
        Commands::Crop(args) => run_crop(args),
        Commands::Resize(args) => run_resize(args),
        Commands::Rotate(args) => run_rotate(args),
        Commands::Border(args) => run_border(args),
        Commands::Neighbor(args) => run_neighbor(args),
        Commands::Grid(args) => run_grid(args),
    }
}

fn run_info(args: InfoArgs) -> Result<()> {
    let (width, height) = image::image_dimensions(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let size = Size::new(width as i32, height as i32);
    let scale = fit_scale(size, Size::new(args.max_width as i32, args.max_height as i32));

    println!("{}", args.input.display());
    println!("Resolution : {}x{}", width, height);
    println!("Aspect     : {:.3}", size.aspect());
    println!(
        "Fit scale  : {:.2}x for a {}x{} viewport",
        scale, args.max_width, args.max_height
    );
    Ok(())
}

fn run_crop(args: CropArgs) -> Result<()> {
    let img = open_image(&args.input)?;

    // Clamp to the image bounds so an off-by-a-few request still crops.
    let x = args.x.min(img.width().saturating_sub(1));
    let y = args.y.min(img.height().saturating_sub(1));
    let width = args.width.min(img.width() - x);
    let height = args.height.min(img.height() - y);
    if width == 0 || height == 0 {
        bail!("Crop region is empty");
    }

    let cropped = img.crop_imm(x, y, width, height);
    save_image(&cropped, &args.output)?;
    println!(
        "Cropped {}x{} at ({}, {}) to {}",
        width,
        height,
        x,
        y,
        args.output.display()
    );
    Ok(())
}

fn run_resize(args: ResizeArgs) -> Result<()> {
    let img = open_image(&args.input)?;

    let resized = match (args.width, args.height) {
        (Some(w), Some(h)) => img.resize_exact(w, h, FilterType::Lanczos3),
        (Some(w), None) => {
            let h = (f64::from(w) * f64::from(img.height()) / f64::from(img.width())).round();
            img.resize_exact(w, h as u32, FilterType::Lanczos3)
        }
        (None, Some(h)) => {
            let w = (f64::from(h) * f64::from(img.width()) / f64::from(img.height())).round();
            img.resize_exact(w as u32, h, FilterType::Lanczos3)
        }
        (None, None) => bail!("Give --width, --height or both"),
    };

    save_image(&resized, &args.output)?;
    println!(
        "Resized to {}x{} at {}",
        resized.width(),
        resized.height(),
        args.output.display()
    );
    Ok(())
}

fn run_rotate(args: RotateArgs) -> Result<()> {
    let img = open_image(&args.input)?;
    let rotated = match args.degrees {
        90 => img.rotate90(),
        180 => img.rotate180(),
        270 => img.rotate270(),
        other => bail!("Rotation must be 90, 180 or 270, got {other}"),
    };
    save_image(&rotated, &args.output)?;
    println!("Rotated {} degrees to {}", args.degrees, args.output.display());
    Ok(())
}

fn run_border(args: BorderArgs) -> Result<()> {
    if args.width == 0 {
        bail!("Border width must be at least 1");
    }
    let img = open_image(&args.input)?;
    let mut canvas = img.to_rgba8();
    let (w, h) = (canvas.width(), canvas.height());
    draw_frame(&mut canvas, 0, 0, w, h, args.width, Rgba([0, 0, 0, 255]));

    save_image(&DynamicImage::ImageRgba8(canvas), &args.output)?;
    println!(
        "Added {}px border to {}",
        args.width,
        args.output.display()
    );
    Ok(())
}

fn run_neighbor(args: NeighborArgs) -> Result<()> {
    let direction = if args.previous {
        Direction::Previous
    } else {
        Direction::Next
    };
    let path = browse::neighbor(&args.input, direction)
        .with_context(|| format!("No neighbor for {}", args.input.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn run_grid(args: GridArgs) -> Result<()> {
    let mut defaults = GridDefaults::load();
    if let Some((w, h)) = args.paper {
        defaults.paper_width = w;
        defaults.paper_height = h;
    }
    if let Some((w, h)) = args.cell {
        defaults.cell_width = w;
        defaults.cell_height = h;
    }
    if let Some(dpi) = args.dpi {
        defaults.dpi = dpi;
    }

    let mut layout: GridLayout<PathBuf> =
        GridLayout::new(defaults.grid_config(), defaults.display_scale())
            .context("Paper/cell configuration rejected")?;
    layout.set_border(args.border);
    log::info!(
        "grid: {}x{} cells on {}x{} paper",
        layout.cols(),
        layout.rows(),
        layout.config().paper_width,
        layout.config().paper_height
    );

    // Cycle the given photos across every cell.
    for index in 0..layout.cell_count() {
        let photo = args.photos[index % args.photos.len()].clone();
        layout.assign_photo(index, photo)?;
    }

    let config = *layout.config();
    let mut sheet = RgbaImage::from_pixel(
        config.paper_width,
        config.paper_height,
        Rgba([255, 255, 255, 255]),
    );

    // Each unique photo is decoded and scaled to the cell once.
    let mut scaled: HashMap<PathBuf, DynamicImage> = HashMap::new();
    for placement in layout.finalize_composite() {
        if !scaled.contains_key(&placement.photo) {
            let img = open_image(&placement.photo)?;
            scaled.insert(
                placement.photo.clone(),
                img.resize(config.cell_width, config.cell_height, FilterType::Lanczos3),
            );
        }
        let photo = &scaled[&placement.photo];
        imageops::overlay(
            &mut sheet,
            photo,
            i64::from(placement.rect.x),
            i64::from(placement.rect.y),
        );
        if placement.draw_border {
            draw_frame(
                &mut sheet,
                placement.rect.x,
                placement.rect.y,
                placement.rect.width as u32,
                placement.rect.height as u32,
                1,
                Rgba([0, 0, 0, 255]),
            );
        }
    }

    sheet
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!(
        "Saved {}x{} grid ({} cells, {} photos) to {}",
        config.paper_width,
        config.paper_height,
        layout.cell_count(),
        args.photos.len().min(layout.cell_count()),
        args.output.display()
    );

    if args.save_defaults {
        if let Err(e) = defaults.save() {
            eprintln!("Warning: Failed to save grid defaults: {}", e);
        }
    }
    Ok(())
}

fn open_image(path: &PathBuf) -> Result<DynamicImage> {
    image::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn save_image(img: &DynamicImage, path: &PathBuf) -> Result<()> {
    img.save(path)
        .with_context(|| format!("Failed to save {}", path.display()))
}

/// Draws a rectangular frame of the given thickness, clipped to the image.
fn draw_frame(img: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, thickness: u32, color: Rgba<u8>) {
    let put = |img: &mut RgbaImage, px: i64, py: i64| {
        if px >= 0 && py >= 0 && (px as u32) < img.width() && (py as u32) < img.height() {
            img.put_pixel(px as u32, py as u32, color);
        }
    };
    let (x, y) = (i64::from(x), i64::from(y));
    let (w, h) = (i64::from(w), i64::from(h));
    for t in 0..i64::from(thickness) {
        for dx in 0..w {
            put(img, x + dx, y + t);
            put(img, x + dx, y + h - 1 - t);
        }
        for dy in 0..h {
            put(img, x + t, y + dy);
            put(img, x + w - 1 - t, y + dy);
        }
    }
}

/// Parses a `WxH` dimension pair.
fn parse_dims(s: &str) -> std::result::Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w = w
        .trim()
        .parse()
        .map_err(|_| format!("bad width in '{s}'"))?;
    let h = h
        .trim()
        .parse()
        .map_err(|_| format!("bad height in '{s}'"))?;
    Ok((w, h))
}
