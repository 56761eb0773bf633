#![deny(unsafe_code)]
//! CLI binary for es20kit.
//!
//! Subcommands:
//! - `inspect <file>`: parse a KTX / PVRTC / PKM file and print its mip table
//! - `convert <image>`: decode an image and write raw GL pixels
//! - `sprite`: print a sprite position matrix and its NDC corners
//! - `uv`: print an atlas UV matrix and its UV corners
//! - `list`: print known containers and pixel formats

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use es20kit_core::vector::{Mat4, Vec4};
use es20kit_core::{AtlasRegion, PixelFormat, SpritePlacement};
use es20kit_textures::{AnyCompressedImage, CompressedTexture, ContainerKind, RawPixelImage};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "es20kit", about = "OpenGL ES 2.0 texture and sprite toolkit")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log parser details (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a compressed texture container and print its mip levels.
    Inspect {
        /// Path to a .ktx, .pvr, or .pkm file.
        file: PathBuf,

        /// Container name (ktx, pvrtc, pkm). Detected from magic bytes if omitted.
        #[arg(short, long)]
        container: Option<String>,
    },
    /// Decode an image file and write its pixels in a raw GL layout.
    Convert {
        /// Input image (PNG).
        image: PathBuf,

        /// Pixel format (rgba8, rgb8, rgba5551, rgb565).
        #[arg(short, long, default_value = "rgba8")]
        format: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.raw")]
        output: PathBuf,
    },
    /// Print the position matrix for a sprite on a render surface.
    Sprite {
        /// Surface size as WIDTHxHEIGHT.
        #[arg(short, long)]
        surface: String,

        /// Sprite rectangle as x,y,width,height in surface pixels.
        #[arg(short, long)]
        rect: Option<String>,

        /// Rotation in degrees.
        #[arg(long)]
        rotate: Option<f32>,

        /// Placement as a JSON object (x, y, width, height, rotation).
        #[arg(long, default_value = "{}")]
        params: String,

        /// Also print the transposed matrix.
        #[arg(long)]
        transpose: bool,
    },
    /// Print the texture coordinate matrix for an atlas sub-rectangle.
    Uv {
        /// Texture size as WIDTHxHEIGHT.
        #[arg(short, long)]
        texture: String,

        /// Region as x,y,width,height in texture pixels.
        #[arg(short, long)]
        rect: String,
    },
    /// List available containers and pixel formats.
    List,
}

fn parse_size(text: &str) -> Result<(u32, u32), CliError> {
    let bad = || CliError::Input(format!("invalid size '{text}', expected WIDTHxHEIGHT"));
    let (w, h) = text.split_once(['x', 'X']).ok_or_else(bad)?;
    let w: u32 = w.trim().parse().map_err(|_| bad())?;
    let h: u32 = h.trim().parse().map_err(|_| bad())?;
    if w == 0 || h == 0 {
        return Err(bad());
    }
    Ok((w, h))
}

fn parse_rect(text: &str) -> Result<[i32; 4], CliError> {
    let bad = || CliError::Input(format!("invalid rect '{text}', expected x,y,width,height"));
    let parts = text
        .split(',')
        .map(|p| p.trim().parse::<i32>().map_err(|_| bad()))
        .collect::<Result<Vec<_>, _>>()?;
    <[i32; 4]>::try_from(parts).map_err(|_| bad())
}

fn matrix_rows(m: &Mat4) -> Vec<[f32; 4]> {
    (0..4)
        .map(|row| [m.m[0][row], m.m[1][row], m.m[2][row], m.m[3][row]])
        .collect()
}

fn print_matrix(label: &str, m: &Mat4) {
    println!("{label}:");
    for row in matrix_rows(m) {
        println!(
            "  [{:>10.6} {:>10.6} {:>10.6} {:>10.6}]",
            row[0], row[1], row[2], row[3]
        );
    }
}

fn corners_json(corners: &[Vec4; 4]) -> Value {
    Value::Array(corners.iter().map(|c| json!([c.x, c.y])).collect())
}

fn print_corners(label: &str, corners: &[Vec4; 4]) {
    println!("{label}:");
    for c in corners {
        println!("  ({:.6}, {:.6})", c.x, c.y);
    }
}

fn build_placement(
    surface: &str,
    rect: Option<&str>,
    rotate: Option<f32>,
    params: &str,
) -> Result<SpritePlacement, CliError> {
    let (surface_width, surface_height) = parse_size(surface)?;
    let params: Value = serde_json::from_str(params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;

    let defaults = SpritePlacement {
        surface_width,
        surface_height,
        x: 0,
        y: 0,
        width: surface_width as i32,
        height: surface_height as i32,
        rotation: 0.0,
    };
    let mut placement = SpritePlacement::from_json(&params, defaults);
    // explicit flags win over --params
    placement.surface_width = surface_width;
    placement.surface_height = surface_height;
    if let Some(rect) = rect {
        let [x, y, w, h] = parse_rect(rect)?;
        placement.x = x;
        placement.y = y;
        placement.width = w;
        placement.height = h;
    }
    if let Some(rotation) = rotate {
        placement.rotation = rotation;
    }
    Ok(placement)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let containers = ContainerKind::list_names();
            let formats = PixelFormat::list_names();
            if cli.json {
                let info = json!({
                    "containers": containers,
                    "pixel_formats": formats,
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Containers:");
                for name in containers {
                    println!("  {name}");
                }
                println!("Pixel formats:");
                println!("  {}", formats.join(", "));
            }
        }
        Command::Inspect { file, container } => {
            let kind = container
                .as_deref()
                .map(ContainerKind::from_name)
                .transpose()?;
            let image = AnyCompressedImage::open(&file, kind)?;

            if cli.json {
                let mut info = image.describe();
                info["file"] = json!(file.display().to_string());
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{}: {} {}x{} format 0x{:04x}, {} mip level(s)",
                    file.display(),
                    image.container(),
                    image.width(),
                    image.height(),
                    image.format().gl_internal_format(),
                    image.mip_count()
                );
                for mip in image.mip_levels() {
                    println!(
                        "  level {:>2}: {:>5}x{:<5} {:>8} bytes",
                        mip.level,
                        mip.width,
                        mip.height,
                        mip.data.len()
                    );
                }
            }
        }
        Command::Convert {
            image,
            format,
            output,
        } => {
            let format = PixelFormat::from_name(&format)?;
            let raw = RawPixelImage::load(&image, format)?;
            std::fs::write(&output, &raw.pixels)
                .map_err(|e| CliError::Io(format!("{}: {e}", output.display())))?;

            if cli.json {
                let info = json!({
                    "input": image.display().to_string(),
                    "output": output.display().to_string(),
                    "width": raw.width,
                    "height": raw.height,
                    "format": format,
                    "bytes": raw.pixels.len(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "converted {} ({}x{}) -> {} as {} ({} bytes)",
                    image.display(),
                    raw.width,
                    raw.height,
                    output.display(),
                    format.name(),
                    raw.pixels.len()
                );
            }
        }
        Command::Sprite {
            surface,
            rect,
            rotate,
            params,
            transpose,
        } => {
            let placement = build_placement(&surface, rect.as_deref(), rotate, &params)?;
            let matrix = placement.position_matrix();
            let corners = placement.ndc_corners();
            let transposed = matrix.transpose();

            if cli.json {
                let mut info = json!({
                    "placement": placement,
                    "matrix": matrix.to_cols_array(),
                    "layout": matrix.translation_layout(),
                    "corners": corners_json(&corners),
                });
                if transpose {
                    info["transposed"] = json!({
                        "matrix": transposed.to_cols_array(),
                        "layout": transposed.translation_layout(),
                    });
                }
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_matrix("position matrix", &matrix);
                print_corners("ndc corners", &corners);
                if transpose {
                    print_matrix("transposed", &transposed);
                    println!("layout: {:?}", transposed.translation_layout());
                }
            }
        }
        Command::Uv { texture, rect } => {
            let (texture_width, texture_height) = parse_size(&texture)?;
            let [x, y, width, height] = parse_rect(&rect)?;
            let region = AtlasRegion {
                texture_width,
                texture_height,
                x,
                y,
                width,
                height,
            };
            let matrix = region.uv_matrix();
            let corners = region.uv_corners();

            if cli.json {
                let info = json!({
                    "region": region,
                    "matrix": matrix.to_cols_array(),
                    "corners": corners_json(&corners),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                print_matrix("uv matrix", &matrix);
                print_corners("uv corners", &corners);
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::debug!("exiting with {e:?}");
        if json_mode {
            let j = json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
