//! Command-line interface for scan_sizes
//!
//! Measures objects in a photo with one of the three measurement modes and
//! optionally writes the annotated image. Set `RUST_LOG=debug` to see
//! per-stage details.

use clap::{Args, Parser, Subcommand};
use scan_sizes::{
    image_loader, measure_multiple_objects_with_config, measure_single_object_with_config,
    measure_with_reference_with_config, ErrorSummary, MeasureConfig, MeasureError, Result,
};
use std::path::{Path, PathBuf};
use std::process;

/// Measure object sizes in photographs
#[derive(Parser, Debug)]
#[command(name = "scan-sizes")]
#[command(about = "Measure object sizes from photos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Area of the primary object using a fixed scale factor
    Single {
        #[command(flatten)]
        common: CommonArgs,

        /// Physical units per pixel
        #[arg(short, long)]
        scale_factor: Option<f64>,
    },

    /// Pixel area of every object on a light background
    Multi {
        #[command(flatten)]
        common: CommonArgs,

        /// Minimum object area in px²
        #[arg(short, long)]
        min_area: Option<f64>,
    },

    /// Width, height and area relative to a reference object
    Reference {
        #[command(flatten)]
        common: CommonArgs,

        /// Physical width of the reference object
        #[arg(short = 'w', long)]
        reference_width: Option<f64>,

        /// Position of the reference in extraction order (top-most first)
        #[arg(short = 'i', long)]
        reference_index: Option<usize>,

        /// Unit label used in output and annotations
        #[arg(short, long)]
        unit: Option<String>,
    },

    /// Write the default configuration as JSON
    Config {
        /// Output file path
        #[arg(default_value = "scan_sizes_config.json")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Input image file path
    input: PathBuf,

    /// Where to save the annotated image
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(error) = run(cli.command) {
        eprintln!("Measurement failed: {}", error);
        if error.is_recoverable() {
            eprintln!("Suggestion: {}", error.user_message());
        }
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Single {
            common,
            scale_factor,
        } => {
            let mut config = load_config(common.config.as_deref())?;
            if let Some(scale_factor) = scale_factor {
                config.single.scale_factor = scale_factor;
            }

            let result = with_error_json(common.json, || {
                measure_single_object_with_config(&common.input, &config)
            })?;
            if common.json {
                print_json(&serde_json::json!({
                    "area": result.area,
                    "selected": result.measurements.objects[result.selected].id,
                    "objects": result.measurements,
                }))?;
            } else {
                println!("Objects found: {}", result.measurements.len());
                println!(
                    "Selected: {} (scale {} per px)",
                    result.measurements.objects[result.selected].id, config.single.scale_factor
                );
                println!("Area: {:.4}", result.area);
            }
            save_annotated(&result.annotated, common.output.as_deref())
        }

        Command::Multi { common, min_area } => {
            let mut config = load_config(common.config.as_deref())?;
            if let Some(min_area) = min_area {
                config.multi.min_area = min_area;
            }

            let result = with_error_json(common.json, || {
                measure_multiple_objects_with_config(&common.input, &config)
            })?;
            if common.json {
                print_json(&result.summary())?;
            } else {
                let summary = result.summary();
                println!("Objects found: {}", summary.object_count);
                for (object, size) in result.measurements.iter().zip(&summary.object_sizes) {
                    println!("  {}: {:.0} px", object.id, size);
                }
                println!("Total area: {:.0} px", summary.total_area);
            }
            save_annotated(&result.annotated, common.output.as_deref())
        }

        Command::Reference {
            common,
            reference_width,
            reference_index,
            unit,
        } => {
            let mut config = load_config(common.config.as_deref())?;
            if let Some(width) = reference_width {
                config.reference.reference_width = width;
            }
            if let Some(index) = reference_index {
                config.reference.reference_index = index;
            }
            if let Some(unit) = unit {
                config.reference.unit = unit;
            }

            let result = with_error_json(common.json, || {
                measure_with_reference_with_config(&common.input, &config)
            })?;
            if common.json {
                print_json(&result.sizes())?;
            } else {
                let unit = &config.reference.unit;
                println!("Objects found: {}", result.measurements.len());
                if let Some(ppu) = result.pixels_per_unit() {
                    println!("Calibration: {:.3} px/{}", ppu, unit);
                }
                for object in result.measurements.iter() {
                    let marker = if object.index == config.reference.reference_index {
                        " (reference)"
                    } else {
                        ""
                    };
                    println!(
                        "  {}: {:.2} x {:.2} {}, area {:.2} {}²{}",
                        object.id,
                        object.measurement.width,
                        object.measurement.height,
                        unit,
                        object.measurement.area,
                        unit,
                        marker
                    );
                }
            }
            save_annotated(&result.annotated, common.output.as_deref())
        }

        Command::Config { output } => {
            MeasureConfig::default().to_json_file(&output)?;
            println!("Default configuration written to: {}", output.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<MeasureConfig> {
    match path {
        Some(path) => MeasureConfig::from_json_file(path),
        None => Ok(MeasureConfig::default()),
    }
}

/// Run a measurement, printing the error payload on stdout in JSON mode
fn with_error_json<T>(json: bool, measure: impl FnOnce() -> Result<T>) -> Result<T> {
    let result = measure();
    if json {
        if let Err(error) = &result {
            print_json(&ErrorSummary::from(error))?;
        }
    }
    result
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| MeasureError::ConfigError {
        message: format!("Failed to serialize output: {}", e),
        source: None,
    })?;
    println!("{}", json);
    Ok(())
}

fn save_annotated(image: &image::RgbImage, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        image_loader::save_image(image, path)?;
        println!("Annotated image saved to: {}", path.display());
    }
    Ok(())
}
