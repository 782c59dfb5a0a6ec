use clap::{Parser, Subcommand};
use imgfit::batch::{self, BatchConfig, BatchMode};
use imgfit::config::{self, Config};
use imgfit::imaging::{
    self, Dimensions, ImageBackend, Interpolation, Quality, Rect, RustBackend, Size, rust_backend,
};
use imgfit::output;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Flags for commands that resample.
#[derive(clap::Args, Clone)]
struct ResampleArgs {
    /// Interpolation quality (overrides [resize] interpolation)
    #[arg(long, value_enum)]
    quality: Option<Interpolation>,
}

/// Flags for commands that write an image file.
#[derive(clap::Args, Clone)]
struct WriteArgs {
    /// Output file; the format follows the extension
    #[arg(short, long)]
    output: PathBuf,

    /// JPEG/AVIF encoding quality, 1-100 (overrides [output] quality)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    encode_quality: Option<u32>,
}

#[derive(Parser)]
#[command(name = "imgfit")]
#[command(about = "Fit, fill, crop and resize images")]
#[command(long_about = "\
Fit, fill, crop and resize images

Sizes are written WIDTHxHEIGHT (200x100); crop regions are WIDTHxHEIGHT+X+Y
(50x50+25+0), measured from the top-left corner.

  fit   the largest size with the image's aspect ratio inside the box
  fill  the smallest size with the image's aspect ratio covering the box

`thumbnail` fills the box, then center-crops it: the result is exactly the
requested size with no letterboxing.

Defaults come from imgfit.toml (see `imgfit gen-config`); flags override it.
Set RUST_LOG=debug for a trace of every resize and crop.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when missing)
    #[arg(long, default_value = config::CONFIG_FILE_NAME, global = true)]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute fit, fill and centered crop for a size without touching pixels
    Measure {
        /// Natural size of the content, e.g. 200x100
        #[arg(long)]
        source: Size,
        /// Bounding box, e.g. 50x50
        #[arg(long)]
        bounds: Size,
    },
    /// Print pixel dimensions and orientation
    Identify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Cut a region out of an image
    Crop {
        input: PathBuf,
        /// Region as WIDTHxHEIGHT+X+Y
        rect: Rect,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Resample to an exact size, or into a box with --fit
    Resize {
        input: PathBuf,
        size: Size,
        /// Keep the aspect ratio: resize to the fit size for SIZE
        #[arg(long)]
        fit: bool,
        #[command(flatten)]
        resample: ResampleArgs,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Fill the box, then center-crop to exactly SIZE
    Thumbnail {
        input: PathBuf,
        /// Target size (default: [thumbnail] size)
        size: Option<Size>,
        #[command(flatten)]
        resample: ResampleArgs,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Re-encode an image into the format named by a MIME type
    Encode {
        input: PathBuf,
        /// e.g. image/jpeg, image/png, image/avif
        #[arg(long)]
        mime: String,
        #[command(flatten)]
        write: WriteArgs,
    },
    /// Thumbnail every image under a directory, in parallel
    Batch {
        source: PathBuf,
        output: PathBuf,
        /// Target size (default: [thumbnail] size)
        #[arg(long)]
        size: Option<Size>,
        /// Fit into the box instead of center-cropping to it
        #[arg(long)]
        fit: bool,
        /// Output extension, e.g. webp (default: keep each source's)
        #[arg(long)]
        format: Option<String>,
        #[command(flatten)]
        resample: ResampleArgs,
        /// JPEG/AVIF encoding quality, 1-100 (overrides [output] quality)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        encode_quality: Option<u32>,
    },
    /// Print a stock imgfit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.command {
        Command::GenConfig => Config::default(),
        _ => config::load_config(&cli.config)?,
    };
    let backend = RustBackend::new();

    match cli.command {
        Command::Measure { source, bounds } => {
            let measurement = imaging::measure(source, bounds);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&measurement)?);
            } else {
                output::print_measurement(&measurement);
            }
        }
        Command::Identify { files } => {
            let mut reports = Vec::new();
            for path in &files {
                let dims = rust_backend::identify(path)?;
                if cli.json {
                    reports.push(serde_json::json!({
                        "path": path,
                        "width": dims.width,
                        "height": dims.height,
                        "landscape": Size::from(dims).is_landscape(),
                    }));
                } else {
                    println!("{}", output::format_identify(path, dims));
                }
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            }
        }
        Command::Crop { input, rect, write } => {
            let img = rust_backend::load_image(&input)?;
            let cropped = imaging::crop(&backend, &img, rect)?;
            save(&backend, &cropped, &write, &config, cli.json)?;
        }
        Command::Resize {
            input,
            size,
            fit,
            resample,
            write,
        } => {
            let img = rust_backend::load_image(&input)?;
            let quality = interpolation(&resample, &config);
            let resized = if fit {
                imaging::resize_to_fit(&backend, &img, size, quality)?
            } else {
                imaging::resize(&backend, &img, size, quality)?
            };
            save(&backend, &resized, &write, &config, cli.json)?;
        }
        Command::Thumbnail {
            input,
            size,
            resample,
            write,
        } => {
            let img = rust_backend::load_image(&input)?;
            let target = size.unwrap_or_else(|| Size::from(config.thumbnail_size()));
            let thumb = imaging::resize_and_crop_to_fit(
                &backend,
                &img,
                target,
                interpolation(&resample, &config),
            )?;
            save(&backend, &thumb, &write, &config, cli.json)?;
        }
        Command::Encode { input, mime, write } => {
            let img = rust_backend::load_image(&input)?;
            let quality = encode_quality(write.encode_quality, &config);
            let bytes = rust_backend::encode_image(&img, &mime, quality)?;
            std::fs::write(&write.output, &bytes)?;
            report_written(&write.output, backend.dimensions(&img), cli.json)?;
        }
        Command::Batch {
            source,
            output: out_dir,
            size,
            fit,
            format,
            resample,
            encode_quality: encode_quality_arg,
        } => {
            init_thread_pool(&config.processing);
            let batch_config = BatchConfig {
                size: size
                    .map(Size::to_dimensions)
                    .unwrap_or_else(|| config.thumbnail_size()),
                mode: if fit {
                    BatchMode::Fit
                } else {
                    BatchMode::CropToFit
                },
                interpolation: interpolation(&resample, &config),
                quality: encode_quality(encode_quality_arg, &config),
                output_extension: format,
            };
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_batch_event(&event);
                }
            });
            let summary = batch::run_batch(&source, &out_dir, &batch_config, Some(tx))?;
            printer
                .join()
                .map_err(|_| "batch output thread panicked")?;
            println!("{}", output::format_batch_summary(&summary));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn interpolation(args: &ResampleArgs, config: &Config) -> Interpolation {
    args.quality.unwrap_or(config.resize.interpolation)
}

fn encode_quality(arg: Option<u32>, config: &Config) -> Quality {
    arg.map(Quality::new)
        .unwrap_or_else(|| config.encode_quality())
}

fn save(
    backend: &RustBackend,
    img: &<RustBackend as ImageBackend>::Image,
    write: &WriteArgs,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    rust_backend::save_image(img, &write.output, encode_quality(write.encode_quality, config))?;
    report_written(&write.output, backend.dimensions(img), json)
}

fn report_written(
    path: &Path,
    dims: Dimensions,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let report = serde_json::json!({
            "output": path,
            "width": dims.width,
            "height": dims.height,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::format_written(path, dims));
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
