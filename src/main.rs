use clap::{Parser, Subcommand};
use image_compress::config::{self, CompressConfig};
use image_compress::{OutputFormat, TransformRequest, compress, logging};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Transform overrides shared by every compress command.
#[derive(clap::Args, Clone, Debug, Default)]
struct TransformArgs {
    /// Upper bound on output width (pixels)
    #[arg(long)]
    max_width: Option<u32>,

    /// Upper bound on output height (pixels)
    #[arg(long)]
    max_height: Option<u32>,

    /// Encoding quality, 0-100 (advisory for PNG)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Clockwise rotation in degrees
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<i32>,

    /// Output format: jpeg, png or webp
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Decode-time downscale factor (rounded down to a power of two)
    #[arg(long)]
    subsample: Option<u32>,

    /// Reserved: accepted for compatibility, currently ignored
    #[arg(long)]
    keep_exif: Option<bool>,

    /// Reserved: accepted for compatibility, currently ignored
    #[arg(long)]
    auto_correction_angle: Option<bool>,
}

impl TransformArgs {
    /// Layer flags over the configured defaults.
    fn apply(&self, config: &config::TransformConfig) -> TransformRequest {
        let mut merged = config.clone();
        if let Some(v) = self.max_width {
            merged.max_width = v;
        }
        if let Some(v) = self.max_height {
            merged.max_height = v;
        }
        if let Some(v) = self.quality {
            merged.quality = v;
        }
        if let Some(v) = self.rotate {
            merged.rotate = v;
        }
        if let Some(v) = self.format {
            merged.format = v;
        }
        if let Some(v) = self.subsample {
            merged.subsample = v;
        }
        if let Some(v) = self.keep_exif {
            merged.keep_exif = v;
        }
        if let Some(v) = self.auto_correction_angle {
            merged.auto_correction_angle = v;
        }
        merged.to_request()
    }
}

#[derive(Parser)]
#[command(name = "image-compress")]
#[command(about = "Shrink, rotate and re-encode images")]
#[command(long_about = "\
Shrink, rotate and re-encode images

Images are scaled down to fit inside --max-width x --max-height with their
aspect ratio preserved (never enlarged), rotated clockwise by --rotate
degrees, and written as JPEG, PNG or WebP at --quality.

Defaults come from image-compress.toml in the working directory when present
(see 'image-compress gen-config'); flags override it.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./image-compress.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log failed operations
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress an image file
    File {
        /// Source image
        input: PathBuf,

        /// Write here instead of stdout (parent directories are created)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Compress image bytes read from stdin and write them to stdout
    Bytes {
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Print a stock image-compress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let Cli {
        config: config_path,
        log,
        command,
    } = Cli::parse();

    match command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::File {
            input,
            output,
            transform,
        } => {
            let config = init(config_path.as_deref(), log)?;
            let request = transform.apply(&config.transform);
            match output {
                Some(target) => {
                    let written = compress::compress_from_file_to_file(&input, &request, &target)
                        .inspect_err(|e| logging::report_failure("file-to-file", e))?;
                    eprintln!("{} → {}", input.display(), written.display());
                }
                None => {
                    let bytes = compress::compress_from_file(&input, &request)
                        .inspect_err(|e| logging::report_failure("file", e))?;
                    std::io::stdout().lock().write_all(&bytes)?;
                }
            }
        }
        Command::Bytes { transform } => {
            let config = init(config_path.as_deref(), log)?;
            let request = transform.apply(&config.transform);
            let mut input = Vec::new();
            std::io::stdin().lock().read_to_end(&mut input)?;
            let bytes = compress::compress_from_bytes(&input, &request)
                .inspect_err(|e| logging::report_failure("bytes", e))?;
            std::io::stdout().lock().write_all(&bytes)?;
        }
    }

    Ok(())
}

/// Load config and set the logging toggle.
///
/// An explicit `--config` must exist; the working-directory default is optional.
fn init(explicit: Option<&Path>, log: bool) -> Result<CompressConfig, config::ConfigError> {
    let config = match explicit {
        Some(path) => config::load_config(path)?,
        None => config::load_config_or_default(Path::new(config::CONFIG_FILENAME))?,
    };
    logging::set_enabled(log || config.logging.enabled);
    Ok(config)
}
