use clap::{Parser, Subcommand};
use env_logger::Env;
use qr_codec::tools::{decode_file, save_symbol_png, text_art};
use qr_codec::{DecodeOptions, ECLevel, EncodeOptions, MaskPattern, RenderOptions, encode_with_options};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "QR code encoder and decoder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text, printing the symbol or writing it as a PNG
    Encode {
        text: String,
        /// Error correction level (L, M, Q or H)
        #[arg(long, default_value = "M")]
        level: ECLevel,
        /// Force a mask pattern instead of the lowest-penalty one
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=7))]
        mask: Option<u8>,
        /// Write a PNG here instead of printing
        #[arg(long)]
        output: Option<PathBuf>,
        /// Pixels per module for PNG output
        #[arg(long, default_value_t = 10)]
        scale: usize,
        /// Quiet zone in modules (at least 4)
        #[arg(long, default_value_t = 4)]
        margin: usize,
    },
    /// Decode the symbol in an image file
    Decode { image: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode {
            text,
            level,
            mask,
            output,
            scale,
            margin,
        } => encode_cmd(&text, level, mask, output.as_deref(), RenderOptions { scale, margin }),
        Command::Decode { image } => decode_cmd(&image),
    }
}

fn encode_cmd(
    text: &str,
    level: ECLevel,
    mask: Option<u8>,
    output: Option<&Path>,
    render: RenderOptions,
) -> ExitCode {
    let force_mask = match mask.map(MaskPattern::new).transpose() {
        Ok(mask) => mask,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let options = EncodeOptions {
        level,
        force_mask,
        min_version: None,
    };
    let symbol = match encode_with_options(text, &options) {
        Ok(symbol) => symbol,
        Err(err) => {
            log::error!("encode failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "version {} ({}x{}), level {:?}, mask {}, mode {:?}",
        symbol.version,
        symbol.size,
        symbol.size,
        symbol.error_correction_level,
        symbol.mask_pattern.index(),
        symbol.mode
    );

    match output {
        Some(path) => match save_symbol_png(&symbol, &render, path) {
            Ok(()) => {
                log::info!("wrote {}", path.display());
                ExitCode::SUCCESS
            }
            Err(err) => {
                log::error!("{}: {err}", path.display());
                ExitCode::FAILURE
            }
        },
        None => {
            print!("{}", text_art(&symbol, render.effective_margin()));
            ExitCode::SUCCESS
        }
    }
}

fn decode_cmd(image: &Path) -> ExitCode {
    let start = Instant::now();
    match decode_file(image, &DecodeOptions::from_env()) {
        Ok(symbol) => {
            log::info!(
                "version {}, level {:?}, mask {} in {:.2?}",
                symbol.version,
                symbol.error_correction,
                symbol.mask_pattern.index(),
                start.elapsed()
            );
            println!("{}", symbol.content);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{}: {err}", image.display());
            ExitCode::FAILURE
        }
    }
}
