//! pdf-audio - Convert PDF files and scans to MP3 audiobooks using neural TTS

mod audio;
mod config;
mod convert;
mod discover;
mod ocr;
mod pdf;
mod text;
mod tts;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::NarratorConfig;
use convert::Converter;
use discover::DocumentKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdf-audio")]
#[command(about = "Convert PDF files and scans to MP3 audiobooks using neural text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Input directory containing PDF and image files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for MP3 files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Voice to narrate with (e.g. af_bella)
    #[arg(long)]
    voice: Option<String>,

    /// Speech speed multiplier (0.5-2.0)
    #[arg(long)]
    speed: Option<f32>,

    /// Skip OCR even when the engine is installed
    #[arg(long, default_value_t = false)]
    no_ocr: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice {
        /// Voice name (e.g. af_bella)
        voice: String,
    },
    /// Set default speech speed
    SetSpeed {
        /// Value (0.5-2.0)
        value: f32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut log_builder = env_logger::Builder::from_default_env();
    if args.debug {
        log_builder.filter_level(log::LevelFilter::Debug);
    }
    log_builder.init();

    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    // Load configuration; CLI flags win over the config file
    let mut config = NarratorConfig::load().context("Failed to load configuration")?;
    if let Some(input) = args.input {
        config.input_dir = input;
    }
    if let Some(output) = args.output {
        config.output_dir = output;
    }
    if let Some(voice) = args.voice {
        config.voice = voice;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }

    eprintln!("{}", "=".repeat(70));
    eprintln!("PDF TO AUDIOBOOK CONVERTER");
    eprintln!("{}", "=".repeat(70));

    std::fs::create_dir_all(&config.input_dir).with_context(|| {
        format!("Failed to create input directory: {}", config.input_dir.display())
    })?;
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {}", config.output_dir.display())
    })?;
    eprintln!("Input folder: {}", config.input_dir.display());
    eprintln!("Output folder: {}", config.output_dir.display());

    eprintln!();
    eprintln!("Setting up text-to-speech engine...");
    eprintln!("(First run? The engine downloads its voice files - only happens once.)");
    let tts = tts::create_backend().context("Failed to initialize the TTS engine")?;
    log::debug!("TTS backend ready: {}", tts.name());

    let ocr = if args.no_ocr {
        None
    } else {
        eprintln!("Setting up OCR engine for scans and images...");
        let engine = ocr::OcrEngine::detect();
        if engine.is_none() {
            eprintln!("Note: OCR not available. Install paddleocr for image and scanned PDF support.");
        }
        engine
    };

    if !audio::assembler::is_ffmpeg_available() {
        eprintln!("Warning: ffmpeg was not found on PATH; audiobook encoding will fail.");
    }

    let documents = discover::discover_documents(&config.input_dir, ocr.is_some())?;
    if documents.is_empty() {
        print_no_files_help(&config, ocr.is_some());
        return Ok(());
    }

    let pdf_count = documents
        .iter()
        .filter(|d| d.kind == DocumentKind::Pdf)
        .count();
    let image_count = documents.len() - pdf_count;
    eprintln!();
    if image_count > 0 {
        eprintln!("Found {pdf_count} PDF file(s) and {image_count} image file(s) to convert");
    } else {
        eprintln!("Found {pdf_count} PDF file(s) to convert");
    }

    let output_dir = config.output_dir.clone();
    let converter = Converter::new(&config, tts, ocr);
    let summary = converter.run(&documents);

    eprintln!();
    eprintln!("{}", "=".repeat(70));
    eprintln!("Successfully converted: {} audiobook(s)", summary.successful);
    if summary.failed > 0 {
        eprintln!("Failed: {} file(s)", summary.failed);
    }
    eprintln!("Your audiobooks are in: {}", output_dir.display());

    Ok(())
}

fn print_no_files_help(config: &NarratorConfig, ocr_available: bool) {
    eprintln!();
    eprintln!("No files found!");
    eprintln!("Looking in: {}", config.input_dir.display());
    eprintln!();
    eprintln!("How to use:");
    eprintln!("  1. Put your PDF files or images in the input folder");
    if ocr_available {
        eprintln!("     Supported: PDF, JPG, JPEG, PNG, BMP, TIFF");
    } else {
        eprintln!("     Supported: PDF only (install paddleocr for image support)");
    }
    eprintln!("  2. Run this program again");
    eprintln!("  3. Find your audiobooks in the output folder");
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = NarratorConfig::load()?;
            println!("Configuration file: {:?}", NarratorConfig::config_path()?);
            println!();
            println!("input_dir = \"{}\"", config.input_dir.display());
            println!("output_dir = \"{}\"", config.output_dir.display());
            println!("voice = \"{}\"", config.voice);
            println!("speed = {}", config.speed);
            println!("chunk_size = {}", config.chunk_size);
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = NarratorConfig::load()?;
            config.voice = voice.clone();
            config.save()?;
            println!("Default voice set to: {voice}");
        }
        ConfigAction::SetSpeed { value } => {
            let mut config = NarratorConfig::load()?;
            config.speed = value.clamp(0.5, 2.0);
            config.save()?;
            println!("Default speed set to: {}", config.speed);
        }
    }
    Ok(())
}
