//! glyph-plate: render uppercase text as glyph images over a background and
//! save the result as a PDF

use clap::{Parser, Subcommand};
use glyph_plate::export::Exporter;
use glyph_plate::preview::{PreviewController, TextSurface};
use glyph_plate::resolver::GlyphResolver;
use glyph_plate::source::ResourceLoader;
use glyph_plate::{Config, RenderError};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

/// Shown to the user whenever an export fails, whatever the cause
const FAILURE_NOTICE: &str = "Failed to generate PDF. Please try again.";

#[derive(Parser, Debug)]
#[command(name = "glyph-plate")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON configuration file (geometry, glyph base, background, output)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory or URL the glyph images live under
    #[arg(short, long, global = true)]
    glyphs: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render text onto the background and save it as a PDF
    #[command(alias = "r")]
    Render {
        /// Text to render; anything but letters and spaces is dropped
        text: String,

        /// Background image, as a path or URL
        #[arg(short, long)]
        background: Option<String>,

        /// Where to save the PDF
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the glyphs that would be drawn for each input, as typed. Reads
    /// one input per line from stdin when no inputs are given
    #[command(alias = "p")]
    Preview { inputs: Vec<String> },
}

fn load_config(cli: &Cli) -> Result<Config, RenderError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(glyphs) = &cli.glyphs {
        config.glyph_base = glyphs.clone();
    }
    Ok(config)
}

async fn render(
    mut config: Config,
    text: &str,
    background: Option<String>,
    output: Option<PathBuf>,
) -> Result<(), RenderError> {
    if let Some(background) = background {
        config.background = background;
    }
    if let Some(output) = output {
        config.output = output;
    }

    let exporter = Exporter::new(
        config.geometry,
        GlyphResolver::new(&config.glyph_base),
        &config.background,
        ResourceLoader::new(),
    );
    exporter.export_to_file(text, &config.output).await?;
    println!("saved {}", config.output.display());
    Ok(())
}

fn preview(config: Config, inputs: Vec<String>) -> Result<(), RenderError> {
    let stdout = std::io::stdout();
    let mut preview = PreviewController::new(
        GlyphResolver::new(&config.glyph_base),
        TextSurface::new(stdout.lock()),
    );

    if inputs.is_empty() {
        for line in std::io::stdin().lock().lines() {
            preview.on_input(&line?);
        }
    } else {
        for input in inputs.iter() {
            preview.on_input(input);
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {e}");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Render {
            text,
            background,
            output,
        } => match render(config, &text, background, output).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("PDF generation failed: {e}");
                log::error!("error details: {e:?}");
                eprintln!("{FAILURE_NOTICE}");
                ExitCode::FAILURE
            }
        },
        Commands::Preview { inputs } => match preview(config, inputs) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                log::error!("preview failed: {e}");
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        },
    }
}
