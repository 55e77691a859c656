mod config;
mod decode;
mod error;
mod parser;
mod processor;
mod serialiser;
mod session;
mod style;
mod subtitle;
mod timecode;

use crate::config::StyleConfig;
use crate::processor::TranslationMode;
use crate::session::{parse_translations, Session};
use crate::style::SystemFonts;
use crate::timecode::Timebase;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use log::{info, LevelFilter};

fn main() {
    match run() {
        Ok(()) => (),
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            std::process::exit(1);
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Keep the original line and add the translation below it.
    Bilingual,
    /// Replace the original text with the translation.
    Rewrite,
}

impl From<Mode> for TranslationMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Bilingual => TranslationMode::Bilingual,
            Mode::Rewrite => TranslationMode::Rewrite,
        }
    }
}

#[derive(ClapParser)]
#[command(about = "Convert SRT, WebVTT, ASS/SSA and FCPXML subtitles into Final Cut Pro XML titles")]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The subtitle file to convert. Its extension selects the format."
    )]
    input: PathBuf,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "The file to write to. Defaults to <name>_SUB.fcpxml (or _DUAL) next to the input; '-' writes to standard output."
    )]
    output: Option<String>,
    #[arg(short, long, value_name = "FILE", help = "Read title styling from a TOML file.")]
    style: Option<PathBuf>,
    #[arg(long, value_name = "NAME", help = "Font family. Falls back to Helvetica if not installed.")]
    font: Option<String>,
    #[arg(long, value_name = "POINTS", help = "Font size of the primary line.")]
    font_size: Option<u32>,
    #[arg(long, value_name = "#RRGGBB", help = "Text color.")]
    font_color: Option<String>,
    #[arg(long, value_name = "#RRGGBB", help = "Outline color.")]
    stroke_color: Option<String>,
    #[arg(long, value_name = "WIDTH", help = "Outline width.")]
    stroke_width: Option<f64>,
    #[arg(
        long,
        value_name = "Y",
        allow_hyphen_values = true,
        help = "Vertical position of the titles."
    )]
    position: Option<f64>,
    #[arg(long, default_value_t = 30, help = "Frame rate of the generated timeline.")]
    fps: u32,
    #[arg(
        short,
        long,
        help = "Render multi-line subtitles as a primary line with a half-size second line."
    )]
    bilingual: bool,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "JSON array with one translated string (or null) per subtitle, in time order."
    )]
    translations: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        default_value = "bilingual",
        requires = "translations",
        help = "How translations are merged into the subtitles."
    )]
    mode: Mode,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Log more; repeat for more detail.")]
    verbose: u8,
}

impl Cli {
    fn style_flags(&self) -> StyleConfig {
        StyleConfig {
            font_name: self.font.clone(),
            font_size: self.font_size,
            font_color: self.font_color.clone(),
            stroke_color: self.stroke_color.clone(),
            stroke_width: self.stroke_width,
            position: self.position,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut session = Session::new();
    session.import_file(&cli.input)?;

    if let Some(path) = &cli.translations {
        let json = std::fs::read_to_string(path)
            .context(format!("Failed to open translations file: '{}'", path.display()))?;
        let translations = parse_translations(&json)
            .context(format!("Failed to read translations file: '{}'", path.display()))?;
        session.apply_translations(cli.mode.into(), &translations)?;
        if session.is_bilingual() {
            info!("Exporting bilingual titles");
        }
    }

    let style = match &cli.style {
        Some(path) => StyleConfig::load(path)?,
        None => StyleConfig::default(),
    };
    let style = style.merge(cli.style_flags());
    let params = style.resolve(session.source_name(), &SystemFonts::load())?;
    let opts = session.render_opts(Timebase::new(cli.fps), cli.bilingual);

    match cli.output.as_deref() {
        Some("-") => {
            let xml = session.export(&params, opts)?;
            io::stdout()
                .write_all(xml.as_bytes())
                .context("Failed to write to stdout")?;
        }
        Some(path) => session.export_to(&params, opts, Path::new(path))?,
        None => {
            let dir = cli.input.parent().unwrap_or_else(|| Path::new(""));
            let path = dir.join(session.output_name(opts));
            session.export_to(&params, opts, &path)?;
        }
    }

    Ok(())
}
