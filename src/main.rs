use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use resume_pdf::{Error, FontSet, LayoutOptions, markdown, output_file_name, preview};

#[derive(Parser)]
#[command(version, about = "Lay out a markdown-style resume as a paginated PDF")]
struct Cli {
    /// Resume text file
    input: PathBuf,

    /// Output path (defaults to <input stem>_modified.pdf next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TrueType font for body text instead of built-in Helvetica
    #[arg(long, env = "RESUME_PDF_FONT")]
    font: Option<PathBuf>,

    /// TrueType font for bold text (defaults to --font)
    #[arg(long, env = "RESUME_PDF_BOLD_FONT", requires = "font")]
    bold_font: Option<PathBuf>,

    /// Also write an HTML preview to FILE
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Print the classified blocks and exit
    #[arg(long)]
    dump_blocks: bool,
}

fn default_output(input: &Path) -> PathBuf {
    input.with_file_name(output_file_name(input.file_name().and_then(|n| n.to_str())))
}

fn run(cli: &Cli) -> Result<(), Error> {
    let text = std::fs::read_to_string(&cli.input)?;

    if cli.dump_blocks {
        for block in markdown::parse(&text) {
            println!("{block:?}");
        }
        return Ok(());
    }

    if let Some(path) = &cli.html {
        std::fs::write(path, preview::render_html(&markdown::parse(&text)))?;
        log::info!("Wrote preview {}", path.display());
    }

    let fonts = match &cli.font {
        Some(regular) => FontSet::from_files(regular, cli.bold_font.as_deref())?,
        None => FontSet::default(),
    };
    let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
    let bytes = resume_pdf::convert_str_to_pdf(&text, &LayoutOptions::default(), &fonts)?;
    std::fs::write(&output, bytes)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
