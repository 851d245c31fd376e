//! mdstyle - Markdown to styled HTML, PDF, and DOCX

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use mdstyle::config::CliSettings;
use mdstyle::{Config, Error, Output, OutputFormat};

#[derive(Parser)]
#[command(name = "mdstyle")]
#[command(
    version,
    about = "Convert Markdown into styled HTML, PDF, and DOCX",
    long_about = None
)]
#[command(after_help = "EXAMPLES:
    mdstyle notes.md                      Write notes.html
    mdstyle notes.md -f docx -f pdf       Write notes.docx and notes.pdf
    mdstyle notes.md -o out/report.docx   Format taken from the extension
    cat notes.md | mdstyle - -f html      Read Markdown from stdin
    mdstyle --inspect notes.md            Print the extracted structure")]
struct Cli {
    /// Markdown file, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Treat INPUT as Markdown text instead of a path
    #[arg(long)]
    text: bool,

    /// Output file; with several formats only its stem is used
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format (repeat for several)
    #[arg(short = 'f', long = "format", value_enum, value_name = "FORMAT")]
    formats: Vec<OutputFormat>,

    /// Stylesheet replacing the default HTML styles
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Configuration file (default: ./mdstyle.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Document title
    #[arg(long)]
    title: Option<String>,

    /// Program used to render PDF
    #[arg(long, value_name = "PROGRAM")]
    pdf_engine: Option<String>,

    /// Print the structured document as JSON instead of converting
    #[arg(long)]
    inspect: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // -v enables INFO, -vv DEBUG, otherwise RUST_LOG or WARN
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested format succeeded.
fn run(cli: &Cli) -> Result<bool, Error> {
    let settings = CliSettings {
        title: cli.title.clone(),
        css_file: cli.css.clone(),
        pdf_program: cli.pdf_engine.clone(),
    };
    let config = Config::load(cli.config.as_deref(), Some(&settings))?;
    let converter = config.converter()?;
    let markdown = read_input(cli)?;

    if cli.inspect {
        let prepared = converter.prepare_bytes(&markdown)?;
        let json = serde_json::to_string_pretty(prepared.document()).map_err(json_error)?;
        println!("{json}");
        return Ok(true);
    }

    let formats = requested_formats(cli, &config);
    let mut all_ok = true;
    for (format, result) in converter.convert_all_bytes(&markdown, &formats) {
        let written = result.and_then(|output| {
            let path = output_path(cli, &output, formats.len());
            write_output(&path, &output)?;
            Ok(path)
        });
        match written {
            Ok(path) => {
                if !cli.quiet {
                    println!("Wrote {}", path.display());
                }
            }
            Err(e) => {
                all_ok = false;
                eprintln!("error: {format}: {e}");
            }
        }
    }
    Ok(all_ok)
}

fn read_input(cli: &Cli) -> Result<Vec<u8>, Error> {
    if cli.text {
        return Ok(cli.input.clone().into_bytes());
    }
    if cli.input == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read(&cli.input)?)
}

/// Writing JSON to a string only fails on serializer errors, which are I/O
/// from the caller's point of view.
fn json_error(e: serde_json::Error) -> Error {
    Error::Io(e.into())
}

/// Flags first, then the `-o` extension, then the config file, then HTML.
fn requested_formats(cli: &Cli, config: &Config) -> Vec<OutputFormat> {
    if !cli.formats.is_empty() {
        let mut formats = Vec::new();
        for &format in &cli.formats {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        return formats;
    }
    let from_extension = cli
        .output
        .as_deref()
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse::<OutputFormat>().ok());
    vec![
        from_extension
            .or(config.format)
            .unwrap_or(OutputFormat::Html),
    ]
}

fn output_path(cli: &Cli, output: &Output, format_count: usize) -> PathBuf {
    match &cli.output {
        Some(path) if format_count == 1 => path.clone(),
        Some(path) => path.with_extension(output.format.extension()),
        None => {
            let dir = if cli.text || cli.input == "-" {
                Path::new(".")
            } else {
                Path::new(&cli.input).parent().unwrap_or(Path::new("."))
            };
            dir.join(output.file_name(&input_stem(cli)))
        }
    }
}

/// File name up to the first dot; `output` for stdin and inline text.
fn input_stem(cli: &Cli) -> String {
    if cli.text || cli.input == "-" {
        return "output".to_string();
    }
    Path::new(&cli.input)
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("output")
        .to_string()
}

/// Bytes are complete before the file is created, so a failed format never
/// leaves a file behind.
fn write_output(path: &Path, output: &Output) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &output.bytes)?;
    Ok(())
}
