// src/main.rs

use std::fs::File;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pkla2js::{parse_document, parse_section, translate};

/// Convert polkit Local Authority (.pkla) configuration to polkit
/// JavaScript rules.
#[derive(Parser)]
#[command(name = "pkla2js", version, about)]
struct Cli {
    /// Input file, "-" for stdin.
    #[arg(value_name = "INPUT", default_value = "-")]
    input: String,

    /// Output file, "-" for stdout.
    #[arg(value_name = "OUTPUT", default_value = "-")]
    output: String,

    /// Print full diagnostic traces instead of a one-line message on failure.
    #[arg(short, long)]
    debug: bool,
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    } else {
        let mut text = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut text))
            .with_context(|| format!("failed to read '{path}'"))?;
        Ok(text)
    }
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        let file = File::create(path).with_context(|| format!("failed to open '{path}'"))?;
        Ok(Box::new(file))
    }
}

fn run(cli: &Cli) -> Result<()> {
    let text = read_input(&cli.input)?;
    let sections = parse_document(&text)?;
    let mut output = open_output(&cli.output)?;

    // Statements are written as they are produced, so a failing section
    // leaves the sections before it in the output, matching the original
    // converter's behavior.
    for section in &sections {
        let record =
            parse_section(section).with_context(|| format!("in section [{}]", section.name))?;
        let statement =
            translate(&record).with_context(|| format!("in section [{}]", section.name))?;
        output
            .write_all(statement.as_bytes())
            .and_then(|()| output.write_all(b"\n"))
            .context("failed to write output")?;
    }

    output.flush().context("failed to write output")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&cli) {
        if cli.debug {
            eprintln!("{err:?}");
        } else {
            eprintln!("{err:#}");
        }
        std::process::exit(1);
    }
}
