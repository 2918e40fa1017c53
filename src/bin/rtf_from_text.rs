//! rtf_from_text - Convert a plain text file to RTF.
//!
//! Installer license dialogs only display RTF. This tool converts a plain
//! text file (typically a LICENSE) and writes the result next to the WiX
//! sources, leaving the output untouched when nothing changed.
//!
//! # Usage
//!
//! ```bash
//! rtf_from_text [OPTIONS] <INPUT> [OUTPUT]
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Print RTF to stdout
//! rtf_from_text LICENSE
//!
//! # Write License.rtf with blank lines between paragraphs
//! rtf_from_text --gap LICENSE target/msi/License.rtf
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wixgen::{fs::write_file_if_changed, rtf};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert a plain text file to RTF.
#[derive(Parser, Debug)]
#[command(name = "rtf_from_text")]
#[command(version = VERSION)]
#[command(about = "Convert a plain text file to RTF for installer dialogs")]
struct Args {
    /// Plain text input file
    input: PathBuf,

    /// Output file (defaults to stdout)
    output: Option<PathBuf>,

    /// Put an empty line between paragraphs
    #[arg(long)]
    gap: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.debug);

    let text = fs::read_to_string(&args.input)?;
    // Windows line endings would otherwise leave a stray \r before every \par
    let text = text.replace("\r\n", "\n");
    debug!(input = %args.input.display(), bytes = text.len(), "read plain text");

    let converted = rtf::from_plain_text(&text, args.gap);

    match args.output {
        Some(path) => {
            if write_file_if_changed(&path, converted.as_bytes())? {
                info!(output = %path.display(), "wrote RTF");
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(converted.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}
