//! dir_to_msi - Package a directory tree as an MSI.
//!
//! This tool walks a directory, mirrors it under
//! `ProgramFiles[64]Folder\<name>` with one component per file, writes the
//! WiX source and runs `candle` and `light` on it.
//!
//! Identifiers are assigned in sorted walk order and component GUIDs are
//! UUIDv5 values derived from the upgrade code and each file's relative path,
//! so the same tree always produces the same source and GUIDs stay stable
//! between releases. `File/@Source` paths are written relative to the output
//! directory, which is where `candle` runs.
//!
//! # Usage
//!
//! ```bash
//! dir_to_msi [OPTIONS] --name <NAME> --manufacturer <MANUFACTURER> <PATH>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Package a release directory (WIX must point at the toolset)
//! dir_to_msi --name "My App" --manufacturer Acme --version 1.2.0 --win64 dist/
//!
//! # Only write the .wsx, with a license page
//! dir_to_msi --name "My App" --manufacturer Acme --license LICENSE --no-build dist/
//!
//! # Pass extra flags through to the toolset
//! dir_to_msi --name "My App" --manufacturer Acme --light-arg=-sval dist/
//! ```

use std::fs;
use std::io;
use std::path::{self, Component, Path, PathBuf};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use walkdir::WalkDir;

use wixgen::build::Builder;
use wixgen::fs::write_file_if_changed;
use wixgen::objects::{Directory, MajorUpgrade, Product, Wix};
use wixgen::rtf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the converted license inside the output directory
const LICENSE_RTF: &str = "License.rtf";

/// Package a directory tree as an MSI.
#[derive(Parser, Debug)]
#[command(name = "dir_to_msi")]
#[command(version = VERSION)]
#[command(about = "Package a directory tree as an MSI using the WiX toolset")]
#[command(long_about = "Walks a directory, generates WiX source with one component per \
    file, and compiles it with candle and light. The toolset is located through the WIX \
    environment variable, or PATH if it is unset.")]
struct Args {
    /// Directory to package
    path: PathBuf,

    /// Product name
    #[arg(long)]
    name: String,

    /// Manufacturer name
    #[arg(long)]
    manufacturer: String,

    /// Product version
    #[arg(long, default_value = "1.0.0")]
    version: String,

    /// Upgrade code (derived from manufacturer and name if omitted)
    #[arg(long)]
    upgrade_code: Option<Uuid>,

    /// Install into the 64-bit Program Files folder
    #[arg(long)]
    win64: bool,

    /// Working directory for the generated files
    #[arg(short, long, default_value = "target/msi")]
    out_dir: PathBuf,

    /// Base file name of the .wsx/.wixobj files (derived from the name if omitted)
    #[arg(long)]
    base_name: Option<String>,

    /// Plain text license shown on a license page
    #[arg(long)]
    license: Option<PathBuf>,

    /// Extra argument for candle (can be specified multiple times)
    #[arg(long = "candle-arg", value_name = "ARG", allow_hyphen_values = true)]
    candle_args: Vec<String>,

    /// Extra argument for light (can be specified multiple times)
    #[arg(long = "light-arg", value_name = "ARG", allow_hyphen_values = true)]
    light_args: Vec<String>,

    /// Only write the WiX source, do not run the toolset
    #[arg(long)]
    no_build: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Removes `.` and folds `..` into the preceding component, without touching
/// the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir if matches!(parts.last(), Some(Component::Normal(_))) => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    parts.iter().collect()
}

/// Expresses the absolute `path` relative to the absolute directory `base`.
///
/// Paths on a different root (another drive) are returned unchanged.
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    let path: Vec<_> = path.components().collect();
    let base: Vec<_> = base.components().collect();
    if path.first() != base.first() {
        return path.iter().collect();
    }

    let common = path.iter().zip(&base).take_while(|(a, b)| a == b).count();
    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for part in &path[common..] {
        rel.push(part);
    }
    rel
}

/// Identifier allocation and collected component ids for one walk.
struct Harvest {
    upgrade_code: Uuid,
    win64: bool,
    /// Directory `File/@Source` paths are relative to
    source_base: PathBuf,
    next: usize,
    component_ids: Vec<String>,
}

impl Harvest {
    fn new(upgrade_code: Uuid, win64: bool, source_base: PathBuf) -> Self {
        Self {
            upgrade_code,
            win64,
            source_base,
            next: 0,
            component_ids: Vec::new(),
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next += 1;
        format!("{}{:05}", prefix, self.next)
    }

    /// Mirrors `dir` (somewhere below `root`) into `target`.
    fn walk(&mut self, dir: &Path, root: &Path, target: &mut Directory) -> Result<(), walkdir::Error> {
        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if entry.file_type().is_dir() {
                let id = self.next_id("dir");
                let sub = target.add_subdir(id, name);
                self.walk(entry.path(), root, sub)?;
            } else if entry.file_type().is_file() {
                let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                let rel = rel.to_string_lossy().replace('\\', "/");
                let guid = Uuid::new_v5(&self.upgrade_code, rel.as_bytes());

                let source = relative_to(entry.path(), &self.source_base);
                let component_id = self.next_id("cmp");
                let file_id = self.next_id("fil");
                debug!(
                    file = %rel,
                    source = %source.display(),
                    component = %component_id,
                    %guid,
                    "harvested"
                );

                target
                    .add_component(component_id.clone(), guid, self.win64)
                    .add_file(file_id, source.to_string_lossy());
                self.component_ids.push(component_id);
            } else {
                debug!(path = %entry.path().display(), "skipping non-regular file");
            }
        }
        Ok(())
    }
}

/// Turns a product name into something usable as a file name.
fn base_name_for(name: &str) -> String {
    let base: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if base.is_empty() {
        "product".to_string()
    } else {
        base
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.debug);

    // canonicalize would yield verbatim `\\?\` paths on Windows
    let root = path::absolute(&args.path)?;
    if !root.is_dir() {
        return Err(format!("{} is not a directory", root.display()).into());
    }
    let upgrade_code = args.upgrade_code.unwrap_or_else(|| {
        let key = format!("{}/{}", args.manufacturer, args.name);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
    });
    let base_name = args
        .base_name
        .clone()
        .unwrap_or_else(|| base_name_for(&args.name));
    fs::create_dir_all(&args.out_dir)?;
    let work_dir = path::absolute(&args.out_dir)?;

    let mut product = Product::new(&args.name, &args.manufacturer, &args.version, upgrade_code);
    let package = product.set_package(&args.manufacturer);
    package.install_scope = Some("perMachine".to_string());
    if args.win64 {
        package.platform = Some("x64".to_string());
    }
    product.add_major_upgrade(MajorUpgrade {
        downgrade_error_message: Some(format!(
            "A newer version of {} is already installed.",
            args.name
        )),
        ..Default::default()
    });
    product.add_media_template();

    let mut harvest = Harvest::new(upgrade_code, args.win64, work_dir.clone());
    let install_dir = product
        .add_target_directory()
        .add_program_files_subdir(args.win64)
        .add_subdir("INSTALLDIR", &args.name);
    harvest.walk(&root, &root, install_dir)?;
    info!(
        components = harvest.component_ids.len(),
        root = %root.display(),
        "harvested directory"
    );

    product
        .add_feature("Complete", 1, &args.name, "")
        .add_component_refs(harvest.component_ids);

    let mut builder = Builder::new(&work_dir, &base_name);
    builder.add_candle_args(args.candle_args);
    builder.add_light_args(args.light_args);

    if let Some(ref license) = args.license {
        let text = fs::read_to_string(license)?.replace("\r\n", "\n");
        let converted = rtf::from_plain_text(&text, false);
        write_file_if_changed(work_dir.join(LICENSE_RTF), converted.as_bytes())?;
        product.add_wix_variable("WixUILicenseRtf", LICENSE_RTF);
        product.add_ui_ref("WixUI_Minimal");
        builder.add_light_args(["-ext", "WixUIExtension"]);
    }

    let doc = Wix::new(product);

    if args.no_build {
        builder.write_source(&doc)?;
        return Ok(());
    }

    builder.run(&doc)?;
    info!(dir = %work_dir.display(), "build finished");

    Ok(())
}
