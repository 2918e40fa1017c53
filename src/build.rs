//! Two-stage MSI build: `candle` compiles the WiX source to an object file,
//! `light` links the object file into the MSI.
//!
//! [`Builder`] serializes a [`Wix`] document, writes it as `<base>.wsx` into
//! the working directory (only if it changed, see [`write_file_if_changed`]),
//! then runs `candle <args> <base>.wsx` and `light <args> <base>.wixobj` in
//! that directory. Each stage blocks until the process exits and the first
//! failure ends the pipeline. Intermediate files are left in place.
//!
//! Processes are started through the [`ProcessRunner`] trait; [`SystemRunner`]
//! is the real implementation and passes stdout/stderr through to the host.
//!
//! # Example
//!
//! ```rust,no_run
//! use uuid::Uuid;
//! use wixgen::build::Builder;
//! use wixgen::objects::{Product, Wix};
//!
//! let product = Product::new("My App", "Acme", "1.0.0", Uuid::new_v4());
//!
//! let mut builder = Builder::new("target/msi", "my-app");
//! builder.add_candle_args(["-arch", "x64"]);
//! builder.add_light_args(["-ext", "WixUIExtension", "-out", "my-app.msi"]);
//! builder.run(&Wix::new(product)).unwrap();
//! ```

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fs::write_file_if_changed;
use crate::objects::Wix;
use crate::writer::{WixWriter, WriterConfig};

/// Environment variable naming the WiX toolset install directory.
pub const WIX_ENV_VAR: &str = "WIX";

/// Name of the compiler stage binary.
pub const CANDLE: &str = "candle";

/// Name of the linker stage binary.
pub const LIGHT: &str = "light";

/// Extension of the generated WiX source.
pub const WSX_EXTENSION: &str = "wsx";

/// Extension of the object file produced by `candle`.
pub const WIXOBJ_EXTENSION: &str = "wixobj";

/// Returns `$WIX/bin`, or an empty path (binaries resolved via `PATH`) when
/// the variable is unset or empty.
pub fn binary_dir_from_env() -> PathBuf {
    binary_dir_from(std::env::var_os(WIX_ENV_VAR))
}

fn binary_dir_from(install_dir: Option<OsString>) -> PathBuf {
    match install_dir {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir).join("bin"),
        _ => PathBuf::new(),
    }
}

/// Exit status of an external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    code: Option<i32>,
}

impl ProcessStatus {
    /// A process that exited with `code`.
    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// A process that ended without an exit code (killed by a signal).
    pub fn terminated() -> Self {
        Self { code: None }
    }

    /// Returns true if the process exited with code 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Returns the exit code, if there is one.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "no exit code (terminated by signal)"),
        }
    }
}

/// Starts external processes and waits for them.
pub trait ProcessRunner {
    /// Runs `program` with `args` in `work_dir` and waits for it to exit.
    ///
    /// An `Err` means the process could not be started at all.
    fn run(&mut self, program: &Path, args: &[String], work_dir: &Path)
        -> std::io::Result<ProcessStatus>;
}

/// Runs processes for real, inheriting stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &mut self,
        program: &Path,
        args: &[String],
        work_dir: &Path,
    ) -> std::io::Result<ProcessStatus> {
        let status = Command::new(program)
            .args(args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;
        Ok(status.into())
    }
}

/// How far a build has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Nothing written yet
    Unbuilt,
    /// The `.wsx` source is on disk
    XmlWritten,
    /// Both stages succeeded
    Compiled,
}

/// Produces MSI files from a [`Wix`] document.
#[derive(Debug, Clone)]
pub struct Builder {
    work_dir: PathBuf,
    binary_dir: PathBuf,
    wsx_file: String,
    wixobj_file: String,
    candle_args: Vec<String>,
    light_args: Vec<String>,
    writer_config: WriterConfig,
    state: BuildState,
}

impl Builder {
    /// Creates a builder that writes `<base_name>.wsx` into `work_dir`.
    ///
    /// The binary directory is taken from the `WIX` environment variable.
    pub fn new(work_dir: impl Into<PathBuf>, base_name: &str) -> Self {
        Self {
            work_dir: work_dir.into(),
            binary_dir: binary_dir_from_env(),
            wsx_file: format!("{}.{}", base_name, WSX_EXTENSION),
            wixobj_file: format!("{}.{}", base_name, WIXOBJ_EXTENSION),
            candle_args: Vec::new(),
            light_args: Vec::new(),
            writer_config: WriterConfig::default(),
            state: BuildState::Unbuilt,
        }
    }

    /// Sets the directory containing `candle` and `light`.
    ///
    /// An empty path means the binaries are looked up on `PATH`.
    pub fn with_binary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.binary_dir = dir.into();
        self
    }

    /// Sets the XML writer configuration used for the `.wsx` file.
    pub fn with_writer_config(mut self, config: WriterConfig) -> Self {
        self.writer_config = config;
        self
    }

    /// Adds flags and arguments passed to `candle` before the source file.
    pub fn add_candle_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.candle_args.extend(args.into_iter().map(Into::into));
    }

    /// Adds flags and arguments passed to `light` before the object file.
    pub fn add_light_args<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.light_args.extend(args.into_iter().map(Into::into));
    }

    /// Working directory of both stages.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory the binaries are resolved from.
    pub fn binary_dir(&self) -> &Path {
        &self.binary_dir
    }

    /// Full path of the generated `.wsx` file.
    pub fn wsx_path(&self) -> PathBuf {
        self.work_dir.join(&self.wsx_file)
    }

    /// Full path of the `.wixobj` file `candle` produces.
    pub fn wixobj_path(&self) -> PathBuf {
        self.work_dir.join(&self.wixobj_file)
    }

    /// Current pipeline state.
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Path of a toolset binary, with the platform executable suffix.
    pub fn tool_path(&self, name: &str) -> PathBuf {
        self.binary_dir
            .join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
    }

    /// Builds the MSI using the real toolset.
    pub fn run(&mut self, doc: &Wix) -> Result<()> {
        self.run_with(doc, &mut SystemRunner)
    }

    /// Serializes `doc` and writes it to [`wsx_path`](Self::wsx_path) if it
    /// changed, without running the toolset.
    ///
    /// Returns whether the file was written. On success the builder is in
    /// [`BuildState::XmlWritten`].
    pub fn write_source(&mut self, doc: &Wix) -> Result<bool> {
        self.state = BuildState::Unbuilt;

        let xml = WixWriter::with_config(self.writer_config.clone()).write_to_vec(doc)?;
        let wsx_path = self.wsx_path();
        let written = write_file_if_changed(&wsx_path, &xml)?;
        if written {
            info!(path = %wsx_path.display(), "wrote WiX source");
        } else {
            debug!(path = %wsx_path.display(), "WiX source unchanged");
        }
        self.state = BuildState::XmlWritten;
        Ok(written)
    }

    /// Builds the MSI, starting processes through `runner`.
    pub fn run_with<R: ProcessRunner + ?Sized>(&mut self, doc: &Wix, runner: &mut R) -> Result<()> {
        self.write_source(doc)?;

        self.run_stage(runner, CANDLE, &self.candle_args, &self.wsx_file)?;
        self.run_stage(runner, LIGHT, &self.light_args, &self.wixobj_file)?;

        self.state = BuildState::Compiled;
        Ok(())
    }

    fn run_stage<R: ProcessRunner + ?Sized>(
        &self,
        runner: &mut R,
        name: &str,
        extra_args: &[String],
        input: &str,
    ) -> Result<()> {
        let program = self.tool_path(name);
        let mut args = extra_args.to_vec();
        args.push(input.to_string());

        info!(stage = name, input, "running");
        debug!(program = %program.display(), ?args, work_dir = %self.work_dir.display());

        let status = runner
            .run(&program, &args, &self.work_dir)
            .map_err(|source| {
                warn!(stage = name, error = %source, "failed to launch");
                Error::ProcessLaunch {
                    program: program.display().to_string(),
                    source,
                }
            })?;

        if !status.success() {
            warn!(stage = name, %status, "stage failed");
            return Err(Error::ProcessFailed {
                program: program.display().to_string(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Product;
    use std::collections::VecDeque;
    use std::fs;
    use uuid::Uuid;

    /// Records invocations and replays canned outcomes (`None` = launch failure).
    #[derive(Default)]
    struct RecordingRunner {
        calls: Vec<(PathBuf, Vec<String>, PathBuf)>,
        outcomes: VecDeque<Option<i32>>,
    }

    impl RecordingRunner {
        fn with_outcomes(outcomes: impl IntoIterator<Item = Option<i32>>) -> Self {
            Self {
                calls: Vec::new(),
                outcomes: outcomes.into_iter().collect(),
            }
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(
            &mut self,
            program: &Path,
            args: &[String],
            work_dir: &Path,
        ) -> std::io::Result<ProcessStatus> {
            self.calls
                .push((program.to_path_buf(), args.to_vec(), work_dir.to_path_buf()));
            match self.outcomes.pop_front().unwrap_or(Some(0)) {
                Some(code) => Ok(ProcessStatus::from_code(code)),
                None => Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "program not found",
                )),
            }
        }
    }

    fn doc() -> Wix {
        let mut p = Product::new("App", "Acme", "1.0.0", Uuid::nil());
        p.set_package("Acme");
        Wix::new(p)
    }

    fn builder(dir: &Path) -> Builder {
        Builder::new(dir, "app").with_binary_dir("wix/bin")
    }

    fn exe(name: &str) -> PathBuf {
        Path::new("wix/bin").join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
    }

    #[test]
    fn test_binary_dir_from() {
        assert_eq!(binary_dir_from(None), PathBuf::new());
        assert_eq!(binary_dir_from(Some(OsString::new())), PathBuf::new());
        assert_eq!(
            binary_dir_from(Some(OsString::from("/opt/wix"))),
            Path::new("/opt/wix").join("bin")
        );
    }

    #[test]
    fn test_tool_path_on_path_when_no_binary_dir() {
        let b = Builder::new(".", "app").with_binary_dir("");
        assert_eq!(
            b.tool_path(CANDLE),
            PathBuf::from(format!("candle{}", std::env::consts::EXE_SUFFIX))
        );
    }

    #[test]
    fn test_successful_build_runs_both_stages() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(dir.path());
        b.add_candle_args(["-arch", "x64"]);
        b.add_light_args(["-out", "app.msi"]);
        let mut runner = RecordingRunner::default();

        b.run_with(&doc(), &mut runner).unwrap();

        assert_eq!(b.state(), BuildState::Compiled);
        assert_eq!(runner.calls.len(), 2);
        assert_eq!(runner.calls[0].0, exe(CANDLE));
        assert_eq!(runner.calls[0].1, vec!["-arch", "x64", "app.wsx"]);
        assert_eq!(runner.calls[0].2, dir.path());
        assert_eq!(runner.calls[1].0, exe(LIGHT));
        assert_eq!(runner.calls[1].1, vec!["-out", "app.msi", "app.wixobj"]);

        let xml = fs::read_to_string(b.wsx_path()).unwrap();
        assert!(xml.contains("<Product Name=\"App\""));
        assert_eq!(b.wixobj_path(), dir.path().join("app.wixobj"));
    }

    #[test]
    fn test_candle_failure_skips_light() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(dir.path());
        let mut runner = RecordingRunner::with_outcomes([Some(1)]);

        let err = b.run_with(&doc(), &mut runner).unwrap_err();

        assert_eq!(runner.calls.len(), 1);
        match err {
            Error::ProcessFailed { program, status } => {
                assert!(program.contains(CANDLE));
                assert_eq!(status.code(), Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(b.state(), BuildState::XmlWritten);
        // source stays on disk for inspection
        assert!(b.wsx_path().exists());
    }

    #[test]
    fn test_candle_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(dir.path());
        let mut runner = RecordingRunner::with_outcomes([None]);

        let err = b.run_with(&doc(), &mut runner).unwrap_err();

        assert!(matches!(err, Error::ProcessLaunch { .. }));
        assert!(err.to_string().contains("failed to launch"));
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn test_light_failure_is_final_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(dir.path());
        let mut runner = RecordingRunner::with_outcomes([Some(0), Some(2)]);

        let err = b.run_with(&doc(), &mut runner).unwrap_err();

        assert_eq!(runner.calls.len(), 2);
        assert!(matches!(err, Error::ProcessFailed { ref program, .. } if program.contains(LIGHT)));
        assert_eq!(b.state(), BuildState::XmlWritten);
    }

    #[test]
    fn test_unwritable_work_dir_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(&dir.path().join("missing"));
        let mut runner = RecordingRunner::default();

        let err = b.run_with(&doc(), &mut runner).unwrap_err();

        assert!(matches!(err, Error::Io(_)));
        assert!(runner.calls.is_empty());
        assert_eq!(b.state(), BuildState::Unbuilt);
    }

    #[test]
    fn test_rebuild_keeps_unchanged_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(dir.path());
        b.run_with(&doc(), &mut RecordingRunner::default()).unwrap();

        let old = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(b.wsx_path())
            .unwrap()
            .set_modified(old)
            .unwrap();
        let before = fs::metadata(b.wsx_path()).unwrap().modified().unwrap();

        b.run_with(&doc(), &mut RecordingRunner::default()).unwrap();
        assert_eq!(fs::metadata(b.wsx_path()).unwrap().modified().unwrap(), before);
    }

    #[test]
    fn test_write_source_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut b = builder(dir.path())
            .with_writer_config(WriterConfig::compact().with_xml_declaration(false));

        assert!(b.write_source(&doc()).unwrap());
        assert_eq!(b.state(), BuildState::XmlWritten);
        assert!(!b.wixobj_path().exists());

        let xml = fs::read_to_string(b.wsx_path()).unwrap();
        assert!(xml.starts_with("<Wix xmlns="));
        assert!(!xml.contains('\n'));

        // unchanged document is not rewritten
        assert!(!b.write_source(&doc()).unwrap());
        assert_eq!(b.state(), BuildState::XmlWritten);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(ProcessStatus::from_code(3).to_string(), "exit code 3");
        assert!(!ProcessStatus::terminated().success());
        assert!(ProcessStatus::from_code(0).success());
    }
}
