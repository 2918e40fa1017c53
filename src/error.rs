//! Error types for the wixgen library.

use thiserror::Error;

use crate::build::ProcessStatus;

/// Errors that can occur when generating or building WiX sources.
#[derive(Error, Debug)]
pub enum Error {
    /// XML serialization error, including failures of the sink the
    /// document is written to
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized document was not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A tri-state enumeration was given a value outside its declared set
    #[error("invalid {kind} value: {value}")]
    InvalidEnumValue {
        /// Name of the enumeration type
        kind: &'static str,
        /// The rejected value, as given
        value: String,
    },

    /// An external compiler stage could not be started
    #[error("failed to launch {program}: {source}")]
    ProcessLaunch {
        /// Program that was being launched
        program: String,
        /// Underlying launch error
        #[source]
        source: std::io::Error,
    },

    /// An external compiler stage ran but reported failure
    #[error("{program} failed with {status}")]
    ProcessFailed {
        /// Program that failed
        program: String,
        /// Exit status reported by the process
        status: ProcessStatus,
    },
}

/// Result type alias for wixgen operations.
pub type Result<T> = std::result::Result<T, Error>;
