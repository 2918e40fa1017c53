//! Typed WiX source generation and MSI build orchestration for Rust.
//!
//! This crate builds Windows Installer packages with the WiX v3 toolset. You
//! describe the installer with a typed object model, the crate writes the WiX
//! XML and drives the external `candle`/`light` compiler.
//!
//! # Features
//!
//! - **Object Model**: Product, Package, Directory, Component, File, Feature,
//!   ServiceInstall/ServiceControl and friends, with `add_*` builder methods.
//! - **Writer**: Deterministic, schema-faithful XML output.
//! - **Change-aware writes**: Generated files are only rewritten when their
//!   content changes, so incremental builds stay incremental.
//! - **Build**: Runs `candle` then `light`, stopping at the first failure.
//! - **RTF**: Plain text to RTF for license dialogs.
//! - **Serde Support**: Optional serialization with the `serde` feature.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use uuid::Uuid;
//! use wixgen::build::Builder;
//! use wixgen::objects::{Product, Wix};
//!
//! let upgrade_code = Uuid::parse_str("5c4a1f7e-8d2b-4a6e-9f3c-1b2d3e4f5a6b").unwrap();
//! let mut product = Product::new("My Service", "Acme", "1.0.0", upgrade_code);
//! product.set_package("Acme");
//! product.add_media_template();
//!
//! let install_dir = product
//!     .add_target_directory()
//!     .add_program_files_subdir(true)
//!     .add_subdir("INSTALLDIR", "My Service");
//! let component = install_dir.add_component("Service", Uuid::new_v4(), true);
//! component.add_file("ServiceExe", "target/release/my-service.exe");
//! component.add_service_install("ServiceInstall", "MyService").display_name =
//!     "My Service".to_string();
//! component.add_service_control("ServiceControl", "MyService");
//!
//! product
//!     .add_feature("Complete", 1, "My Service", "")
//!     .add_component_refs(["Service"]);
//!
//! Builder::new("target/msi", "my-service")
//!     .run(&Wix::new(product))
//!     .unwrap();
//! ```
//!
//! # Module Structure
//!
//! - [`objects`] - WiX object model
//! - [`writer`] - XML serialization
//! - [`fs`] - Change-aware file writes
//! - [`build`] - candle/light orchestration
//! - [`rtf`] - Plain text to RTF conversion
//! - [`error`] - Error types
//!
//! # Optional Features
//!
//! - `serde` - Enable serde serialization/deserialization support
//! - `cli` - Build the `rtf_from_text` and `dir_to_msi` tools

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod build;
pub mod error;
pub mod fs;
pub mod objects;
pub mod rtf;
pub mod writer;

// Re-export commonly used types at the crate root
pub use build::{BuildState, Builder, ProcessRunner, ProcessStatus, SystemRunner};
pub use error::{Error, Result};
pub use fs::write_file_if_changed;
pub use objects::{
    Component, Directory, Feature, File, InstallUninstallType, Package, Product, Wix, YesNoType,
};
pub use writer::WixWriter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
