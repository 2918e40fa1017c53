//! demo_build - Run the full candle/light pipeline for a one-file package.
//!
//! The demo writes a tiny payload and a license into a working directory,
//! generates the WiX source for it and invokes the toolset found through the
//! `WIX` environment variable. Running it twice shows the change-aware
//! writes: the second run leaves the `.wsx` untouched.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_build [work_dir]
//! ```
//!
//! The working directory defaults to `target/demo_build`.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use uuid::Uuid;
use wixgen::build::{BuildState, Builder};
use wixgen::error::Error;
use wixgen::fs::write_file_if_changed;
use wixgen::objects::{Product, Wix};
use wixgen::rtf;

const LICENSE: &str = "Copyright (c) Acme Corp\n\nPermission is granted to use this demo {freely}.\n";

fn build_doc(payload: &str) -> Wix {
    let upgrade_code = Uuid::from_u128(0x1d2c_3b4a_5f6e_4d8c_9b0a_1f2e_3d4c_5b6a);
    let mut product = Product::new("Hello Demo", "Acme Corp", "0.1.0", upgrade_code);
    product.set_package("Acme Corp");
    product.add_media_template();
    product.add_wix_variable("WixUILicenseRtf", "License.rtf");
    product.add_ui_ref("WixUI_Minimal");

    product
        .add_target_directory()
        .add_program_files_subdir(false)
        .add_subdir("INSTALLDIR", "Hello Demo")
        .add_component(
            "Hello",
            Uuid::new_v5(&upgrade_code, payload.as_bytes()),
            false,
        )
        .add_file("HelloTxt", payload);

    product
        .add_feature("Complete", 1, "Hello Demo", "")
        .add_component_refs(["Hello"]);

    Wix::new(product)
}

fn run(work_dir: PathBuf) -> Result<BuildState, Error> {
    fs::create_dir_all(&work_dir)?;
    write_file_if_changed(work_dir.join("hello.txt"), b"Hello from wixgen\n")?;
    write_file_if_changed(
        work_dir.join("License.rtf"),
        rtf::from_plain_text(LICENSE, false).as_bytes(),
    )?;

    let mut builder = Builder::new(&work_dir, "hello-demo");
    builder.add_light_args(["-ext", "WixUIExtension", "-out", "hello-demo.msi"]);
    println!("candle: {}", builder.tool_path("candle").display());
    println!("light:  {}", builder.tool_path("light").display());

    let result = builder.run(&build_doc("hello.txt"));
    let state = builder.state();
    result.map(|()| state).map_err(|e| {
        eprintln!("Pipeline stopped in state {:?}", state);
        e
    })
}

fn main() {
    let work_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/demo_build"));

    match run(work_dir.clone()) {
        Ok(state) => println!(
            "Built {} ({:?})",
            work_dir.join("hello-demo.msi").display(),
            state
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
