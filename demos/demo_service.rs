//! demo_service - Print the WiX source for a Windows service installer.
//!
//! This demo builds the object model for a small 64-bit service package: the
//! service executable with its `ServiceInstall`/`ServiceControl` pair, a
//! config file, a Start Menu shortcut to the bundled README, an upgrade table
//! that removes older releases, and a single feature. The resulting XML is
//! printed to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example demo_service [--compact]
//! ```

use std::env;
use std::process;

use uuid::Uuid;
use wixgen::objects::{
    MajorUpgrade, Product, RemoveExistingProducts, UpgradeVersion, Wix, YesNoType,
};
use wixgen::writer::{WixWriter, WriterConfig};

const SERVICE_NAME: &str = "AcmeSync";

fn build_product() -> Product {
    // Fixed GUIDs keep the output reproducible between runs.
    let upgrade_code = Uuid::from_u128(0x6f1c_0a52_9d1e_4b7a_8c3f_2e5d_7a9b_0c14);
    let mut product = Product::new("Acme Sync", "Acme Corp", "2.3.0", upgrade_code);

    let package = product.set_package("Acme Corp");
    package.description = Some("Acme Sync background service".to_string());
    package.install_scope = Some("perMachine".to_string());
    package.platform = Some("x64".to_string());

    product.add_major_upgrade(MajorUpgrade {
        downgrade_error_message: Some("A newer version of Acme Sync is installed.".to_string()),
        ..Default::default()
    });
    product.add_upgrade(upgrade_code).add_version(UpgradeVersion {
        property: "PREVIOUSVERSIONSINSTALLED".to_string(),
        minimum: Some("1.0.0".to_string()),
        include_minimum: YesNoType::Yes,
        maximum: Some("2.3.0".to_string()),
        include_maximum: YesNoType::No,
        ..Default::default()
    });
    product
        .install_execute_sequence_mut()
        .add_remove_existing_products(RemoveExistingProducts::after("InstallInitialize"));
    product.add_media_template();
    product.add_property("ARPHELPLINK", "https://acme.example/sync");

    let target = product.add_target_directory();
    let install_dir = target
        .add_program_files_subdir(true)
        .add_subdir("ACMEDIR", "Acme")
        .add_subdir("INSTALLDIR", "Sync");

    let service = install_dir.add_component(
        "SyncService",
        Uuid::from_u128(0x0b8e_44a1_5c6d_4e2f_9a7b_1d3c_5e7f_9a01),
        true,
    );
    let exe = service.add_file("SyncServiceExe", r"build\release\acme-sync.exe");
    exe.vital = YesNoType::Yes;

    let install = service.add_service_install("SyncServiceInstall", SERVICE_NAME);
    install.display_name = "Acme Sync".to_string();
    install.description = Some("Keeps Acme workspaces in sync".to_string());
    install.start = Some("auto".to_string());
    install.error_control = Some("normal".to_string());
    install.service_type = Some("ownProcess".to_string());
    service
        .add_service_control("SyncServiceControl", SERVICE_NAME)
        .wait = YesNoType::Yes;

    install_dir
        .add_component(
            "SyncConfig",
            Uuid::from_u128(0x3a4b_5c6d_7e8f_4a1b_8c2d_3e4f_5a6b_7c8d),
            true,
        )
        .add_file("SyncConfigToml", r"build\release\sync.toml");

    let readme = install_dir
        .add_component(
            "SyncReadme",
            Uuid::from_u128(0x9f8e_7d6c_5b4a_4392_8170_6f5e_4d3c_2b1a),
            true,
        )
        .add_file("SyncReadmeTxt", r"build\release\README.txt");
    readme.add_shortcut("SyncReadmeShortcut", "ProgramMenuFolder", "Acme Sync README");

    target.add_subdir("ProgramMenuFolder", "");

    product
        .add_feature("Complete", 1, "Acme Sync", "The Acme Sync service")
        .add_component_refs(["SyncService", "SyncConfig", "SyncReadme"]);

    product
}

fn main() {
    let compact = env::args().skip(1).any(|arg| arg == "--compact");
    let config = if compact {
        WriterConfig::compact()
    } else {
        WriterConfig::default()
    };

    let doc = Wix::new(build_product());
    match WixWriter::with_config(config).write_to_string(&doc) {
        Ok(xml) => println!("{}", xml),
        Err(e) => {
            eprintln!("Error writing WiX source: {}", e);
            process::exit(1);
        }
    }
}
