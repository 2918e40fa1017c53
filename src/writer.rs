//! WiX writer for serializing the object model to XML.
//!
//! This module renders a [`Wix`] document as WiX v3 source. The root element
//! declares [`XMLNS_WIX`]; children are written in collection order, so the
//! output is a pure function of the tree.
//!
//! Attribute presence follows the schema, field by field: required attributes
//! are always written (even when zero), optional ones are written only when
//! set. Optional [`YesNoType`] and [`InstallUninstallType`] attributes are
//! left out when `Unspecified`.
//!
//! # Example
//!
//! ```rust
//! use uuid::Uuid;
//! use wixgen::objects::{Product, Wix};
//! use wixgen::writer::WixWriter;
//!
//! let mut product = Product::new("My App", "Acme", "1.0.0", Uuid::new_v4());
//! product.set_package("Acme");
//! let install_dir = product
//!     .add_target_directory()
//!     .add_program_files_subdir(true)
//!     .add_subdir("INSTALLDIR", "My App");
//! install_dir
//!     .add_component("MainExe", Uuid::new_v4(), true)
//!     .add_file("MainExeFile", "target/release/app.exe");
//! product
//!     .add_feature("Complete", 1, "My App", "")
//!     .add_component_refs(["MainExe"]);
//!
//! let xml = WixWriter::new().write_to_string(&Wix::new(product)).unwrap();
//! println!("{}", xml);
//! ```

use crate::error::Result;
use crate::objects::{
    Component, ComponentRef, Directory, Feature, File, InstallExecuteSequence,
    InstallUninstallType, MajorUpgrade, MediaTemplate, Package, Product, Property,
    RemoveExistingProducts, ServiceControl, ServiceInstall, Shortcut, UIRef, Upgrade,
    UpgradeVersion, Wix, WixVariable, YesNoType, XMLNS_WIX,
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Write;
use tracing::warn;
use uuid::Uuid;

/// Configuration options for the WiX writer.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Whether to indent the output for readability
    pub indent: bool,
    /// Indentation string (default: two spaces)
    ///
    /// Must repeat a single ASCII character, such as `"  "` or `"\t"`; see
    /// [`WriterConfig::with_indent_string`].
    pub indent_string: String,
    /// Whether to include the XML declaration
    pub xml_declaration: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: true,
            indent_string: "  ".to_string(),
            xml_declaration: true,
        }
    }
}

impl WriterConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a compact configuration (no indentation).
    pub fn compact() -> Self {
        Self {
            indent: false,
            indent_string: String::new(),
            xml_declaration: true,
        }
    }

    /// Sets whether to indent the output.
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the indentation string used per nesting level.
    ///
    /// The string must be one ASCII character repeated, for example `"    "`
    /// or `"\t"`. A mixed string such as `"\t "` cannot be represented and
    /// is written as its first character repeated `len` times (a warning is
    /// logged when the document is written).
    pub fn with_indent_string(mut self, s: impl Into<String>) -> Self {
        self.indent_string = s.into();
        self
    }

    /// Sets whether to write the `<?xml ...?>` declaration.
    pub fn with_xml_declaration(mut self, xml_declaration: bool) -> Self {
        self.xml_declaration = xml_declaration;
        self
    }
}

/// Formats a GUID the way WiX v3 expects it: hyphenated and upper case.
fn guid_str(guid: &Uuid) -> String {
    guid.hyphenated().to_string().to_uppercase()
}

/// Attribute list for one element, with the schema's presence rules.
struct Attrs(BytesStart<'static>);

impl Attrs {
    fn new(name: &'static str) -> Self {
        Self(BytesStart::new(name))
    }

    /// Required attribute, always written.
    fn req(mut self, name: &str, value: &str) -> Self {
        self.0.push_attribute((name, value));
        self
    }

    /// Required numeric attribute, written even when zero.
    fn req_num(self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        self.req(name, &value)
    }

    /// Optional attribute, written when set.
    fn opt(self, name: &str, value: &Option<String>) -> Self {
        match value {
            Some(v) => self.req(name, v),
            None => self,
        }
    }

    /// Optional numeric attribute, written when set.
    fn opt_num<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.req_num(name, v),
            None => self,
        }
    }

    /// Optional yes/no attribute, written unless unspecified.
    fn yes_no(self, name: &str, value: YesNoType) -> Self {
        if value.is_specified() {
            self.req(name, value.as_str())
        } else {
            self
        }
    }

    /// Optional install/uninstall attribute, written unless unspecified.
    fn install_uninstall(self, name: &str, value: InstallUninstallType) -> Self {
        if value.is_specified() {
            self.req(name, value.as_str())
        } else {
            self
        }
    }
}

/// WiX XML writer.
///
/// Serializes a [`Wix`] document to WiX v3 source.
#[derive(Debug, Clone, Default)]
pub struct WixWriter {
    config: WriterConfig,
}

impl WixWriter {
    /// Creates a new writer with default configuration.
    pub fn new() -> Self {
        Self {
            config: WriterConfig::default(),
        }
    }

    /// Creates a new writer with the specified configuration.
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Writes a document to a string.
    pub fn write_to_string(&self, doc: &Wix) -> Result<String> {
        Ok(String::from_utf8(self.write_to_vec(doc)?)?)
    }

    /// Writes a document to a byte buffer.
    pub fn write_to_vec(&self, doc: &Wix) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(doc, &mut buffer)?;
        Ok(buffer)
    }

    /// Writes a document to any Write implementation.
    pub fn write<W: Write>(&self, doc: &Wix, writer: W) -> Result<()> {
        // quick-xml indents with one repeated byte
        let indent_char = self.config.indent_string.bytes().next().unwrap_or(b' ');
        if self.config.indent && !self.config.indent_string.bytes().all(|b| b == indent_char) {
            warn!(
                indent = ?self.config.indent_string,
                "indent string is not one repeated character, using its first byte"
            );
        }
        let mut xml_writer = if self.config.indent {
            Writer::new_with_indent(writer, indent_char, self.config.indent_string.len())
        } else {
            Writer::new(writer)
        };

        if self.config.xml_declaration {
            emit(&mut xml_writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }

        let root = Attrs::new("Wix").req("xmlns", XMLNS_WIX);
        match doc.product {
            Some(ref product) => {
                self.open(&mut xml_writer, root)?;
                self.write_product(&mut xml_writer, product)?;
                self.close(&mut xml_writer, "Wix")?;
            }
            None => self.empty(&mut xml_writer, root)?,
        }

        Ok(())
    }

    /// Writes the product and all of its collections in schema order.
    fn write_product<W: Write>(&self, writer: &mut Writer<W>, p: &Product) -> Result<()> {
        let attrs = Attrs::new("Product")
            .req("Name", &p.name)
            .req("Manufacturer", &p.manufacturer)
            .req("Id", &p.id)
            .req("UpgradeCode", &guid_str(&p.upgrade_code))
            .req_num("Language", p.language)
            .req_num("Codepage", p.codepage)
            .req("Version", &p.version);

        if p.is_empty() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;

        if let Some(ref package) = p.package {
            self.write_package(writer, package)?;
        }
        for upgrade in p.upgrades() {
            self.write_upgrade(writer, upgrade)?;
        }
        for major in p.major_upgrades() {
            self.write_major_upgrade(writer, major)?;
        }
        if let Some(ref seq) = p.install_execute_sequence {
            self.write_install_execute_sequence(writer, seq)?;
        }
        for feature in p.features() {
            self.write_feature(writer, feature)?;
        }
        for media in p.media_templates() {
            self.write_media_template(writer, media)?;
        }
        for ui_ref in p.ui_refs() {
            self.write_ui_ref(writer, ui_ref)?;
        }
        for var in p.wix_variables() {
            self.write_wix_variable(writer, var)?;
        }
        for property in p.properties() {
            self.write_property(writer, property)?;
        }
        for dir in p.directories() {
            self.write_directory(writer, dir)?;
        }

        self.close(writer, "Product")
    }

    fn write_package<W: Write>(&self, writer: &mut Writer<W>, p: &Package) -> Result<()> {
        let attrs = Attrs::new("Package")
            .req("Id", &p.id)
            .opt("Keywords", &p.keywords)
            .opt("Description", &p.description)
            .opt("Comments", &p.comments)
            .req("Manufacturer", &p.manufacturer)
            .opt_num("InstallerVersion", p.installer_version)
            .opt("InstallPrivileges", &p.install_privileges)
            .opt("InstallScope", &p.install_scope)
            .opt("Platform", &p.platform)
            .req_num("Languages", p.languages)
            .req("Compressed", p.compressed.as_str())
            .req_num("SummaryCodepage", p.summary_codepage);
        self.empty(writer, attrs)
    }

    fn write_upgrade<W: Write>(&self, writer: &mut Writer<W>, u: &Upgrade) -> Result<()> {
        let attrs = Attrs::new("Upgrade").req("Id", &guid_str(&u.id));
        if u.versions().next().is_none() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;
        for v in u.versions() {
            self.write_upgrade_version(writer, v)?;
        }
        self.close(writer, "Upgrade")
    }

    fn write_upgrade_version<W: Write>(
        &self,
        writer: &mut Writer<W>,
        v: &UpgradeVersion,
    ) -> Result<()> {
        let attrs = Attrs::new("UpgradeVersion")
            .req("Property", &v.property)
            .opt("Minimum", &v.minimum)
            .yes_no("IncludeMinimum", v.include_minimum)
            .opt("Maximum", &v.maximum)
            .yes_no("IncludeMaximum", v.include_maximum)
            .yes_no("OnlyDetect", v.only_detect)
            .opt("MigrateFeatures", &v.migrate_features)
            .opt("RemoveFeatures", &v.remove_features)
            .yes_no("IgnoreRemoveFailure", v.ignore_remove_failure);
        self.empty(writer, attrs)
    }

    fn write_major_upgrade<W: Write>(&self, writer: &mut Writer<W>, m: &MajorUpgrade) -> Result<()> {
        let attrs = Attrs::new("MajorUpgrade")
            .yes_no("AllowDowngrades", m.allow_downgrades)
            .yes_no("AllowSameVersionUpgrades", m.allow_same_version_upgrades)
            .yes_no("Disallow", m.disallow)
            .yes_no("IgnoreRemoveFailure", m.ignore_remove_failure)
            .yes_no("MigrateFeatures", m.migrate_features)
            .opt("RemoveFeatures", &m.remove_features)
            .opt("Schedule", &m.schedule)
            .opt("DowngradeErrorMessage", &m.downgrade_error_message);
        self.empty(writer, attrs)
    }

    fn write_install_execute_sequence<W: Write>(
        &self,
        writer: &mut Writer<W>,
        seq: &InstallExecuteSequence,
    ) -> Result<()> {
        let attrs = Attrs::new("InstallExecuteSequence");
        if seq.existing_product_removals().next().is_none() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;
        for r in seq.existing_product_removals() {
            self.write_remove_existing_products(writer, r)?;
        }
        self.close(writer, "InstallExecuteSequence")
    }

    fn write_remove_existing_products<W: Write>(
        &self,
        writer: &mut Writer<W>,
        r: &RemoveExistingProducts,
    ) -> Result<()> {
        let attrs = Attrs::new("RemoveExistingProducts")
            .opt("Before", &r.before)
            .opt("After", &r.after)
            .yes_no("Overridable", r.overridable)
            .opt_num("Sequence", r.sequence)
            .yes_no("Suppress", r.suppress);
        self.empty(writer, attrs)
    }

    /// Writes a feature, its component references and its subfeatures.
    fn write_feature<W: Write>(&self, writer: &mut Writer<W>, f: &Feature) -> Result<()> {
        let attrs = Attrs::new("Feature")
            .req("Id", &f.id)
            .req_num("Level", f.level)
            .opt("Title", &f.title)
            .opt("Description", &f.description)
            .opt("Display", &f.display)
            .opt("ConfigurableDirectory", &f.configurable_directory);

        if f.is_empty() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;
        for r in f.component_refs() {
            self.write_component_ref(writer, r)?;
        }
        for sub in f.subfeatures() {
            self.write_feature(writer, sub)?;
        }
        self.close(writer, "Feature")
    }

    fn write_component_ref<W: Write>(&self, writer: &mut Writer<W>, r: &ComponentRef) -> Result<()> {
        let attrs = Attrs::new("ComponentRef")
            .req("Id", &r.id)
            .yes_no("Primary", r.primary);
        self.empty(writer, attrs)
    }

    fn write_media_template<W: Write>(&self, writer: &mut Writer<W>, m: &MediaTemplate) -> Result<()> {
        let attrs = Attrs::new("MediaTemplate").req("EmbedCab", m.embed_cab.as_str());
        self.empty(writer, attrs)
    }

    fn write_ui_ref<W: Write>(&self, writer: &mut Writer<W>, u: &UIRef) -> Result<()> {
        self.empty(writer, Attrs::new("UIRef").req("Id", &u.id))
    }

    fn write_wix_variable<W: Write>(&self, writer: &mut Writer<W>, v: &WixVariable) -> Result<()> {
        let attrs = Attrs::new("WixVariable")
            .req("Id", &v.id)
            .req("Value", &v.value)
            .yes_no("Overridable", v.overridable);
        self.empty(writer, attrs)
    }

    fn write_property<W: Write>(&self, writer: &mut Writer<W>, p: &Property) -> Result<()> {
        let attrs = Attrs::new("Property")
            .req("Id", &p.id)
            .opt("Value", &p.value)
            .yes_no("Secure", p.secure);
        self.empty(writer, attrs)
    }

    /// Writes a directory: subdirectories first, then components.
    fn write_directory<W: Write>(&self, writer: &mut Writer<W>, d: &Directory) -> Result<()> {
        let attrs = Attrs::new("Directory").req("Id", &d.id).opt("Name", &d.name);

        if d.is_empty() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;
        for sub in d.subdirs() {
            self.write_directory(writer, sub)?;
        }
        for c in d.components() {
            self.write_component(writer, c)?;
        }
        self.close(writer, "Directory")
    }

    fn write_component<W: Write>(&self, writer: &mut Writer<W>, c: &Component) -> Result<()> {
        let attrs = Attrs::new("Component")
            .req("Id", &c.id)
            .req("Guid", &guid_str(&c.guid))
            .yes_no("Win64", c.win64);

        if c.is_empty() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;
        for f in c.files() {
            self.write_file(writer, f)?;
        }
        for s in c.service_installs() {
            self.write_service_install(writer, s)?;
        }
        for s in c.service_controls() {
            self.write_service_control(writer, s)?;
        }
        self.close(writer, "Component")
    }

    fn write_file<W: Write>(&self, writer: &mut Writer<W>, f: &File) -> Result<()> {
        let attrs = Attrs::new("File")
            .req("Id", &f.id)
            .req("Source", &f.source)
            .req("KeyPath", f.key_path.as_str())
            .yes_no("Checksum", f.checksum)
            .yes_no("Vital", f.vital);

        if f.shortcuts().next().is_none() {
            return self.empty(writer, attrs);
        }
        self.open(writer, attrs)?;
        for s in f.shortcuts() {
            self.write_shortcut(writer, s)?;
        }
        self.close(writer, "File")
    }

    fn write_shortcut<W: Write>(&self, writer: &mut Writer<W>, s: &Shortcut) -> Result<()> {
        let attrs = Attrs::new("Shortcut")
            .req("Id", &s.id)
            .opt("Directory", &s.directory)
            .req("Name", &s.name)
            .opt("WorkingDirectory", &s.working_directory)
            .opt("Icon", &s.icon)
            .opt_num("IconIndex", s.icon_index)
            .yes_no("Advertise", s.advertise);
        self.empty(writer, attrs)
    }

    fn write_service_install<W: Write>(
        &self,
        writer: &mut Writer<W>,
        s: &ServiceInstall,
    ) -> Result<()> {
        let attrs = Attrs::new("ServiceInstall")
            .req("Id", &s.id)
            .req("Name", &s.name)
            .req("DisplayName", &s.display_name)
            .opt("Description", &s.description)
            .opt("Arguments", &s.arguments)
            .opt("ErrorControl", &s.error_control)
            .yes_no("Interactive", s.interactive)
            .opt("Start", &s.start)
            .opt("Type", &s.service_type)
            .yes_no("Vital", s.vital);
        self.empty(writer, attrs)
    }

    fn write_service_control<W: Write>(
        &self,
        writer: &mut Writer<W>,
        s: &ServiceControl,
    ) -> Result<()> {
        let attrs = Attrs::new("ServiceControl")
            .req("Id", &s.id)
            .req("Name", &s.name)
            .install_uninstall("Remove", s.remove)
            .install_uninstall("Start", s.start)
            .install_uninstall("Stop", s.stop)
            .yes_no("Wait", s.wait);
        self.empty(writer, attrs)
    }

    fn open<W: Write>(&self, writer: &mut Writer<W>, attrs: Attrs) -> Result<()> {
        emit(writer, Event::Start(attrs.0))
    }

    fn empty<W: Write>(&self, writer: &mut Writer<W>, attrs: Attrs) -> Result<()> {
        emit(writer, Event::Empty(attrs.0))
    }

    fn close<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<()> {
        emit(writer, Event::End(BytesEnd::new(name)))
    }
}

/// Writes one event. Failures of the underlying sink are serialization
/// errors, reported as [`Error::Xml`](crate::error::Error::Xml).
fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(quick_xml::Error::from)?;
    Ok(())
}

/// Convenience function to write a document to a string.
pub fn to_string(doc: &Wix) -> Result<String> {
    WixWriter::new().write_to_string(doc)
}

/// Convenience function to write a document to a string without indentation.
pub fn to_string_compact(doc: &Wix) -> Result<String> {
    WixWriter::with_config(WriterConfig::compact()).write_to_string(doc)
}

/// Convenience function to write a document to a writer.
pub fn write<W: Write>(doc: &Wix, writer: W) -> Result<()> {
    WixWriter::new().write(doc, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use quick_xml::events::Event as ReadEvent;
    use quick_xml::Reader;

    type Outline = Vec<(usize, String, Vec<(String, String)>)>;

    fn element(e: &BytesStart<'_>) -> (String, Vec<(String, String)>) {
        let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
        let attrs = e
            .attributes()
            .map(|a| {
                let a = a.unwrap();
                (
                    String::from_utf8(a.key.as_ref().to_vec()).unwrap(),
                    a.unescape_value().unwrap().into_owned(),
                )
            })
            .collect();
        (name, attrs)
    }

    /// Element outline: (depth, name, attributes) in document order.
    fn outline(xml: &str) -> Outline {
        let mut reader = Reader::from_str(xml);
        let mut depth = 0;
        let mut out = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                ReadEvent::Start(e) => {
                    let (name, attrs) = element(&e);
                    out.push((depth, name, attrs));
                    depth += 1;
                }
                ReadEvent::Empty(e) => {
                    let (name, attrs) = element(&e);
                    out.push((depth, name, attrs));
                }
                ReadEvent::End(_) => depth -= 1,
                ReadEvent::Eof => break,
                _ => {}
            }
        }
        out
    }

    fn attr_names(attrs: &[(String, String)]) -> Vec<&str> {
        attrs.iter().map(|(k, _)| k.as_str()).collect()
    }

    fn sample_product() -> Product {
        let upgrade_code = Uuid::parse_str("5c4a1f7e-8d2b-4a6e-9f3c-1b2d3e4f5a6b").unwrap();
        let mut p = Product::new("Svc App", "Acme", "2.1.0", upgrade_code);
        p.set_package("Acme");
        p.add_major_upgrade(MajorUpgrade {
            downgrade_error_message: Some("A newer version is installed.".to_string()),
            ..Default::default()
        });
        p.add_media_template();

        let install_dir = p
            .add_target_directory()
            .add_program_files_subdir(true)
            .add_subdir("INSTALLDIR", "Svc App");
        let main = install_dir.add_component(
            "MainExe",
            Uuid::parse_str("0f9e8d7c-6b5a-4938-8271-605f4e3d2c1b").unwrap(),
            true,
        );
        main.add_file("MainExeFile", r"bin\svc.exe");
        main.add_service_install("SvcInstall", "SvcApp").display_name = "Svc App".to_string();
        main.add_service_control("SvcControl", "SvcApp");
        install_dir.add_subdir("DOCS", "docs");

        p.add_feature("Complete", 1, "Svc App", "")
            .add_component_refs(["MainExe"]);
        p
    }

    #[test]
    fn test_write_root_namespace() {
        let xml = to_string(&Wix::default()).unwrap();

        assert!(xml.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Wix xmlns=\"http://schemas.microsoft.com/wix/2006/wi\"/>"));
    }

    #[test]
    fn test_write_product_attributes() {
        let xml = to_string(&Wix::new(sample_product())).unwrap();

        assert!(xml.contains("<Product Name=\"Svc App\" Manufacturer=\"Acme\" Id=\"*\" \
             UpgradeCode=\"5C4A1F7E-8D2B-4A6E-9F3C-1B2D3E4F5A6B\" Language=\"1033\" \
             Codepage=\"1252\" Version=\"2.1.0\">"));
        assert!(xml.contains("</Product>"));
        assert!(xml.contains("</Wix>"));
    }

    #[test]
    fn test_package_required_attributes_always_written() {
        let mut p = Product::new("App", "Acme", "1.0", Uuid::nil());
        p.package = Some(Package::default());
        let xml = to_string(&Wix::new(p)).unwrap();

        assert!(xml.contains(
            "<Package Id=\"\" Manufacturer=\"\" Languages=\"0\" Compressed=\"unspecified\" \
             SummaryCodepage=\"0\"/>"
        ));
        assert!(!xml.contains("InstallerVersion"));
        assert!(!xml.contains("Keywords"));
    }

    #[test]
    fn test_unspecified_optional_attributes_omitted() {
        let xml = to_string(&Wix::new(sample_product())).unwrap();

        // MajorUpgrade only has the message set
        assert!(xml.contains(
            "<MajorUpgrade DowngradeErrorMessage=\"A newer version is installed.\"/>"
        ));
        assert!(!xml.contains("AllowDowngrades"));
        // Wait is unspecified on the service control
        assert!(xml.contains(
            "<ServiceControl Id=\"SvcControl\" Name=\"SvcApp\" Remove=\"uninstall\" \
             Start=\"install\" Stop=\"both\"/>"
        ));
        // Directory name omitted for predefined folders
        assert!(xml.contains("<Directory Id=\"ProgramFiles64Folder\">"));
        assert!(xml.contains("<File Id=\"MainExeFile\" Source=\"bin\\svc.exe\" KeyPath=\"yes\"/>"));
        assert!(xml.contains("<MediaTemplate EmbedCab=\"yes\"/>"));
    }

    #[test]
    fn test_service_install_display_name_required() {
        let mut c = Component::new("c", Uuid::nil());
        c.add_service_install("si", "svc");
        let mut p = Product::new("App", "Acme", "1.0", Uuid::nil());
        p.add_target_directory().append_component(c);

        let xml = to_string(&Wix::new(p)).unwrap();
        assert!(xml.contains("<ServiceInstall Id=\"si\" Name=\"svc\" DisplayName=\"\"/>"));
        assert_eq!(ServiceInstall::default().display_name, "");
    }

    #[test]
    fn test_nested_output_is_indented() {
        let mut p = Product::new("App", "Acme", "1.0", Uuid::nil());
        p.add_target_directory()
            .add_subdir("INSTALLDIR", "App")
            .add_component("c", Uuid::nil(), false)
            .add_file("f", "a.txt");

        let xml = WixWriter::with_config(WriterConfig::new().with_xml_declaration(false))
            .write_to_string(&Wix::new(p))
            .unwrap();

        let expected = indoc! {r#"
            <Wix xmlns="http://schemas.microsoft.com/wix/2006/wi">
              <Product Name="App" Manufacturer="Acme" Id="*" UpgradeCode="00000000-0000-0000-0000-000000000000" Language="1033" Codepage="1252" Version="1.0">
                <Directory Id="TARGETDIR" Name="SourceDir">
                  <Directory Id="INSTALLDIR" Name="App">
                    <Component Id="c" Guid="00000000-0000-0000-0000-000000000000">
                      <File Id="f" Source="a.txt" KeyPath="yes"/>
                    </Component>
                  </Directory>
                </Directory>
              </Product>
            </Wix>"#};
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_write_compact() {
        let xml = to_string_compact(&Wix::new(sample_product())).unwrap();

        let content_start = xml.find("<Wix").unwrap();
        assert!(!xml[content_start..].contains('\n'));
    }

    #[test]
    fn test_attribute_values_escaped() {
        let mut p = Product::new("A & B <Tools>", "\"Acme\"", "1.0", Uuid::nil());
        p.add_property("GREETING", "it's");
        let xml = to_string(&Wix::new(p)).unwrap();

        assert!(xml.contains("Name=\"A &amp; B &lt;Tools&gt;\""));
        assert!(xml.contains("Manufacturer=\"&quot;Acme&quot;\""));
    }

    #[test]
    fn test_subfeatures_written_as_feature() {
        let mut p = Product::new("App", "Acme", "1.0", Uuid::nil());
        let f = p.add_feature("Main", 1, "Main", "");
        f.add_component_refs(["a"]);
        f.add_subfeature("Docs", 1000, "Docs", "Documentation")
            .add_component_refs(["b"]);

        let xml = to_string_compact(&Wix::new(p)).unwrap();
        assert!(xml.contains(
            "<Feature Id=\"Main\" Level=\"1\" Title=\"Main\"><ComponentRef Id=\"a\"/>\
             <Feature Id=\"Docs\" Level=\"1000\" Title=\"Docs\" Description=\"Documentation\">\
             <ComponentRef Id=\"b\"/></Feature></Feature>"
        ));
        assert!(!xml.contains("Subfeatures"));
    }

    #[test]
    fn test_upgrade_and_sequence() {
        let code = Uuid::nil();
        let mut p = Product::new("App", "Acme", "1.0", code);
        p.add_upgrade(code).add_version(UpgradeVersion {
            property: "OLDERFOUND".to_string(),
            only_detect: YesNoType::No,
            ..Default::default()
        });
        p.install_execute_sequence_mut()
            .add_remove_existing_products(RemoveExistingProducts::after("InstallValidate"));

        let xml = to_string_compact(&Wix::new(p)).unwrap();
        assert!(xml.contains(
            "<Upgrade Id=\"00000000-0000-0000-0000-000000000000\">\
             <UpgradeVersion Property=\"OLDERFOUND\" OnlyDetect=\"no\"/></Upgrade>"
        ));
        assert!(xml.contains(
            "<InstallExecuteSequence><RemoveExistingProducts After=\"InstallValidate\"/>\
             </InstallExecuteSequence>"
        ));
    }

    #[test]
    fn test_roundtrip_preserves_nesting_and_presence() {
        let xml = to_string(&Wix::new(sample_product())).unwrap();
        let parsed = outline(&xml);

        let shape: Vec<_> = parsed.iter().map(|(d, n, _)| (*d, n.as_str())).collect();
        assert_eq!(
            shape,
            vec![
                (0, "Wix"),
                (1, "Product"),
                (2, "Package"),
                (2, "MajorUpgrade"),
                (2, "Feature"),
                (3, "ComponentRef"),
                (2, "MediaTemplate"),
                (2, "Directory"),
                (3, "Directory"),
                (4, "Directory"),
                (5, "Directory"),
                (5, "Component"),
                (6, "File"),
                (6, "ServiceInstall"),
                (6, "ServiceControl"),
            ]
        );

        let package = &parsed[2].2;
        assert_eq!(
            attr_names(package),
            vec![
                "Id",
                "Manufacturer",
                "InstallerVersion",
                "Languages",
                "Compressed",
                "SummaryCodepage"
            ]
        );

        let component = &parsed[11].2;
        assert_eq!(attr_names(component), vec!["Id", "Guid", "Win64"]);
        assert_eq!(component[1].1, "0F9E8D7C-6B5A-4938-8271-605F4E3D2C1B");

        let control = &parsed[14].2;
        assert_eq!(attr_names(control), vec!["Id", "Name", "Remove", "Start", "Stop"]);
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_xml_error() {
        let err = WixWriter::new()
            .write(&Wix::new(sample_product()), FailingSink)
            .unwrap_err();

        assert!(matches!(err, crate::error::Error::Xml(_)), "got {err:?}");
        assert!(err.to_string().starts_with("XML error"));
    }

    #[test]
    fn test_tab_indentation() {
        let mut p = Product::new("App", "Acme", "1.0", Uuid::nil());
        p.add_ui_ref("WixUI_Minimal");
        let config = WriterConfig::new()
            .with_xml_declaration(false)
            .with_indent_string("\t");

        let xml = WixWriter::with_config(config)
            .write_to_string(&Wix::new(p))
            .unwrap();
        assert!(xml.contains("\n\t<Product "));
        assert!(xml.contains("\n\t\t<UIRef Id=\"WixUI_Minimal\"/>"));
    }

    #[test]
    fn test_mixed_indent_string_uses_first_character() {
        let mut p = Product::new("App", "Acme", "1.0", Uuid::nil());
        p.add_ui_ref("WixUI_Minimal");
        let config = WriterConfig::new()
            .with_xml_declaration(false)
            .with_indent_string("\t ");

        let xml = WixWriter::with_config(config)
            .write_to_string(&Wix::new(p))
            .unwrap();
        assert!(xml.contains("\n\t\t<Product "));
        assert!(xml.contains("\n\t\t\t\t<UIRef "));
    }

    #[test]
    fn test_deterministic_output() {
        let a = to_string(&Wix::new(sample_product())).unwrap();
        let b = to_string(&Wix::new(sample_product())).unwrap();
        assert_eq!(a, b);
    }
}
