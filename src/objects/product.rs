//! Wix - the document root - and the Product element it carries.
//!
//! [`Product`] owns every top-level collection of an installer definition in
//! the order it is written: package, upgrades, execute sequence, features,
//! media templates, UI references, variables, properties and directories.

use uuid::Uuid;

use crate::objects::directory::Directory;
use crate::objects::feature::Feature;
use crate::objects::push_and_get;
use crate::objects::types::{YesNoType, TARGETDIR};

/// Default language for products and packages (en-US)
pub const DEFAULT_LANGUAGE: u16 = 1033;

/// Default codepage for products and package summary information (Windows-1252)
pub const DEFAULT_CODEPAGE: u16 = 1252;

/// The `<Wix>` document root.
///
/// The WiX namespace is always declared on this element by the writer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wix {
    /// The product, if any
    pub product: Option<Product>,
}

impl Wix {
    /// Creates a document holding `product`.
    pub fn new(product: Product) -> Self {
        Self {
            product: Some(product),
        }
    }
}

/// `Wix.Product` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Product {
    /// Product name
    pub name: String,
    /// Manufacturer name
    pub manufacturer: String,
    /// Product code (`*` lets the compiler generate one)
    pub id: String,
    /// Upgrade code shared by every version of the product
    pub upgrade_code: Uuid,
    /// Language identifier
    pub language: u16,
    /// Codepage of the product database
    pub codepage: u16,
    /// Product version (`major.minor.build`)
    pub version: String,

    /// Package (summary information)
    pub package: Option<Package>,
    /// Execute sequence overrides
    pub install_execute_sequence: Option<InstallExecuteSequence>,

    upgrades: Vec<Upgrade>,
    major_upgrades: Vec<MajorUpgrade>,
    features: Vec<Feature>,
    media_templates: Vec<MediaTemplate>,
    ui_refs: Vec<UIRef>,
    wix_variables: Vec<WixVariable>,
    properties: Vec<Property>,
    directories: Vec<Directory>,
}

impl Product {
    /// Creates a product with a generated product code and en-US defaults.
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        version: impl Into<String>,
        upgrade_code: Uuid,
    ) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            id: "*".to_string(),
            upgrade_code,
            language: DEFAULT_LANGUAGE,
            codepage: DEFAULT_CODEPAGE,
            version: version.into(),
            ..Default::default()
        }
    }

    /// Sets a compressed package with common defaults and returns it.
    pub fn set_package(&mut self, manufacturer: impl Into<String>) -> &mut Package {
        self.package.insert(Package::new(manufacturer))
    }

    /// Returns the execute sequence, creating an empty one if needed.
    pub fn install_execute_sequence_mut(&mut self) -> &mut InstallExecuteSequence {
        self.install_execute_sequence.get_or_insert_with(Default::default)
    }

    /// Appends a property and returns it.
    pub fn add_property(&mut self, id: impl Into<String>, value: impl Into<String>) -> &mut Property {
        let value = value.into();
        let property = Property {
            id: id.into(),
            value: if value.is_empty() { None } else { Some(value) },
            secure: YesNoType::Unspecified,
        };
        push_and_get(&mut self.properties, property)
    }

    /// Appends an `Upgrade` with the given upgrade code and returns it.
    pub fn add_upgrade(&mut self, id: Uuid) -> &mut Upgrade {
        push_and_get(&mut self.upgrades, Upgrade::new(id))
    }

    /// Appends a `MajorUpgrade` and returns it.
    pub fn add_major_upgrade(&mut self, upgrade: MajorUpgrade) -> &mut MajorUpgrade {
        push_and_get(&mut self.major_upgrades, upgrade)
    }

    /// Appends a media template that embeds the cabinet in the MSI.
    pub fn add_media_template(&mut self) -> &mut MediaTemplate {
        push_and_get(
            &mut self.media_templates,
            MediaTemplate {
                embed_cab: YesNoType::Yes,
            },
        )
    }

    /// Appends a top-level feature and returns it.
    pub fn add_feature(
        &mut self,
        id: impl Into<String>,
        level: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Feature {
        push_and_get(&mut self.features, Feature::new(id, level, title, description))
    }

    /// Appends the root `TARGETDIR` directory (named `SourceDir`) and returns it.
    pub fn add_target_directory(&mut self) -> &mut Directory {
        push_and_get(
            &mut self.directories,
            Directory::new(TARGETDIR, Some("SourceDir".to_string())),
        )
    }

    /// Appends a `UIRef` and returns it.
    pub fn add_ui_ref(&mut self, id: impl Into<String>) -> &mut UIRef {
        push_and_get(&mut self.ui_refs, UIRef { id: id.into() })
    }

    /// Appends a `WixVariable` and returns it.
    pub fn add_wix_variable(
        &mut self,
        id: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut WixVariable {
        let variable = WixVariable {
            id: id.into(),
            value: value.into(),
            overridable: YesNoType::Unspecified,
        };
        push_and_get(&mut self.wix_variables, variable)
    }

    /// Returns an iterator over upgrades.
    pub fn upgrades(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.iter()
    }

    /// Returns an iterator over major upgrades.
    pub fn major_upgrades(&self) -> impl Iterator<Item = &MajorUpgrade> {
        self.major_upgrades.iter()
    }

    /// Returns an iterator over top-level features.
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Returns a mutable iterator over top-level features.
    pub fn features_mut(&mut self) -> impl Iterator<Item = &mut Feature> {
        self.features.iter_mut()
    }

    /// Returns an iterator over media templates.
    pub fn media_templates(&self) -> impl Iterator<Item = &MediaTemplate> {
        self.media_templates.iter()
    }

    /// Returns an iterator over UI references.
    pub fn ui_refs(&self) -> impl Iterator<Item = &UIRef> {
        self.ui_refs.iter()
    }

    /// Returns an iterator over WiX variables.
    pub fn wix_variables(&self) -> impl Iterator<Item = &WixVariable> {
        self.wix_variables.iter()
    }

    /// Returns an iterator over properties.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// Returns an iterator over root directories.
    pub fn directories(&self) -> impl Iterator<Item = &Directory> {
        self.directories.iter()
    }

    /// Returns a mutable iterator over root directories.
    pub fn directories_mut(&mut self) -> impl Iterator<Item = &mut Directory> {
        self.directories.iter_mut()
    }

    /// Returns true if the product has no child elements at all.
    pub fn is_empty(&self) -> bool {
        self.package.is_none()
            && self.install_execute_sequence.is_none()
            && self.upgrades.is_empty()
            && self.major_upgrades.is_empty()
            && self.features.is_empty()
            && self.media_templates.is_empty()
            && self.ui_refs.is_empty()
            && self.wix_variables.is_empty()
            && self.properties.is_empty()
            && self.directories.is_empty()
    }
}

/// `Wix.Package` element.
///
/// `Languages`, `Compressed` and `SummaryCodepage` are always written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    /// Package code (use `*`)
    pub id: String,
    /// Summary keywords
    pub keywords: Option<String>,
    /// Summary description
    pub description: Option<String>,
    /// Summary comments
    pub comments: Option<String>,
    /// Manufacturer name
    pub manufacturer: String,
    /// Minimum installer version (use 200)
    pub installer_version: Option<u32>,
    /// `limited` or `elevated` (schema default is `elevated`)
    pub install_privileges: Option<String>,
    /// `perMachine` or `perUser`
    pub install_scope: Option<String>,
    /// `x86`, `x64`, ...
    pub platform: Option<String>,
    /// Supported language identifier
    pub languages: u16,
    /// Whether files are compressed in cabinets
    pub compressed: YesNoType,
    /// Codepage of the summary information stream
    pub summary_codepage: u16,
}

impl Package {
    /// Creates a compressed package with a generated package code.
    pub fn new(manufacturer: impl Into<String>) -> Self {
        Self {
            id: "*".to_string(),
            manufacturer: manufacturer.into(),
            installer_version: Some(200),
            languages: DEFAULT_LANGUAGE,
            compressed: YesNoType::Yes,
            summary_codepage: DEFAULT_CODEPAGE,
            ..Default::default()
        }
    }
}

/// `Wix.Upgrade` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Upgrade {
    /// Upgrade code of the related products to detect
    pub id: Uuid,

    versions: Vec<UpgradeVersion>,
}

impl Upgrade {
    /// Creates an upgrade element for the given upgrade code.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            versions: Vec::new(),
        }
    }

    /// Appends an `UpgradeVersion` and returns it.
    pub fn add_version(&mut self, version: UpgradeVersion) -> &mut UpgradeVersion {
        push_and_get(&mut self.versions, version)
    }

    /// Returns an iterator over upgrade versions.
    pub fn versions(&self) -> impl Iterator<Item = &UpgradeVersion> {
        self.versions.iter()
    }
}

/// `Wix.UpgradeVersion` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeVersion {
    /// Property set when a matching product is found
    pub property: String,
    /// Lower version bound
    pub minimum: Option<String>,
    /// Whether the lower bound is inclusive
    pub include_minimum: YesNoType,
    /// Upper version bound
    pub maximum: Option<String>,
    /// Whether the upper bound is inclusive
    pub include_maximum: YesNoType,
    /// Only detect, never remove
    pub only_detect: YesNoType,
    /// Features to migrate
    pub migrate_features: Option<String>,
    /// Features to remove
    pub remove_features: Option<String>,
    /// Continue when removal fails
    pub ignore_remove_failure: YesNoType,
}

/// `Wix.MajorUpgrade` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MajorUpgrade {
    /// Allow installing older versions over newer ones
    pub allow_downgrades: YesNoType,
    /// Treat the same version as an upgrade
    pub allow_same_version_upgrades: YesNoType,
    /// Block upgrades entirely
    pub disallow: YesNoType,
    /// Continue when removing the old product fails
    pub ignore_remove_failure: YesNoType,
    /// Migrate feature states from the old product
    pub migrate_features: YesNoType,
    /// Features to remove from the old product
    pub remove_features: Option<String>,
    /// When `RemoveExistingProducts` is scheduled
    pub schedule: Option<String>,
    /// Message shown when a newer version is already installed
    pub downgrade_error_message: Option<String>,
}

/// `Wix.InstallExecuteSequence` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstallExecuteSequence {
    existing_product_removals: Vec<RemoveExistingProducts>,
}

impl InstallExecuteSequence {
    /// Appends a `RemoveExistingProducts` action and returns it.
    pub fn add_remove_existing_products(
        &mut self,
        action: RemoveExistingProducts,
    ) -> &mut RemoveExistingProducts {
        push_and_get(&mut self.existing_product_removals, action)
    }

    /// Returns an iterator over `RemoveExistingProducts` actions.
    pub fn existing_product_removals(&self) -> impl Iterator<Item = &RemoveExistingProducts> {
        self.existing_product_removals.iter()
    }
}

/// `Wix.RemoveExistingProducts` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemoveExistingProducts {
    /// Schedule before this action
    pub before: Option<String>,
    /// Schedule after this action
    pub after: Option<String>,
    /// Whether the scheduling may be overridden
    pub overridable: YesNoType,
    /// Explicit sequence number
    pub sequence: Option<i32>,
    /// Suppress the action
    pub suppress: YesNoType,
}

impl RemoveExistingProducts {
    /// Schedules the removal after the named standard action.
    pub fn after(action: impl Into<String>) -> Self {
        Self {
            after: Some(action.into()),
            ..Default::default()
        }
    }

    /// Schedules the removal before the named standard action.
    pub fn before(action: impl Into<String>) -> Self {
        Self {
            before: Some(action.into()),
            ..Default::default()
        }
    }
}

/// `Wix.MediaTemplate` element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaTemplate {
    /// Embed the cabinet in the MSI (always written)
    pub embed_cab: YesNoType,
}

/// `Wix.UIRef` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UIRef {
    /// Identifier of the referenced UI (e.g. `WixUI_Minimal`)
    pub id: String,
}

/// `Wix.WixVariable` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WixVariable {
    /// Variable name
    pub id: String,
    /// Variable value (always written)
    pub value: String,
    /// Whether the value may be overridden on the command line
    pub overridable: YesNoType,
}

/// `Wix.Property` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    /// Property name
    pub id: String,
    /// Property value
    pub value: Option<String>,
    /// Whether the property is passed to the server side
    pub secure: YesNoType,
}
