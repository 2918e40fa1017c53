//! WiX object types.
//!
//! This module contains the typed object model for a subset of the WiX v3
//! schema:
//!
//! - [`Wix`] - The document root
//! - [`Product`] - The installer definition and its top-level collections
//! - [`Directory`], [`Component`], [`File`] - What gets installed, and where
//! - [`Feature`] - User-selectable groups of components
//! - [`ServiceInstall`], [`ServiceControl`] - Windows service registration
//!
//! Also provides the attribute value types [`YesNoType`] and
//! [`InstallUninstallType`].
//!
//! Builder methods named `add_*` append a child to an ordered collection and
//! return a mutable reference to it for further configuration. No
//! cross-reference checking is done here.

mod directory;
mod feature;
mod product;
mod types;

pub use types::{InstallUninstallType, YesNoType, TARGETDIR, XMLNS_WIX};

pub use directory::{Component, Directory, File, ServiceControl, ServiceInstall, Shortcut};
pub use feature::{ComponentRef, Feature};
pub use product::{
    InstallExecuteSequence, MajorUpgrade, MediaTemplate, Package, Product, Property,
    RemoveExistingProducts, UIRef, Upgrade, UpgradeVersion, Wix, WixVariable, DEFAULT_CODEPAGE,
    DEFAULT_LANGUAGE,
};

/// Pushes `item` onto `items` and returns a reference to it.
pub(crate) fn push_and_get<T>(items: &mut Vec<T>, item: T) -> &mut T {
    items.push(item);
    let last = items.len() - 1;
    &mut items[last]
}
