//! Directory tree and the installable payload hanging off it.
//!
//! A [`Directory`] holds nested directories and [`Component`]s. A component is
//! the unit the installer tracks: it owns [`File`]s and the Windows service
//! definitions ([`ServiceInstall`], [`ServiceControl`]) tied to them.

use uuid::Uuid;

use crate::objects::push_and_get;
use crate::objects::types::{InstallUninstallType, YesNoType};

/// `Wix.Directory` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Directory {
    /// Directory identifier (`TARGETDIR` for the root)
    pub id: String,
    /// Directory name on disk
    pub name: Option<String>,

    subdirs: Vec<Directory>,
    components: Vec<Component>,
}

impl Directory {
    /// Creates a directory with an identifier and optional name.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            name,
            ..Default::default()
        }
    }

    /// Appends a child directory and returns it.
    ///
    /// An empty `name` leaves the `Name` attribute out, which is how
    /// predefined folders such as `ProgramFilesFolder` are referenced.
    pub fn add_subdir(&mut self, id: impl Into<String>, name: impl Into<String>) -> &mut Directory {
        let name = name.into();
        let name = if name.is_empty() { None } else { Some(name) };
        push_and_get(&mut self.subdirs, Directory::new(id, name))
    }

    /// Appends `ProgramFiles64Folder` when `win64` is set, `ProgramFilesFolder` otherwise.
    pub fn add_program_files_subdir(&mut self, win64: bool) -> &mut Directory {
        if win64 {
            self.add_subdir("ProgramFiles64Folder", "")
        } else {
            self.add_subdir("ProgramFilesFolder", "")
        }
    }

    /// Appends a component and returns it.
    ///
    /// `win64` marks the component `Win64="yes"`; otherwise the attribute is
    /// left out.
    pub fn add_component(&mut self, id: impl Into<String>, guid: Uuid, win64: bool) -> &mut Component {
        let mut component = Component::new(id, guid);
        if win64 {
            component.win64 = YesNoType::Yes;
        }
        push_and_get(&mut self.components, component)
    }

    /// Appends a fully built component.
    pub fn append_component(&mut self, component: Component) -> &mut Component {
        push_and_get(&mut self.components, component)
    }

    /// Returns an iterator over child directories.
    pub fn subdirs(&self) -> impl Iterator<Item = &Directory> {
        self.subdirs.iter()
    }

    /// Returns a mutable iterator over child directories.
    pub fn subdirs_mut(&mut self) -> impl Iterator<Item = &mut Directory> {
        self.subdirs.iter_mut()
    }

    /// Returns an iterator over components in this directory.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Returns true if the directory has no subdirectories and no components.
    pub fn is_empty(&self) -> bool {
        self.subdirs.is_empty() && self.components.is_empty()
    }

    /// Returns an iterator that recursively yields every component.
    pub fn iter_all_components(&self) -> Box<dyn Iterator<Item = &Component> + '_> {
        Box::new(
            self.components
                .iter()
                .chain(self.subdirs.iter().flat_map(|d| d.iter_all_components())),
        )
    }
}

/// `Wix.Component` element.
///
/// The GUID is how Windows Installer tracks the component across installs,
/// repairs and uninstalls. It must be unique in the product and must change
/// whenever the component's set of resources changes. Nothing here enforces
/// that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    /// Component identifier, referenced from `ComponentRef`
    pub id: String,
    /// Component GUID
    pub guid: Uuid,
    /// 64-bit component flag
    pub win64: YesNoType,

    files: Vec<File>,
    service_installs: Vec<ServiceInstall>,
    service_controls: Vec<ServiceControl>,
}

impl Component {
    /// Creates a component with an identifier and GUID.
    pub fn new(id: impl Into<String>, guid: Uuid) -> Self {
        Self {
            id: id.into(),
            guid,
            ..Default::default()
        }
    }

    /// Appends a file, marked as the component key path, and returns it.
    pub fn add_file(&mut self, id: impl Into<String>, source: impl Into<String>) -> &mut File {
        push_and_get(&mut self.files, File::new(id, source))
    }

    /// Appends a `ServiceInstall` for the service `name` and returns it.
    pub fn add_service_install(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> &mut ServiceInstall {
        let install = ServiceInstall {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        };
        push_and_get(&mut self.service_installs, install)
    }

    /// Appends a `ServiceControl` for the service `name` and returns it.
    ///
    /// The control starts the service on install, stops it on both install
    /// and uninstall, and removes it on uninstall.
    pub fn add_service_control(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> &mut ServiceControl {
        let control = ServiceControl {
            id: id.into(),
            name: name.into(),
            start: InstallUninstallType::InstallOnly,
            stop: InstallUninstallType::Both,
            remove: InstallUninstallType::UninstallOnly,
            wait: YesNoType::Unspecified,
        };
        push_and_get(&mut self.service_controls, control)
    }

    /// Returns an iterator over the files in this component.
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.files.iter()
    }

    /// Returns an iterator over the service installs in this component.
    pub fn service_installs(&self) -> impl Iterator<Item = &ServiceInstall> {
        self.service_installs.iter()
    }

    /// Returns an iterator over the service controls in this component.
    pub fn service_controls(&self) -> impl Iterator<Item = &ServiceControl> {
        self.service_controls.iter()
    }

    /// Returns true if the component has no child elements.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.service_installs.is_empty() && self.service_controls.is_empty()
    }
}

/// `Wix.File` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct File {
    /// File identifier
    pub id: String,
    /// Path of the file on the build machine
    pub source: String,
    /// Whether this file is the key path of its component (always written)
    pub key_path: YesNoType,
    /// Whether to compute a checksum
    pub checksum: YesNoType,
    /// Whether failure to install the file fails the install
    pub vital: YesNoType,

    shortcuts: Vec<Shortcut>,
}

impl File {
    /// Creates a file marked as key path.
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            key_path: YesNoType::Yes,
            ..Default::default()
        }
    }

    /// Appends a shortcut to this file and returns it.
    pub fn add_shortcut(
        &mut self,
        id: impl Into<String>,
        directory: impl Into<String>,
        name: impl Into<String>,
    ) -> &mut Shortcut {
        let shortcut = Shortcut {
            id: id.into(),
            directory: Some(directory.into()),
            name: name.into(),
            ..Default::default()
        };
        push_and_get(&mut self.shortcuts, shortcut)
    }

    /// Returns an iterator over the shortcuts to this file.
    pub fn shortcuts(&self) -> impl Iterator<Item = &Shortcut> {
        self.shortcuts.iter()
    }
}

/// `Wix.Shortcut` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shortcut {
    /// Shortcut identifier
    pub id: String,
    /// Directory the shortcut is created in
    pub directory: Option<String>,
    /// Shortcut name
    pub name: String,
    /// Working directory identifier
    pub working_directory: Option<String>,
    /// Icon identifier
    pub icon: Option<String>,
    /// Index of the icon in the icon file
    pub icon_index: Option<i32>,
    /// Advertised shortcut (schema default is `no`)
    pub advertise: YesNoType,
}

/// `Wix.ServiceInstall` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceInstall {
    /// Element identifier
    pub id: String,
    /// Service system name
    pub name: String,
    /// Service display name (always written)
    pub display_name: String,
    /// Service description
    pub description: Option<String>,
    /// Command line arguments passed to the service
    pub arguments: Option<String>,
    /// `ignore`, `normal` or `critical`
    pub error_control: Option<String>,
    /// Whether the service interacts with the desktop
    pub interactive: YesNoType,
    /// `auto`, `demand` or `disabled`
    pub start: Option<String>,
    /// `ownProcess` or `shareProcess`
    pub service_type: Option<String>,
    /// Whether failure to install the service fails the install
    pub vital: YesNoType,
}

/// `Wix.ServiceControl` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceControl {
    /// Element identifier
    pub id: String,
    /// Name of the controlled service
    pub name: String,
    /// When to remove the service
    pub remove: InstallUninstallType,
    /// When to start the service
    pub start: InstallUninstallType,
    /// When to stop the service
    pub stop: InstallUninstallType,
    /// Wait for the service action to complete (schema default is `yes`)
    pub wait: YesNoType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_subdir_returns_child() {
        let mut root = Directory::new("TARGETDIR", Some("SourceDir".to_string()));
        let pf = root.add_program_files_subdir(true);
        assert_eq!(pf.id, "ProgramFiles64Folder");
        assert_eq!(pf.name, None);

        let app = pf.add_subdir("INSTALLDIR", "My App");
        app.add_subdir("DOCS", "docs");

        let pf = root.subdirs().next().unwrap();
        let app = pf.subdirs().next().unwrap();
        assert_eq!(app.name.as_deref(), Some("My App"));
        assert_eq!(app.subdirs().count(), 1);
    }

    #[test]
    fn test_add_component_win64_flag() {
        let mut dir = Directory::new("INSTALLDIR", None);
        let guid = Uuid::new_v4();
        dir.add_component("c32", guid, false);
        dir.add_component("c64", guid, true);

        let flags: Vec<_> = dir.components().map(|c| c.win64).collect();
        assert_eq!(flags, vec![YesNoType::Unspecified, YesNoType::Yes]);
    }

    #[test]
    fn test_add_file_defaults_key_path() {
        let mut component = Component::new("main", Uuid::nil());
        let file = component.add_file("app.exe", "build/app.exe");
        assert_eq!(file.key_path, YesNoType::Yes);
        assert_eq!(file.vital, YesNoType::Unspecified);
    }

    #[test]
    fn test_add_service_control_presets() {
        let mut component = Component::new("svc", Uuid::nil());
        let control = component.add_service_control("svcctl", "MyService");
        assert_eq!(control.start, InstallUninstallType::InstallOnly);
        assert_eq!(control.stop, InstallUninstallType::Both);
        assert_eq!(control.remove, InstallUninstallType::UninstallOnly);
        assert_eq!(control.wait, YesNoType::Unspecified);
    }

    #[test]
    fn test_iter_all_components_preserves_order() {
        let mut root = Directory::new("TARGETDIR", None);
        root.add_component("a", Uuid::nil(), false);
        let sub = root.add_subdir("SUB", "sub");
        sub.add_component("b", Uuid::nil(), false);
        sub.add_subdir("DEEP", "deep").add_component("c", Uuid::nil(), false);

        let ids: Vec<_> = root.iter_all_components().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
