//! Features group components into user-selectable installation units.

use crate::objects::push_and_get;
use crate::objects::types::YesNoType;

/// `Wix.Feature` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Feature identifier
    pub id: String,
    /// Install level (always written; 0 disables the feature)
    pub level: u32,
    /// Short title shown in the selection tree
    pub title: Option<String>,
    /// Longer description shown in the selection tree
    pub description: Option<String>,
    /// `collapse`, `expand` or `hidden`
    pub display: Option<String>,
    /// Identifier of a Directory the user may change at install time (UPPERCASE)
    pub configurable_directory: Option<String>,

    component_refs: Vec<ComponentRef>,
    subfeatures: Vec<Feature>,
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Feature {
    /// Creates a feature. Empty title or description are left out of the output.
    pub fn new(
        id: impl Into<String>,
        level: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            title: non_empty(title.into()),
            description: non_empty(description.into()),
            ..Default::default()
        }
    }

    /// Appends a `ComponentRef` for each identifier.
    ///
    /// The identifiers are not checked against the directory tree; a dangling
    /// reference is reported by the WiX compiler.
    pub fn add_component_refs<I, S>(&mut self, refs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_refs
            .extend(refs.into_iter().map(ComponentRef::new));
    }

    /// Appends a child feature and returns it.
    pub fn add_subfeature(
        &mut self,
        id: impl Into<String>,
        level: u32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Feature {
        push_and_get(&mut self.subfeatures, Feature::new(id, level, title, description))
    }

    /// Returns an iterator over component references.
    pub fn component_refs(&self) -> impl Iterator<Item = &ComponentRef> {
        self.component_refs.iter()
    }

    /// Returns a mutable iterator over component references.
    pub fn component_refs_mut(&mut self) -> impl Iterator<Item = &mut ComponentRef> {
        self.component_refs.iter_mut()
    }

    /// Returns an iterator over child features.
    pub fn subfeatures(&self) -> impl Iterator<Item = &Feature> {
        self.subfeatures.iter()
    }

    /// Returns true if the feature has no child elements.
    pub fn is_empty(&self) -> bool {
        self.component_refs.is_empty() && self.subfeatures.is_empty()
    }
}

/// `Wix.ComponentRef` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentRef {
    /// Identifier of the referenced component
    pub id: String,
    /// Whether this feature is the component's primary feature
    pub primary: YesNoType,
}

impl ComponentRef {
    /// Creates a reference to the component `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary: YesNoType::Unspecified,
        }
    }
}
