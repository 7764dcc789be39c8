//! Library registry entities.
//!
//! A [`Registry`] maps [`LibraryId`]s to the [`LibraryDefinition`] whose asset
//! tags get injected into the generated HTML entry point. The literal id
//! `none` is never a registry key; it parses to [`LibrarySelection::None`].

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// The reserved selection meaning "inject nothing".
pub const NONE_SELECTION: &str = "none";

/// Unique key of a library in the registry.
///
/// Invariant: non-empty, no surrounding whitespace, never `none`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LibraryId(String);

impl LibraryId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "id" });
        }
        if id.trim() != id {
            return Err(DomainError::InvalidLibrary(format!(
                "id '{id}' has surrounding whitespace"
            )));
        }
        if id == NONE_SELECTION {
            return Err(DomainError::ReservedLibraryId { id });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LibraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LibraryId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LibraryId> for String {
    fn from(id: LibraryId) -> Self {
        id.0
    }
}

impl Borrow<str> for LibraryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LibraryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What the caller asked to inject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LibrarySelection {
    /// The sentinel: scaffold without third-party assets.
    #[default]
    None,
    Library(LibraryId),
}

impl LibrarySelection {
    /// Parse user input; `none` maps to the sentinel.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if input == NONE_SELECTION {
            return Ok(Self::None);
        }
        LibraryId::new(input).map(Self::Library)
    }

    pub fn id(&self) -> Option<&LibraryId> {
        match self {
            Self::None => None,
            Self::Library(id) => Some(id),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl FromStr for LibrarySelection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LibrarySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(NONE_SELECTION),
            Self::Library(id) => write!(f, "{id}"),
        }
    }
}

/// One injectable resource reference.
///
/// `src` is never validated for shape; see
/// [`AttributeEscaping`](super::AttributeEscaping) for how it is written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTag {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub crossorigin: bool,
    /// Only meaningful on scripts; ignored for stylesheets.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub defer: bool,
}

impl AssetTag {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            integrity: None,
            crossorigin: false,
            defer: false,
        }
    }

    pub fn integrity(mut self, hash: impl Into<String>) -> Self {
        self.integrity = Some(hash.into());
        self
    }

    pub fn crossorigin(mut self, enabled: bool) -> Self {
        self.crossorigin = enabled;
        self
    }

    pub fn defer(mut self, enabled: bool) -> Self {
        self.defer = enabled;
        self
    }
}

/// Injection metadata for one third-party add-on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryDefinition {
    pub id: LibraryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub css: Vec<AssetTag>,
    pub js: Vec<AssetTag>,
}

impl LibraryDefinition {
    pub fn new(id: LibraryId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            css: Vec::new(),
            js: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_css(mut self, tag: AssetTag) -> Self {
        self.css.push(tag);
        self
    }

    pub fn with_js(mut self, tag: AssetTag) -> Self {
        self.js.push(tag);
        self
    }

    /// Human label: the display name, or the id when none is set.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }

    /// `true` when the definition would inject nothing.
    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.js.is_empty()
    }
}

/// Mapping from library id to its definition, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    libraries: BTreeMap<LibraryId, LibraryDefinition>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition, replacing any previous one with the same id.
    pub fn insert(&mut self, definition: LibraryDefinition) -> Option<LibraryDefinition> {
        self.libraries.insert(definition.id.clone(), definition)
    }

    pub fn with_library(mut self, definition: LibraryDefinition) -> Self {
        self.insert(definition);
        self
    }

    pub fn get(&self, id: &str) -> Option<&LibraryDefinition> {
        self.libraries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a selection to the definition to inject.
    ///
    /// Returns `None` for the sentinel and for ids missing from the registry.
    pub fn resolve(&self, selection: &LibrarySelection) -> Option<&LibraryDefinition> {
        selection.id().and_then(|id| self.libraries.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &LibraryId> {
        self.libraries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LibraryDefinition> {
        self.libraries.values()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

impl FromIterator<LibraryDefinition> for Registry {
    fn from_iter<I: IntoIterator<Item = LibraryDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.insert(definition);
        }
        registry
    }
}
