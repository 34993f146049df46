//! Template sources: where the bundled reference document comes from.

use crate::document::LoadedDocument;
use crate::error::UpdateError;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Named text resources shipped with an application.
pub trait ResourceProvider {
    /// Full text of the resource called `name`.
    fn open(&self, name: &str) -> Result<String, UpdateError>;
}

/// Resources stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn open(&self, name: &str) -> Result<String, UpdateError> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(UpdateError::ResourceNotFound(path.display().to_string()));
        }
        Ok(std::fs::read_to_string(&path)?)
    }
}

/// Resources compiled into the binary, typically with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<String, &'static str>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: &'static str) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: &'static str) {
        self.entries.insert(name.into(), text);
    }
}

impl ResourceProvider for EmbeddedResources {
    fn open(&self, name: &str) -> Result<String, UpdateError> {
        self.entries
            .get(name)
            .map(|text| text.to_string())
            .ok_or_else(|| UpdateError::ResourceNotFound(name.to_string()))
    }
}

/// The template an update reads its structure, defaults and comments from.
pub enum TemplateSource<'a> {
    Text(Cow<'a, str>),
    File(PathBuf),
    Resource {
        provider: &'a dyn ResourceProvider,
        name: &'a str,
    },
}

impl<'a> TemplateSource<'a> {
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        TemplateSource::Text(text.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        TemplateSource::File(path.into())
    }

    pub fn resource(provider: &'a dyn ResourceProvider, name: &'a str) -> Self {
        TemplateSource::Resource { provider, name }
    }

    /// Raw template text.
    pub fn read(&self) -> Result<String, UpdateError> {
        match self {
            TemplateSource::Text(text) => Ok(text.to_string()),
            TemplateSource::File(path) => {
                if !path.is_file() {
                    return Err(UpdateError::ResourceNotFound(path.display().to_string()));
                }
                Ok(std::fs::read_to_string(path)?)
            }
            TemplateSource::Resource { provider, name } => provider.open(name),
        }
    }

    /// Raw template text together with its parsed tree.
    pub fn load(&self) -> Result<LoadedDocument, UpdateError> {
        Ok(LoadedDocument::parse(self.read()?)?)
    }

    /// Short human-readable origin, used in logs.
    pub fn describe(&self) -> String {
        match self {
            TemplateSource::Text(_) => "<inline>".to_string(),
            TemplateSource::File(path) => path.display().to_string(),
            TemplateSource::Resource { name, .. } => format!("resource:{name}"),
        }
    }
}
