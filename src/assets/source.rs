use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{TemplatrError, TemplatrResult};

/// Opaque handle naming a source image (a relative path, a URL, a storage key).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where encoded image bytes come from.
///
/// Implementations must be shareable across threads; thumbnail batches load from one source on
/// several workers at once.
pub trait ImageSource: Send + Sync {
    fn load(&self, reference: &ImageRef) -> TemplatrResult<Vec<u8>>;
}

/// Reads images from files under a root directory.
///
/// References are root-relative; absolute paths and `..` segments are refused.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, reference: &ImageRef) -> TemplatrResult<PathBuf> {
        let rel = normalize_rel_path(reference.as_str())?;
        Ok(self.root.join(rel))
    }
}

impl ImageSource for FsImageSource {
    fn load(&self, reference: &ImageRef) -> TemplatrResult<Vec<u8>> {
        let path = self.resolve(reference)?;
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// In-memory images keyed by reference. Handy for callers that already hold the bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<ImageRef, Arc<Vec<u8>>>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<ImageRef>, bytes: Vec<u8>) {
        self.images.insert(reference.into(), Arc::new(bytes));
    }

    pub fn with(mut self, reference: impl Into<ImageRef>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }

    pub fn contains(&self, reference: &ImageRef) -> bool {
        self.images.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for MemoryImageSource {
    fn load(&self, reference: &ImageRef) -> TemplatrResult<Vec<u8>> {
        self.images
            .get(reference)
            .map(|bytes| bytes.as_ref().clone())
            .ok_or_else(|| TemplatrError::decode(reference.as_str(), "no such image"))
    }
}

/// Normalizes a root-relative reference to forward-slash form.
pub(crate) fn normalize_rel_path(reference: &str) -> TemplatrResult<String> {
    let s = reference.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(TemplatrError::validation("image reference must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(TemplatrError::validation(format!(
            "image reference '{reference}' must be relative"
        )));
    }

    let mut parts = Vec::<&str>::new();
    for part in s.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                return Err(TemplatrError::validation(format!(
                    "image reference '{reference}' must not contain '..'"
                )));
            }
            _ => parts.push(part),
        }
    }
    if parts.is_empty() {
        return Err(TemplatrError::validation(format!(
            "image reference '{reference}' has no file name"
        )));
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
