use std::collections::{HashMap, VecDeque};

use crate::{
    assets::source::{ImageRef, ImageSource},
    config::settings::Settings,
    foundation::error::{TemplatrError, TemplatrResult},
    render::pipeline::{Thumbnail, encode_thumbnail},
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ThumbnailKey {
    pub background: ImageRef,
    pub foreground: ImageRef,
}

impl ThumbnailKey {
    pub fn new(background: &ImageRef, foreground: &ImageRef) -> Self {
        Self {
            background: background.clone(),
            foreground: foreground.clone(),
        }
    }
}

/// Bounded LRU of encoded thumbnails.
///
/// Owned by the caller and handed to [`render_thumbnail_cached`]; one cache should serve one
/// [`Settings`] value since the key does not include render settings.
#[derive(Debug)]
pub struct ThumbnailCache {
    entries: HashMap<ThumbnailKey, Thumbnail>,
    lru: VecDeque<ThumbnailKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ThumbnailCache {
    pub fn new(capacity: usize) -> TemplatrResult<Self> {
        if capacity == 0 {
            return Err(TemplatrError::validation(
                "thumbnail cache capacity must be >= 1",
            ));
        }
        Ok(Self {
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        })
    }

    pub fn from_settings(settings: &Settings) -> TemplatrResult<Self> {
        Self::new(settings.thumbnail.cache_capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn contains(&self, key: &ThumbnailKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&mut self, key: &ThumbnailKey) -> Option<Thumbnail> {
        let Some(hit) = self.entries.get(key).cloned() else {
            self.misses += 1;
            return None;
        };
        self.hits += 1;
        self.touch(key);
        Some(hit)
    }

    pub fn insert(&mut self, key: ThumbnailKey, thumbnail: Thumbnail) {
        self.entries.insert(key.clone(), thumbnail);
        self.touch(&key);
        while self.lru.len() > self.capacity {
            if let Some(old) = self.lru.pop_front() {
                tracing::debug!(background = %old.background, foreground = %old.foreground, "thumbnail evicted");
                self.entries.remove(&old);
            }
        }
    }

    /// Drops every entry mentioning `reference`, e.g. after the image was replaced.
    pub fn invalidate(&mut self, reference: &ImageRef) {
        self.lru
            .retain(|k| &k.background != reference && &k.foreground != reference);
        self.entries
            .retain(|k, _| &k.background != reference && &k.foreground != reference);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    fn touch(&mut self, key: &ThumbnailKey) {
        if let Some(pos) = self.lru.iter().position(|k| k == key) {
            self.lru.remove(pos);
        }
        self.lru.push_back(key.clone());
    }
}

/// Thumbnail for the pair, served from `cache` when present.
///
/// Background-only fallbacks are returned but never cached, so a foreground that becomes
/// readable later is picked up on the next call.
pub fn render_thumbnail_cached(
    cache: &mut ThumbnailCache,
    source: &dyn ImageSource,
    background: &ImageRef,
    foreground: &ImageRef,
    settings: &Settings,
) -> TemplatrResult<Thumbnail> {
    let key = ThumbnailKey::new(background, foreground);
    if let Some(hit) = cache.get(&key) {
        tracing::debug!(%background, %foreground, "thumbnail cache hit");
        return Ok(hit);
    }

    let thumbnail = encode_thumbnail(source, background, foreground, settings)?;
    if thumbnail.foreground_drawn {
        cache.insert(key, thumbnail.clone());
    }
    Ok(thumbnail)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
