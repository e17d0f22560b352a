//! Bounded least-recently-used font cache
//!
//! Font resolution (discovery plus file parsing) is expensive and text is
//! drawn at high frequency, so resolved fonts are kept per descriptor. The
//! cache is the only state shared across render passes; mutation is
//! serialized behind a mutex and resolved fonts are handed out as `Arc`s.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::font::{FontDescriptor, FontLoader, FontResource};
use crate::Result;

/// Default number of fonts kept resident
pub const DEFAULT_FONT_CACHE_CAPACITY: usize = 50;

/// Cache over a type-erased loader, as shared between canvases
pub type DynFontCache = FontCache<Arc<dyn FontLoader>>;

/// Font cache keyed by [`FontDescriptor`] value
pub struct FontCache<L> {
    loader: L,
    entries: Mutex<LruCache<FontDescriptor, Arc<dyn FontResource>>>,
}

impl<L: FontLoader> FontCache<L> {
    pub fn new(loader: L) -> Self {
        Self::with_capacity(loader, DEFAULT_FONT_CACHE_CAPACITY)
    }

    /// A capacity of zero is treated as one
    pub fn with_capacity(loader: L, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            loader,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Get the font for `descriptor`, loading it on a miss
    ///
    /// A hit marks the entry most-recently-used. A miss resolves through the
    /// loader and may evict the least-recently-used entry.
    pub fn get(&self, descriptor: &FontDescriptor) -> Result<Arc<dyn FontResource>> {
        // Check cache first (LruCache::get promotes to most-recently-used)
        if let Some(font) = self.lock().get(descriptor) {
            return Ok(Arc::clone(font));
        }

        // Resolve outside the lock. When a concurrent miss on the same
        // descriptor inserts first, its entry is kept and this load dropped.
        let font = self.loader.resolve(descriptor)?;
        tracing::debug!(%descriptor, family = font.family_name(), "resolved font");

        let mut entries = self.lock();
        if let Some(existing) = entries.get(descriptor) {
            return Ok(Arc::clone(existing));
        }
        if let Some((evicted, _)) = entries.push(descriptor.clone(), Arc::clone(&font)) {
            if &evicted != descriptor {
                tracing::trace!(%evicted, "evicted least-recently-used font");
            }
        }
        Ok(font)
    }

    /// Whether `descriptor` is resident, without touching recency
    pub fn contains(&self, descriptor: &FontDescriptor) -> bool {
        self.lock().contains(descriptor)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<FontDescriptor, Arc<dyn FontResource>>> {
        // A panic while holding the lock cannot leave the LRU half-updated in
        // a way that matters here, so keep serving from it.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
