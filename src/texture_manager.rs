use std::collections::HashMap;
use egui::{Context, TextureHandle, TextureId, ColorImage, TextureOptions};
use thiserror::Error;

use crate::element::ComponentKind;

/// Raster sizes are rounded up to this step so live resizing reuses textures
const SIZE_STEP: u32 = 32;
/// Upper bound on either side of a cached raster
const MAX_TEXTURE_SIDE: u32 = 2048;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to generate texture: {0}")]
    GenerationFailed(String),
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

type CacheKey = (ComponentKind, [u32; 2]);

/// Caches rasterized component graphics, evicting the least recently used
pub struct TextureManager {
    texture_cache: HashMap<CacheKey, TextureHandle>,
    /// Tracks when each texture was last used
    last_used: HashMap<CacheKey, u64>,
    /// Current frame counter for LRU tracking
    current_frame: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .field("max_cache_size", &self.max_cache_size)
            .finish()
    }
}

/// Rounds a wanted on-screen size to the raster size that gets cached
pub fn raster_size(width: f32, height: f32) -> Result<[u32; 2], TextureGenerationError> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(TextureGenerationError::InvalidDimensions);
    }
    let round = |side: f32| {
        let side = (side.ceil() as u32).clamp(1, MAX_TEXTURE_SIDE);
        side.div_ceil(SIZE_STEP) * SIZE_STEP
    };
    Ok([round(width), round(height)])
}

impl TextureManager {
    /// Creates a new texture manager with the specified cache size
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Gets or creates the texture of `kind` rasterized at `size` pixels
    pub fn get_or_create_texture<F>(
        &mut self,
        kind: ComponentKind,
        size: [u32; 2],
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (kind, size);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.id());
        }

        let image = generator()?;

        let name = format!("component_{}_{}x{}", kind, size[0], size[1]);
        let handle = ctx.load_texture(&name, image, TextureOptions::LINEAR);

        self.texture_cache.insert(cache_key, handle.clone());
        self.last_used.insert(cache_key, self.current_frame);

        // Prune after inserting so the new texture is never the one evicted
        self.prune_cache_if_needed();

        Ok(handle.id())
    }

    /// Prunes the cache if it exceeds the maximum size
    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(CacheKey, u64)> = self.last_used
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();

        // Oldest first
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    /// Clears all textures from the cache
    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    /// Returns the number of textures currently in the cache
    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn get_texture(&self, kind: ComponentKind, size: [u32; 2]) -> Option<&TextureHandle> {
        self.texture_cache.get(&(kind, size))
    }
}
