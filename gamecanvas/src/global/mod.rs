//! Global singletons.

pub mod settings;

use crate::textures::TextureStore;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// Get the shared texture store. Written by asset loading and downloads, read by the rasterizer.
pub fn textures() -> &'static parking_lot::RwLock<TextureStore> {
    static STORE: std::sync::OnceLock<parking_lot::RwLock<TextureStore>> = std::sync::OnceLock::new();
    STORE.get_or_init(parking_lot::RwLock::default)
}
