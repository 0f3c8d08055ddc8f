//! The numbered asset set, read from a directory at startup.
//!
//! Images are `img0.png`, `img1.png`, ... and sounds `snd0.*`, `snd1.*`, ...,
//! each numbered run ending at its first gap. An optional `font.png` supplies
//! the glyph atlas.

use gamecanvas_core::assets::{AssetTable, ImageInfo};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("{0:?} is not a directory")]
    NotADirectory(std::path::PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Image {
        path: std::path::PathBuf,
        source: image::ImageError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct DirectoryAssets {
    images: Vec<ImageInfo>,
    sounds: Vec<std::path::PathBuf>,
}
impl DirectoryAssets {
    /// Decode every image in parallel and move them into the global texture store.
    pub fn load(dir: &std::path::Path) -> Result<Self, LoadError> {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        if !dir.is_dir() {
            return Err(LoadError::NotADirectory(dir.to_owned()));
        }
        let names: hashbrown::HashSet<String> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
            .collect();

        let image_paths: Vec<_> = (0..)
            .map(|i| format!("img{i}.png"))
            .take_while(|name| names.contains(name))
            .map(|name| dir.join(name))
            .collect();
        let sounds: Vec<std::path::PathBuf> = (0..)
            .map_while(|i| {
                let stem = format!("snd{i}.");
                let mut matching: Vec<_> = names.iter().filter(|name| name.starts_with(&stem)).collect();
                matching.sort();
                matching.first().map(|name| dir.join(name))
            })
            .collect();

        // Decode off-thread, but insert in id order so handles are stable between runs.
        let decoded: Vec<Result<image::RgbaImage, LoadError>> = image_paths
            .into_par_iter()
            .map(|path| match image::open(&path) {
                Ok(image) => Ok(image.into_rgba8()),
                Err(source) => Err(LoadError::Image { path, source }),
            })
            .collect();

        let mut store = crate::global::textures().write();
        let images = decoded
            .into_iter()
            .map(|image| image.map(|image| store.insert(image)))
            .collect::<Result<Vec<_>, _>>()?;

        let font_path = dir.join("font.png");
        if names.contains("font.png") {
            let font = image::open(&font_path)
                .map_err(|source| LoadError::Image {
                    path: font_path.clone(),
                    source,
                })?
                .into_rgba8();
            if let Err(e) = store.set_font(font) {
                log::warn!("ignoring {font_path:?}: {e}");
            }
        }
        if !store.has_font() {
            log::info!("no font atlas, text will be invisible");
        }

        log::info!(
            "loaded {} images and {} sounds from {dir:?}",
            images.len(),
            sounds.len()
        );
        Ok(Self { images, sounds })
    }
    /// File backing a sound id, for an audio backend.
    #[must_use]
    pub fn sound_path(&self, id: usize) -> Option<&std::path::Path> {
        self.sounds.get(id).map(std::path::PathBuf::as_path)
    }
}
impl AssetTable for DirectoryAssets {
    fn image_count(&self) -> usize {
        self.images.len()
    }
    fn image(&self, id: usize) -> Option<ImageInfo> {
        self.images.get(id).copied()
    }
    fn sound_count(&self) -> usize {
        self.sounds.len()
    }
}
