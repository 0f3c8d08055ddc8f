//! Interfaces to the resources the host owns: numbered images and sounds, and
//! an optional camera.

/// Opaque reference to a texture living in the host's store.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TextureHandle(pub u64);

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ImageInfo {
    pub handle: TextureHandle,
    /// Native size in pixels.
    pub width: u32,
    pub height: u32,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetError {
    #[error("no image with id {id}, {count} loaded")]
    NoSuchImage { id: usize, count: usize },
    #[error("no sound with id {id}, {count} loaded")]
    NoSuchSound { id: usize, count: usize },
}

/// The numbered asset set, loaded once by the host before the first frame.
pub trait AssetTable {
    fn image_count(&self) -> usize;
    /// `None` for ids outside `0..image_count()`.
    fn image(&self, id: usize) -> Option<ImageInfo>;
    fn sound_count(&self) -> usize;

    fn lookup_image(&self, id: usize) -> Result<ImageInfo, AssetError> {
        self.image(id).ok_or(AssetError::NoSuchImage {
            id,
            count: self.image_count(),
        })
    }
    /// Validate a sound id before handing it to an audio backend.
    fn check_sound(&self, id: usize) -> Result<usize, AssetError> {
        let count = self.sound_count();
        if id < count {
            Ok(id)
        } else {
            Err(AssetError::NoSuchSound { id, count })
        }
    }
}

/// A table with nothing in it.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoAssets;
impl AssetTable for NoAssets {
    fn image_count(&self) -> usize {
        0
    }
    fn image(&self, _: usize) -> Option<ImageInfo> {
        None
    }
    fn sound_count(&self) -> usize {
        0
    }
}

/// A fixed list of images, for hosts that register textures up front.
#[derive(Clone, Debug, Default)]
pub struct ImageList {
    pub images: Vec<ImageInfo>,
    pub sounds: usize,
}
impl AssetTable for ImageList {
    fn image_count(&self) -> usize {
        self.images.len()
    }
    fn image(&self, id: usize) -> Option<ImageInfo> {
        self.images.get(id).copied()
    }
    fn sound_count(&self) -> usize {
        self.sounds
    }
}

/// A live camera stream.
pub trait CameraFeed {
    /// Size of the current frame, `None` while the stream isn't producing.
    fn frame_size(&self) -> Option<[u32; 2]>;
}
