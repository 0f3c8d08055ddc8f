//! Host-side pixel storage behind [`TextureHandle`]s.
//!
//! Rows are kept bottom-up, the order a GPU upload expects, so sprites flagged
//! `flip_y` read them back upright.

use gamecanvas_core::assets::{ImageInfo, TextureHandle};
use gamecanvas_core::draw::text::FALLBACK_GLYPH;

/// Glyph cells per atlas row.
pub const FONT_COLUMNS: u32 = 20;
/// Enough rows for every cell up to and including the fallback glyph.
#[allow(clippy::cast_lossless)]
pub const FONT_ROWS: u32 = (FALLBACK_GLYPH as u32 + 1).div_ceil(FONT_COLUMNS);

#[derive(thiserror::Error, Debug)]
pub enum AtlasError {
    #[error("font atlas {width}x{height} doesn't divide into {FONT_COLUMNS}x{FONT_ROWS} cells")]
    BadSize { width: u32, height: u32 },
}

/// A rectangle of some stored image, in storage (bottom-up) pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Some pixels and where to sample them.
pub struct TexelSource<'a> {
    pub image: &'a image::RgbaImage,
    pub region: Region,
}
impl TexelSource<'_> {
    /// Nearest texel at `uv` in 0..1, with v growing downward.
    /// `flip_y` reads the bottom-up storage upright.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn sample(&self, u: f32, v: f32, flip_y: bool) -> [f32; 4] {
        let v = if flip_y { 1.0 - v } else { v };
        let Region {
            x,
            y,
            width,
            height,
        } = self.region;
        let tx = x + ((u * width as f32) as u32).min(width.saturating_sub(1));
        let ty = y + ((v * height as f32) as u32).min(height.saturating_sub(1));
        let image::Rgba(texel) = *self.image.get_pixel(tx, ty);
        texel.map(|c| f32::from(c) / 255.0)
    }
}

#[derive(Default)]
pub struct TextureStore {
    images: hashbrown::HashMap<TextureHandle, image::RgbaImage>,
    font: Option<image::RgbaImage>,
    next: u64,
}
impl TextureStore {
    /// Take ownership of an upright image.
    pub fn insert(&mut self, mut image: image::RgbaImage) -> ImageInfo {
        image::imageops::flip_vertical_in_place(&mut image);
        let handle = TextureHandle(self.next);
        self.next += 1;
        let info = ImageInfo {
            handle,
            width: image.width(),
            height: image.height(),
        };
        self.images.insert(handle, image);
        info
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
    #[must_use]
    pub fn image(&self, handle: TextureHandle) -> Option<TexelSource<'_>> {
        let image = self.images.get(&handle)?;
        Some(TexelSource {
            image,
            region: Region {
                x: 0,
                y: 0,
                width: image.width(),
                height: image.height(),
            },
        })
    }
    /// Install an upright atlas of [`FONT_COLUMNS`] by [`FONT_ROWS`] equal cells,
    /// read left to right, top to bottom.
    pub fn set_font(&mut self, mut atlas: image::RgbaImage) -> Result<(), AtlasError> {
        let (width, height) = atlas.dimensions();
        if width == 0 || height == 0 || width % FONT_COLUMNS != 0 || height % FONT_ROWS != 0 {
            return Err(AtlasError::BadSize { width, height });
        }
        image::imageops::flip_vertical_in_place(&mut atlas);
        self.font = Some(atlas);
        Ok(())
    }
    #[must_use]
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }
    #[must_use]
    pub fn glyph(&self, cell: u16) -> Option<TexelSource<'_>> {
        let atlas = self.font.as_ref()?;
        let cell = u32::from(cell);
        let (column, row) = (cell % FONT_COLUMNS, cell / FONT_COLUMNS);
        if row >= FONT_ROWS {
            return None;
        }
        let width = atlas.width() / FONT_COLUMNS;
        let height = atlas.height() / FONT_ROWS;
        Some(TexelSource {
            image: atlas,
            region: Region {
                x: column * width,
                // Upright row `row` sits that many cells up from the bottom of storage.
                y: atlas.height() - (row + 1) * height,
                width,
                height,
            },
        })
    }
}
