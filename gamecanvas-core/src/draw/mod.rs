//! The immediate-mode draw surface.
//!
//! Every public call funnels into one of two primitives, [`Painter::draw_sprite`]
//! and [`Painter::draw_polyline`], which claim a slot from the [`RenderPool`]
//! and fill it in. Invalid arguments are rejected before any slot is touched.

pub mod style;
pub mod text;

pub use style::Style;

use crate::{
    assets::{AssetError, AssetTable, CameraFeed, ImageInfo},
    cache::WebCache,
    canvas::{CanvasError, CanvasScaler, ResolutionChange},
    collision,
    color::Color,
    math::{circle_points, compose_about_pivot, CIRCLE_RESOLUTION},
    pool::{ClipRect, RenderPool, SpriteSlot, Texture},
    touch::GestureRecognizer,
    util::FiniteF32Error,
};
use style::positive;
use ultraviolet::Vec2;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("{name} must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be nonzero")]
    Zero { name: &'static str },
    #[error("{name} must be finite")]
    NotFinite { name: &'static str },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("bad color channel: {0}")]
    Color(#[from] FiniteF32Error),
}

/// What became of a draw call that was accepted.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Drawn,
    /// Degenerate geometry, nothing to show.
    Skipped,
    /// The source isn't available yet. Try again next frame.
    NotReady,
}

pub type DrawResult = Result<Outcome, DrawError>;

/// Rotation in degrees about a pivot, the pivot given relative to the
/// position of the thing being drawn.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rotation {
    pub degrees: f32,
    pub pivot: Vec2,
}
impl Rotation {
    pub const NONE: Self = Self {
        degrees: 0.0,
        pivot: Vec2 { x: 0.0, y: 0.0 },
    };
    #[must_use]
    pub fn degrees(degrees: f32) -> Self {
        Self {
            degrees,
            ..Self::NONE
        }
    }
    #[must_use]
    pub fn about(degrees: f32, pivot: Vec2) -> Self {
        Self { degrees, pivot }
    }
    /// A rotation about the position itself needs no matrix work.
    fn is_pivoted(&self) -> bool {
        self.degrees != 0.0 && self.pivot != Vec2::zero()
    }
}

/// Pixels trimmed from each edge of a source texture.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct ClipInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}
impl ClipInsets {
    pub const NONE: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };
    #[must_use]
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
    fn validate(&self) -> Result<(), DrawError> {
        for (name, value) in [
            ("clip top", self.top),
            ("clip right", self.right),
            ("clip bottom", self.bottom),
            ("clip left", self.left),
        ] {
            if !value.is_finite() {
                return Err(DrawError::NotFinite { name });
            }
            if value < 0.0 {
                return Err(DrawError::Negative { name, value });
            }
        }
        Ok(())
    }
    fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// Everything a sprite slot needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpriteDraw {
    pub texture: Texture,
    pub color: Color,
    /// Canvas space.
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: Rotation,
    pub clip: ClipInsets,
    pub priority: i8,
    pub flip_y: bool,
}
impl SpriteDraw {
    #[must_use]
    pub fn new(texture: Texture, position: Vec2, priority: i8) -> Self {
        Self {
            texture,
            color: Color::WHITE,
            position,
            scale: Vec2::one(),
            rotation: Rotation::NONE,
            clip: ClipInsets::NONE,
            priority,
            flip_y: false,
        }
    }
}

/// Everything a line slot needs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineDraw<'v> {
    /// Polyline relative to `position`.
    pub vertices: &'v [Vec2],
    pub color: Color,
    pub position: Vec2,
    pub rotation: Rotation,
    pub width: f32,
    pub priority: i8,
}

/// Borrowed view of a [`crate::GameCanvas`] for the duration of a frame's drawing.
pub struct Painter<'a> {
    pub(crate) pool: &'a mut RenderPool,
    pub(crate) canvas: &'a mut CanvasScaler,
    pub(crate) style: &'a mut Style,
    pub(crate) assets: &'a dyn AssetTable,
    pub(crate) web: &'a mut WebCache,
    pub(crate) camera: Option<&'a dyn CameraFeed>,
    pub(crate) gestures: &'a GestureRecognizer,
}

// Primitives.
impl Painter<'_> {
    /// Claim a sprite slot.
    pub fn draw_sprite(&mut self, draw: &SpriteDraw) -> DrawResult {
        draw.clip.validate()?;
        if draw.scale.x == 0.0 || draw.scale.y == 0.0 {
            return Ok(Outcome::Skipped);
        }
        let border = self.canvas.border();
        let source = draw.texture.source_size();
        let is_camera = matches!(draw.texture, Texture::Camera { .. });
        let insets = draw.clip;

        let clip = if insets.is_none() {
            None
        } else {
            if insets.left + insets.right > source.x || insets.top + insets.bottom >= source.y {
                return Ok(Outcome::Skipped);
            }
            let min = border + draw.position;
            let max = min + source - Vec2::new(insets.left + insets.right, insets.top + insets.bottom);
            let s = self.canvas.scale();
            // Camera clips multiply by the scale where everything else divides.
            let (min, max) = if is_camera {
                (min * s, max * s)
            } else {
                (min / s, max / s)
            };
            Some(ClipRect {
                left: min.x,
                top: min.y,
                right: max.x,
                bottom: max.y,
            })
        };

        // Camera frames go on a unit quad, so the frame size rides along in the scale.
        let frame = if is_camera { source } else { Vec2::one() };
        let (position, scale, rotation) = if draw.rotation.is_pivoted() {
            let pivot = if is_camera {
                draw.rotation.pivot * draw.scale
            } else {
                draw.rotation.pivot
            };
            let placed = compose_about_pivot(draw.position, pivot, draw.rotation.degrees, draw.scale);
            (border + placed.position, placed.scale * frame, placed.rotation)
        } else {
            (
                border + draw.position - Vec2::new(insets.left, insets.top),
                draw.scale * frame,
                draw.rotation.degrees,
            )
        };

        let depth = self.pool.depth(draw.priority);
        let index = self.pool.acquire_sprite();
        *self.pool.sprite_mut(index) = SpriteSlot {
            enabled: true,
            texture: draw.texture,
            color: draw.color,
            position,
            scale,
            rotation,
            depth,
            priority: draw.priority,
            clip,
            flip_y: draw.flip_y,
        };
        Ok(Outcome::Drawn)
    }
    /// Claim a line slot.
    pub fn draw_polyline(&mut self, draw: &LineDraw<'_>) -> DrawResult {
        positive("line width", draw.width)?;
        let border = self.canvas.border();
        let (position, rotation) = if draw.rotation.is_pivoted() {
            let placed = compose_about_pivot(
                draw.position,
                draw.rotation.pivot,
                draw.rotation.degrees,
                Vec2::one(),
            );
            (border + placed.position, placed.rotation)
        } else {
            (border + draw.position, draw.rotation.degrees)
        };

        let depth = self.pool.depth(draw.priority);
        let index = self.pool.acquire_line();
        let slot = self.pool.line_mut(index);
        slot.enabled = true;
        slot.vertices.clear();
        slot.vertices.extend_from_slice(draw.vertices);
        slot.color = draw.color;
        slot.position = position;
        slot.rotation = rotation;
        slot.width = draw.width;
        slot.depth = depth;
        slot.priority = draw.priority;
        Ok(Outcome::Drawn)
    }
    fn solid(&mut self, texture: Texture, color: Color, position: Vec2, size: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        self.draw_sprite(&SpriteDraw {
            color,
            scale: size,
            rotation,
            ..SpriteDraw::new(texture, position, priority)
        })
    }
    fn stroke(&mut self, vertices: &[Vec2], position: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        self.draw_polyline(&LineDraw {
            vertices,
            color: self.style.color(),
            position,
            rotation,
            width: self.style.line_width(),
            priority,
        })
    }
}

fn check_size(size: Vec2) -> Result<(), DrawError> {
    positive("width", size.x)?;
    positive("height", size.y)?;
    Ok(())
}

// Shapes.
impl Painter<'_> {
    /// Paint the whole canvas white, behind everything.
    pub fn clear_screen(&mut self) -> DrawResult {
        let size = self.canvas.size();
        self.solid(Texture::Rect, Color::WHITE, Vec2::zero(), size, Rotation::NONE, i8::MIN)
    }
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, priority: i8) -> DrawResult {
        self.stroke(&[Vec2::zero(), end - start], start, Rotation::NONE, priority)
    }
    /// Outline centered on `center`.
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, priority: i8) -> DrawResult {
        positive("radius", radius)?;
        let mut vertices: smallvec::SmallVec<[Vec2; CIRCLE_RESOLUTION + 1]> =
            circle_points().iter().map(|p| *p * radius).collect();
        vertices.push(vertices[0]);
        self.stroke(&vertices, center, Rotation::NONE, priority)
    }
    /// Outline with its top-left at `position`.
    pub fn draw_rect(&mut self, position: Vec2, size: Vec2, priority: i8) -> DrawResult {
        self.draw_rotated_rect(position, size, Rotation::NONE, priority)
    }
    pub fn draw_rotated_rect(&mut self, position: Vec2, size: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        check_size(size)?;
        let vertices = [
            Vec2::zero(),
            Vec2::new(size.x, 0.0),
            size,
            Vec2::new(0.0, size.y),
            Vec2::zero(),
        ];
        self.stroke(&vertices, position, rotation, priority)
    }
    pub fn fill_rect(&mut self, position: Vec2, size: Vec2, priority: i8) -> DrawResult {
        self.fill_rotated_rect(position, size, Rotation::NONE, priority)
    }
    pub fn fill_rotated_rect(&mut self, position: Vec2, size: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        check_size(size)?;
        self.solid(Texture::Rect, self.style.color(), position, size, rotation, priority)
    }
    /// Disc centered on `center`.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, priority: i8) -> DrawResult {
        positive("radius", radius)?;
        self.solid(
            Texture::Circle,
            self.style.color(),
            center,
            Vec2::broadcast(radius * 2.0),
            Rotation::NONE,
            priority,
        )
    }
    /// Letterbox bars over whatever spills outside the canvas.
    pub(crate) fn draw_border(&mut self) {
        let border = self.canvas.border();
        let size = self.canvas.size();
        let bars = if border.x > 0.0 {
            [
                (Vec2::new(-border.x, 0.0), Vec2::new(border.x, size.y)),
                (Vec2::new(size.x, 0.0), Vec2::new(border.x, size.y)),
            ]
        } else if border.y > 0.0 {
            [
                (Vec2::new(0.0, -border.y), Vec2::new(size.x, border.y)),
                (Vec2::new(0.0, size.y), Vec2::new(size.x, border.y)),
            ]
        } else {
            return;
        };
        for (position, size) in bars {
            if let Err(err) = self.solid(Texture::Rect, Color::BLACK, position, size, Rotation::NONE, i8::MAX) {
                log::warn!("failed to draw border: {err}");
            }
        }
    }
}

// Numbered images.
impl Painter<'_> {
    fn image_sprite(
        &mut self,
        id: usize,
        position: Vec2,
        scale: Vec2,
        rotation: Rotation,
        clip: ClipInsets,
        priority: i8,
    ) -> DrawResult {
        let info = self.assets.lookup_image(id)?;
        self.draw_sprite(&SpriteDraw {
            texture: Texture::Image(info),
            color: Color::WHITE,
            position,
            scale,
            rotation,
            clip,
            priority,
            flip_y: true,
        })
    }
    pub fn draw_image(&mut self, id: usize, position: Vec2, priority: i8) -> DrawResult {
        self.image_sprite(id, position, Vec2::one(), Rotation::NONE, ClipInsets::NONE, priority)
    }
    pub fn draw_rotated_image(&mut self, id: usize, position: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        self.image_sprite(id, position, Vec2::one(), rotation, ClipInsets::NONE, priority)
    }
    pub fn draw_scaled_image(&mut self, id: usize, position: Vec2, scale: Vec2, priority: i8) -> DrawResult {
        self.image_sprite(id, position, scale, Rotation::NONE, ClipInsets::NONE, priority)
    }
    /// Draw part of an image. `position` is where the visible part's top-left lands.
    pub fn draw_clipped_image(&mut self, id: usize, position: Vec2, clip: ClipInsets, priority: i8) -> DrawResult {
        self.image_sprite(id, position, Vec2::one(), Rotation::NONE, clip, priority)
    }
    pub fn draw_image_srt(
        &mut self,
        id: usize,
        position: Vec2,
        scale: Vec2,
        rotation: Rotation,
        priority: i8,
    ) -> DrawResult {
        self.image_sprite(id, position, scale, rotation, ClipInsets::NONE, priority)
    }
    pub fn image_width(&self, id: usize) -> Result<u32, DrawError> {
        Ok(self.assets.lookup_image(id)?.width)
    }
    pub fn image_height(&self, id: usize) -> Result<u32, DrawError> {
        Ok(self.assets.lookup_image(id)?.height)
    }
    /// Whether two images, placed by their top-left corners, overlap.
    #[allow(clippy::cast_precision_loss)]
    pub fn check_hit_image(&self, a: usize, a_position: Vec2, b: usize, b_position: Vec2) -> Result<bool, DrawError> {
        let size = |info: ImageInfo| Vec2::new(info.width as f32, info.height as f32);
        let a = size(self.assets.lookup_image(a)?);
        let b = size(self.assets.lookup_image(b)?);
        Ok(collision::hit_rect(a_position, a, b_position, b))
    }
}

// Camera.
impl Painter<'_> {
    fn camera_sprite(&mut self, position: Vec2, scale: Vec2, rotation: Rotation, clip: ClipInsets, priority: i8) -> DrawResult {
        let Some([width, height]) = self.camera.and_then(|camera| camera.frame_size()) else {
            return Ok(Outcome::NotReady);
        };
        self.draw_sprite(&SpriteDraw {
            texture: Texture::Camera { width, height },
            color: Color::WHITE,
            position,
            scale,
            rotation,
            clip,
            priority,
            flip_y: true,
        })
    }
    pub fn draw_camera_image(&mut self, position: Vec2, priority: i8) -> DrawResult {
        self.camera_sprite(position, Vec2::one(), Rotation::NONE, ClipInsets::NONE, priority)
    }
    pub fn draw_clipped_camera_image(&mut self, position: Vec2, clip: ClipInsets, priority: i8) -> DrawResult {
        self.camera_sprite(position, Vec2::one(), Rotation::NONE, clip, priority)
    }
    pub fn draw_scaled_camera_image(&mut self, position: Vec2, scale: Vec2, priority: i8) -> DrawResult {
        self.camera_sprite(position, scale, Rotation::NONE, ClipInsets::NONE, priority)
    }
    pub fn draw_rotated_camera_image(&mut self, position: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        self.camera_sprite(position, Vec2::one(), rotation, ClipInsets::NONE, priority)
    }
    pub fn draw_camera_image_srt(&mut self, position: Vec2, scale: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        self.camera_sprite(position, scale, rotation, ClipInsets::NONE, priority)
    }
    /// Zero while no camera is streaming.
    #[must_use]
    pub fn camera_image_width(&self) -> u32 {
        self.camera.and_then(|c| c.frame_size()).map_or(0, |[w, _]| w)
    }
    #[must_use]
    pub fn camera_image_height(&self) -> u32 {
        self.camera.and_then(|c| c.frame_size()).map_or(0, |[_, h]| h)
    }
}

fn is_web_url(url: &str) -> bool {
    if url.starts_with("http") {
        true
    } else {
        log::warn!("not a web url: {url:?}");
        false
    }
}

// Downloaded images.
impl Painter<'_> {
    fn online_sprite(
        &mut self,
        url: &str,
        position: Vec2,
        scale: Vec2,
        rotation: Rotation,
        clip: ClipInsets,
        priority: i8,
    ) -> DrawResult {
        clip.validate()?;
        if !is_web_url(url) {
            return Ok(Outcome::Skipped);
        }
        let Some(info) = self.web.image(url) else {
            return Ok(Outcome::NotReady);
        };
        self.draw_sprite(&SpriteDraw {
            texture: Texture::Image(info),
            color: Color::WHITE,
            position,
            scale,
            rotation,
            clip,
            priority,
            flip_y: true,
        })
    }
    /// Draws once downloaded. The first call starts the download.
    pub fn draw_online_image(&mut self, url: &str, position: Vec2, priority: i8) -> DrawResult {
        self.online_sprite(url, position, Vec2::one(), Rotation::NONE, ClipInsets::NONE, priority)
    }
    pub fn draw_scaled_online_image(&mut self, url: &str, position: Vec2, scale: Vec2, priority: i8) -> DrawResult {
        self.online_sprite(url, position, scale, Rotation::NONE, ClipInsets::NONE, priority)
    }
    pub fn draw_rotated_online_image(&mut self, url: &str, position: Vec2, rotation: Rotation, priority: i8) -> DrawResult {
        self.online_sprite(url, position, Vec2::one(), rotation, ClipInsets::NONE, priority)
    }
    pub fn draw_clipped_online_image(&mut self, url: &str, position: Vec2, clip: ClipInsets, priority: i8) -> DrawResult {
        self.online_sprite(url, position, Vec2::one(), Rotation::NONE, clip, priority)
    }
    pub fn draw_online_image_srt(
        &mut self,
        url: &str,
        position: Vec2,
        scale: Vec2,
        rotation: Rotation,
        priority: i8,
    ) -> DrawResult {
        self.online_sprite(url, position, scale, rotation, ClipInsets::NONE, priority)
    }
    /// Zero until downloaded.
    #[must_use]
    pub fn online_image_width(&self, url: &str) -> u32 {
        self.web.peek_image(url).map_or(0, |info| info.width)
    }
    #[must_use]
    pub fn online_image_height(&self, url: &str) -> u32 {
        self.web.peek_image(url).map_or(0, |info| info.height)
    }
    #[must_use]
    pub fn is_downloaded_image(&self, url: &str) -> bool {
        self.web.peek_image(url).is_some()
    }
    /// Text at `url`, `None` until downloaded. The first call starts the download.
    pub fn text_from_net(&mut self, url: &str) -> Option<std::sync::Arc<str>> {
        if !is_web_url(url) {
            return None;
        }
        self.web.text(url)
    }
}

// Text.
impl Painter<'_> {
    fn glyphs(&mut self, origin: Vec2, glyphs: impl Iterator<Item = text::PlacedGlyph>, priority: i8) -> DrawResult {
        let scale = Vec2::new(
            self.style.font_size() * self.style.horizontal_ratio(),
            self.style.font_size(),
        );
        let color = self.style.color();
        let mut outcome = Outcome::Skipped;
        for glyph in glyphs {
            outcome = self.draw_sprite(&SpriteDraw {
                color,
                scale,
                flip_y: true,
                ..SpriteDraw::new(Texture::Glyph(glyph.cell), origin + glyph.offset, priority)
            })?;
        }
        Ok(outcome)
    }
    fn advance(&self) -> f32 {
        self.style.font_size() * self.style.horizontal_ratio() * self.style.tracking()
    }
    /// One line of text. Line breaks are ignored but still take up a cell.
    pub fn draw_string(&mut self, position: Vec2, string: &str, priority: i8) -> DrawResult {
        let advance = self.advance();
        self.glyphs(position, text::layout_line(string, advance), priority)
    }
    /// Text broken into lines at `\n`.
    pub fn draw_multi_line_string(&mut self, position: Vec2, string: &str, priority: i8) -> DrawResult {
        let advance = self.advance();
        let line_advance = self.style.font_size() * self.style.line_height();
        self.glyphs(position, text::layout_lines(string, advance, line_advance), priority)
    }
}

// Everything else.
impl Painter<'_> {
    #[must_use]
    pub fn style(&self) -> &Style {
        self.style
    }
    pub fn style_mut(&mut self) -> &mut Style {
        self.style
    }
    #[must_use]
    pub fn canvas(&self) -> &CanvasScaler {
        self.canvas
    }
    #[must_use]
    pub fn gestures(&self) -> &GestureRecognizer {
        self.gestures
    }
    #[must_use]
    pub fn assets(&self) -> &dyn AssetTable {
        self.assets
    }
    /// Resize the logical canvas, clearing it if the size actually changed.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<ResolutionChange, CanvasError> {
        let change = self.canvas.set_resolution(width, height)?;
        if change == ResolutionChange::Changed {
            if let Err(err) = self.clear_screen() {
                log::warn!("failed to clear after resize: {err}");
            }
        }
        Ok(change)
    }
}
