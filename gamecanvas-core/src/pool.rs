//! Recycled render slots.
//!
//! Every visible thing drawn during a frame occupies one slot. Slots are
//! handed out in call order, grow on demand and are never freed: at the end of
//! a frame everything past the cursor is disabled and the cursor rewinds, so
//! next frame the same slots are overwritten in place.
//!
//! Depth is derived from the byte priority plus the call order, scaled by how
//! many draws the previous frame made, so that later calls at the same
//! priority land in front without ever reaching the next priority band.

use crate::{assets::ImageInfo, color::Color};
use ultraviolet::Vec2;

pub const INITIAL_SPRITES: usize = 32;
pub const INITIAL_LINES: usize = 16;
/// Lower bound for the previous frame's high-water mark.
pub const MIN_DEPTH_SPAN: u32 = ((INITIAL_SPRITES + INITIAL_LINES) * 2) as u32;
/// Largest tie-breaking fraction within one priority band.
/// Coarse enough to stay below the next band after rounding at depth -512.
const MAX_TIE_FRACTION: f32 = 1.0 - 1.0 / 4096.0;

/// What a sprite samples from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Texture {
    /// Solid unit square.
    Rect,
    /// Solid circle inscribed in the unit square.
    Circle,
    /// A cell of the font atlas.
    Glyph(u16),
    Image(ImageInfo),
    /// The current camera frame, stretched over the unit square.
    Camera { width: u32, height: u32 },
}
impl Texture {
    /// Pixel size of the source, as seen by clipping.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn source_size(&self) -> Vec2 {
        match *self {
            Self::Rect | Self::Circle | Self::Glyph(_) => Vec2::one(),
            Self::Image(ImageInfo { width, height, .. }) | Self::Camera { width, height } => {
                Vec2::new(width as f32, height as f32)
            }
        }
    }
    /// Size of the quad before the slot's scale applies.
    /// Camera slots carry the frame size in their scale instead.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn quad_size(&self) -> Vec2 {
        match *self {
            Self::Image(ImageInfo { width, height, .. }) => Vec2::new(width as f32, height as f32),
            _ => Vec2::one(),
        }
    }
    /// Point of the quad that sits at the slot position, as a fraction of its size.
    /// Everything hangs from its top-left except the builtin circle, which is centered.
    #[must_use]
    pub fn anchor(&self) -> Vec2 {
        match self {
            Self::Circle => Vec2::broadcast(0.5),
            _ => Vec2::zero(),
        }
    }
}

/// Visible region of a sprite, in device pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}
impl ClipRect {
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpriteSlot {
    pub enabled: bool,
    pub texture: Texture,
    pub color: Color,
    /// World-space top-left, before rotation.
    pub position: Vec2,
    pub scale: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub depth: f32,
    pub priority: i8,
    pub clip: Option<ClipRect>,
    pub flip_y: bool,
}
impl SpriteSlot {
    fn disabled() -> Self {
        Self {
            enabled: false,
            texture: Texture::Rect,
            color: Color::WHITE,
            position: Vec2::zero(),
            scale: Vec2::one(),
            rotation: 0.0,
            depth: 0.0,
            priority: 0,
            clip: None,
            flip_y: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineSlot {
    pub enabled: bool,
    /// Polyline in local space. Reused between frames to keep its allocation.
    pub vertices: Vec<Vec2>,
    pub color: Color,
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub width: f32,
    pub depth: f32,
    pub priority: i8,
}
impl LineSlot {
    fn disabled() -> Self {
        Self {
            enabled: false,
            vertices: Vec::new(),
            color: Color::WHITE,
            position: Vec2::zero(),
            rotation: 0.0,
            width: 1.0,
            depth: 0.0,
            priority: 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameCursor {
    pub sprite: usize,
    pub line: usize,
    /// Draw calls made so far this frame.
    pub draw_index: u32,
    /// Twice last frame's draw count, floored at [`MIN_DEPTH_SPAN`].
    pub prev_frame_max: u32,
}
impl Default for FrameCursor {
    fn default() -> Self {
        Self {
            sprite: 0,
            line: 0,
            draw_index: 0,
            prev_frame_max: MIN_DEPTH_SPAN,
        }
    }
}

/// A slot to be painted, borrowed from the pool.
#[derive(Copy, Clone, Debug)]
pub enum Primitive<'a> {
    Sprite(&'a SpriteSlot),
    Line(&'a LineSlot),
}
impl Primitive<'_> {
    #[must_use]
    pub fn depth(&self) -> f32 {
        match self {
            Self::Sprite(s) => s.depth,
            Self::Line(l) => l.depth,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderPool {
    sprites: Vec<SpriteSlot>,
    lines: Vec<LineSlot>,
    cursor: FrameCursor,
}
impl Default for RenderPool {
    fn default() -> Self {
        Self::with_capacity(INITIAL_SPRITES, INITIAL_LINES)
    }
}
impl RenderPool {
    #[must_use]
    pub fn with_capacity(sprites: usize, lines: usize) -> Self {
        Self {
            sprites: std::iter::repeat_with(SpriteSlot::disabled).take(sprites).collect(),
            lines: std::iter::repeat_with(LineSlot::disabled).take(lines).collect(),
            cursor: FrameCursor::default(),
        }
    }
    #[must_use]
    pub fn cursor(&self) -> FrameCursor {
        self.cursor
    }
    /// Pseudo-depth for the next draw at `priority`. Higher is nearer.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn depth(&self, priority: i8) -> f32 {
        let tie = (self.cursor.draw_index as f32 / self.cursor.prev_frame_max as f32).min(MAX_TIE_FRACTION);
        f32::from(priority) * 2.0 - 256.0 + tie * 2.0
    }
    /// Claim the next sprite slot for this frame, returning its index.
    pub fn acquire_sprite(&mut self) -> usize {
        let index = self.cursor.sprite;
        if index == self.sprites.len() {
            self.sprites.push(SpriteSlot::disabled());
            log::trace!("sprite pool grew to {}", self.sprites.len());
        }
        self.cursor.sprite += 1;
        self.cursor.draw_index += 1;
        index
    }
    /// Claim the next line slot for this frame, returning its index.
    pub fn acquire_line(&mut self) -> usize {
        let index = self.cursor.line;
        if index == self.lines.len() {
            self.lines.push(LineSlot::disabled());
            log::trace!("line pool grew to {}", self.lines.len());
        }
        self.cursor.line += 1;
        self.cursor.draw_index += 1;
        index
    }
    /// Disable everything not drawn this frame and rewind.
    pub fn end_frame(&mut self) {
        let FrameCursor {
            sprite,
            line,
            draw_index,
            ..
        } = self.cursor;
        for slot in &mut self.sprites[sprite..] {
            slot.enabled = false;
        }
        for slot in &mut self.lines[line..] {
            slot.enabled = false;
        }
        self.cursor = FrameCursor {
            prev_frame_max: draw_index.saturating_mul(2).max(MIN_DEPTH_SPAN),
            ..FrameCursor::default()
        };
    }
    #[must_use]
    pub fn sprites(&self) -> &[SpriteSlot] {
        &self.sprites
    }
    #[must_use]
    pub fn lines(&self) -> &[LineSlot] {
        &self.lines
    }
    pub(crate) fn sprite_mut(&mut self, index: usize) -> &mut SpriteSlot {
        &mut self.sprites[index]
    }
    pub(crate) fn line_mut(&mut self, index: usize) -> &mut LineSlot {
        &mut self.lines[index]
    }
    /// Enabled slots, back to front.
    #[must_use]
    pub fn painter_order(&self) -> Vec<Primitive<'_>> {
        let mut visible: Vec<_> = self
            .sprites
            .iter()
            .filter(|s| s.enabled)
            .map(Primitive::Sprite)
            .chain(self.lines.iter().filter(|l| l.enabled).map(Primitive::Line))
            .collect();
        visible.sort_by(|a, b| a.depth().total_cmp(&b.depth()));
        visible
    }
}
