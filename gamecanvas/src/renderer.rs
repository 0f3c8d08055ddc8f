//! CPU rasterizer for the render pool.
//!
//! Paints every enabled slot back to front into a device-sized image. Sprites
//! are unit quads pushed through an affine transform and sampled nearest,
//! lines are stroked segment by segment. Good enough for snapshots and tests,
//! not for frame rates.

use cgmath::{Deg, Matrix3, SquareMatrix, Vector3};
use gamecanvas_core::{
    canvas::CanvasScaler,
    pool::{LineSlot, Primitive, RenderPool, SpriteSlot, Texture},
    Vec2,
};

use crate::textures::{TexelSource, TextureStore};

const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn translation(offset: Vec2) -> Matrix3<f32> {
    Matrix3::from_cols(
        Vector3::unit_x(),
        Vector3::unit_y(),
        Vector3::new(offset.x, offset.y, 1.0),
    )
}
fn scaling(scale: Vec2) -> Matrix3<f32> {
    Matrix3::from_diagonal(Vector3::new(scale.x, scale.y, 1.0))
}
fn apply(matrix: Matrix3<f32>, point: Vec2) -> Vec2 {
    let out = matrix * Vector3::new(point.x, point.y, 1.0);
    Vec2::new(out.x, out.y)
}

/// Straight-alpha float pixels, converted to 8 bit once at the end.
struct Target {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}
impl Target {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![BACKGROUND; width as usize * height as usize],
        }
    }
    fn blend(&mut self, x: u32, y: u32, [r, g, b, a]: [f32; 4]) {
        let dst = &mut self.pixels[y as usize * self.width as usize + x as usize];
        let keep = 1.0 - a;
        *dst = [
            r * a + dst[0] * keep,
            g * a + dst[1] * keep,
            b * a + dst[2] * keep,
            a + dst[3] * keep,
        ];
    }
    /// Pixel rows and columns whose centers might fall inside `min..max`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn covered(&self, min: Vec2, max: Vec2) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let clamp = |v: f32, limit: u32| v.clamp(0.0, limit as f32) as u32;
        let xs = clamp(min.x.floor(), self.width)..clamp(max.x.ceil(), self.width);
        let ys = clamp(min.y.floor(), self.height)..clamp(max.y.ceil(), self.height);
        (!xs.is_empty() && !ys.is_empty()).then_some((xs, ys))
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_image(self) -> image::RgbaImage {
        let bytes = self
            .pixels
            .iter()
            .flat_map(|pixel| pixel.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect();
        // Length is width * height * 4 by construction.
        image::RgbaImage::from_raw(self.width, self.height, bytes).unwrap_or_default()
    }
}

enum Fill<'a> {
    Solid,
    Disc,
    Texels(TexelSource<'a>),
}

/// Paint the pool as it stands after a frame.
#[must_use]
pub fn rasterize(pool: &RenderPool, canvas: &CanvasScaler, store: &TextureStore) -> image::RgbaImage {
    let [width, height] = canvas.device_size();
    let mut target = Target::new(width, height);
    let to_device = 1.0 / canvas.scale();
    for primitive in pool.painter_order() {
        match primitive {
            Primitive::Sprite(slot) => paint_sprite(&mut target, slot, to_device, store),
            Primitive::Line(slot) => paint_line(&mut target, slot, to_device),
        }
    }
    target.into_image()
}

#[allow(clippy::cast_precision_loss)]
fn paint_sprite(target: &mut Target, slot: &SpriteSlot, to_device: f32, store: &TextureStore) {
    let fill = match slot.texture {
        Texture::Rect => Fill::Solid,
        Texture::Circle => Fill::Disc,
        Texture::Glyph(cell) => match store.glyph(cell) {
            Some(texels) => Fill::Texels(texels),
            None => return,
        },
        Texture::Image(info) => match store.image(info.handle) {
            Some(texels) => Fill::Texels(texels),
            None => {
                log::trace!("texture {:?} missing from store", info.handle);
                return;
            }
        },
        // No camera on this host.
        Texture::Camera { .. } => return,
    };

    // Unit quad -> world -> device.
    let quad = slot.texture.quad_size() * slot.scale;
    let local_to_device = scaling(Vec2::broadcast(to_device))
        * translation(slot.position)
        * Matrix3::from_angle_z(Deg(slot.rotation))
        * scaling(quad)
        * translation(-slot.texture.anchor());
    let Some(device_to_local) = local_to_device.invert() else {
        return;
    };

    let corners = [Vec2::zero(), Vec2::unit_x(), Vec2::unit_y(), Vec2::one()]
        .map(|corner| apply(local_to_device, corner));
    let mut min = corners.iter().fold(Vec2::broadcast(f32::INFINITY), |acc, c| acc.min_by_component(*c));
    let mut max = corners.iter().fold(Vec2::broadcast(f32::NEG_INFINITY), |acc, c| acc.max_by_component(*c));
    if let Some(clip) = slot.clip {
        min = min.max_by_component(Vec2::new(clip.left, clip.top));
        max = max.min_by_component(Vec2::new(clip.right, clip.bottom));
    }
    let Some((xs, ys)) = target.covered(min, max) else {
        return;
    };

    for y in ys {
        for x in xs.clone() {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if slot.clip.is_some_and(|clip| !clip.contains(center)) {
                continue;
            }
            let uv = apply(device_to_local, center);
            if !(0.0..1.0).contains(&uv.x) || !(0.0..1.0).contains(&uv.y) {
                continue;
            }
            let texel = match &fill {
                Fill::Solid => [1.0; 4],
                Fill::Disc => {
                    if (uv - Vec2::broadcast(0.5)).mag_sq() > 0.25 {
                        continue;
                    }
                    [1.0; 4]
                }
                Fill::Texels(texels) => texels.sample(uv.x, uv.y, slot.flip_y),
            };
            target.blend(x, y, slot.color.modulate(texel));
        }
    }
}

fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let along = b - a;
    let length_sq = along.mag_sq();
    let t = if length_sq > 0.0 {
        ((point - a).dot(along) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (point - (a + along * t)).mag()
}

#[allow(clippy::cast_precision_loss)]
fn paint_line(target: &mut Target, slot: &LineSlot, to_device: f32) {
    if slot.vertices.len() < 2 {
        return;
    }
    let local_to_device =
        scaling(Vec2::broadcast(to_device)) * translation(slot.position) * Matrix3::from_angle_z(Deg(slot.rotation));
    let points: Vec<Vec2> = slot.vertices.iter().map(|v| apply(local_to_device, *v)).collect();
    // Hairlines still cover the pixels they cross.
    let half_width = (slot.width * to_device * 0.5).max(0.5);

    let min = points.iter().fold(Vec2::broadcast(f32::INFINITY), |acc, p| acc.min_by_component(*p));
    let max = points.iter().fold(Vec2::broadcast(f32::NEG_INFINITY), |acc, p| acc.max_by_component(*p));
    let pad = Vec2::broadcast(half_width);
    let Some((xs, ys)) = target.covered(min - pad, max + pad) else {
        return;
    };
    let color = slot.color.modulate([1.0; 4]);
    for y in ys {
        for x in xs.clone() {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            // Each pixel once, however many segments touch it.
            let hit = points
                .windows(2)
                .any(|pair| distance_to_segment(center, pair[0], pair[1]) <= half_width);
            if hit {
                target.blend(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::rasterize;
    use crate::textures::TextureStore;
    use gamecanvas_core::{
        assets::ImageList,
        cache::NoFetcher,
        canvas::DisplayInfo,
        config::Settings,
        color::Color,
        draw::Rotation,
        FrameInput, GameCanvas, Vec2,
    };

    fn canvas(display: DisplayInfo, assets: ImageList) -> GameCanvas {
        GameCanvas::new(&Settings::default(), display, Box::new(assets), Box::new(NoFetcher)).unwrap()
    }
    fn pixel(image: &image::RgbaImage, x: u32, y: u32) -> [u8; 4] {
        image.get_pixel(x, y).0
    }
    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];
    const WHITE: [u8; 4] = [255; 4];

    #[test]
    fn filled_shapes() {
        let mut gc = canvas(DisplayInfo::default(), ImageList::default());
        let input = FrameInput::default();
        gc.tick(0.016, &input, |p| {
            p.style_mut().set_color(Color::new(1.0, 0.0, 0.0, 1.0).unwrap());
            p.fill_rect(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), 0).unwrap();
            p.fill_circle(Vec2::new(100.0, 100.0), 10.0, 0).unwrap();
        });
        let image = rasterize(gc.pool(), gc.canvas(), &TextureStore::default());
        assert_eq!(image.dimensions(), (640, 480));
        assert_eq!(pixel(&image, 15, 15), RED);
        assert_eq!(pixel(&image, 31, 15), BLACK);
        assert_eq!(pixel(&image, 100, 100), RED);
        assert_eq!(pixel(&image, 100, 108), RED);
        // Corner of the circle's square is outside the disc.
        assert_eq!(pixel(&image, 91, 91), BLACK);
    }
    #[test]
    fn priority_and_rotation() {
        let mut gc = canvas(DisplayInfo::default(), ImageList::default());
        gc.tick(0.016, &FrameInput::default(), |p| {
            p.style_mut().set_color(Color::new(1.0, 0.0, 0.0, 1.0).unwrap());
            p.fill_rect(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), 1).unwrap();
            p.style_mut().set_color(Color::WHITE);
            // Drawn later but lower priority.
            p.fill_rect(Vec2::new(0.0, 0.0), Vec2::new(50.0, 50.0), 0).unwrap();
            // Quarter turn about its own top-left swings it to the left of x = 200.
            p.fill_rotated_rect(
                Vec2::new(200.0, 200.0),
                Vec2::new(40.0, 10.0),
                Rotation::degrees(90.0),
                0,
            )
            .unwrap();
        });
        let image = rasterize(gc.pool(), gc.canvas(), &TextureStore::default());
        assert_eq!(pixel(&image, 25, 25), RED);
        assert_eq!(pixel(&image, 195, 220), WHITE);
        assert_eq!(pixel(&image, 220, 205), BLACK);
    }
    #[test]
    fn lines_and_letterbox() {
        let display = DisplayInfo {
            width: 1280,
            height: 480,
            ..DisplayInfo::default()
        };
        let mut gc = canvas(display, ImageList::default());
        gc.tick(0.016, &FrameInput { display, ..FrameInput::default() }, |p| {
            p.clear_screen().unwrap();
            p.style_mut().set_color(Color::new(1.0, 0.0, 0.0, 1.0).unwrap());
            p.draw_line(Vec2::new(0.0, 100.0), Vec2::new(640.0, 100.0), 0).unwrap();
        });
        let image = rasterize(gc.pool(), gc.canvas(), &TextureStore::default());
        assert_eq!(image.dimensions(), (1280, 480));
        // 640 wide canvas centered in 1280: 320 px bars either side.
        assert_eq!(pixel(&image, 100, 50), BLACK);
        assert_eq!(pixel(&image, 1200, 50), BLACK);
        assert_eq!(pixel(&image, 400, 50), WHITE);
        assert_eq!(pixel(&image, 400, 100), RED);
    }
    #[test]
    fn images_read_upright() {
        let mut store = TextureStore::default();
        let mut picture = image::RgbaImage::from_pixel(4, 4, image::Rgba(BLACK));
        picture.put_pixel(0, 0, image::Rgba(RED));
        let info = store.insert(picture);
        let mut gc = canvas(
            DisplayInfo::default(),
            ImageList {
                images: vec![info],
                sounds: 0,
            },
        );
        gc.tick(0.016, &FrameInput::default(), |p| {
            p.draw_scaled_image(0, Vec2::new(100.0, 100.0), Vec2::new(2.0, 2.0), 0).unwrap();
        });
        let image = rasterize(gc.pool(), gc.canvas(), &store);
        assert_eq!(pixel(&image, 100, 100), RED);
        assert_eq!(pixel(&image, 101, 101), RED);
        assert_eq!(pixel(&image, 103, 103), BLACK);
        assert_eq!(pixel(&image, 100, 107), BLACK);
    }
}
