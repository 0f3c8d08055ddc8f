//! A small scene that exercises the canvas: taps count, flicks shift the
//! palette, pinches zoom the first image and a finger leaves a trail.

use gamecanvas_core::{
    draw::{DrawError, Painter, Rotation},
    Vec2,
};

const MIN_ZOOM: f32 = 0.25;
const MAX_ZOOM: f32 = 8.0;

pub struct Demo {
    taps: u32,
    flicks: u32,
    zoom: f32,
    spin: f32,
    /// Image to show from the web, if any.
    url: Option<String>,
}
impl Demo {
    #[must_use]
    pub fn new(url: Option<String>) -> Self {
        Self {
            taps: 0,
            flicks: 0,
            zoom: 1.0,
            spin: 0.0,
            url,
        }
    }
    #[must_use]
    pub fn taps(&self) -> u32 {
        self.taps
    }
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }
    fn react(&mut self, painter: &Painter<'_>) {
        let gestures = painter.gestures();
        if gestures.is_tap() {
            self.taps += 1;
            log::debug!("tap {} at {:?}", self.taps, gestures.touch_point());
        }
        if gestures.is_flick() {
            self.flicks += 1;
        }
        if gestures.is_pinch_in_out() {
            self.zoom = (self.zoom * gestures.pinch_ratio_instant()).clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self.spin = (self.spin + 3.0) % 360.0;
    }
    /// Draw one frame. Errors mean a bug in the scene, not bad input.
    #[allow(clippy::cast_precision_loss)]
    pub fn frame(&mut self, painter: &mut Painter<'_>) -> Result<(), DrawError> {
        self.react(painter);
        let size = painter.canvas().size();
        let hue = (self.flicks as f32 * 0.15).fract();

        _ = painter.clear_screen()?;
        painter.style_mut().set_color_hsv(hue, 0.3, 1.0, 1.0)?;
        _ = painter.fill_rect(Vec2::new(0.0, size.y * 0.75), Vec2::new(size.x, size.y * 0.25), -10)?;

        if painter.assets().image_count() > 0 {
            let scale = Vec2::broadcast(self.zoom);
            let image = Vec2::new(painter.image_width(0)? as f32, painter.image_height(0)? as f32) * scale;
            _ = painter.draw_scaled_image(0, (size - image) * 0.5, scale, 0)?;
        }
        if let Some(url) = &self.url {
            let half = Vec2::new(
                painter.online_image_width(url) as f32,
                painter.online_image_height(url) as f32,
            ) * 0.5;
            _ = painter.draw_rotated_online_image(url, Vec2::new(20.0, 20.0), Rotation::about(self.spin, half), 5)?;
        }

        painter.style_mut().set_color_hsv(hue + 0.5, 0.8, 0.6, 1.0)?;
        painter.style_mut().set_line_width(3.0)?;
        _ = painter.draw_rect(Vec2::new(8.0, 8.0), size - Vec2::broadcast(16.0), 10)?;
        let gestures = painter.gestures();
        if gestures.is_touch() {
            let point = gestures.touch_point();
            let radius = if gestures.is_hold() { 30.0 } else { 15.0 };
            _ = painter.fill_circle(point, radius, 20)?;
            _ = painter.draw_circle(point, radius + 6.0, 20)?;
        }

        painter.style_mut().set_color_rgba(0.1, 0.1, 0.1, 1.0)?;
        painter.style_mut().set_font_size(24.0)?;
        _ = painter.draw_multi_line_string(
            Vec2::new(24.0, 24.0),
            &format!("TAPS {}\nZOOM {:.2}", self.taps, self.zoom),
            30,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Demo;
    use crate::script::Script;
    use gamecanvas_core::{assets::NoAssets, cache::NoFetcher, config::Settings, GameCanvas};

    fn run(script: &str) -> Demo {
        let script = Script::from_toml_str(script).unwrap();
        let frames = script.frames();
        let settings = Settings::default();
        let mut gc = GameCanvas::new(&settings, frames[0].display, Box::new(NoAssets), Box::new(NoFetcher)).unwrap();
        let mut demo = Demo::new(None);
        for input in &frames {
            gc.tick(settings.frame_interval(), input, |p| demo.frame(p).unwrap());
        }
        demo
    }

    #[test]
    fn counts_taps() {
        let demo = run(r"
[[steps]]
mouse = [100.0, 100.0]
held = true

[[steps]]

[[steps]]
held = true

[[steps]]
frames = 2
");
        assert_eq!(demo.taps(), 2);
    }
    #[test]
    fn pinch_zooms() {
        let demo = run(r#"
[display]
touch_supported = true

[[steps]]
touches = [
    { id = 0, x = 100.0, y = 100.0, phase = "began" },
    { id = 1, x = 200.0, y = 100.0, phase = "began" },
]

[[steps]]
touches = [
    { id = 0, x = 50.0, y = 100.0, phase = "moved" },
    { id = 1, x = 250.0, y = 100.0, phase = "moved" },
]
"#);
        assert!((demo.zoom() - 2.0).abs() < 1e-4);
        assert_eq!(demo.taps(), 0);
    }
}
