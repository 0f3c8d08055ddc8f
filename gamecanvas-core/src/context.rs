//! The canvas as a whole, driven one frame at a time by the host.

use crate::{
    assets::{AssetTable, CameraFeed},
    cache::{Fetcher, WebCache},
    canvas::{CanvasError, CanvasScaler, DisplayInfo, ResolutionChange},
    config::{ConfigError, Settings},
    draw::{Painter, Style},
    pool::RenderPool,
    touch::{GestureRecognizer, PointerInput},
};

/// Everything the host samples once per frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub display: DisplayInfo,
    pub pointer: PointerInput,
}

pub struct GameCanvas {
    canvas: CanvasScaler,
    pool: RenderPool,
    style: Style,
    gestures: GestureRecognizer,
    assets: Box<dyn AssetTable>,
    web: WebCache,
    camera: Option<Box<dyn CameraFeed>>,
    display: DisplayInfo,
    frame_rate: u32,
    frame: u64,
}
impl GameCanvas {
    pub fn new(
        settings: &Settings,
        display: DisplayInfo,
        assets: Box<dyn AssetTable>,
        fetcher: Box<dyn Fetcher>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let canvas = CanvasScaler::new(
            settings.canvas.width,
            settings.canvas.height,
            display.width,
            display.height,
        )?;
        log::info!(
            "canvas {}x{} on {}x{} device at {}, {} images, {} sounds",
            canvas.width(),
            canvas.height(),
            display.width,
            display.height,
            display.resolution,
            assets.image_count(),
            assets.sound_count(),
        );
        Ok(Self {
            canvas,
            pool: RenderPool::default(),
            style: settings.style.clone(),
            gestures: GestureRecognizer::new(settings.gestures.clone()),
            assets,
            web: WebCache::new(fetcher),
            camera: None,
            display,
            frame_rate: settings.frame_rate,
            frame: 0,
        })
    }
    /// Run one frame: pick up display changes, digest input, let `draw` paint,
    /// then add the letterbox and retire whatever wasn't drawn.
    pub fn tick<F>(&mut self, delta: f32, input: &FrameInput, draw: F)
    where
        F: FnOnce(&mut Painter<'_>),
    {
        if self.canvas.set_device_size(input.display.width, input.display.height) {
            log::debug!(
                "device now {}x{}, scale {}",
                input.display.width,
                input.display.height,
                self.canvas.scale()
            );
        }
        self.display = input.display;
        self.gestures
            .update(delta, &input.pointer, input.display.resolution, &self.canvas);
        {
            let mut painter = self.painter();
            draw(&mut painter);
            painter.draw_border();
        }
        self.pool.end_frame();
        self.frame += 1;
    }
    /// Draw outside of [`Self::tick`]. Slots claimed here are retired at the end of the next tick
    /// unless that tick draws at least as many.
    pub fn painter(&mut self) -> Painter<'_> {
        Painter {
            pool: &mut self.pool,
            canvas: &mut self.canvas,
            style: &mut self.style,
            assets: self.assets.as_ref(),
            web: &mut self.web,
            camera: self.camera.as_deref(),
            gestures: &self.gestures,
        }
    }
    pub fn set_resolution(&mut self, width: u32, height: u32) -> Result<ResolutionChange, CanvasError> {
        self.painter().set_resolution(width, height)
    }
    pub fn set_camera(&mut self, camera: Option<Box<dyn CameraFeed>>) {
        self.camera = camera;
    }
    #[must_use]
    pub fn canvas(&self) -> &CanvasScaler {
        &self.canvas
    }
    #[must_use]
    pub fn pool(&self) -> &RenderPool {
        &self.pool
    }
    #[must_use]
    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }
    pub fn gestures_mut(&mut self) -> &mut GestureRecognizer {
        &mut self.gestures
    }
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }
    #[must_use]
    pub fn web_cache(&self) -> &WebCache {
        &self.web
    }
    /// For delivering download results.
    pub fn web_cache_mut(&mut self) -> &mut WebCache {
        &mut self.web
    }
    #[must_use]
    pub fn assets(&self) -> &dyn AssetTable {
        self.assets.as_ref()
    }
    #[must_use]
    pub fn display(&self) -> &DisplayInfo {
        &self.display
    }
    #[must_use]
    pub fn is_touch_supported(&self) -> bool {
        self.display.touch_supported
    }
    #[must_use]
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }
    /// Frames completed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod test {
    use super::{FrameInput, GameCanvas};
    use crate::{
        assets::NoAssets,
        cache::NoFetcher,
        canvas::{DisplayInfo, ResolutionChange},
        config::Settings,
        draw::Outcome,
        touch::{MouseSample, PointerInput},
        units::Resolution,
    };
    use ultraviolet::Vec2;

    fn canvas() -> GameCanvas {
        GameCanvas::new(
            &Settings::default(),
            DisplayInfo::default(),
            Box::new(NoAssets),
            Box::new(NoFetcher),
        )
        .unwrap()
    }

    #[test]
    fn frames_recycle_slots() {
        let mut gc = canvas();
        let input = FrameInput::default();
        gc.tick(1.0 / 60.0, &input, |p| {
            for i in 0..3 {
                assert_eq!(
                    p.fill_rect(Vec2::new(i as f32, 0.0), Vec2::one(), 0),
                    Ok(Outcome::Drawn)
                );
            }
        });
        assert_eq!(gc.pool().sprites().iter().filter(|s| s.enabled).count(), 3);
        gc.tick(1.0 / 60.0, &input, |p| {
            p.fill_circle(Vec2::new(5.0, 5.0), 2.0, 0).unwrap();
        });
        assert_eq!(gc.pool().sprites().iter().filter(|s| s.enabled).count(), 1);
        assert_eq!(gc.frame_count(), 2);
    }
    #[test]
    fn display_change_adds_border() {
        let mut gc = canvas();
        let input = FrameInput {
            display: DisplayInfo {
                width: 1280,
                height: 720,
                resolution: Resolution::Dpi(160.0),
                touch_supported: true,
            },
            pointer: PointerInput::default(),
        };
        gc.tick(0.016, &input, |_| {});
        assert!(gc.canvas().border().x > 0.0);
        assert!(gc.is_touch_supported());
        let bars: Vec<_> = gc.pool().sprites().iter().filter(|s| s.enabled).collect();
        assert_eq!(bars.len(), 2);
    }
    #[test]
    fn input_reaches_the_draw_callback() {
        let mut gc = canvas();
        let input = FrameInput {
            pointer: PointerInput::Mouse(MouseSample {
                position: Vec2::new(30.0, 40.0),
                held: true,
                pressed: true,
                released: false,
            }),
            ..FrameInput::default()
        };
        let mut seen = None;
        gc.tick(0.016, &input, |p| {
            seen = Some((p.gestures().is_touch_began(), p.gestures().touch_point()));
        });
        assert_eq!(seen, Some((true, Vec2::new(30.0, 40.0))));
    }
    #[test]
    fn resize_between_frames() {
        let mut gc = canvas();
        assert_eq!(gc.set_resolution(640, 480), Ok(ResolutionChange::Unchanged));
        assert_eq!(gc.pool().cursor().draw_index, 0);
        assert_eq!(gc.set_resolution(480, 640), Ok(ResolutionChange::Changed));
        assert!(gc.canvas().is_portrait());
        // The clear is pending until the frame ends.
        assert_eq!(gc.pool().cursor().draw_index, 1);
        gc.tick(0.016, &FrameInput::default(), |_| {});
        let cleared = &gc.pool().sprites()[0];
        assert!(cleared.enabled);
        assert_eq!(cleared.priority, -128);
    }
}
