//! Pointer input to gestures.
//!
//! The host hands over raw pointer state once per frame as a [`PointerInput`],
//! either real touches or a mouse. [`GestureRecognizer::update`] folds it
//! into levels (is the screen being touched, is it a hold) and one-frame edges
//! (touch began, ended, tap, flick). Only the first finger drives taps and
//! flicks; the first two drive the pinch.

pub mod pinch;

use crate::{canvas::CanvasScaler, config::GestureConfig, units::Resolution};
use pinch::PinchState;
use smallvec::SmallVec;
use ultraviolet::Vec2;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    pub id: u64,
    /// Device pixels.
    pub position: Vec2,
    pub phase: TouchPhase,
}

/// Mouse state sampled this frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MouseSample {
    /// Device pixels.
    pub position: Vec2,
    /// Primary button is down.
    pub held: bool,
    /// Primary button went down since last frame.
    pub pressed: bool,
    /// Primary button went up since last frame.
    pub released: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    /// Active touches, in the order the platform reports them.
    Touches(SmallVec<[Touch; 4]>),
    Mouse(MouseSample),
}
impl Default for PointerInput {
    fn default() -> Self {
        Self::Mouse(MouseSample::default())
    }
}

/// Turns a mouse into a one-finger touch.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
struct MouseEmulation {
    last: Option<Vec2>,
}
impl MouseEmulation {
    fn phase(&mut self, mouse: &MouseSample) -> Option<TouchPhase> {
        if !(mouse.held || mouse.released) {
            return None;
        }
        let phase = if mouse.pressed {
            self.last = Some(mouse.position);
            TouchPhase::Began
        } else if mouse.released {
            self.last = None;
            TouchPhase::Ended
        } else if self.last != Some(mouse.position) {
            self.last = Some(mouse.position);
            TouchPhase::Moved
        } else {
            TouchPhase::Stationary
        };
        Some(phase)
    }
}

const NO_POINT: Vec2 = Vec2 { x: -1.0, y: -1.0 };

#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    config: GestureConfig,
    mouse: MouseEmulation,
    /// `None` while idle.
    phase: Option<TouchPhase>,
    touching: bool,
    began: bool,
    ended: bool,
    tapped: bool,
    flicked: bool,
    raw_point: Option<Vec2>,
    canvas_point: Vec2,
    began_point: Option<Vec2>,
    touch_time: f32,
    hold_time: f32,
    touches: SmallVec<[Touch; 4]>,
    pinch: PinchState,
}
impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            mouse: MouseEmulation::default(),
            phase: None,
            touching: false,
            began: false,
            ended: false,
            tapped: false,
            flicked: false,
            raw_point: None,
            canvas_point: NO_POINT,
            began_point: None,
            touch_time: 0.0,
            hold_time: 0.0,
            touches: SmallVec::new(),
            pinch: PinchState::default(),
        }
    }
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
    /// Thresholds are validated by [`GestureConfig`]'s setters, so any value here is usable.
    pub fn config_mut(&mut self) -> &mut GestureConfig {
        &mut self.config
    }
    /// Advance one frame. `delta` is seconds since the last update.
    pub fn update(&mut self, delta: f32, input: &PointerInput, resolution: Resolution, canvas: &CanvasScaler) {
        self.began = false;
        self.ended = false;
        self.tapped = false;
        self.flicked = false;

        let primary = match input {
            PointerInput::Touches(touches) => {
                self.touches.clone_from(touches);
                touches.first().map(|t| (t.position, t.phase))
            }
            PointerInput::Mouse(mouse) => {
                self.touches.clear();
                self.mouse.phase(mouse).map(|phase| (mouse.position, phase))
            }
        };
        self.touching = primary.is_some();
        self.phase = primary.map(|(_, phase)| phase);

        if let Some((point, phase)) = primary {
            self.touch_time += delta;
            self.raw_point = Some(point);
            match phase {
                TouchPhase::Began => {
                    self.began_point = Some(point);
                    self.began = true;
                }
                TouchPhase::Ended | TouchPhase::Canceled => {
                    self.classify_release(point, resolution);
                    self.began_point = None;
                    self.touch_time = 0.0;
                    self.hold_time = 0.0;
                    self.ended = true;
                }
                TouchPhase::Moved => self.hold_time = 0.0,
                TouchPhase::Stationary => self.hold_time += delta,
            }
        }

        match self.touches.as_slice() {
            [first, second, ..] => self.pinch.update(first, second),
            _ => self.pinch.reset(),
        }

        self.canvas_point = self.raw_point.map_or(NO_POINT, |raw| canvas.to_canvas(raw));
    }
    fn classify_release(&mut self, point: Vec2, resolution: Resolution) {
        // A touch that began before we were watching has nothing to compare against.
        let Some(began) = self.began_point else {
            return;
        };
        if self.hold_time > self.config.max_tap_time() {
            return;
        }
        let resolution = resolution.or_fallback();
        let inches = (point - began).mag() / resolution.into_dpi();
        self.flicked = inches >= self.config.min_flick_distance().into_inches(resolution);
        self.tapped = inches <= self.config.max_tap_distance().into_inches(resolution);
        if self.tapped || self.flicked {
            log::trace!(
                "release after {inches:.3}in: tap {}, flick {}",
                self.tapped,
                self.flicked
            );
        }
    }

    /// Anything touching the screen right now.
    #[must_use]
    pub fn is_touch(&self) -> bool {
        self.touching
    }
    #[must_use]
    pub fn is_touch_began(&self) -> bool {
        self.began
    }
    #[must_use]
    pub fn is_touch_ended(&self) -> bool {
        self.ended
    }
    #[must_use]
    pub fn is_tap(&self) -> bool {
        self.tapped
    }
    #[must_use]
    pub fn is_flick(&self) -> bool {
        self.flicked
    }
    /// Held still for at least the configured hold time.
    #[must_use]
    pub fn is_hold(&self) -> bool {
        self.hold_time >= self.config.min_hold_time()
    }
    #[must_use]
    pub fn phase(&self) -> Option<TouchPhase> {
        self.phase
    }
    /// Last known touch position in canvas space, `(-1, -1)` before any touch.
    #[must_use]
    pub fn touch_point(&self) -> Vec2 {
        self.canvas_point
    }
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn touch_x(&self) -> i32 {
        self.canvas_point.x as i32
    }
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn touch_y(&self) -> i32 {
        self.canvas_point.y as i32
    }
    /// Device position of the given finger, `(-1, -1)` if that finger isn't down.
    #[must_use]
    pub fn touch_point_of(&self, finger: usize) -> Vec2 {
        self.touches.get(finger).map_or(NO_POINT, |t| t.position)
    }
    #[must_use]
    pub fn touch_count(&self) -> usize {
        if self.touches.is_empty() {
            usize::from(self.touching)
        } else {
            self.touches.len()
        }
    }
    /// Seconds since the current touch began.
    #[must_use]
    pub fn touch_time(&self) -> f32 {
        self.touch_time
    }
    /// Seconds the current touch has stayed still.
    #[must_use]
    pub fn hold_time(&self) -> f32 {
        self.hold_time
    }
    #[must_use]
    pub fn pinch(&self) -> &PinchState {
        &self.pinch
    }
    /// Spread relative to the start of the pinch, zero when not pinching.
    #[must_use]
    pub fn pinch_ratio(&self) -> f32 {
        self.pinch.cumulative_ratio()
    }
    /// Spread relative to last frame, zero when not pinching.
    #[must_use]
    pub fn pinch_ratio_instant(&self) -> f32 {
        self.pinch.instant_ratio()
    }
    #[must_use]
    pub fn is_pinch_in(&self) -> bool {
        self.pinch.is_pinch_in(self.config.pinch_in_scale())
    }
    #[must_use]
    pub fn is_pinch_out(&self) -> bool {
        self.pinch.is_pinch_out(self.config.pinch_out_scale())
    }
    #[must_use]
    pub fn is_pinch_in_out(&self) -> bool {
        self.is_pinch_in() || self.is_pinch_out()
    }
}
