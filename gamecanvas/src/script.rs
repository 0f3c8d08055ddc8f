//! Recorded input, replayed frame by frame.
//!
//! A script is toml: an optional `[display]` table followed by `[[steps]]`,
//! each lasting some number of frames. A step either holds touches or places
//! the mouse; button edges are worked out from neighbouring steps.
//!
//! ```toml
//! [display]
//! width = 1280
//! height = 720
//!
//! [[steps]]
//! mouse = [100.0, 100.0]
//! held = true
//! frames = 3
//!
//! [[steps]]
//! touches = [{ id = 0, x = 10.0, y = 20.0, phase = "began" }]
//! ```

use gamecanvas_core::{
    canvas::DisplayInfo,
    touch::{MouseSample, PointerInput, Touch, TouchPhase},
    units::Resolution,
    FrameInput, Vec2,
};

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("malformed script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("display size must be nonzero, got {0}x{1}")]
    EmptyDisplay(u32, u32),
    #[error("step {0} lasts zero frames")]
    EmptyStep(usize),
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct ScriptDisplay {
    pub width: u32,
    pub height: u32,
    /// Zero for a display that doesn't report a density.
    pub dpi: f32,
    pub touch_supported: bool,
}
impl Default for ScriptDisplay {
    fn default() -> Self {
        let display = DisplayInfo::default();
        Self {
            width: display.width,
            height: display.height,
            dpi: display.resolution.into_dpi(),
            touch_supported: display.touch_supported,
        }
    }
}
impl From<ScriptDisplay> for DisplayInfo {
    fn from(value: ScriptDisplay) -> Self {
        Self {
            width: value.width,
            height: value.height,
            resolution: Resolution::Dpi(value.dpi),
            touch_supported: value.touch_supported,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ScriptTouch {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub phase: TouchPhase,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Step {
    pub frames: u32,
    /// Mouse position in device pixels. Keeps the previous position if absent.
    pub mouse: Option<[f32; 2]>,
    pub held: bool,
    /// Takes precedence over the mouse.
    pub touches: Option<Vec<ScriptTouch>>,
    /// New device size from this step on.
    pub resize: Option<[u32; 2]>,
}
impl Default for Step {
    fn default() -> Self {
        Self {
            frames: 1,
            mouse: None,
            held: false,
            touches: None,
            resize: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default)]
pub struct Script {
    pub display: ScriptDisplay,
    pub steps: Vec<Step>,
}
impl Script {
    pub fn from_toml_str(text: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(text)?;
        let ScriptDisplay { width, height, .. } = script.display;
        if width == 0 || height == 0 {
            return Err(ScriptError::EmptyDisplay(width, height));
        }
        if let Some(index) = script.steps.iter().position(|step| step.frames == 0) {
            return Err(ScriptError::EmptyStep(index));
        }
        Ok(script)
    }
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.steps.iter().map(|step| step.frames as usize).sum()
    }
    /// Expand into one input per frame.
    #[must_use]
    pub fn frames(&self) -> Vec<FrameInput> {
        let mut display = DisplayInfo::from(self.display);
        let mut mouse = MouseSample::default();
        let mut frames = Vec::with_capacity(self.frame_count());

        for step in &self.steps {
            if let Some([width, height]) = step.resize {
                display.width = width;
                display.height = height;
            }
            for repeat in 0..step.frames {
                let pointer = if let Some(touches) = &step.touches {
                    PointerInput::Touches(
                        touches
                            .iter()
                            .filter_map(|touch| touch_on_repeat(touch, repeat))
                            .collect(),
                    )
                } else {
                    let position = step.mouse.map_or(mouse.position, Vec2::from);
                    mouse = MouseSample {
                        position,
                        held: step.held,
                        pressed: step.held && !mouse.held,
                        released: !step.held && mouse.held,
                    };
                    PointerInput::Mouse(mouse)
                };
                frames.push(FrameInput { display, pointer });
            }
        }
        frames
    }
}

/// The scripted phase only holds for a step's first frame. After that a live
/// touch sits still and a finished one is gone.
fn touch_on_repeat(touch: &ScriptTouch, repeat: u32) -> Option<Touch> {
    let phase = match (repeat, touch.phase) {
        (0, phase) => phase,
        (_, TouchPhase::Ended | TouchPhase::Canceled) => return None,
        _ => TouchPhase::Stationary,
    };
    Some(Touch {
        id: touch.id,
        position: Vec2::new(touch.x, touch.y),
        phase,
    })
}

#[cfg(test)]
mod test {
    use super::{Script, ScriptError};
    use gamecanvas_core::{
        touch::{PointerInput, TouchPhase},
        units::Resolution,
        Vec2,
    };

    #[test]
    fn mouse_edges() {
        let script = Script::from_toml_str(
            r#"
[[steps]]
mouse = [5.0, 5.0]
held = true
frames = 2

[[steps]]
mouse = [9.0, 5.0]

[[steps]]
frames = 2
"#,
        )
        .unwrap();
        let samples: Vec<_> = script
            .frames()
            .into_iter()
            .map(|frame| match frame.pointer {
                PointerInput::Mouse(mouse) => mouse,
                PointerInput::Touches(_) => panic!("expected mouse"),
            })
            .collect();
        assert_eq!(samples.len(), 5);
        assert!(samples[0].pressed && samples[0].held);
        assert!(!samples[1].pressed && samples[1].held);
        assert!(samples[2].released);
        assert_eq!(samples[2].position, Vec2::new(9.0, 5.0));
        // Position carries over, edges don't.
        assert_eq!(samples[4].position, Vec2::new(9.0, 5.0));
        assert!(!samples[4].released);
    }
    #[test]
    fn touches_settle() {
        let script = Script::from_toml_str(
            r#"
[[steps]]
frames = 3
touches = [
    { id = 0, x = 1.0, y = 2.0, phase = "began" },
    { id = 1, x = 3.0, y = 4.0, phase = "ended" },
]
"#,
        )
        .unwrap();
        let frames = script.frames();
        let PointerInput::Touches(first) = &frames[0].pointer else {
            panic!("expected touches")
        };
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].phase, TouchPhase::Ended);
        let PointerInput::Touches(later) = &frames[2].pointer else {
            panic!("expected touches")
        };
        assert_eq!(later.len(), 1);
        assert_eq!(later[0].phase, TouchPhase::Stationary);
    }
    #[test]
    fn display_and_resize() {
        let script = Script::from_toml_str(
            r"
[display]
width = 1280
height = 720
dpi = 0.0

[[steps]]

[[steps]]
resize = [720, 1280]
",
        )
        .unwrap();
        let frames = script.frames();
        assert_eq!(frames[0].display.width, 1280);
        assert_eq!(frames[0].display.resolution, Resolution::Dpi(0.0));
        assert_eq!((frames[1].display.width, frames[1].display.height), (720, 1280));
    }
    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Script::from_toml_str("[display]\nwidth = 0"),
            Err(ScriptError::EmptyDisplay(0, 480))
        ));
        assert!(matches!(
            Script::from_toml_str("[[steps]]\nframes = 0"),
            Err(ScriptError::EmptyStep(0))
        ));
        assert!(matches!(
            Script::from_toml_str("steps = 4"),
            Err(ScriptError::Parse(_))
        ));
    }
}
