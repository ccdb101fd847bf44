use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::OrbitCamera;

/// Pixels per scroll line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Which drag gesture a held mouse button drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
}

/// Turns winit mouse events into orbit camera motion
///
/// Left drag rotates, right drag pans, the wheel zooms.
#[derive(Debug, Clone, Default)]
pub struct OrbitInput {
    /// Current cursor position (relative to window)
    cursor: Option<(f32, f32)>,
    drag: Option<DragMode>,
}

impl OrbitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit WindowEvent, feeding the camera
    pub fn process_event(&mut self, event: &WindowEvent, camera: &mut OrbitCamera) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                self.button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32, camera);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.drag = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                camera.zoom(lines);
            }
            _ => {}
        }
    }

    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        let mode = match button {
            MouseButton::Left => DragMode::Rotate,
            MouseButton::Right => DragMode::Pan,
            _ => return,
        };

        if pressed {
            self.drag = Some(mode);
        } else if self.drag == Some(mode) {
            self.drag = None;
        }
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32, camera: &mut OrbitCamera) {
        if let (Some((old_x, old_y)), Some(mode)) = (self.cursor, self.drag) {
            let (dx, dy) = (x - old_x, y - old_y);
            match mode {
                DragMode::Rotate => camera.rotate(dx, dy),
                DragMode::Pan => camera.pan(dx, dy),
            }
        }
        self.cursor = Some((x, y));
    }

    pub fn drag(&self) -> Option<DragMode> {
        self.drag
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }
}
