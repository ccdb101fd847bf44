//! Viewer state: camera, lighting and the one model currently shown
//!
//! Every load goes through [`ViewerState::show_model`], which clears the
//! scene before installing the new root. `swap_in` alone never clears.

use glam::Vec3;

use crate::camera::{CameraSettings, OrbitCamera};
use crate::scene::SceneGraphRoot;

/// 0xRRGGBB to float RGB in 0..=1
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    pub fov_degrees: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Half-angle of the cone, radians
    pub angle: f32,
    pub shadow: ShadowSettings,
}

/// Ambient fill plus one spot light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingRig {
    pub ambient: AmbientLight,
    pub spot: SpotLight,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: rgb(0xfafafa),
                intensity: 0.9,
            },
            spot: SpotLight {
                color: rgb(0x606060),
                intensity: 1.0,
                position: Vec3::splat(5000.0),
                target: Vec3::ZERO,
                angle: std::f32::consts::FRAC_PI_3,
                shadow: ShadowSettings {
                    map_size: 1024,
                    near: 0.1,
                    far: 100_000.0,
                    fov_degrees: 75.0,
                },
            },
        }
    }
}

/// Everything the render loop draws
#[derive(Debug, Clone)]
pub struct ViewerState {
    root: Option<SceneGraphRoot>,
    camera: OrbitCamera,
    lighting: LightingRig,
    default_lighting: LightingRig,
    model_scale: f32,
    revision: u64,
}

impl ViewerState {
    /// Empty lit scene with the camera at its default position
    pub fn new(camera: CameraSettings, lighting: LightingRig, model_scale: f32, aspect: f32) -> Self {
        Self {
            root: None,
            camera: OrbitCamera::new(camera, aspect),
            lighting,
            default_lighting: lighting,
            model_scale,
            revision: 0,
        }
    }

    /// Drop the model, restore the default lights and camera
    pub fn reset(&mut self) {
        self.root = None;
        self.lighting = self.default_lighting;
        self.camera.reset();
        self.revision += 1;
    }

    /// Pin the root at the origin, apply the model scale and install it
    pub fn swap_in(&mut self, mut root: SceneGraphRoot) {
        root.transform.translation = Vec3::ZERO;
        root.transform.scale = Vec3::splat(self.model_scale);

        log::debug!(
            "Swapping in model: {} nodes, {} triangles",
            root.node_count(),
            root.triangle_count()
        );

        self.root = Some(root);
        self.revision += 1;
    }

    /// Load policy used by every caller: clear, then swap in
    pub fn show_model(&mut self, root: SceneGraphRoot) {
        self.reset();
        self.swap_in(root);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn root(&self) -> Option<&SceneGraphRoot> {
        self.root.as_ref()
    }

    pub fn has_model(&self) -> bool {
        self.root.is_some()
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }

    pub fn model_scale(&self) -> f32 {
        self.model_scale
    }

    /// Bumped on every change to the displayed scene graph
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
