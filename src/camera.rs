use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::FRAC_PI_2;

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f32 = 1.0;

/// Fixed camera parameters the viewer resets to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Share of pending motion applied per 60 Hz frame
    pub damping: f32,
    /// Radians per dragged pixel
    pub rotate_speed: f32,
    /// Log-distance per scroll line
    pub zoom_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 100_000.0,
            position: Vec3::new(2000.0, 1000.0, -2000.0),
            target: Vec3::ZERO,
            damping: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
        }
    }
}

/// Motion requested by input but not yet applied
#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct PendingMotion {
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: Vec2,
}

impl PendingMotion {
    fn scaled(&self, factor: f32) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            zoom: self.zoom * factor,
            pan: self.pan * factor,
        }
    }

    fn is_settled(&self) -> bool {
        self.yaw.abs() < 1e-6 && self.pitch.abs() < 1e-6 && self.zoom.abs() < 1e-6 && self.pan.length() < 1e-3
    }
}

/// Orbit camera with damped rotate / zoom / pan around a target point
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    settings: CameraSettings,
    target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    aspect: f32,
    pending: PendingMotion,
}

impl OrbitCamera {
    pub fn new(settings: CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            settings,
            target: settings.target,
            distance: MIN_DISTANCE,
            yaw: 0.0,
            pitch: 0.0,
            aspect: aspect.max(f32::EPSILON),
            pending: PendingMotion::default(),
        };
        camera.reset();
        camera
    }

    /// Back to the configured position, dropping any pending motion
    pub fn reset(&mut self) {
        let offset = self.settings.position - self.settings.target;
        self.target = self.settings.target;
        self.distance = offset.length().max(MIN_DISTANCE);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = offset.x.atan2(offset.z);
        self.pending = PendingMotion::default();
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Queue a rotation from a mouse drag, in pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending.yaw -= dx * self.settings.rotate_speed;
        self.pending.pitch += dy * self.settings.rotate_speed;
    }

    /// Queue a zoom; positive lines move closer
    pub fn zoom(&mut self, lines: f32) {
        self.pending.zoom -= lines * self.settings.zoom_speed;
    }

    /// Queue a pan from a mouse drag, in pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending.pan += Vec2::new(dx, dy);
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_settled()
    }

    /// Apply a damped share of the pending motion
    pub fn update(&mut self, delta_time: f32) {
        let retain = (1.0 - self.settings.damping.clamp(0.0, 1.0)).powf(delta_time.max(0.0) * 60.0);
        let step = self.pending.scaled(1.0 - retain);
        self.pending = self.pending.scaled(retain);

        self.yaw += step.yaw;
        self.pitch = (self.pitch + step.pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance * step.zoom.exp()).clamp(MIN_DISTANCE, self.settings.far * 0.5);

        if step.pan != Vec2::ZERO {
            let forward = (self.target - self.eye()).normalize();
            let right = forward.cross(Vec3::Y).normalize();
            let up = right.cross(forward).normalize();
            let pan_speed = self.distance * 0.001;
            self.target += (-right * step.pan.x + up * step.pan.y) * pan_speed;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.settings.fov_y_degrees.to_radians(),
            self.aspect,
            self.settings.near,
            self.settings.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(CameraSettings::default(), 1.5)
    }

    fn settle(camera: &mut OrbitCamera) {
        for _ in 0..2000 {
            camera.update(1.0 / 60.0);
        }
    }

    #[test]
    fn default_eye_is_configured_position() {
        let camera = camera();
        assert!((camera.eye() - Vec3::new(2000.0, 1000.0, -2000.0)).length() < 1e-2);
        assert_eq!(camera.target(), Vec3::ZERO);
        assert!((camera.distance() - 3000.0).abs() < 1e-2);
    }

    #[test]
    fn damping_applies_rotation_gradually() {
        let mut camera = camera();
        let start = camera.eye();

        camera.rotate(100.0, 0.0);
        camera.update(1.0 / 60.0);
        let after_one = camera.eye();
        assert!((after_one - start).length() > 0.0);
        assert!(!camera.is_settled());

        settle(&mut camera);
        assert!(camera.is_settled());
        // Full 0.5 rad of yaw ends up applied
        let mut expected = OrbitCamera::new(CameraSettings::default(), 1.5);
        expected.yaw -= 0.5;
        assert!((camera.eye() - expected.eye()).length() < 0.5);
    }

    #[test]
    fn damping_is_frame_rate_independent() {
        let mut fast = camera();
        let mut slow = camera();
        fast.rotate(50.0, 20.0);
        slow.rotate(50.0, 20.0);

        fast.update(1.0 / 60.0);
        fast.update(1.0 / 60.0);
        slow.update(2.0 / 60.0);

        assert!((fast.eye() - slow.eye()).length() < 1e-2);
    }

    #[test]
    fn pitch_is_clamped_below_the_pole() {
        let mut camera = camera();
        camera.rotate(0.0, 100_000.0);
        settle(&mut camera);
        assert!(camera.eye().y < camera.distance());
        assert!(camera.view_matrix().is_finite());
    }

    #[test]
    fn zoom_moves_closer() {
        let mut camera = camera();
        camera.zoom(3.0);
        settle(&mut camera);
        assert!(camera.distance() < 3000.0);
        assert!(camera.distance() >= MIN_DISTANCE);
    }

    #[test]
    fn pan_moves_target() {
        let mut camera = camera();
        camera.pan(100.0, 0.0);
        settle(&mut camera);
        assert!(camera.target().length() > 1.0);
    }

    #[test]
    fn reset_restores_default_pose() {
        let mut camera = camera();
        camera.rotate(300.0, -50.0);
        camera.pan(10.0, 10.0);
        settle(&mut camera);
        camera.rotate(10.0, 0.0);

        camera.reset();
        assert!((camera.eye() - Vec3::new(2000.0, 1000.0, -2000.0)).length() < 1e-2);
        assert!(camera.is_settled());
    }

    #[test]
    fn aspect_ignores_zero_sizes() {
        let mut camera = camera();
        camera.set_aspect(1600, 800);
        assert_eq!(camera.aspect(), 2.0);
        camera.set_aspect(0, 800);
        assert_eq!(camera.aspect(), 2.0);
    }
}
