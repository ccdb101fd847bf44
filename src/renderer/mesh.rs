use glam::{Mat3, Mat4, Vec3};

use crate::scene::SceneNode;
use crate::viewer::{LightingRig, ViewerState};

/// World-space vertex as consumed by `scene.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Scene uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    /// rgb premultiplied by intensity
    pub ambient: [f32; 4],
    /// rgb premultiplied by intensity
    pub spot_color: [f32; 4],
    pub spot_position: [f32; 4],
    /// xyz direction, w cosine of the cone half-angle
    pub spot_direction: [f32; 4],
}

impl SceneUniform {
    pub fn new(viewer: &ViewerState) -> Self {
        let camera = viewer.camera();
        let rig = viewer.lighting();
        let spot = &rig.spot;
        let direction = (spot.target - spot.position).normalize_or_zero();

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_view_proj: light_view_projection(rig).to_cols_array_2d(),
            eye: camera.eye().extend(1.0).to_array(),
            ambient: scaled(rig.ambient.color, rig.ambient.intensity),
            spot_color: scaled(spot.color, spot.intensity),
            spot_position: spot.position.extend(1.0).to_array(),
            spot_direction: direction.extend(spot.angle.cos()).to_array(),
        }
    }
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [color[0] * intensity, color[1] * intensity, color[2] * intensity, 1.0]
}

/// Projection of the spot light's shadow camera
pub fn light_view_projection(rig: &LightingRig) -> Mat4 {
    let spot = &rig.spot;
    let shadow = &spot.shadow;
    let up = if spot.position.cross(Vec3::Y).length_squared() < f32::EPSILON {
        Vec3::Z
    } else {
        Vec3::Y
    };

    Mat4::perspective_rh(shadow.fov_degrees.to_radians(), 1.0, shadow.near, shadow.far)
        * Mat4::look_at_rh(spot.position, spot.target, up)
}

/// Expand the scene graph into a world-space triangle list
pub fn flatten(root: &SceneNode) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(root.triangle_count() * 3);

    root.visit_primitives(Mat4::IDENTITY, &mut |primitive, world| {
        let normal_matrix = normal_matrix(world);

        for &index in &primitive.indices {
            let i = index as usize;
            let (Some(position), Some(normal)) = (primitive.positions.get(i), primitive.normals.get(i)) else {
                continue;
            };

            vertices.push(Vertex {
                position: world.transform_point3(*position).to_array(),
                normal: (normal_matrix * *normal).normalize_or_zero().to_array(),
                color: primitive.base_color,
            });
        }
    });

    vertices
}

fn normal_matrix(world: Mat4) -> Mat3 {
    if world.determinant().abs() <= f32::EPSILON {
        Mat3::from_mat4(world)
    } else {
        Mat3::from_mat4(world.inverse().transpose())
    }
}
