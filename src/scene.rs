//! In-memory scene graph produced by the scene loader
//!
//! A loaded model is a tree of [`SceneNode`]s. Each node carries a local
//! transform, an optional mesh and its children. World transforms are the
//! product of the parent chain, the way glTF defines them.

use glam::{Mat4, Quat, Vec3};

/// Local translation / rotation / scale of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Triangle list with per-vertex normals and a flat base colour
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub base_color: [f32; 4],
}

impl Primitive {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// Node of a loaded scene graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub children: Vec<SceneNode>,
}

/// Root node handed over by the scene loader
pub type SceneGraphRoot = SceneNode;

impl SceneNode {
    pub fn group(name: Option<String>, children: Vec<SceneNode>) -> Self {
        Self {
            name,
            transform: Transform::IDENTITY,
            mesh: None,
            children,
        }
    }

    /// Visit every primitive together with its world matrix
    pub fn visit_primitives<F>(&self, parent: Mat4, visit: &mut F)
    where
        F: FnMut(&Primitive, Mat4),
    {
        let world = parent * self.transform.matrix();

        if let Some(mesh) = &self.mesh {
            for primitive in &mesh.primitives {
                visit(primitive, world);
            }
        }

        for child in &self.children {
            child.visit_primitives(world, visit);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    pub fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.visit_primitives(Mat4::IDENTITY, &mut |primitive, _| {
            count += primitive.triangle_count();
        });
        count
    }

    /// World-space bounds of all geometry under this node, if any
    pub fn world_bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        self.visit_primitives(Mat4::IDENTITY, &mut |primitive, world| {
            let points = primitive.positions.iter().map(|p| world.transform_point3(*p));
            if let Some(b) = Bounds::from_points(points) {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&b),
                    None => b,
                });
            }
        });
        bounds
    }
}

/// Axis-aligned bounding box
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_points(mut points: impl Iterator<Item = Vec3>) -> Option<Self> {
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Primitive {
        Primitive {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: vec![Vec3::Z; 3],
            indices: vec![0, 1, 2],
            base_color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    fn mesh_node(translation: Vec3) -> SceneNode {
        SceneNode {
            name: Some("tri".to_string()),
            transform: Transform {
                translation,
                ..Transform::IDENTITY
            },
            mesh: Some(Mesh {
                name: None,
                primitives: vec![unit_triangle()],
            }),
            children: vec![],
        }
    }

    #[test]
    fn transform_matrix_applies_scale_then_translation() {
        let t = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(2.0),
        };
        let p = t.matrix().transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn visit_composes_parent_transforms() {
        let mut root = SceneNode::group(None, vec![mesh_node(Vec3::new(0.0, 0.0, 5.0))]);
        root.transform.scale = Vec3::splat(10.0);

        let bounds = root.world_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, 0.0, 50.0));
        assert_eq!(bounds.max, Vec3::new(10.0, 10.0, 50.0));
    }

    #[test]
    fn counts_nodes_and_triangles() {
        let root = SceneNode::group(None, vec![mesh_node(Vec3::ZERO), mesh_node(Vec3::X)]);
        assert_eq!(root.node_count(), 3);
        assert_eq!(root.triangle_count(), 2);
    }

    #[test]
    fn empty_group_has_no_bounds() {
        assert!(SceneNode::group(None, vec![]).world_bounds().is_none());
    }

    #[test]
    fn bounds_union_and_center() {
        let a = Bounds::from_points([Vec3::ZERO, Vec3::ONE].into_iter()).unwrap();
        let b = Bounds::from_points([Vec3::splat(-1.0)].into_iter()).unwrap();
        let u = a.union(&b);
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::ONE);
        assert_eq!(u.center(), Vec3::ZERO);
        assert_eq!(u.extent(), Vec3::splat(2.0));
    }
}
