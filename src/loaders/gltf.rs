use glam::{Quat, Vec3};

use super::{SceneDocument, SceneLoader};
use crate::error::{ViewerError, ViewerResult};
use crate::scene::{Mesh, Primitive, SceneGraphRoot, SceneNode, Transform};

const DEFAULT_BASE_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// Deepest node hierarchy accepted; scene traversal recurses once per level
pub const MAX_NODE_DEPTH: usize = 256;

/// Parses glTF 2.0 JSON documents with embedded (`data:`) buffers
#[derive(Debug, Default, Clone, Copy)]
pub struct GltfSceneLoader;

impl GltfSceneLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw glTF bytes (JSON or GLB)
    pub fn parse_slice(&self, bytes: &[u8]) -> ViewerResult<SceneGraphRoot> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
        let buffers = gltf::import_buffers(&document, None, blob)?;

        log::debug!(
            "glTF parsed: {} scenes, {} nodes, {} meshes",
            document.scenes().count(),
            document.nodes().count(),
            document.meshes().count()
        );

        let scene = document.default_scene().or_else(|| document.scenes().next());

        let root = match scene {
            Some(scene) => {
                let mut walk = NodeWalk::new(document.nodes().count());
                let children = scene
                    .nodes()
                    .map(|node| convert_node(&node, &buffers, &mut walk))
                    .collect::<ViewerResult<Vec<_>>>()?;
                SceneNode::group(scene.name().map(str::to_string), children)
            }
            None => {
                log::warn!("glTF document has no scenes");
                SceneNode::group(None, Vec::new())
            }
        };

        log::debug!(
            "Scene graph built: {} nodes, {} triangles",
            root.node_count(),
            root.triangle_count()
        );
        Ok(root)
    }
}

impl SceneLoader for GltfSceneLoader {
    fn parse(&self, doc: &SceneDocument) -> ViewerResult<SceneGraphRoot> {
        let bytes = serde_json::to_vec(doc).map_err(|e| ViewerError::ParseFailed(e.to_string()))?;
        self.parse_slice(&bytes)
    }
}

/// Hierarchy bookkeeping for one scene conversion.
///
/// glTF requires node hierarchies to be disjoint trees, but the validator
/// does not enforce it. A node reached twice is either a cycle or shared
/// between parents, and both are rejected.
struct NodeWalk {
    visited: Vec<bool>,
    ancestors: Vec<usize>,
}

impl NodeWalk {
    fn new(node_count: usize) -> Self {
        Self {
            visited: vec![false; node_count],
            ancestors: Vec::new(),
        }
    }

    fn enter(&mut self, index: usize) -> ViewerResult<()> {
        if self.ancestors.contains(&index) {
            return Err(ViewerError::ParseFailed(format!("node cycle at node {}", index)));
        }
        if self.ancestors.len() >= MAX_NODE_DEPTH {
            return Err(ViewerError::ParseFailed(format!(
                "node hierarchy deeper than {} levels",
                MAX_NODE_DEPTH
            )));
        }
        match self.visited.get_mut(index) {
            Some(seen) if *seen => Err(ViewerError::ParseFailed(format!(
                "node {} has more than one parent",
                index
            ))),
            Some(seen) => {
                *seen = true;
                self.ancestors.push(index);
                Ok(())
            }
            None => Err(ViewerError::ParseFailed(format!("node {} out of range", index))),
        }
    }

    fn leave(&mut self) {
        self.ancestors.pop();
    }
}

/// Recursively converts glTF nodes
fn convert_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    walk: &mut NodeWalk,
) -> ViewerResult<SceneNode> {
    walk.enter(node.index())?;
    let converted = convert_subtree(node, buffers, walk);
    walk.leave();
    converted
}

fn convert_subtree(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    walk: &mut NodeWalk,
) -> ViewerResult<SceneNode> {
    let (translation, rotation, scale) = node.transform().decomposed();

    let mesh = node
        .mesh()
        .map(|mesh| convert_mesh(&mesh, buffers))
        .transpose()?;

    let children = node
        .children()
        .map(|child| convert_node(&child, buffers, walk))
        .collect::<ViewerResult<Vec<_>>>()?;

    Ok(SceneNode {
        name: node.name().map(str::to_string),
        transform: Transform {
            translation: Vec3::from_array(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from_array(scale),
        },
        mesh,
        children,
    })
}

fn convert_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> ViewerResult<Mesh> {
    let mut primitives = Vec::new();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

        let positions: Vec<Vec3> = match reader.read_positions() {
            Some(iter) => iter.map(Vec3::from_array).collect(),
            None => {
                return Err(ViewerError::ParseFailed(format!(
                    "mesh {:?} has a primitive without positions",
                    mesh.name().unwrap_or("unnamed")
                )))
            }
        };

        if positions.is_empty() {
            continue;
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(ViewerError::ParseFailed(format!(
                "index {} out of range for {} vertices",
                bad,
                positions.len()
            )));
        }
        let indices = truncate_to_triangles(indices);

        let normals = match reader.read_normals() {
            Some(iter) => {
                let normals: Vec<Vec3> = iter.map(Vec3::from_array).collect();
                if normals.len() == positions.len() {
                    normals
                } else {
                    compute_vertex_normals(&positions, &indices)
                }
            }
            None => compute_vertex_normals(&positions, &indices),
        };

        let base_color = primitive
            .material()
            .pbr_metallic_roughness()
            .base_color_factor();

        primitives.push(Primitive {
            positions,
            normals,
            indices,
            base_color: if primitive.material().index().is_some() {
                base_color
            } else {
                DEFAULT_BASE_COLOR
            },
        });
    }

    Ok(Mesh {
        name: mesh.name().map(str::to_string),
        primitives,
    })
}

fn truncate_to_triangles(mut indices: Vec<u32>) -> Vec<u32> {
    let whole = indices.len() - indices.len() % 3;
    indices.truncate(whole);
    indices
}

/// Area-weighted vertex normals from the triangle list
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Three vertices (0,0,0) (1,0,0) (0,1,0) as little-endian f32
    const TRIANGLE_BUFFER: &str =
        "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";

    fn triangle_document() -> SceneDocument {
        json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "name": "main", "nodes": [0] }],
            "nodes": [{ "name": "triangle", "mesh": 0, "translation": [5.0, 0.0, 0.0] }],
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
            "buffers": [{ "uri": TRIANGLE_BUFFER, "byteLength": 36 }],
            "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
            "accessors": [{
                "bufferView": 0,
                "componentType": 5126,
                "count": 3,
                "type": "VEC3",
                "min": [0.0, 0.0, 0.0],
                "max": [1.0, 1.0, 0.0]
            }]
        })
    }

    #[test]
    fn parses_embedded_triangle() {
        let root = GltfSceneLoader::new().parse(&triangle_document()).unwrap();

        assert_eq!(root.name.as_deref(), Some("main"));
        assert_eq!(root.transform, Transform::IDENTITY);
        assert_eq!(root.children.len(), 1);

        let node = &root.children[0];
        assert_eq!(node.name.as_deref(), Some("triangle"));
        assert_eq!(node.transform.translation, Vec3::new(5.0, 0.0, 0.0));

        let primitive = &node.mesh.as_ref().unwrap().primitives[0];
        assert_eq!(primitive.indices, vec![0, 1, 2]);
        assert_eq!(primitive.base_color, DEFAULT_BASE_COLOR);
        for normal in &primitive.normals {
            assert!((*normal - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn rejects_non_gltf_json() {
        let result = GltfSceneLoader::new().parse(&json!({ "hello": "world" }));
        assert!(matches!(result, Err(ViewerError::ParseFailed(_))));
    }

    #[test]
    fn rejects_external_buffer_uris() {
        let mut doc = triangle_document();
        doc["buffers"][0]["uri"] = json!("triangle.bin");

        let result = GltfSceneLoader::new().parse(&doc);
        assert!(matches!(result, Err(ViewerError::ParseFailed(_))));
    }

    #[test]
    fn document_without_scenes_is_an_empty_group() {
        let root = GltfSceneLoader::new()
            .parse(&json!({ "asset": { "version": "2.0" } }))
            .unwrap();
        assert!(root.children.is_empty());
        assert!(root.mesh.is_none());
    }

    /// `depth` nodes, each the only child of the one before
    fn chain_document(depth: usize) -> SceneDocument {
        let nodes: Vec<_> = (0..depth)
            .map(|i| {
                if i + 1 < depth {
                    json!({ "name": format!("link-{}", i), "children": [i + 1] })
                } else {
                    json!({ "name": format!("link-{}", i) })
                }
            })
            .collect();
        json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": nodes
        })
    }

    #[test]
    fn self_parented_node_is_a_parse_failure() {
        let doc = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [{ "name": "loop", "children": [0] }]
        });

        match GltfSceneLoader::new().parse(&doc) {
            Err(ViewerError::ParseFailed(message)) => assert!(message.contains("cycle")),
            other => panic!("expected a parse failure, got {:?}", other),
        }
    }

    #[test]
    fn indirect_cycle_is_a_parse_failure() {
        let doc = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0] }],
            "nodes": [{ "children": [1] }, { "children": [2] }, { "children": [0] }]
        });

        let result = GltfSceneLoader::new().parse(&doc);
        assert!(matches!(result, Err(ViewerError::ParseFailed(_))));
    }

    #[test]
    fn shared_child_is_a_parse_failure() {
        let doc = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": [0, 1] }],
            "nodes": [{ "children": [2] }, { "children": [2] }, { "name": "shared" }]
        });

        let result = GltfSceneLoader::new().parse(&doc);
        assert!(matches!(result, Err(ViewerError::ParseFailed(_))));
    }

    #[test]
    fn hierarchy_depth_is_capped() {
        let loader = GltfSceneLoader::new();

        let root = loader.parse(&chain_document(MAX_NODE_DEPTH)).unwrap();
        assert_eq!(root.node_count(), MAX_NODE_DEPTH + 1);

        let result = loader.parse(&chain_document(MAX_NODE_DEPTH + 1));
        assert!(matches!(result, Err(ViewerError::ParseFailed(_))));
    }

    #[test]
    fn vertex_normals_follow_winding() {
        let positions = [Vec3::ZERO, Vec3::Z, Vec3::X];
        let normals = compute_vertex_normals(&positions, &[0, 1, 2]);
        assert!((normals[0] - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn truncates_trailing_indices() {
        assert_eq!(truncate_to_triangles(vec![0, 1, 2, 0]), vec![0, 1, 2]);
    }
}
