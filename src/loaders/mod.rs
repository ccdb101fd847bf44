//! Scene loader adapter: serialized scene document in, scene graph out

pub mod gltf;

pub use self::gltf::GltfSceneLoader;

use crate::error::ViewerResult;
use crate::scene::SceneGraphRoot;

/// Opaque JSON scene document, passed through unmodified
pub type SceneDocument = serde_json::Value;

/// Turns a scene document into a scene graph.
///
/// Implementations must not touch viewer state; a malformed document is
/// reported as `ViewerError::ParseFailed`.
pub trait SceneLoader: Send + Sync {
    fn parse(&self, doc: &SceneDocument) -> ViewerResult<SceneGraphRoot>;
}
