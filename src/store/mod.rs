//! Model store client: the remote catalog of named scene documents
//!
//! The catalog speaks a small JSON protocol:
//! - `GET <base>` returns `[{ "id": .., "scene": .. }, ..]`
//! - `GET <base>/<id>` returns `{ "id": .., "scene": .. }`
//! - `POST <base>` with `{ "id": .., "scene": .. }` creates or replaces an entry
//!
//! None of the operations retry or cache.

mod http;
mod memory;

pub use http::HttpModelStore;
pub use memory::MemoryModelStore;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ViewerResult;
use crate::loaders::SceneDocument;
use crate::model_id::ModelId;

/// Wire form of one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ModelId,
    pub scene: SceneDocument,
}

/// Access to the model catalog
pub trait ModelStore: Send + Sync {
    /// Every known id, in the order the server returns them
    fn list_all(&self) -> ViewerResult<Vec<ModelId>>;

    /// One scene document; `NotFound` when the catalog has no such id
    fn fetch_one(&self, id: &ModelId) -> ViewerResult<SceneDocument>;

    /// Create or replace an entry. Last writer wins.
    fn submit(&self, id: &ModelId, doc: &SceneDocument) -> ViewerResult<()>;
}

/// URL of a single catalog entry: the base with `id` appended as one
/// percent-encoded path segment.
pub fn entry_url(base: &Url, id: &ModelId) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(id.as_str());
    }
    url
}
