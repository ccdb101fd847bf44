#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::executor::block_on;
use model_viewer::app::ModelViewerApp;
use model_viewer::config::{ViewerConfig, DEFAULT_BASE_URL};
use model_viewer::jobs::JobDispatcher;
use model_viewer::loaders::{GltfSceneLoader, SceneDocument};
use model_viewer::store::{CatalogEntry, MemoryModelStore, ModelStore};
use model_viewer::{ModelId, ViewerResult};
use serde_json::json;

// Three vertices (0,0,0) (1,0,0) (0,1,0) as little-endian f32
pub const TRIANGLE_BUFFER: &str =
    "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";

/// Minimal glTF with one triangle node called `node_name`
pub fn triangle_document(node_name: &str) -> SceneDocument {
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": node_name, "mesh": 0, "translation": [3.0, 2.0, 1.0] }],
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

pub fn id(raw: &str) -> ModelId {
    ModelId::new(raw).unwrap()
}

pub fn entry(raw: &str) -> CatalogEntry {
    CatalogEntry {
        id: id(raw),
        scene: triangle_document(&format!("{}-node", raw)),
    }
}

/// Store wrapper that counts every call reaching the catalog
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryModelStore,
    pub lists: AtomicUsize,
    pub fetches: AtomicUsize,
    pub submits: AtomicUsize,
}

impl CountingStore {
    pub fn new(inner: MemoryModelStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.lists.load(Ordering::SeqCst) + self.fetches.load(Ordering::SeqCst) + self.submits.load(Ordering::SeqCst)
    }
}

impl ModelStore for CountingStore {
    fn list_all(&self) -> ViewerResult<Vec<ModelId>> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.inner.list_all()
    }

    fn fetch_one(&self, id: &ModelId) -> ViewerResult<SceneDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_one(id)
    }

    fn submit(&self, id: &ModelId, doc: &SceneDocument) -> ViewerResult<()> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        self.inner.submit(id, doc)
    }
}

pub fn config() -> ViewerConfig {
    ViewerConfig::new(DEFAULT_BASE_URL).unwrap()
}

/// Application wired to `store` with a real glTF loader
pub fn app_with(store: Arc<dyn ModelStore>) -> ModelViewerApp {
    let (jobs, queue) = JobDispatcher::new(2, store, Arc::new(GltfSceneLoader::new())).unwrap();
    ModelViewerApp::new(&config(), jobs, queue, 1.5)
}

/// Apply `count` job completions, blocking for each
pub fn settle(app: &mut ModelViewerApp, count: usize) {
    for _ in 0..count {
        assert!(block_on(app.process_next()), "job queue closed early");
    }
}

/// Scratch directory under the system temp dir, removed on drop
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "model-viewer-tests-{}-{}",
            std::process::id(),
            label
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory
    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.path.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
