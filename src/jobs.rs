//! Background jobs for store and parser work
//!
//! Jobs run on a small thread pool and report back through an unbounded
//! channel. The UI thread drains the channel once per event-loop turn, so
//! completions are applied in arrival order: when two loads race, the one
//! drained last is what ends up on screen. Nothing is cancelled.

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::executor::ThreadPool;
use futures::StreamExt;
use std::sync::Arc;

use crate::error::ViewerResult;
use crate::loaders::{SceneDocument, SceneLoader};
use crate::model_id::ModelId;
use crate::scene::SceneGraphRoot;
use crate::store::ModelStore;

/// Where a loaded scene came from
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOrigin {
    Catalog(ModelId),
    UploadPreview(ModelId),
}

impl LoadOrigin {
    pub fn id(&self) -> &ModelId {
        match self {
            LoadOrigin::Catalog(id) | LoadOrigin::UploadPreview(id) => id,
        }
    }
}

/// Completion of one background job
#[derive(Debug)]
pub enum ViewerEvent {
    Listed(ViewerResult<Vec<ModelId>>),
    Loaded {
        origin: LoadOrigin,
        result: ViewerResult<SceneGraphRoot>,
    },
    Submitted {
        id: ModelId,
        result: ViewerResult<()>,
    },
}

/// Receiving end of job completions
pub struct EventQueue {
    receiver: UnboundedReceiver<ViewerEvent>,
}

impl EventQueue {
    /// Everything completed so far, without blocking
    pub fn drain(&mut self) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Wait for the next completion; `None` once every sender is gone
    pub async fn next(&mut self) -> Option<ViewerEvent> {
        self.receiver.next().await
    }
}

/// Spawns store and loader work off the UI thread
#[derive(Clone)]
pub struct JobDispatcher {
    pool: ThreadPool,
    store: Arc<dyn ModelStore>,
    loader: Arc<dyn SceneLoader>,
    events: UnboundedSender<ViewerEvent>,
}

impl JobDispatcher {
    pub fn new(
        workers: usize,
        store: Arc<dyn ModelStore>,
        loader: Arc<dyn SceneLoader>,
    ) -> std::io::Result<(Self, EventQueue)> {
        let pool = ThreadPool::builder()
            .pool_size(workers.max(1))
            .name_prefix("viewer-job-")
            .create()?;
        let (events, receiver) = unbounded();

        Ok((
            Self {
                pool,
                store,
                loader,
                events,
            },
            EventQueue { receiver },
        ))
    }

    /// List the catalog
    pub fn list_models(&self) {
        let store = self.store.clone();
        let events = self.events.clone();

        self.pool.spawn_ok(async move {
            send(&events, ViewerEvent::Listed(store.list_all()));
        });
    }

    /// Fetch then parse one catalog entry
    pub fn load_model(&self, id: ModelId) {
        let store = self.store.clone();
        let loader = self.loader.clone();
        let events = self.events.clone();

        self.pool.spawn_ok(async move {
            let result = store.fetch_one(&id).and_then(|doc| loader.parse(&doc));
            send(
                &events,
                ViewerEvent::Loaded {
                    origin: LoadOrigin::Catalog(id),
                    result,
                },
            );
        });
    }

    /// Parse a staged document for local preview
    pub fn preview(&self, id: ModelId, document: SceneDocument) {
        let loader = self.loader.clone();
        let events = self.events.clone();

        self.pool.spawn_ok(async move {
            let result = loader.parse(&document);
            send(
                &events,
                ViewerEvent::Loaded {
                    origin: LoadOrigin::UploadPreview(id),
                    result,
                },
            );
        });
    }

    /// Store a document in the catalog
    pub fn submit(&self, id: ModelId, document: SceneDocument) {
        let store = self.store.clone();
        let events = self.events.clone();

        self.pool.spawn_ok(async move {
            let result = store.submit(&id, &document);
            send(&events, ViewerEvent::Submitted { id, result });
        });
    }
}

fn send(events: &UnboundedSender<ViewerEvent>, event: ViewerEvent) {
    if events.unbounded_send(event).is_err() {
        log::debug!("Event queue closed, dropping job result");
    }
}
