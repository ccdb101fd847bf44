//! Application core: routes UI actions and job completions between the
//! model list, the upload workflow and the viewer state.
//!
//! Everything here runs on the UI thread. Failures are logged and kept as
//! a one-line status; none of them stop the viewer.

use std::path::PathBuf;

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::jobs::{EventQueue, JobDispatcher, LoadOrigin, ViewerEvent};
use crate::model_id::ModelId;
use crate::model_list::ModelList;
use crate::upload::UploadWorkflow;
use crate::viewer::ViewerState;

/// Intent raised by the side panel
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Refresh,
    Select(ModelId),
    OpenFile(PathBuf),
    Upload,
}

/// Latest diagnostic shown under the panel
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub message: String,
    pub is_error: bool,
}

pub struct ModelViewerApp {
    viewer: ViewerState,
    models: ModelList,
    upload: UploadWorkflow,
    jobs: JobDispatcher,
    queue: EventQueue,
    status: Option<StatusLine>,
}

impl ModelViewerApp {
    pub fn new(config: &ViewerConfig, jobs: JobDispatcher, queue: EventQueue, aspect: f32) -> Self {
        Self {
            viewer: ViewerState::new(config.camera, config.lighting, config.model_scale, aspect),
            models: ModelList::new(),
            upload: UploadWorkflow::new(),
            jobs,
            queue,
            status: None,
        }
    }

    /// Kick off the initial catalog listing
    pub fn start(&mut self) {
        self.viewer.reset();
        self.jobs.list_models();
    }

    pub fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Refresh => self.jobs.list_models(),
            UiAction::Select(id) => self.select(id),
            UiAction::OpenFile(path) => self.open_file(path),
            UiAction::Upload => self.upload(),
        }
    }

    /// Load a catalog entry into the viewer
    pub fn select(&mut self, id: ModelId) {
        log::info!("Loading model {}", id);
        self.models.select(&id);
        self.jobs.load_model(id);
    }

    pub fn open_file(&mut self, path: PathBuf) {
        match self.upload.select_file(&path) {
            Ok(()) => self.info(format!("Staged {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    /// Preview the staged file, store it and list it.
    ///
    /// The list entry is added right away; a failed store write is only
    /// logged and the next refresh drops the entry again.
    pub fn upload(&mut self) {
        match self.upload.submit() {
            Ok(pending) => {
                log::info!("Uploading model {}", pending.id);
                self.jobs.preview(pending.id.clone(), pending.document.clone());
                self.jobs.submit(pending.id.clone(), pending.document);
                self.models.add_entry(pending.id);
            }
            Err(e) => self.report(e),
        }
    }

    /// Apply every completion that has arrived. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let events = self.queue.drain();
        let count = events.len();
        for event in events {
            self.apply(event);
        }
        count
    }

    /// Wait for one completion and apply it. `false` once no job can report.
    pub async fn process_next(&mut self) -> bool {
        match self.queue.next().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, event: ViewerEvent) {
        match event {
            ViewerEvent::Listed(Ok(ids)) => {
                log::info!("Model list refreshed: {} entries", ids.len());
                self.models.replace_all(ids);
            }
            ViewerEvent::Listed(Err(e)) => self.report(e),
            ViewerEvent::Loaded { origin, result: Ok(root) } => {
                self.viewer.show_model(root);
                match origin {
                    LoadOrigin::Catalog(id) => self.info(format!("Showing {}", id)),
                    LoadOrigin::UploadPreview(id) => self.info(format!("Previewing {}", id)),
                }
            }
            ViewerEvent::Loaded { origin, result: Err(e) } => {
                log::warn!("Load of {} failed", origin.id());
                self.report(e);
            }
            ViewerEvent::Submitted { id, result: Ok(()) } => {
                self.info(format!("Stored {} in the catalog", id));
            }
            ViewerEvent::Submitted { id, result: Err(e) } => {
                log::error!("Storing {} failed; it stays listed until the next refresh", id);
                self.report(e);
            }
        }
    }

    fn info(&mut self, message: String) {
        log::info!("{}", message);
        self.status = Some(StatusLine {
            message,
            is_error: false,
        });
    }

    fn report(&mut self, error: ViewerError) {
        match &error {
            ViewerError::NotFound(_) | ViewerError::ValidationFailed(_) => log::warn!("{}", error),
            ViewerError::StoreUnavailable(_) | ViewerError::ParseFailed(_) => log::error!("{}", error),
        }
        self.status = Some(StatusLine {
            message: error.to_string(),
            is_error: true,
        });
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut ViewerState {
        &mut self.viewer
    }

    pub fn models(&self) -> &ModelList {
        &self.models
    }

    pub fn upload_state(&self) -> &UploadWorkflow {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadWorkflow {
        &mut self.upload
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }
}
