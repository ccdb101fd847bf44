//! Upload workflow: stage a local scene file, validate the id, hand off
//!
//! ```text
//!   Idle --file ok--> StagedFile --submit, id ok--> Idle
//!    ^  \--file bad--> Idle         |
//!    |                              \--submit, id bad--> StagedFile
//!    \--submit--> Idle (no file staged)
//! ```

use std::path::Path;

use crate::error::{ViewerError, ViewerResult};
use crate::loaders::SceneDocument;
use crate::model_id::ModelId;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadState {
    Idle,
    StagedFile { file_name: String, document: SceneDocument },
}

/// A validated (id, document) pair ready for preview and submission
#[derive(Debug, Clone, PartialEq)]
pub struct PendingUpload {
    pub id: ModelId,
    pub document: SceneDocument,
}

#[derive(Debug, Clone)]
pub struct UploadWorkflow {
    state: UploadState,
    id_field: String,
}

impl Default for UploadWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self {
            state: UploadState::Idle,
            id_field: String::new(),
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_staged(&self) -> bool {
        matches!(self.state, UploadState::StagedFile { .. })
    }

    pub fn staged_file_name(&self) -> Option<&str> {
        match &self.state {
            UploadState::StagedFile { file_name, .. } => Some(file_name),
            UploadState::Idle => None,
        }
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Text buffer bound to the id input
    pub fn id_field_mut(&mut self) -> &mut String {
        &mut self.id_field
    }

    /// Read and stage a scene file from disk
    pub fn select_file(&mut self, path: &Path) -> ViewerResult<()> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.state = UploadState::Idle;
                return Err(ViewerError::ValidationFailed(format!(
                    "cannot read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.stage_bytes(file_name, &bytes)
    }

    /// Decode file contents as JSON and stage them.
    ///
    /// On failure nothing stays staged, even if a file was staged before.
    pub fn stage_bytes(&mut self, file_name: impl Into<String>, bytes: &[u8]) -> ViewerResult<()> {
        let file_name = file_name.into();

        match serde_json::from_slice::<SceneDocument>(bytes) {
            Ok(document) => {
                log::info!("Staged {} for upload", file_name);
                self.state = UploadState::StagedFile { file_name, document };
                Ok(())
            }
            Err(e) => {
                self.state = UploadState::Idle;
                Err(ViewerError::ParseFailed(format!("{} is not valid JSON: {}", file_name, e)))
            }
        }
    }

    /// Validate and take the staged upload, clearing the file and the id field.
    ///
    /// Fails with `ValidationFailed` when the id is invalid (the file stays
    /// staged) or when nothing is staged.
    pub fn submit(&mut self) -> ViewerResult<PendingUpload> {
        let id = ModelId::from_input(&self.id_field)?;

        match std::mem::replace(&mut self.state, UploadState::Idle) {
            UploadState::StagedFile { document, .. } => {
                self.id_field.clear();
                Ok(PendingUpload { id, document })
            }
            UploadState::Idle => Err(ViewerError::ValidationFailed(
                "no model file selected".to_string(),
            )),
        }
    }
}
