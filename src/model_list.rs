use crate::model_id::ModelId;

/// Ids shown in the side panel.
///
/// The list is a view of the catalog: `replace_all` rebuilds it from a fresh
/// listing, `add_entry` appends an optimistic entry after an upload.
#[derive(Debug, Clone, Default)]
pub struct ModelList {
    entries: Vec<ModelId>,
    selected: Option<ModelId>,
}

impl ModelList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` unless already listed. Returns whether it was added.
    pub fn add_entry(&mut self, id: ModelId) -> bool {
        if self.entries.contains(&id) {
            return false;
        }
        self.entries.push(id);
        true
    }

    /// Rebuild from a catalog listing, keeping server order
    pub fn replace_all(&mut self, ids: impl IntoIterator<Item = ModelId>) {
        self.entries.clear();
        for id in ids {
            self.add_entry(id);
        }
        if let Some(selected) = &self.selected {
            if !self.entries.contains(selected) {
                self.selected = None;
            }
        }
    }

    /// Record the activated entry for highlighting
    pub fn select(&mut self, id: &ModelId) {
        self.selected = Some(id.clone());
    }

    pub fn selected(&self) -> Option<&ModelId> {
        self.selected.as_ref()
    }

    pub fn entries(&self) -> &[ModelId] {
        &self.entries
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.entries.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
