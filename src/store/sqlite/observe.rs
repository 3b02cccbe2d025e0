//! Live (observable) queries over SqliteStore.

use super::SqliteStore;
use crate::domain::{
    AppNote, Container, NoteAttachment, NoteDisplayMode, NoteTag, Scholar, ScholarCategory,
    ScholarSubcategory,
};
use crate::store::{CorpusRepository, Live, NotesRepository, PrefsRepository, StoreResult};

impl SqliteStore {
    // ===========================================
    // Notes
    // ===========================================

    pub fn observe_all(&self) -> StoreResult<Live<Vec<AppNote>>> {
        Live::new(self, |store| store.list_all())
    }

    pub fn observe_by_container(&self, container: &Container) -> StoreResult<Live<Vec<AppNote>>> {
        let container = container.clone();
        Live::new(self, move |store| store.list_by_container(&container))
    }

    pub fn observe_all_note_tag_names(&self) -> StoreResult<Live<Vec<NoteTag>>> {
        Live::new(self, |store| store.all_note_tag_names())
    }

    pub fn observe_all_attachments(&self) -> StoreResult<Live<Vec<NoteAttachment>>> {
        Live::new(self, |store| store.all_attachments())
    }

    // ===========================================
    // Corpus
    // ===========================================

    pub fn observe_scholars(&self) -> StoreResult<Live<Vec<Scholar>>> {
        Live::new(self, |store| store.list_scholars())
    }

    pub fn observe_categories(&self, scholar_id: &str) -> StoreResult<Live<Vec<ScholarCategory>>> {
        let scholar_id = scholar_id.to_string();
        Live::new(self, move |store| store.list_categories(&scholar_id))
    }

    pub fn observe_subcategories(
        &self,
        scholar_id: &str,
        category_name: &str,
    ) -> StoreResult<Live<Vec<ScholarSubcategory>>> {
        let scholar_id = scholar_id.to_string();
        let category_name = category_name.to_string();
        Live::new(self, move |store| {
            store.list_subcategories(&scholar_id, &category_name)
        })
    }

    // ===========================================
    // Preferences
    // ===========================================

    pub fn observe_display_mode(&self) -> StoreResult<Live<NoteDisplayMode>> {
        Live::new(self, |store| store.display_mode())
    }
}
