//! Document store — the mutation core
//!
//! Single owner of the currently open CV. Mutation operations apply
//! synchronously against the in-memory document; only persistence suspends.
//! Updates referencing an unknown section/entry id are silently ignored —
//! the UI only ever acts on ids it rendered from current state — and never
//! set the dirty flag.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{
    self, AccentBoxPatch, Cv, EntryPatch, HeaderPatch, LayoutPatch, PersonalInfoPatch, Revision,
    Section, SectionEntry, SectionPatch, ThemePatch,
};
use crate::storage::StorageAdapter;

/// Store owning the currently open document and its save status.
pub struct DocumentStore {
    storage: Arc<dyn StorageAdapter>,
    cv: Option<Cv>,
    is_dirty: bool,
    is_saving: bool,
    last_saved_at: Option<DateTime<Utc>>,
}

impl DocumentStore {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            cv: None,
            is_dirty: false,
            is_saving: false,
            last_saved_at: None,
        }
    }

    pub fn cv(&self) -> Option<&Cv> {
        self.cv.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Load a document from storage, healing older records in place.
    /// A missing id leaves the store empty ("not found" state for the UI).
    pub async fn load(&mut self, id: &str) -> Result<()> {
        tracing::debug!("Loading CV: {}", id);
        let mut cv = self.storage.get_cv(id).await?;

        if let Some(cv) = &mut cv {
            model::migrate::heal(cv);
        }

        self.last_saved_at = cv.as_ref().map(|cv| cv.updated_at);
        self.cv = cv;
        self.is_dirty = false;
        Ok(())
    }

    /// Build a fresh document from a template, persist it immediately, and
    /// make it the open document.
    pub async fn create(&mut self, name: &str, template_id: &str) -> Result<Cv> {
        tracing::info!("Creating CV '{}' from template '{}'", name, template_id);
        let cv = model::create_cv(name, template_id)?;

        self.storage.put_cv(&cv).await?;

        self.last_saved_at = Some(cv.updated_at);
        self.cv = Some(cv.clone());
        self.is_dirty = false;
        Ok(cv)
    }

    /// Bumps `updated_at` strictly past its previous value even when the
    /// clock has not advanced, then marks the document dirty.
    fn touch(cv: &mut Cv) {
        let now = Utc::now();
        cv.updated_at = if now > cv.updated_at {
            now
        } else {
            cv.updated_at + Duration::milliseconds(1)
        };
    }

    /// Applies `mutate` to the open document; marks dirty only when the
    /// closure reports that it changed something.
    fn mutate<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut Cv) -> bool,
    {
        if let Some(cv) = &mut self.cv {
            if mutate(cv) {
                Self::touch(cv);
                self.is_dirty = true;
            }
        }
    }

    pub fn update_personal_info(&mut self, patch: PersonalInfoPatch) {
        self.mutate(|cv| {
            patch.apply(&mut cv.personal_info);
            true
        });
    }

    pub fn update_layout(&mut self, patch: LayoutPatch) {
        self.mutate(|cv| {
            patch.apply(&mut cv.layout);
            true
        });
    }

    pub fn update_theme(&mut self, patch: ThemePatch) {
        self.mutate(|cv| {
            patch.apply(&mut cv.theme);
            true
        });
    }

    pub fn update_accent_box(&mut self, patch: AccentBoxPatch) {
        self.mutate(|cv| {
            patch.apply(&mut cv.theme.accent_box);
            true
        });
    }

    pub fn update_header(&mut self, patch: HeaderPatch) {
        self.mutate(|cv| {
            patch.apply(&mut cv.header);
            true
        });
    }

    pub fn update_name(&mut self, name: &str) {
        self.mutate(|cv| {
            cv.name = name.to_string();
            true
        });
    }

    pub fn update_section(&mut self, section_id: &str, patch: SectionPatch) {
        self.mutate(|cv| match cv.section_mut(section_id) {
            Some(section) => {
                patch.apply(section);
                true
            }
            None => false,
        });
    }

    /// Re-sequence sections to match `ordered_ids`. Sections omitted from
    /// the list are dropped; callers must always pass the complete id set.
    /// The resulting `order` values are a dense `0..n` permutation.
    pub fn reorder_sections(&mut self, ordered_ids: &[String]) {
        self.mutate(|cv| {
            let mut by_id: HashMap<String, Section> = cv
                .sections
                .drain(..)
                .map(|s| (s.id.clone(), s))
                .collect();

            let mut sections = Vec::with_capacity(ordered_ids.len());
            for id in ordered_ids {
                if let Some(mut section) = by_id.remove(id) {
                    section.order = sections.len() as u32;
                    sections.push(section);
                }
            }
            cv.sections = sections;
            true
        });
    }

    /// Append a pre-built entry to a section. The entry's kind must match
    /// the section's type; a mismatch is ignored to keep the document
    /// well-typed.
    pub fn add_entry(&mut self, section_id: &str, entry: SectionEntry) {
        self.mutate(|cv| match cv.section_mut(section_id) {
            Some(section) if section.section_type == entry.section_type() => {
                section.entries.push(entry);
                true
            }
            _ => false,
        });
    }

    pub fn update_entry(&mut self, section_id: &str, entry_id: &str, patch: EntryPatch) {
        self.mutate(|cv| {
            let Some(section) = cv.section_mut(section_id) else {
                return false;
            };
            let Some(entry) = section.entries.iter_mut().find(|e| e.id() == entry_id) else {
                return false;
            };
            patch.apply(entry)
        });
    }

    pub fn remove_entry(&mut self, section_id: &str, entry_id: &str) {
        self.mutate(|cv| {
            let Some(section) = cv.section_mut(section_id) else {
                return false;
            };
            let before = section.entries.len();
            section.entries.retain(|e| e.id() != entry_id);
            section.entries.len() != before
        });
    }

    /// Re-sequence a section's entries to the given id order; omitted ids
    /// are dropped (same contract as `reorder_sections`).
    pub fn reorder_entries(&mut self, section_id: &str, ordered_entry_ids: &[String]) {
        self.mutate(|cv| {
            let Some(section) = cv.section_mut(section_id) else {
                return false;
            };
            let mut by_id: HashMap<String, SectionEntry> = section
                .entries
                .drain(..)
                .map(|e| (e.id().to_string(), e))
                .collect();

            section.entries = ordered_entry_ids
                .iter()
                .filter_map(|id| by_id.remove(id))
                .collect();
            true
        });
    }

    /// Persist the open document. No-op when nothing is loaded or nothing
    /// changed. On failure the dirty flag is left set so a retry is possible
    /// and the "unsaved" indicator stays accurate.
    pub async fn save(&mut self) -> Result<()> {
        let Some(cv) = &self.cv else {
            return Ok(());
        };
        if !self.is_dirty {
            return Ok(());
        }

        // Snapshot at call time; the adapter never sees later mutations.
        let snapshot = cv.clone();
        self.is_saving = true;

        let result = self.storage.put_cv(&snapshot).await;
        self.is_saving = false;
        result?;

        self.is_dirty = false;
        self.last_saved_at = Some(snapshot.updated_at);
        tracing::debug!("Saved CV: {}", snapshot.id);
        Ok(())
    }

    /// Snapshot the current document into the revision log. The log is
    /// capped by the adapter; the oldest entries beyond the cap are evicted
    /// silently.
    pub async fn save_revision(&mut self) -> Result<()> {
        let Some(cv) = &self.cv else {
            return Ok(());
        };

        let revision = Revision {
            id: Uuid::new_v4().to_string(),
            cv_id: cv.id.clone(),
            timestamp: Utc::now(),
            data: cv.clone(),
        };

        self.storage.append_revision(&revision).await?;
        tracing::debug!("Recorded revision for CV: {}", revision.cv_id);
        Ok(())
    }

    /// Clears all state, used when leaving the editing context.
    pub fn reset(&mut self) {
        self.cv = None;
        self.is_dirty = false;
        self.is_saving = false;
        self.last_saved_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::model::{CvMetadata, SkillsEntry, SummaryEntry};
    use crate::storage::sqlite::initialize_schema;
    use crate::storage::SqliteStorage;
    use async_trait::async_trait;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_store() -> DocumentStore {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        DocumentStore::new(Arc::new(SqliteStorage::new(pool)))
    }

    fn section_id(store: &DocumentStore, section_type: crate::model::SectionType) -> String {
        store
            .cv()
            .unwrap()
            .sections
            .iter()
            .find(|s| s.section_type == section_type)
            .unwrap()
            .id
            .clone()
    }

    /// Adapter whose writes always fail, for the persistence-failure path.
    struct FailingStorage;

    #[async_trait]
    impl StorageAdapter for FailingStorage {
        async fn get_cv(&self, _id: &str) -> Result<Option<Cv>> {
            Ok(None)
        }
        async fn put_cv(&self, _cv: &Cv) -> Result<()> {
            Err(AppError::Storage("disk full".to_string()))
        }
        async fn delete_cv(&self, _id: &str) -> Result<()> {
            Ok(())
        }
        async fn list_metadata(&self) -> Result<Vec<CvMetadata>> {
            Ok(vec![])
        }
        async fn list_revisions(&self, _cv_id: &str) -> Result<Vec<Revision>> {
            Ok(vec![])
        }
        async fn append_revision(&self, _revision: &Revision) -> Result<()> {
            Err(AppError::Storage("disk full".to_string()))
        }
        async fn clear_revisions(&self, _cv_id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_then_edit_scenario() {
        let mut store = create_test_store().await;
        store.create("Resume A", "modern").await.unwrap();

        store.update_personal_info(PersonalInfoPatch {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        });

        let cv = store.cv().unwrap();
        assert_eq!(cv.personal_info.first_name, "Ada");
        assert_eq!(cv.name, "Resume A");
        assert_eq!(cv.layout.columns, 2);
        assert!(store.is_dirty());
    }

    #[tokio::test]
    async fn test_updated_at_is_monotonic() {
        let mut store = create_test_store().await;
        store.create("Mono", "classic").await.unwrap();

        let mut previous = store.cv().unwrap().updated_at;
        for i in 0..20 {
            store.update_name(&format!("Mono {}", i));
            let current = store.cv().unwrap().updated_at;
            assert!(current > previous, "updatedAt must strictly increase");
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_unknown_target_is_silent_noop() {
        let mut store = create_test_store().await;
        store.create("Quiet", "classic").await.unwrap();
        store.save().await.unwrap();

        store.update_section("no-such-section", SectionPatch::default());
        store.update_entry(
            "no-such-section",
            "no-such-entry",
            EntryPatch::Summary { content: None },
        );
        store.remove_entry("no-such-section", "no-such-entry");

        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_reorder_sections_assigns_dense_order() {
        let mut store = create_test_store().await;
        store.create("Reorder", "classic").await.unwrap();

        let ids: Vec<String> = store
            .cv()
            .unwrap()
            .sections
            .iter()
            .map(|s| s.id.clone())
            .collect();

        // Move the third section first, keep the rest in place.
        let mut reordered = vec![ids[2].clone(), ids[0].clone(), ids[1].clone()];
        reordered.extend(ids[3..].iter().cloned());
        store.reorder_sections(&reordered);

        let cv = store.cv().unwrap();
        assert_eq!(cv.sections[0].id, ids[2]);
        assert_eq!(cv.sections[1].id, ids[0]);
        assert_eq!(cv.sections[2].id, ids[1]);

        let orders: Vec<u32> = cv.sections.iter().map(|s| s.order).collect();
        assert_eq!(orders, (0..cv.sections.len() as u32).collect::<Vec<_>>());
        assert!(store.is_dirty());
    }

    #[tokio::test]
    async fn test_add_entry_rejects_type_mismatch() {
        let mut store = create_test_store().await;
        store.create("Typed", "classic").await.unwrap();
        store.save().await.unwrap();

        let skills_section = section_id(&store, crate::model::SectionType::Skills);
        store.add_entry(
            &skills_section,
            SectionEntry::Summary(SummaryEntry {
                id: "e1".to_string(),
                content: "<p>wrong home</p>".to_string(),
            }),
        );

        let cv = store.cv().unwrap();
        assert!(cv.section(&skills_section).unwrap().entries.is_empty());
        assert!(!store.is_dirty());
    }

    #[tokio::test]
    async fn test_entry_lifecycle() {
        let mut store = create_test_store().await;
        store.create("Entries", "classic").await.unwrap();
        let skills = section_id(&store, crate::model::SectionType::Skills);

        store.add_entry(
            &skills,
            SectionEntry::Skills(SkillsEntry {
                id: "sk1".to_string(),
                category: "Languages".to_string(),
                skills: vec!["Rust".to_string()],
            }),
        );
        store.add_entry(
            &skills,
            SectionEntry::Skills(SkillsEntry {
                id: "sk2".to_string(),
                category: "Tools".to_string(),
                skills: vec!["Git".to_string()],
            }),
        );

        store.update_entry(
            &skills,
            "sk1",
            EntryPatch::Skills {
                category: None,
                skills: Some(vec!["Rust".to_string(), "SQL".to_string()]),
            },
        );

        store.reorder_entries(&skills, &["sk2".to_string(), "sk1".to_string()]);

        let section = store.cv().unwrap().section(&skills).unwrap();
        assert_eq!(section.entries.len(), 2);
        assert_eq!(section.entries[0].id(), "sk2");
        match &section.entries[1] {
            SectionEntry::Skills(e) => assert_eq!(e.skills.len(), 2),
            _ => unreachable!(),
        }

        store.remove_entry(&skills, "sk2");
        let section = store.cv().unwrap().section(&skills).unwrap();
        assert_eq!(section.entries.len(), 1);
        assert_eq!(section.entries[0].id(), "sk1");
    }

    #[tokio::test]
    async fn test_save_clears_dirty_and_records_timestamp() {
        let mut store = create_test_store().await;
        store.create("Saved", "classic").await.unwrap();

        store.update_name("Saved v2");
        assert!(store.is_dirty());

        let updated_at = store.cv().unwrap().updated_at;
        store.save().await.unwrap();

        assert!(!store.is_dirty());
        assert!(!store.is_saving());
        assert_eq!(store.last_saved_at(), Some(updated_at));

        store.update_name("Saved v3");
        assert!(store.is_dirty());
    }

    #[tokio::test]
    async fn test_save_failure_keeps_dirty_flag() {
        let mut store = DocumentStore::new(Arc::new(FailingStorage));
        store.cv = Some(crate::model::create_cv("Doomed", "classic").unwrap());
        store.update_name("Doomed v2");

        let result = store.save().await;
        assert!(result.is_err());
        assert!(store.is_dirty());
        assert!(!store.is_saving());
    }

    #[tokio::test]
    async fn test_load_missing_yields_empty_state() {
        let mut store = create_test_store().await;
        store.load("ghost").await.unwrap();
        assert!(store.cv().is_none());
        assert!(!store.is_dirty());
        assert!(store.last_saved_at().is_none());
    }

    #[tokio::test]
    async fn test_load_replaces_state_and_clears_dirty() {
        let mut store = create_test_store().await;
        let created = store.create("Loaded", "classic").await.unwrap();
        store.update_name("Loaded dirty");
        // Deliberately not saved; reload discards the unsaved change.
        store.load(&created.id).await.unwrap();

        let cv = store.cv().unwrap();
        assert_eq!(cv.name, "Loaded");
        assert!(!store.is_dirty());
        assert_eq!(store.last_saved_at(), Some(cv.updated_at));
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut store = create_test_store().await;
        store.create("Gone", "classic").await.unwrap();
        store.update_name("Gone v2");
        store.reset();

        assert!(store.cv().is_none());
        assert!(!store.is_dirty());
        assert!(store.last_saved_at().is_none());
    }
}
