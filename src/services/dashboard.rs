//! Dashboard store
//!
//! Collection-level operations over the stored documents: listing, creating,
//! duplicating, renaming and deleting. Operates directly on the storage
//! adapter and keeps only the lightweight metadata list in memory.

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{self, Cv, CvMetadata};
use crate::storage::StorageAdapter;

/// Store backing the document list view.
pub struct DashboardStore {
    storage: Arc<dyn StorageAdapter>,
    cvs: Vec<CvMetadata>,
}

impl DashboardStore {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self {
            storage,
            cvs: Vec::new(),
        }
    }

    /// The cached metadata list from the last `load_list` call.
    pub fn cvs(&self) -> &[CvMetadata] {
        &self.cvs
    }

    /// Refresh the metadata list, most recently updated first. Ties keep
    /// their storage order (the sort is stable).
    pub async fn load_list(&mut self) -> Result<&[CvMetadata]> {
        let mut list = self.storage.list_metadata().await?;
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        self.cvs = list;
        Ok(&self.cvs)
    }

    /// Create a document from a template and persist it.
    pub async fn create(&mut self, name: &str, template_id: &str) -> Result<Cv> {
        tracing::info!("Creating CV '{}' from template '{}'", name, template_id);
        let cv = model::create_cv(name, template_id)?;
        self.storage.put_cv(&cv).await?;
        self.load_list().await?;
        Ok(cv)
    }

    /// Deep-copy a document under a fresh id, named "<original> (Copy)".
    /// Every section and entry receives a new id; content, layout, theme
    /// and header settings carry over. Returns `None` when the source does
    /// not exist.
    pub async fn duplicate(&mut self, id: &str) -> Result<Option<Cv>> {
        let Some(source) = self.storage.get_cv(id).await? else {
            tracing::warn!("Duplicate requested for missing CV: {}", id);
            return Ok(None);
        };

        let now = Utc::now();
        let copy = Cv {
            id: Uuid::new_v4().to_string(),
            name: format!("{} (Copy)", source.name),
            template_id: source.template_id.clone(),
            created_at: now,
            updated_at: now,
            personal_info: source.personal_info.clone(),
            sections: source
                .sections
                .iter()
                .map(|section| {
                    let mut section = section.clone();
                    section.id = Uuid::new_v4().to_string();
                    section.entries = section
                        .entries
                        .iter()
                        .map(|entry| entry.with_new_id())
                        .collect();
                    section
                })
                .collect(),
            layout: source.layout.clone(),
            theme: source.theme.clone(),
            header: source.header.clone(),
        };

        self.storage.put_cv(&copy).await?;
        self.load_list().await?;
        tracing::info!("Duplicated CV {} -> {}", id, copy.id);
        Ok(Some(copy))
    }

    /// Delete a document, its metadata entry and its revision log. Deleting
    /// an unknown id succeeds without effect.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        tracing::info!("Deleting CV: {}", id);
        self.storage.delete_cv(id).await?;
        self.load_list().await?;
        Ok(())
    }

    /// Rename a stored document without opening it. Bumps `updated_at`
    /// strictly past its previous value. Unknown ids are ignored.
    pub async fn rename(&mut self, id: &str, name: &str) -> Result<()> {
        let Some(mut cv) = self.storage.get_cv(id).await? else {
            return Ok(());
        };

        cv.name = name.to_string();
        let now = Utc::now();
        cv.updated_at = if now > cv.updated_at {
            now
        } else {
            cv.updated_at + Duration::milliseconds(1)
        };

        self.storage.put_cv(&cv).await?;
        self.load_list().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SectionEntry, SummaryEntry};
    use crate::services::DocumentStore;
    use crate::storage::sqlite::initialize_schema;
    use crate::storage::SqliteStorage;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_storage() -> Arc<SqliteStorage> {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        initialize_schema(&pool).await.unwrap();
        Arc::new(SqliteStorage::new(pool))
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_updated_at_desc() {
        let storage = create_test_storage().await;
        let mut store = DashboardStore::new(storage);

        let first = store.create("First", "classic").await.unwrap();
        let second = store.create("Second", "classic").await.unwrap();

        // Renaming the older document moves it to the top.
        store.rename(&first.id, "First renamed").await.unwrap();

        let list = store.load_list().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, first.id);
        assert_eq!(list[0].name, "First renamed");
        assert_eq!(list[1].id, second.id);
    }

    #[tokio::test]
    async fn test_duplicate_gets_fresh_ids_and_copy_suffix() {
        let storage = create_test_storage().await;
        let mut docs = DocumentStore::new(storage.clone());
        let original = docs.create("Original", "modern").await.unwrap();

        let summary_id = original
            .sections
            .iter()
            .find(|s| s.section_type == crate::model::SectionType::Summary)
            .unwrap()
            .id
            .clone();
        docs.add_entry(
            &summary_id,
            SectionEntry::Summary(SummaryEntry {
                id: "sum1".to_string(),
                content: "<p>Engineer.</p>".to_string(),
            }),
        );
        docs.save().await.unwrap();

        let mut dash = DashboardStore::new(storage);
        let copy = dash.duplicate(&original.id).await.unwrap().unwrap();

        assert_eq!(copy.name, "Original (Copy)");
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.template_id, original.template_id);
        assert_eq!(copy.sections.len(), original.sections.len());
        for (a, b) in copy.sections.iter().zip(original.sections.iter()) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.section_type, b.section_type);
            assert_eq!(a.title, b.title);
        }
        let copied_summary = copy
            .sections
            .iter()
            .find(|s| s.section_type == crate::model::SectionType::Summary)
            .unwrap();
        assert_eq!(copied_summary.entries.len(), 1);
        assert_ne!(copied_summary.entries[0].id(), "sum1");
    }

    #[tokio::test]
    async fn test_duplicate_is_independent_of_source() {
        let storage = create_test_storage().await;
        let mut dash = DashboardStore::new(storage.clone());
        let original = dash.create("Source", "classic").await.unwrap();
        let copy = dash.duplicate(&original.id).await.unwrap().unwrap();

        // Edit the copy; the source must be untouched.
        let mut docs = DocumentStore::new(storage.clone());
        docs.load(&copy.id).await.unwrap();
        docs.update_name("Copy edited");
        docs.save().await.unwrap();

        let source = storage.get_cv(&original.id).await.unwrap().unwrap();
        assert_eq!(source.name, "Source");
    }

    #[tokio::test]
    async fn test_duplicate_missing_returns_none() {
        let storage = create_test_storage().await;
        let mut dash = DashboardStore::new(storage);
        assert!(dash.duplicate("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_from_list() {
        let storage = create_test_storage().await;
        let mut dash = DashboardStore::new(storage);
        let cv = dash.create("Doomed", "classic").await.unwrap();
        let keeper = dash.create("Keeper", "classic").await.unwrap();

        dash.delete(&cv.id).await.unwrap();

        assert_eq!(dash.cvs().len(), 1);
        assert_eq!(dash.cvs()[0].id, keeper.id);

        // Unknown ids succeed without effect.
        dash.delete("ghost").await.unwrap();
        assert_eq!(dash.cvs().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_bumps_updated_at() {
        let storage = create_test_storage().await;
        let mut dash = DashboardStore::new(storage.clone());
        let cv = dash.create("Before", "classic").await.unwrap();

        dash.rename(&cv.id, "After").await.unwrap();

        let stored = storage.get_cv(&cv.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "After");
        assert!(stored.updated_at > cv.updated_at);
    }
}
