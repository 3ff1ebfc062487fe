//! Confirmed-state cache over the collection and record endpoints.
//!
//! The store keeps three caches: the collection list, the currently
//! open collection, and the open collection's records. Every cache is
//! updated **only** from successful server responses; there are no
//! optimistic writes, so a failed mutation leaves local state exactly
//! as it was and the UI stays consistent with the server.
//!
//! Concurrent operations are deliberately uncoordinated: two
//! overlapping updates resolve to whichever response is applied last.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use satchel_core::model::{Collection, MessageResponse, Record, RecordData};
use satchel_core::schema::Schema;
use satchel_core::templates::FolderTemplate;
use satchel_core::types::EntityId;

use crate::error::ApiResult;
use crate::http::ApiTransport;
use crate::notify::Notifier;

#[derive(Serialize)]
struct CollectionPayload<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<&'a Schema>,
}

#[derive(Serialize)]
struct RecordPayload<'a> {
    data: &'a RecordData,
}

/// Collection and record state, shared across the session.
pub struct CollectionStore {
    transport: Arc<ApiTransport>,
    notifier: Arc<dyn Notifier>,
    collections: RwLock<Vec<Collection>>,
    current: RwLock<Option<Collection>>,
    records: RwLock<Vec<Record>>,
}

impl CollectionStore {
    pub(crate) fn new(transport: Arc<ApiTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
            collections: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            records: RwLock::new(Vec::new()),
        }
    }

    // ---- snapshots ----

    /// Cached collection list, newest first.
    pub fn collections(&self) -> Vec<Collection> {
        self.collections
            .read()
            .expect("collection cache lock poisoned")
            .clone()
    }

    /// The collection last loaded with [`Self::fetch_collection`].
    pub fn current_collection(&self) -> Option<Collection> {
        self.current
            .read()
            .expect("collection cache lock poisoned")
            .clone()
    }

    /// Records of the collection last loaded with [`Self::fetch_records`].
    pub fn records(&self) -> Vec<Record> {
        self.records
            .read()
            .expect("collection cache lock poisoned")
            .clone()
    }

    // ---- collections ----

    /// Reload the full collection list.
    ///
    /// The server's ordering is not contractual, so the list is
    /// re-sorted newest-first here; ties keep the server's order.
    pub async fn fetch_collections(&self) -> ApiResult<Vec<Collection>> {
        match self.transport.get::<Vec<Collection>>("/collections").await {
            Ok(mut list) => {
                list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                *self
                    .collections
                    .write()
                    .expect("collection cache lock poisoned") = list.clone();
                Ok(list)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to load collections"));
                Err(err)
            }
        }
    }

    /// Load one collection into the `current` slot.
    ///
    /// Does not touch the cached list, where a fresher detail response can
    /// coexist with a staler list entry until the next full reload.
    pub async fn fetch_collection(&self, id: EntityId) -> ApiResult<Collection> {
        match self
            .transport
            .get::<Collection>(&format!("/collections/{id}"))
            .await
        {
            Ok(collection) => {
                *self.current.write().expect("collection cache lock poisoned") =
                    Some(collection.clone());
                Ok(collection)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to load collection"));
                Err(err)
            }
        }
    }

    /// Create a collection, optionally typed by a schema and seeded
    /// with example items.
    ///
    /// Seeds are posted sequentially in item order once the collection
    /// exists, so record timestamps follow item order. A failure while
    /// seeding aborts before the collection reaches the local cache;
    /// the server keeps the partially-seeded collection, and it shows
    /// up on the next full reload.
    pub async fn create_collection(
        &self,
        name: &str,
        description: &str,
        schema: Option<&Schema>,
        example_items: &[RecordData],
    ) -> ApiResult<Collection> {
        match self
            .create_remote(name, description, schema, example_items)
            .await
        {
            Ok(collection) => {
                self.collections
                    .write()
                    .expect("collection cache lock poisoned")
                    .insert(0, collection.clone());
                self.notifier.success("Folder created successfully!");
                Ok(collection)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to create folder"));
                Err(err)
            }
        }
    }

    /// [`Self::create_collection`] with a built-in template's schema
    /// and example items.
    pub async fn create_from_template(
        &self,
        name: &str,
        description: &str,
        template: &FolderTemplate,
    ) -> ApiResult<Collection> {
        self.create_collection(
            name,
            description,
            Some(&template.schema),
            &template.example_items,
        )
        .await
    }

    async fn create_remote(
        &self,
        name: &str,
        description: &str,
        schema: Option<&Schema>,
        example_items: &[RecordData],
    ) -> ApiResult<Collection> {
        let collection: Collection = self
            .transport
            .post(
                "/collections",
                &CollectionPayload {
                    name,
                    description,
                    schema,
                },
            )
            .await?;

        for item in example_items {
            let _: Record = self
                .transport
                .post(
                    &format!("/collections/{}/records", collection.id),
                    &RecordPayload { data: item },
                )
                .await?;
        }

        Ok(collection)
    }

    /// Rename or re-describe a collection.
    pub async fn update_collection(
        &self,
        id: EntityId,
        name: &str,
        description: &str,
    ) -> ApiResult<Collection> {
        let payload = CollectionPayload {
            name,
            description,
            schema: None,
        };
        match self
            .transport
            .put::<_, Collection>(&format!("/collections/{id}"), &payload)
            .await
        {
            Ok(updated) => {
                {
                    let mut collections = self
                        .collections
                        .write()
                        .expect("collection cache lock poisoned");
                    for slot in collections.iter_mut() {
                        if slot.id == id {
                            *slot = updated.clone();
                        }
                    }
                }
                let mut current = self.current.write().expect("collection cache lock poisoned");
                if current.as_ref().map_or(false, |c| c.id == id) {
                    *current = Some(updated.clone());
                }
                self.notifier.success("Collection updated!");
                Ok(updated)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to update collection"));
                Err(err)
            }
        }
    }

    /// Delete a collection. Removed from the cached list only after the
    /// server confirms.
    pub async fn delete_collection(&self, id: EntityId) -> ApiResult<()> {
        match self
            .transport
            .delete::<MessageResponse>(&format!("/collections/{id}"))
            .await
        {
            Ok(_) => {
                self.collections
                    .write()
                    .expect("collection cache lock poisoned")
                    .retain(|c| c.id != id);
                self.notifier.success("Collection deleted");
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to delete collection"));
                Err(err)
            }
        }
    }

    // ---- records ----

    /// Replace the record cache with the given collection's records.
    pub async fn fetch_records(&self, collection_id: EntityId) -> ApiResult<Vec<Record>> {
        match self
            .transport
            .get::<Vec<Record>>(&format!("/collections/{collection_id}/records"))
            .await
        {
            Ok(records) => {
                *self.records.write().expect("collection cache lock poisoned") = records.clone();
                Ok(records)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to load records"));
                Err(err)
            }
        }
    }

    /// Add a record; prepended to the cache on confirmation.
    pub async fn create_record(
        &self,
        collection_id: EntityId,
        data: &RecordData,
    ) -> ApiResult<Record> {
        match self
            .transport
            .post::<_, Record>(
                &format!("/collections/{collection_id}/records"),
                &RecordPayload { data },
            )
            .await
        {
            Ok(record) => {
                self.records
                    .write()
                    .expect("collection cache lock poisoned")
                    .insert(0, record.clone());
                self.notifier.success("Record created!");
                Ok(record)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to create record"));
                Err(err)
            }
        }
    }

    /// Replace a record's data wholesale.
    pub async fn update_record(
        &self,
        collection_id: EntityId,
        record_id: EntityId,
        data: &RecordData,
    ) -> ApiResult<Record> {
        match self
            .transport
            .put::<_, Record>(
                &format!("/collections/{collection_id}/records/{record_id}"),
                &RecordPayload { data },
            )
            .await
        {
            Ok(updated) => {
                let mut records = self.records.write().expect("collection cache lock poisoned");
                for slot in records.iter_mut() {
                    if slot.id == record_id {
                        *slot = updated.clone();
                    }
                }
                drop(records);
                self.notifier.success("Record updated!");
                Ok(updated)
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to update record"));
                Err(err)
            }
        }
    }

    /// Delete a record. Removed from the cache only after the server
    /// confirms.
    pub async fn delete_record(
        &self,
        collection_id: EntityId,
        record_id: EntityId,
    ) -> ApiResult<()> {
        match self
            .transport
            .delete::<MessageResponse>(&format!(
                "/collections/{collection_id}/records/{record_id}"
            ))
            .await
        {
            Ok(_) => {
                self.records
                    .write()
                    .expect("collection cache lock poisoned")
                    .retain(|r| r.id != record_id);
                self.notifier.success("Record deleted");
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&err.user_message("Failed to delete record"));
                Err(err)
            }
        }
    }

    /// Drop every cache. Part of logout teardown.
    pub(crate) fn clear_cached(&self) {
        self.collections
            .write()
            .expect("collection cache lock poisoned")
            .clear();
        *self.current.write().expect("collection cache lock poisoned") = None;
        self.records
            .write()
            .expect("collection cache lock poisoned")
            .clear();
    }
}
