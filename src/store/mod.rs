//! In-memory member store.
//!
//! The list lives for the lifetime of the process. Records can only be
//! appended, and readers always receive copies.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{MemberCard, MemberRecord};

/// Append-only ordered list of submitted members.
#[derive(Clone, Default)]
pub struct MemberList {
    records: Arc<RwLock<Vec<MemberRecord>>>,
}

impl MemberList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return the new length.
    pub(crate) async fn append(&self, record: MemberRecord) -> usize {
        let mut records = self.records.write().await;
        records.push(record);
        records.len()
    }

    /// All records in insertion order.
    pub async fn list(&self) -> Vec<MemberRecord> {
        self.records.read().await.clone()
    }

    /// Get a record by ID.
    pub async fn get(&self, id: &str) -> Option<MemberRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn cards(&self) -> Vec<MemberCard> {
        self.records
            .read()
            .await
            .iter()
            .map(MemberRecord::card)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
