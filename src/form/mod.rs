//! Form state controller.
//!
//! Owns the single live draft and publishes a [`FormEvent`] for every change
//! so observers can re-render without polling.

mod image;

pub use image::*;

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::errors::ImageDecodeError;
use crate::models::{Draft, DraftField, SubmissionStatus};

const EVENT_CAPACITY: usize = 64;

/// Change notifications emitted by the form and its submission pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    FieldChanged(DraftField),
    ImageAttached { file_name: String },
    ImageRejected { reason: String },
    ImageCleared,
    Reset,
    Status(SubmissionStatus),
    Committed { id: String },
    SuccessCleared,
}

/// Mutable draft plus its mutation operations.
#[derive(Clone)]
pub struct FormStateController {
    draft: Arc<RwLock<Draft>>,
    events: broadcast::Sender<FormEvent>,
    max_image_bytes: usize,
}

impl FormStateController {
    pub fn new(max_image_bytes: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            draft: Arc::new(RwLock::new(Draft::default())),
            events,
            max_image_bytes,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    /// Publish an event; having no subscribers is not an error.
    pub(crate) fn publish(&self, event: FormEvent) {
        let _ = self.events.send(event);
    }

    /// Hold the draft's write lock, as a slow writer would.
    #[cfg(test)]
    pub(crate) async fn lock_draft(&self) -> tokio::sync::RwLockWriteGuard<'_, Draft> {
        self.draft.write().await
    }

    /// Copy of the current draft.
    pub async fn snapshot(&self) -> Draft {
        self.draft.read().await.clone()
    }

    /// Set one text field verbatim. No validation happens here.
    pub async fn set_field(&self, field: DraftField, value: impl Into<String>) {
        self.draft.write().await.set(field, value.into());
        self.publish(FormEvent::FieldChanged(field));
    }

    /// Decode the upload and attach it together with its preview.
    ///
    /// The draft is left untouched when decoding fails.
    pub async fn set_image(&self, upload: ImageUpload) -> Result<(), ImageDecodeError> {
        let file_name = upload.file_name.clone();
        let picture = match decode_preview(upload, self.max_image_bytes).await {
            Ok(picture) => picture,
            Err(err) => {
                tracing::warn!("Rejected profile image {}: {}", file_name, err);
                self.publish(FormEvent::ImageRejected {
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        self.draft.write().await.picture = Some(picture);
        self.publish(FormEvent::ImageAttached { file_name });
        Ok(())
    }

    pub async fn clear_image(&self) {
        self.draft.write().await.picture = None;
        self.publish(FormEvent::ImageCleared);
    }

    /// Replace the draft with a fresh empty one.
    pub async fn reset(&self) {
        *self.draft.write().await = Draft::default();
        self.publish(FormEvent::Reset);
    }
}
