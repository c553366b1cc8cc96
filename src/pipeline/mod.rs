//! Submission pipeline.
//!
//! Validates the draft, waits out the simulated remote call, appends the
//! finalized record to the member list, resets the form and raises the
//! transient success indicator.
//!
//! Per attempt the state moves `Idle -> Validating -> Failed -> Idle` or
//! `Idle -> Validating -> Pending -> Committed -> Idle`. While `Validating`
//! or `Pending`, further submissions are refused without side effects.

mod id;

pub use id::*;

use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::config::FormSettings;
use crate::errors::{SubmitError, ValidationError};
use crate::form::{FormEvent, FormStateController};
use crate::models::{Draft, MemberRecord, SubmissionStatus};
use crate::store::MemberList;

/// Check that every required field is filled in.
pub fn validate(draft: &Draft) -> Result<(), ValidationError> {
    let fields = draft.missing_required();
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredField { fields })
    }
}

#[derive(Default)]
struct PipelineState {
    status: SubmissionStatus,
    success_visible: bool,
    banner: Option<JoinHandle<()>>,
}

struct PipelineInner {
    state: Mutex<PipelineState>,
    members: MemberList,
    ids: IdGenerator,
    settings: FormSettings,
}

impl Drop for PipelineInner {
    fn drop(&mut self) {
        if let Some(banner) = self.state.get_mut().banner.take() {
            banner.abort();
        }
    }
}

/// Turns drafts into member records, one submission at a time.
#[derive(Clone)]
pub struct SubmissionPipeline {
    inner: Arc<PipelineInner>,
}

impl SubmissionPipeline {
    pub fn new(members: MemberList, settings: FormSettings) -> Self {
        Self {
            inner: Arc::new(PipelineInner {
                state: Mutex::new(PipelineState::default()),
                members,
                ids: IdGenerator,
                settings,
            }),
        }
    }

    pub fn members(&self) -> &MemberList {
        &self.inner.members
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.inner.state.lock().await.status
    }

    /// Whether the success indicator is currently shown.
    pub async fn success_visible(&self) -> bool {
        self.inner.state.lock().await.success_visible
    }

    /// Submit the form's current draft.
    ///
    /// Validation failures return immediately and change nothing. Once the
    /// status reaches `Pending` the commit runs on a separate task, so
    /// dropping the returned future from then on does not cancel it. Dropping
    /// it earlier leaves the status at `Idle`.
    pub async fn submit(&self, form: &FormStateController) -> Result<MemberRecord, SubmitError> {
        // Read before the status leaves `Idle`.
        let draft = form.snapshot().await;

        let draft = {
            let mut state = self.inner.state.lock().await;
            if state.status.is_busy() {
                tracing::debug!("Submission ignored, another one is in progress");
                return Err(SubmitError::AlreadyPending);
            }

            set_status(&mut state, form, SubmissionStatus::Validating);

            if let Err(err) = validate(&draft) {
                tracing::warn!("Submission rejected: {}", err);
                set_status(&mut state, form, SubmissionStatus::Failed);
                set_status(&mut state, form, SubmissionStatus::Idle);
                return Err(err.into());
            }

            set_status(&mut state, form, SubmissionStatus::Pending);
            draft
        };

        let inner = self.inner.clone();
        let task_form = form.clone();
        let task = tokio::spawn(async move { inner.commit(draft, task_form).await });

        match task.await {
            Ok(record) => Ok(record),
            Err(e) => {
                let mut state = self.inner.state.lock().await;
                set_status(&mut state, form, SubmissionStatus::Idle);
                Err(SubmitError::Aborted(e.to_string()))
            }
        }
    }
}

impl PipelineInner {
    async fn commit(self: Arc<Self>, draft: Draft, form: FormStateController) -> MemberRecord {
        tokio::time::sleep(self.settings.submit_delay).await;

        let submitted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let record = MemberRecord::from_draft(self.ids.next_id(), &draft, submitted_at);

        match serde_json::to_string(&record) {
            Ok(payload) => tracing::info!(%payload, "Submitting team member data"),
            Err(e) => tracing::warn!("Failed to serialize member {}: {}", record.id, e),
        }

        let count = self.members.append(record.clone()).await;
        form.reset().await;
        tracing::info!("Member {} added ({} total)", record.id, count);

        let mut state = self.state.lock().await;
        set_status(&mut state, &form, SubmissionStatus::Committed);
        form.publish(FormEvent::Committed {
            id: record.id.clone(),
        });

        state.success_visible = true;
        if let Some(previous) = state.banner.take() {
            previous.abort();
        }
        state.banner = Some(schedule_success_clear(
            Arc::downgrade(&self),
            form.clone(),
            self.settings.success_banner,
        ));

        set_status(&mut state, &form, SubmissionStatus::Idle);
        record
    }
}

fn set_status(state: &mut PipelineState, form: &FormStateController, status: SubmissionStatus) {
    state.status = status;
    form.publish(FormEvent::Status(status));
}

/// Hide the success indicator after `after`. Holds only a weak reference so a
/// torn-down pipeline is never touched.
fn schedule_success_clear(
    pipeline: Weak<PipelineInner>,
    form: FormStateController,
    after: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        let Some(inner) = pipeline.upgrade() else {
            return;
        };
        let mut state = inner.state.lock().await;
        state.success_visible = false;
        state.banner = None;
        drop(state);
        tracing::debug!("Success indicator cleared");
        form.publish(FormEvent::SuccessCleared);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DraftField;
    use std::collections::HashSet;

    fn settings() -> FormSettings {
        FormSettings {
            submit_delay: Duration::from_secs(1),
            success_banner: Duration::from_secs(3),
            max_image_bytes: 1024,
        }
    }

    fn setup() -> (FormStateController, SubmissionPipeline) {
        let form = FormStateController::new(1024);
        let pipeline = SubmissionPipeline::new(MemberList::new(), settings());
        (form, pipeline)
    }

    async fn fill_ada(form: &FormStateController) {
        form.set_field(DraftField::FullName, "Ada Lovelace").await;
        form.set_field(DraftField::TeamName, "Backend Team").await;
        form.set_field(DraftField::RoleTag, "Developer").await;
        form.set_field(DraftField::GithubProfile, "https://github.com/ada")
            .await;
        form.set_field(DraftField::LinkedinProfile, "https://linkedin.com/in/ada")
            .await;
        form.set_field(DraftField::PersonalWebsite, "").await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_submission_commits_after_delay() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;

        let started = tokio::time::Instant::now();
        let record = pipeline.submit(&form).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(1));

        assert!(record.id.starts_with(ID_PREFIX));
        assert_eq!(record.full_name, "Ada Lovelace");
        assert_eq!(record.team_name, "Backend Team");
        assert_eq!(record.role_tag, "Developer");
        assert_eq!(record.github_profile, "https://github.com/ada");
        assert_eq!(record.linkedin_profile, "https://linkedin.com/in/ada");
        assert_eq!(record.personal_website, "");
        assert!(chrono::DateTime::parse_from_rfc3339(&record.submitted_at).is_ok());
        assert!(record.submitted_at.ends_with('Z'));

        assert_eq!(pipeline.members().list().await, vec![record]);
        assert_eq!(form.snapshot().await, Draft::default());
        assert_eq!(pipeline.status().await, SubmissionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_field_fails_without_side_effects() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;
        form.set_field(DraftField::FullName, "").await;
        let before = form.snapshot().await;

        let started = tokio::time::Instant::now();
        let err = pipeline.submit(&form).await.unwrap_err();
        assert_eq!(started.elapsed(), Duration::ZERO);

        match err {
            SubmitError::Validation(ValidationError::MissingRequiredField { fields }) => {
                assert_eq!(fields, vec![DraftField::FullName]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(pipeline.members().is_empty().await);
        assert_eq!(form.snapshot().await, before);
        assert_eq!(pipeline.status().await, SubmissionStatus::Idle);
        assert!(!pipeline.success_visible().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_missing_required_field_is_rejected() {
        for missing in DraftField::REQUIRED {
            let (form, pipeline) = setup();
            fill_ada(&form).await;
            form.set_field(missing, "").await;

            let err = pipeline.submit(&form).await.unwrap_err();
            assert!(
                matches!(err, SubmitError::Validation(_)),
                "{missing} should be required"
            );
            assert_eq!(pipeline.members().len().await, 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_optional_fields_may_be_empty() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;

        let record = pipeline.submit(&form).await.unwrap();
        assert!(record.picture.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_picture_is_copied_into_record() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;
        form.set_image(crate::form::ImageUpload::new(
            "ada.png",
            "image/png",
            vec![1, 2, 3],
        ))
        .await
        .unwrap();

        let record = pipeline.submit(&form).await.unwrap();
        let picture = record.picture.unwrap();
        assert_eq!(picture.profile_image.file_name, "ada.png");
        assert_eq!(picture.profile_image_preview, "data:image/png;base64,AQID");
        assert!(form.snapshot().await.picture.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_submit_is_ignored() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;

        let (first, second) = tokio::join!(pipeline.submit(&form), pipeline.submit(&form));

        assert!(first.is_ok());
        assert!(matches!(second, Err(SubmitError::AlreadyPending)));
        assert_eq!(pipeline.members().len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_transitions_are_published() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;
        let mut events = form.subscribe();

        let record = pipeline.submit(&form).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                FormEvent::Status(SubmissionStatus::Validating),
                FormEvent::Status(SubmissionStatus::Pending),
                FormEvent::Reset,
                FormEvent::Status(SubmissionStatus::Committed),
                FormEvent::Committed { id: record.id },
                FormEvent::Status(SubmissionStatus::Idle),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_validation_transitions() {
        let (form, pipeline) = setup();
        let mut events = form.subscribe();

        pipeline.submit(&form).await.unwrap_err();

        assert_eq!(
            events.try_recv().unwrap(),
            FormEvent::Status(SubmissionStatus::Validating)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            FormEvent::Status(SubmissionStatus::Failed)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            FormEvent::Status(SubmissionStatus::Idle)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_indicator_clears_after_banner_duration() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;

        pipeline.submit(&form).await.unwrap();
        assert!(pipeline.success_visible().await);

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert!(pipeline.success_visible().await);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!pipeline.success_visible().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_success_restarts_banner_timer() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;
        pipeline.submit(&form).await.unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        fill_ada(&form).await;
        pipeline.submit(&form).await.unwrap();

        // past the first commit's deadline, inside the second's
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(pipeline.success_visible().await);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(!pipeline.success_visible().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_caller_does_not_cancel_pending_submission() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;

        let submit = pipeline.submit(&form);
        let timed_out = tokio::time::timeout(Duration::from_millis(100), submit).await;
        assert!(timed_out.is_err());
        assert_eq!(pipeline.status().await, SubmissionStatus::Pending);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(pipeline.members().len().await, 1);
        assert_eq!(pipeline.status().await, SubmissionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_submit_before_pending_returns_to_idle() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;

        let writer = form.lock_draft().await;
        let timed_out =
            tokio::time::timeout(Duration::from_millis(50), pipeline.submit(&form)).await;
        assert!(timed_out.is_err());
        drop(writer);

        assert_eq!(pipeline.status().await, SubmissionStatus::Idle);
        assert!(pipeline.members().is_empty().await);

        let record = pipeline.submit(&form).await.unwrap();
        assert_eq!(record.full_name, "Ada Lovelace");
        assert_eq!(pipeline.members().len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_is_append_only_across_submissions() {
        let (form, pipeline) = setup();
        let mut previous: Vec<MemberRecord> = Vec::new();

        for i in 0..5 {
            fill_ada(&form).await;
            form.set_field(DraftField::FullName, format!("Member {i}")).await;
            pipeline.submit(&form).await.unwrap();

            let current = pipeline.members().list().await;
            assert_eq!(current.len(), previous.len() + 1);
            assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ten_thousand_rapid_submissions_have_unique_ids() {
        let form = FormStateController::new(1024);
        let pipeline = SubmissionPipeline::new(
            MemberList::new(),
            FormSettings {
                submit_delay: Duration::ZERO,
                ..settings()
            },
        );

        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            fill_ada(&form).await;
            let record = pipeline.submit(&form).await.unwrap();
            assert!(ids.insert(record.id));
        }
        assert_eq!(pipeline.members().len().await, 10_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_pipeline_cancels_banner_timer() {
        let (form, pipeline) = setup();
        fill_ada(&form).await;
        pipeline.submit(&form).await.unwrap();
        let mut events = form.subscribe();

        drop(pipeline);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(events.try_recv().is_err());
    }
}
