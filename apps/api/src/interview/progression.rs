//! Stage save / progression.
//!
//! Flow: validate the saved stage against the plan → generate the handoff note →
//!       upload the transcript archive → record + advance in one transaction.

use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::agents::Persona;
use crate::interview::handoff::generate_handoff;
use crate::interview::stage::{next_stage, Stage};
use crate::interview::store::{apply_transition, fetch_session, StageTransition};
use crate::llm_client::{ChatModel, Message, Role};
use crate::models::session::InterviewSessionRow;
use crate::storage::put_markdown;

/// Where a save moves the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub stage: Stage,
    /// `None` when `stage` is the last planned stage.
    pub next: Option<Stage>,
}

/// Session pointer and flags written when a stage is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionAdvance {
    pub current: Stage,
    pub clear_history: bool,
    pub completed: bool,
}

impl Transition {
    /// Moving on clears the history for the next interviewer; saving the last
    /// stage completes the session and keeps its transcript in place.
    pub fn apply_flags(&self) -> SessionAdvance {
        match self.next {
            Some(next) => SessionAdvance {
                current: next,
                clear_history: true,
                completed: false,
            },
            None => SessionAdvance {
                current: self.stage,
                clear_history: false,
                completed: true,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub record_id: Uuid,
    pub next_stage: Option<Stage>,
    pub handoff_note: Value,
}

/// Object storage target for transcript archives.
pub struct Archive<'a> {
    pub s3: &'a aws_sdk_s3::Client,
    pub bucket: &'a str,
}

/// Decides whether `stage` may be saved now and where the session goes next.
pub fn plan_transition(session: &InterviewSessionRow, stage: Stage) -> Result<Transition, AppError> {
    if session.is_completed {
        return Err(AppError::Conflict(format!(
            "Session {} is already completed",
            session.session_id
        )));
    }

    let plan = session.plan();
    if !plan.contains(&stage) {
        return Err(AppError::Validation(format!(
            "Stage {stage} is not part of this session's plan"
        )));
    }

    let current = session.current();
    if current != stage {
        return Err(AppError::Conflict(format!(
            "Session is on stage {current}, cannot save stage {stage}"
        )));
    }

    Ok(Transition {
        stage,
        next: next_stage(&plan, stage),
    })
}

/// Renders a stage transcript as markdown with persona and candidate labels.
pub fn render_transcript_md(session_id: Uuid, stage: Stage, history: &[Message]) -> String {
    let persona = Persona::for_stage(stage);
    let mut md = format!("# {} Transcript, Session {session_id}\n\n", stage.label());
    for message in history.iter().filter(|m| m.role != Role::System) {
        let speaker = match message.role {
            Role::Assistant => persona.name,
            _ => "Candidate",
        };
        md.push_str(&format!("**{speaker}:**\n{}\n\n", message.content));
    }
    md
}

pub fn archive_key(session: &InterviewSessionRow, stage: Stage) -> String {
    format!(
        "transcripts/{}/{}/{}.md",
        crate::storage::sanitize_key_segment(&session.user_id),
        session.session_id,
        stage
    )
}

/// Saves the current stage: handoff note, transcript archive, and advance.
pub async fn save_stage(
    pool: &PgPool,
    llm: &dyn ChatModel,
    archive: Archive<'_>,
    session_id: Uuid,
    stage: Stage,
) -> Result<SaveOutcome, AppError> {
    let session = fetch_session(pool, session_id).await?;
    let transition = plan_transition(&session, stage)?;
    let history = &session.history.0;

    let note = generate_handoff(llm, stage, history).await;
    let handoff_note = if note.is_empty() {
        serde_json::json!({})
    } else {
        serde_json::to_value(&note)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize handoff: {e}")))?
    };

    let key = archive_key(&session, stage);
    put_markdown(
        archive.s3,
        archive.bucket,
        &key,
        render_transcript_md(session_id, stage, history),
    )
    .await?;

    let record_id = apply_transition(
        pool,
        &session,
        StageTransition {
            step: transition,
            handoff_note: &handoff_note,
            transcript: history,
            archive_key: Some(&key),
        },
    )
    .await?;

    info!(
        "Stage {stage} saved for session {session_id} ({} messages archived)",
        history.len()
    );

    Ok(SaveOutcome {
        record_id,
        next_stage: transition.next,
        handoff_note,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::session::fixtures::session;

    #[test]
    fn test_plan_transition_advances_to_next_stage() {
        let row = session(&[Stage::Phone, Stage::Manager, Stage::Hr], Stage::Phone);
        let transition = plan_transition(&row, Stage::Phone).unwrap();
        assert_eq!(transition.next, Some(Stage::Manager));
    }

    #[test]
    fn test_plan_transition_last_stage_completes() {
        let row = session(&[Stage::Phone, Stage::Hr], Stage::Hr);
        let transition = plan_transition(&row, Stage::Hr).unwrap();
        assert_eq!(transition.next, None);
    }

    #[test]
    fn test_apply_flags_moves_to_next_stage_and_clears_history() {
        let row = session(&[Stage::Phone, Stage::Manager], Stage::Phone);
        let advance = plan_transition(&row, Stage::Phone).unwrap().apply_flags();
        assert_eq!(
            advance,
            SessionAdvance {
                current: Stage::Manager,
                clear_history: true,
                completed: false,
            }
        );
    }

    #[test]
    fn test_apply_flags_last_stage_completes_and_keeps_history() {
        let row = session(&[Stage::Phone, Stage::Hr], Stage::Hr);
        let advance = plan_transition(&row, Stage::Hr).unwrap().apply_flags();
        assert_eq!(
            advance,
            SessionAdvance {
                current: Stage::Hr,
                clear_history: false,
                completed: true,
            }
        );
    }

    #[test]
    fn test_plan_transition_rejects_stage_outside_plan() {
        let row = session(&[Stage::Phone, Stage::Hr], Stage::Phone);
        assert!(matches!(
            plan_transition(&row, Stage::Whiteboard),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_plan_transition_rejects_out_of_order_save() {
        let row = session(&[Stage::Phone, Stage::Hr], Stage::Phone);
        assert!(matches!(
            plan_transition(&row, Stage::Hr),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_plan_transition_rejects_completed_session() {
        let mut row = session(&[Stage::Phone], Stage::Phone);
        row.is_completed = true;
        assert!(matches!(
            plan_transition(&row, Stage::Phone),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_render_transcript_md_labels_speakers() {
        let id = Uuid::new_v4();
        let md = render_transcript_md(
            id,
            Stage::Whiteboard,
            &[
                Message::system("hidden"),
                Message::assistant("Reverse a list."),
                Message::user("Three pointers."),
            ],
        );
        assert!(md.starts_with("# Whiteboard Stage Transcript"));
        assert!(md.contains("**Alex:**\nReverse a list."));
        assert!(md.contains("**Candidate:**\nThree pointers."));
        assert!(!md.contains("hidden"));
    }

    #[test]
    fn test_archive_key_layout() {
        let row = session(&[Stage::Phone], Stage::Phone);
        let key = archive_key(&row, Stage::Phone);
        assert_eq!(key, format!("transcripts/user-1/{}/phone.md", row.session_id));
    }
}
