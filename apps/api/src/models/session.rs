use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::interview::stage::Stage;
use crate::llm_client::Message;

/// One candidate's run through the interview plan.
///
/// `resume_snapshot` and `company_snapshot` are copied at init so later edits or
/// deletions of the source rows never change a running interview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewSessionRow {
    pub session_id: Uuid,
    pub user_id: String,
    pub current_stage: String,
    pub stages_list: Vec<String>,
    pub history: Json<Vec<Message>>,
    pub resume_snapshot: Value,
    pub company_snapshot: String,
    pub summary_phone: Option<Value>,
    pub summary_whiteboard: Option<Value>,
    pub summary_manager: Option<Value>,
    pub summary_hr: Option<Value>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl InterviewSessionRow {
    /// The ordered stage plan. Unknown names written by older clients are skipped.
    pub fn plan(&self) -> Vec<Stage> {
        self.stages_list
            .iter()
            .filter_map(|s| Stage::parse(s))
            .collect()
    }

    pub fn current(&self) -> Stage {
        Stage::resolve_loose(&self.current_stage)
    }

    /// The handoff note stored for `stage`, if one was generated and is non-empty.
    pub fn summary_for(&self, stage: Stage) -> Option<&Value> {
        let slot = match stage {
            Stage::Phone => &self.summary_phone,
            Stage::Whiteboard => &self.summary_whiteboard,
            Stage::Manager => &self.summary_manager,
            Stage::Hr => &self.summary_hr,
        };
        slot.as_ref().filter(|v| !is_blank(v))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// An archived transcript for one completed stage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StageRecordRow {
    pub record_id: Uuid,
    pub user_id: String,
    pub session_id: Uuid,
    pub stage: String,
    pub content: Json<Vec<Message>>,
    pub archive_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user-facing feedback report, for a single stage or the whole interview.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackReportRow {
    pub id: i64,
    pub session_id: Uuid,
    pub stage: String,
    pub report_type: String,
    pub content: Value,
    pub score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn session(plan: &[Stage], current: Stage) -> InterviewSessionRow {
        InterviewSessionRow {
            session_id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            current_stage: current.as_str().to_string(),
            stages_list: plan.iter().map(|s| s.as_str().to_string()).collect(),
            history: Json(Vec::new()),
            resume_snapshot: serde_json::json!({"name": "Sunny", "skills": ["Rust", "Python"]}),
            company_snapshot: "Acme builds logistics robots.".to_string(),
            summary_phone: None,
            summary_whiteboard: None,
            summary_manager: None,
            summary_hr: None,
            is_completed: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::session;
    use super::*;

    #[test]
    fn test_plan_skips_unknown_names() {
        let mut row = session(&[Stage::Phone, Stage::Hr], Stage::Phone);
        row.stages_list.insert(1, "lunch".to_string());
        assert_eq!(row.plan(), vec![Stage::Phone, Stage::Hr]);
    }

    #[test]
    fn test_summary_for_ignores_empty_notes() {
        let mut row = session(&[Stage::Phone, Stage::Manager], Stage::Manager);
        row.summary_phone = Some(serde_json::json!({}));
        assert!(row.summary_for(Stage::Phone).is_none());

        row.summary_phone = Some(serde_json::json!({"overall_score": 7}));
        assert_eq!(row.summary_for(Stage::Phone).unwrap()["overall_score"], 7);
    }
}
