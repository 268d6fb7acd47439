//! Handoff generator: condenses one stage's transcript into a structured note
//! for the next stage's interviewer.
//!
//! A failed generation never blocks the interview: it is logged and an empty
//! note is returned, which later stages simply do not see.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::interview::prompts::{HANDOFF_PROMPT_TEMPLATE, HANDOFF_SYSTEM_TEMPLATE};
use crate::interview::stage::Stage;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{complete_json, ChatModel, ChatRequest, Message, Role};

const HANDOFF_TEMPERATURE: f32 = 0.7;

/// Internal note passed from one interviewer to the next. Not shown to the candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandoffNote {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
    /// 1 – 10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<u8>,
}

impl HandoffNote {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.suggested_questions.is_empty()
            && self.overall_score.is_none()
    }
}

/// Wire shape accepted from the model; scores arrive as any JSON number.
#[derive(Debug, Deserialize)]
struct RawHandoffNote {
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    suggested_questions: Vec<String>,
    #[serde(default)]
    overall_score: Option<f64>,
}

impl From<RawHandoffNote> for HandoffNote {
    fn from(raw: RawHandoffNote) -> Self {
        HandoffNote {
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            suggested_questions: raw.suggested_questions,
            overall_score: raw
                .overall_score
                .filter(|s| s.is_finite())
                .map(|s| s.round().clamp(1.0, 10.0) as u8),
        }
    }
}

/// Renders a transcript as `role: content` lines.
pub fn render_transcript(history: &[Message]) -> String {
    history
        .iter()
        .map(|m| {
            let role = match m.role {
                Role::System => "system",
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            format!("{role}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_request(stage: Stage, history: &[Message]) -> ChatRequest {
    let system = format!(
        "{}\n\n{}",
        HANDOFF_SYSTEM_TEMPLATE.replace("{stage}", stage.as_str()),
        JSON_ONLY_INSTRUCTION
    );
    let prompt = HANDOFF_PROMPT_TEMPLATE.replace("{transcript}", &render_transcript(history));
    ChatRequest::new(vec![Message::system(system), Message::user(prompt)])
        .with_temperature(HANDOFF_TEMPERATURE)
        .json()
}

/// Generates the handoff note for `stage` from its transcript.
pub async fn generate_handoff(llm: &dyn ChatModel, stage: Stage, history: &[Message]) -> HandoffNote {
    info!("Generating {stage} handoff note from {} messages", history.len());

    match complete_json::<RawHandoffNote>(llm, &build_request(stage, history)).await {
        Ok(raw) => raw.into(),
        Err(e) => {
            warn!("Handoff generation for {stage} failed: {e}");
            HandoffNote::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    fn transcript() -> Vec<Message> {
        vec![
            Message::assistant("Why do you want to join Acme?"),
            Message::user("I like robotics."),
        ]
    }

    #[test]
    fn test_render_transcript() {
        assert_eq!(
            render_transcript(&transcript()),
            "assistant: Why do you want to join Acme?\nuser: I like robotics."
        );
    }

    #[tokio::test]
    async fn test_generate_handoff_parses_note() {
        let model = ScriptedModel::replying(&[r#"{
            "strengths": ["motivated"],
            "weaknesses": ["vague on metrics"],
            "suggested_questions": ["Quantify the robot project", "Team size?"],
            "overall_score": 7
        }"#]);

        let note = generate_handoff(&model, Stage::Phone, &transcript()).await;
        assert_eq!(note.strengths, vec!["motivated"]);
        assert_eq!(note.suggested_questions.len(), 2);
        assert_eq!(note.overall_score, Some(7));

        let request = model.last_request();
        assert!(request.json_mode);
        assert!(request.messages[0].content.contains("\"phone\" stage"));
        assert!(request.messages[1].content.contains("user: I like robotics."));
    }

    #[tokio::test]
    async fn test_generate_handoff_clamps_score() {
        let model = ScriptedModel::replying(&[r#"{"overall_score": 14.2}"#]);
        let note = generate_handoff(&model, Stage::Manager, &transcript()).await;
        assert_eq!(note.overall_score, Some(10));
        assert!(note.strengths.is_empty());
    }

    #[tokio::test]
    async fn test_generate_handoff_failure_yields_empty_note() {
        let model = ScriptedModel::failing("upstream down");
        let note = generate_handoff(&model, Stage::Whiteboard, &transcript()).await;
        assert!(note.is_empty());
    }

    #[tokio::test]
    async fn test_generate_handoff_invalid_json_yields_empty_note() {
        let model = ScriptedModel::replying(&["not json at all"]);
        let note = generate_handoff(&model, Stage::Hr, &transcript()).await;
        assert_eq!(note, HandoffNote::default());
    }
}
