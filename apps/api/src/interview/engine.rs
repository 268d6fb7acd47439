//! Turn engine: assembles the prompt for one interview turn and interprets the reply.
//!
//! Flow: pick persona → preamble (system prompt + resume/company/handoffs) →
//!       restore history → append the candidate answer → LLM → clean reply →
//!       completion check.

use tracing::debug;

use crate::errors::AppError;
use crate::interview::agents::Persona;
use crate::interview::context::SessionContext;
use crate::interview::stage::{is_stage_finished, Stage};
use crate::llm_client::{ChatModel, ChatRequest, Message, Role};

/// Result of one turn. `appended` is what must be added to the session history.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub stage: Stage,
    pub question: String,
    pub is_stage_finished: bool,
    pub appended: Vec<Message>,
}

/// Normalizes a candidate answer: blank answers count as no answer.
pub fn normalize_answer(answer: Option<&str>) -> Option<&str> {
    answer.map(str::trim).filter(|a| !a.is_empty())
}

/// Builds the full message list for a turn.
///
/// On the first turn (no answer, interviewer has not spoken) only the preamble
/// is sent so the interviewer opens. Otherwise the stored history follows the
/// preamble, then the new answer exactly once.
pub fn build_turn_messages(
    persona: &Persona,
    ctx: &SessionContext,
    answer: Option<&str>,
) -> Vec<Message> {
    let mut messages = persona.preamble(ctx);

    if answer.is_none() && !ctx.has_ai_spoken() {
        return messages;
    }

    messages.extend(
        ctx.history
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned(),
    );
    if let Some(answer) = answer {
        messages.push(Message::user(answer));
    }
    messages
}

/// Produces the interviewer's next message for the current stage.
pub async fn next_question(
    llm: &dyn ChatModel,
    ctx: &SessionContext,
    user_answer: Option<&str>,
) -> Result<TurnOutcome, AppError> {
    let answer = normalize_answer(user_answer);
    let persona = Persona::for_stage(ctx.current_stage);
    let messages = build_turn_messages(&persona, ctx, answer);

    debug!(
        "{} turn for stage {}: {} messages ({} handoff notes)",
        persona.name,
        ctx.current_stage,
        messages.len(),
        ctx.previous_summaries.len()
    );

    let request = ChatRequest::new(messages).with_temperature(persona.temperature);
    let reply = llm
        .complete(&request)
        .await
        .map_err(|e| AppError::Llm(format!("{} failed to respond: {e}", persona.name)))?;
    let question = persona.clean_reply(&reply);
    if question.is_empty() {
        return Err(AppError::Llm(format!(
            "{} replied with no interviewer turn",
            persona.name
        )));
    }

    let mut appended = Vec::with_capacity(2);
    if let Some(answer) = answer {
        appended.push(Message::user(answer));
    }
    appended.push(Message::assistant(question.clone()));

    Ok(TurnOutcome {
        stage: ctx.current_stage,
        is_stage_finished: is_stage_finished(&question),
        question,
        appended,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::interview::context::PreviousSummary;
    use crate::llm_client::testing::ScriptedModel;

    fn ctx(stage: Stage, history: Vec<Message>) -> SessionContext {
        SessionContext {
            current_stage: stage,
            resume: json!({"name": "Sunny"}),
            company_info: "Acme".to_string(),
            history,
            previous_summaries: vec![],
        }
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer(None), None);
        assert_eq!(normalize_answer(Some("   ")), None);
        assert_eq!(normalize_answer(Some(" yes ")), Some("yes"));
    }

    #[test]
    fn test_first_turn_sends_preamble_only() {
        let persona = Persona::for_stage(Stage::Phone);
        let messages = build_turn_messages(&persona, &ctx(Stage::Phone, vec![]), None);
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_answer_is_sent_once_after_history() {
        let persona = Persona::for_stage(Stage::Phone);
        let history = vec![
            Message::assistant("Hi, is now a good time?"),
            Message::user("Yes"),
            Message::assistant("How did you find the role?"),
        ];
        let messages = build_turn_messages(&persona, &ctx(Stage::Phone, history), Some("LinkedIn"));
        assert_eq!(messages.len(), 2 + 3 + 1);
        let last = messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "LinkedIn");
        assert_eq!(
            messages.iter().filter(|m| m.content == "LinkedIn").count(),
            1
        );
    }

    #[test]
    fn test_stored_system_messages_are_not_replayed() {
        let persona = Persona::for_stage(Stage::Hr);
        let history = vec![
            Message::system("stale prompt"),
            Message::assistant("Welcome"),
        ];
        let messages = build_turn_messages(&persona, &ctx(Stage::Hr, history), None);
        assert!(messages.iter().all(|m| m.content != "stale prompt"));
        assert_eq!(messages.last().unwrap().content, "Welcome");
    }

    #[tokio::test]
    async fn test_next_question_opening_turn() {
        let model = ScriptedModel::replying(&["Hello, this is Jayden from Acme."]);
        let outcome = next_question(&model, &ctx(Stage::Phone, vec![]), None)
            .await
            .unwrap();

        assert_eq!(outcome.stage, Stage::Phone);
        assert_eq!(outcome.question, "Hello, this is Jayden from Acme.");
        assert!(!outcome.is_stage_finished);
        assert_eq!(outcome.appended, vec![Message::assistant("Hello, this is Jayden from Acme.")]);
        assert_eq!(model.last_request().temperature, 0.8);
    }

    #[tokio::test]
    async fn test_next_question_records_answer_and_detects_end() {
        let model = ScriptedModel::replying(&["Thank you, that's all for today. Bye!"]);
        let context = ctx(
            Stage::Whiteboard,
            vec![Message::assistant("Reverse a linked list.")],
        );
        let outcome = next_question(&model, &context, Some("Use three pointers."))
            .await
            .unwrap();

        assert!(outcome.is_stage_finished);
        assert_eq!(
            outcome.appended,
            vec![
                Message::user("Use three pointers."),
                Message::assistant("Thank you, that's all for today. Bye!"),
            ]
        );
        assert_eq!(model.last_request().temperature, 0.5);
    }

    #[tokio::test]
    async fn test_next_question_injects_handoff_notes() {
        let model = ScriptedModel::replying(&["Tell me about the robot project."]);
        let mut context = ctx(Stage::Manager, vec![]);
        context.previous_summaries.push(PreviousSummary {
            stage: Stage::Phone,
            note: json!({"suggested_questions": ["Ask about the robot project"]}),
        });

        next_question(&model, &context, None).await.unwrap();
        let request = model.last_request();
        assert!(request.messages[1].content.contains("Ask about the robot project"));
    }

    #[tokio::test]
    async fn test_next_question_strips_simulated_candidate() {
        let model = ScriptedModel::replying(&["What is your notice period?\nCandidate: One month."]);
        let outcome = next_question(&model, &ctx(Stage::Hr, vec![]), None).await.unwrap();
        assert_eq!(outcome.question, "What is your notice period?");
    }

    #[tokio::test]
    async fn test_next_question_rejects_reply_with_only_candidate_turn() {
        let model = ScriptedModel::replying(&["Candidate: I have five years of Rust. Bye!"]);
        let result = next_question(&model, &ctx(Stage::Phone, vec![]), Some("hi")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }

    #[tokio::test]
    async fn test_next_question_propagates_llm_failure() {
        let model = ScriptedModel::failing("boom");
        let result = next_question(&model, &ctx(Stage::Phone, vec![]), Some("hi")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
