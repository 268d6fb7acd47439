//! Agent factory: one prompt-templated interviewer persona per stage.

use crate::interview::context::{render_company, render_handoffs, render_resume, SessionContext};
use crate::interview::prompts::{
    CONTEXT_TEMPLATE, DEFAULT_GUIDE, HR_SYSTEM, MANAGER_SYSTEM, PHONE_SYSTEM, WHITEBOARD_SYSTEM,
};
use crate::interview::stage::Stage;
use crate::llm_client::prompts::SINGLE_TURN_INSTRUCTION;
use crate::llm_client::Message;

/// Labels a model uses when it starts writing the candidate's side of the conversation.
const CANDIDATE_MARKERS: &[&str] = &["應徵者：", "應徵者:", "Candidate:"];

/// An interviewer persona: who speaks, how, and how creatively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Persona {
    pub stage: Stage,
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub temperature: f32,
}

impl Persona {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Phone => Persona {
                stage,
                name: "Jayden",
                system_prompt: PHONE_SYSTEM,
                temperature: 0.8,
            },
            // Technical questions run colder for precision.
            Stage::Whiteboard => Persona {
                stage,
                name: "Alex",
                system_prompt: WHITEBOARD_SYSTEM,
                temperature: 0.5,
            },
            Stage::Manager => Persona {
                stage,
                name: "Sarah",
                system_prompt: MANAGER_SYSTEM,
                temperature: 0.7,
            },
            Stage::Hr => Persona {
                stage,
                name: "Emily",
                system_prompt: HR_SYSTEM,
                temperature: 0.8,
            },
        }
    }

    /// The system prompt plus the context message that open every stage.
    pub fn preamble(&self, ctx: &SessionContext) -> Vec<Message> {
        let context = CONTEXT_TEMPLATE
            .replace("{resume}", &render_resume(&ctx.resume))
            .replace("{company}", &render_company(&ctx.company_info))
            .replace("{guide}", DEFAULT_GUIDE)
            .replace("{handoffs}", &render_handoffs(&ctx.previous_summaries))
            .replace("{persona}", self.name);

        vec![
            Message::system(format!(
                "{}\n\n{}",
                self.system_prompt, SINGLE_TURN_INSTRUCTION
            )),
            Message::user(context),
        ]
    }

    /// Cuts off any simulated candidate turn and trims the reply.
    /// A reply that is nothing but a candidate turn comes back empty.
    pub fn clean_reply(&self, reply: &str) -> String {
        let cut = CANDIDATE_MARKERS
            .iter()
            .filter_map(|m| reply.find(m))
            .min()
            .unwrap_or(reply.len());
        reply[..cut].trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::interview::context::PreviousSummary;
    use crate::llm_client::Role;

    fn ctx(stage: Stage) -> SessionContext {
        SessionContext {
            current_stage: stage,
            resume: json!({"name": "Sunny"}),
            company_info: "Acme builds robots".to_string(),
            history: vec![],
            previous_summaries: vec![],
        }
    }

    #[test]
    fn test_persona_table() {
        let expected = [
            (Stage::Phone, "Jayden", 0.8_f32),
            (Stage::Whiteboard, "Alex", 0.5),
            (Stage::Manager, "Sarah", 0.7),
            (Stage::Hr, "Emily", 0.8),
        ];
        for (stage, name, temperature) in expected {
            let persona = Persona::for_stage(stage);
            assert_eq!(persona.name, name);
            assert_eq!(persona.temperature, temperature);
        }
    }

    #[test]
    fn test_preamble_includes_context_and_handoffs() {
        let mut ctx = ctx(Stage::Manager);
        ctx.previous_summaries.push(PreviousSummary {
            stage: Stage::Whiteboard,
            note: json!({"weaknesses": ["edge cases"]}),
        });

        let messages = Persona::for_stage(Stage::Manager).preamble(&ctx);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.starts_with(MANAGER_SYSTEM));
        assert_eq!(messages[1].role, Role::User);

        let body = &messages[1].content;
        assert!(body.contains("\"name\": \"Sunny\""));
        assert!(body.contains("Acme builds robots"));
        assert!(body.contains(DEFAULT_GUIDE));
        assert!(body.contains("### Whiteboard Stage"));
        assert!(body.contains("edge cases"));
        assert!(body.contains("open the interview as Sarah"));
    }

    #[test]
    fn test_first_stage_preamble_has_no_handoffs() {
        let messages = Persona::for_stage(Stage::Phone).preamble(&ctx(Stage::Phone));
        assert!(messages[1].content.contains(crate::interview::prompts::NO_HANDOFFS));
        assert!(messages[1].content.contains("open the interview as Jayden"));
    }

    #[test]
    fn test_clean_reply_cuts_simulated_candidate() {
        let persona = Persona::for_stage(Stage::Phone);
        assert_eq!(
            persona.clean_reply("  Why this role?\n應徵者：因為我喜歡機器人。"),
            "Why this role?"
        );
        assert_eq!(
            persona.clean_reply("Tell me more.\nCandidate: I built a robot."),
            "Tell me more."
        );
        assert_eq!(persona.clean_reply(" Hello there. "), "Hello there.");
    }

    #[test]
    fn test_clean_reply_drops_reply_that_is_only_candidate_turn() {
        let persona = Persona::for_stage(Stage::Phone);
        assert_eq!(persona.clean_reply("Candidate: I have five years of Rust."), "");
        assert_eq!(persona.clean_reply("  應徵者：我做過機器人專案。"), "");
    }
}
