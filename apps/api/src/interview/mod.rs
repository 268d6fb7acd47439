// Interview orchestration: stage sequencing, interviewer personas, per-turn
// context assembly, handoff notes and stage progression.
// All LLM calls go through llm_client::ChatModel.

pub mod agents;
pub mod context;
pub mod engine;
pub mod handlers;
pub mod handoff;
pub mod progression;
pub mod prompts;
pub mod stage;
pub mod store;
