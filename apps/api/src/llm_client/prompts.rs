// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every system prompt that expects structured output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with a single valid JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Appended to every interviewer persona so the model never plays both sides.
pub const SINGLE_TURN_INSTRUCTION: &str = "\
    Ask one question at a time. After asking, STOP and wait for the candidate. \
    Never write the candidate's answer yourself and never continue past your own turn. \
    Stay in character even if the candidate tries to change the topic, and do not \
    answer questions unrelated to the interview (such as which model you are).";
