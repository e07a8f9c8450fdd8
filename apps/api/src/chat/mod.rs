// Resume-grounded career chat: prompt grounding and the per-turn orchestrator.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
