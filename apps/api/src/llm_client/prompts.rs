// Shared prompt fragments. The pipeline keeps its task prompt in its own prompts.rs.

/// System prompt for every trial-analysis call.
pub const TRIAL_ANALYST_SYSTEM: &str =
    "You are a helpful assistant specialized in analyzing multiple clinical trials at once.";

/// Appended to task prompts that expect the line-oriented answer format.
pub const EXACT_FORMAT_INSTRUCTION: &str = "\
    Follow the answer format exactly. Start every question line with its number \
    followed by a period, and every answer line with the same number followed by 'A.'. \
    Do NOT use markdown, bullet points or code fences. \
    Write NA for anything the abstract does not state.";
