//! Prompt construction for grounded reply drafting.
//!
//! The prompt content is provider-agnostic; only the request envelope
//! differs between providers.

/// Fixed system instruction establishing the grounding rules.
pub const GROUNDING_SYSTEM_PROMPT: &str = "\
You are an assistant that drafts email replies for a support inbox.

Rules:
- Answer ONLY from the reference content provided. Do not invent facts.
- If the reference content has nothing relevant, reply with the fallback \
message verbatim.
- Keep the reply to 2-4 sentences.
- Match the requested tone.
- End with a single line inviting the sender to reach a human contact.";

/// Trivial prompt for connectivity verification.
pub const TEST_PROMPT: &str = "Reply with the single word: ok";

/// Build the user instruction embedding the email context, reference
/// content, tone, and fallback message.
pub fn build_user_prompt(
    email_context: &str,
    reference_text: &str,
    tone: &str,
    fallback_message: &str,
) -> String {
    format!(
        "Draft a reply to the email below.\n\n\
         [EMAIL]\n{email_context}\n\n\
         [REFERENCE CONTENT]\n{reference_text}\n\n\
         [TONE]\n{tone}\n\n\
         [FALLBACK MESSAGE]\n{fallback_message}"
    )
}
