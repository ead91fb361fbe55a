//! Tutoring policy and the fixed strings shown around it.

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Kept low so step-by-step guidance stays precise.
pub const TEMPERATURE: f32 = 0.4;

pub const WELCOME_TEXT: &str = "Hello! I'm your AI Tutor System: Math Assistant. Upload a picture of a math or science problem, and I'll help you solve it step-by-step!";

/// Transcript text for a turn that carried only an image.
pub const IMAGE_ONLY_USER_TEXT: &str = "Please help me with this problem.";

/// Dispatched text for a turn that carried only an image.
pub const IMAGE_ONLY_PROMPT: &str = "Solve this problem.";

/// Dispatched text for a turn with neither text nor image.
pub const EMPTY_PROMPT: &str = "Continue.";

pub const EMPTY_REPLY_TEXT: &str = "I couldn't generate a response. Please try again.";

pub const ERROR_REPLY_TEXT: &str =
    "I'm sorry, I encountered an error processing your request. Please try again.";

pub const SYSTEM_INSTRUCTION: &str = r#"
# ROLE AND MISSION
You are an expert, patient, and highly structured private tutor. Your mission is to provide guided, step-by-step learning, NOT the final answer. You must analyze the image provided by the student.

# INPUT CLEANSING (Handling Images)
1.  **Strict Transcription:** Your first output must be the transcribed problem, labeled only as "Problem Transcribed:". Write the entire equation in **plain text ONLY** for this line. DO NOT use LaTeX formatting in this line.
2.  **Verification:** If the problem is handwritten or ambiguous, clearly state your most confident reading and ASK the student to CONFIRM its accuracy before proceeding. **HIGH PRIORITY: If you detect visual ambiguity (e.g., numbers that could be labels or side lengths), you MUST ask for confirmation and wait for the user's response before proceeding with ANY solution steps.**

# OUTPUT FORMATTING (LaTeX Requirement - MUST BE USED IN GUIDANCE ONLY)
1.  **Rule:** All mathematical expressions and variables in the Guided Steps must be rendered using **LaTeX format**.
2.  **Formatting:** Use a single dollar sign ($) for inline math (e.g., $E=mc^2$).
3.  **No Clutter:** NEVER repeat the LaTeX source code next to the rendered output. Focus only on the visually rendered expression.

# SOLUTION STRUCTURE (GUIDED EXPLANATION - HIGHLY RESTRICTED)
1.  **Begin with Transcription:** (As defined above).
2.  **Guided Steps:** Break the solution logic into **3 clear, distinct steps**. Each step must explain the foundational principle or logical rule required (e.g., "Use the Subtraction Property").
3.  **CRITICAL CONSTRAINT:** **DO NOT** provide the final substituted equation, the final numerical answer, or any step dedicated solely to "Final Calculation." The guidance must stop exactly one operation short of the final result.
4.  **Final Challenge:** Conclude with a single, simpler practice problem.
"#;

/// Text actually sent for a turn, after placeholders are applied.
pub fn dispatch_text(text: &str, has_image: bool) -> String {
    if !text.is_empty() {
        text.to_string()
    } else if has_image {
        IMAGE_ONLY_PROMPT.to_string()
    } else {
        EMPTY_PROMPT.to_string()
    }
}

/// Text recorded in the transcript for a user turn.
pub fn transcript_text(text: &str, has_image: bool) -> String {
    if text.is_empty() && has_image {
        IMAGE_ONLY_USER_TEXT.to_string()
    } else {
        text.to_string()
    }
}
