// All LLM prompt constants for the interview endpoints.

/// System persona shared by both operations.
pub const INTERVIEWER_SYSTEM: &str = "You are an expert interviewer";

/// Question generation prompt template. Replace `{question_type}`, `{skills}`,
/// `{experience}`, `{company}` and `{position}` before sending.
pub const GENERATE_QUESTIONS_TEMPLATE: &str = "This is a {question_type} interview. \
    Generate 4 questions to evaluate a candidate's skills in {skills} with {experience} \
    years of experience, applying to {company} for the position of {position}. \
    Do not provide any introduction or explanations. Only provide the 4 questions. \
    Avoid questions that ask the candidate to write a program.";

/// System prompt for per-answer review. The expected output shape (one
/// feedback line, then approach guidance, then an example) is what
/// `build_feedback_item` parses back out.
pub const REVIEW_SYSTEM: &str = "You are an expert interviewer. Provide concise \
    one-line feedback on the candidate's response. Then, give guidance on how to \
    approach the question effectively, followed by an example.";

/// Per-answer review prompt template. Replace `{question}` and `{response}`.
pub const REVIEW_TEMPLATE: &str = "Question: \"{question}\"\nResponse: \"{response}\"";
