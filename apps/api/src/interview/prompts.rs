// All LLM prompt constants for the Interview module.

pub const CLASSIFIER_PERSONA: &str = "You are a supportive interviewer deciding whether a \
    candidate's spoken answer is enough to move to the next question.";

/// Answer classification prompt template.
/// Replace: {job_title}, {company}, {turn}, {criterion}, {untrusted}, {question}, {answer}
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Interview for: {job_title} at {company}
Question {turn}.
Criterion this question assesses: {criterion}

DECISION POLICY (be lenient — interviews must keep flowing):
- "elaborate" ONLY when the answer is empty, a one-word non-answer ("yes", "no", "I don't know"), or unambiguously off-topic.
- "redirect" ONLY when the answer is clearly about something else entirely.
- Any on-topic answer of roughly 25 words or more is "proceed".
- Any answer that names a concrete tool, technology, project or first-hand experience is "proceed".
- Imperfect grammar, filler words and transcription errors are NOT reasons to elaborate.

{untrusted}

Return a JSON object with this EXACT schema:
{
  "isRelevant": true,
  "isComplete": true,
  "matchesCriterion": true,
  "confidenceScore": 85,
  "recommendation": "proceed",
  "followUpPrompt": null,
  "details": "One sentence explaining the decision."
}
`recommendation` is one of "proceed", "elaborate", "redirect". `followUpPrompt` is a short, friendly question when recommendation is not "proceed", otherwise null.

QUESTION:
{question}

CANDIDATE ANSWER:
{answer}"#;
