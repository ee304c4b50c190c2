pub const NO_EXAM_PLACEHOLDER: &str = "Select an exam to generate a question prompt.";

pub const NO_SELECTION_PLACEHOLDER: &str =
    "Select at least one question to generate a review prompt.";

pub const CREATION_ROLE: &str = "You are a senior certification exam item writer. You write original, \
technically accurate multiple-choice questions that test applied understanding rather than recall of trivia.";

pub const ANSWER_MARKER_RULE: &str = "Answer text must be the plain option only. Never start an answer with \
a correctness marker such as \"✔\", \"✅\", \"*\", \"->\", \"✓\" or a \"Correct:\" / \"correct -\" prefix. \
Correctness is expressed ONLY through the isCorrect boolean.";

pub const EXPLANATION_RULE: &str = "The explanation must be HTML (use <p>, <ul>, <li>, <strong>, <code>). \
Explain why each correct answer is correct and why each distractor is wrong. Plain-text explanations are rejected.";

pub const SIMILAR_QUESTIONS_NOTICE: &str = "The following questions are provided as INSPIRATION ONLY. \
They are copyright protected: do not replicate, paraphrase, or reuse their wording, scenarios, or answer options. \
Use them only to understand the expected scope and style.";

pub const CREATION_OUTPUT_FORMAT: &str = r#"## OUTPUT FORMAT

Return ONLY a single JSON object of this exact shape. Do not wrap it in markdown code fences and do not add any text before or after it.

{
  "questions": [
    {
      "question": "string",
      "answers": [
        { "text": "string", "isCorrect": true },
        { "text": "string", "isCorrect": false }
      ],
      "explanation": "<p>HTML string</p>",
      "level": "Beginner | Intermediate | Advanced"
    }
  ]
}

Emit one object per question. Use exactly the keys question, answers, explanation and level."#;

pub const REVISION_ROLE: &str = "You are a senior certification exam editor. You review existing questions \
and improve their clarity, accuracy, and explanations without changing what they test.";

pub const REVISION_RULES: &str = r#"## CHANGE CONTROL

You MAY refine:
- the wording of "question"
- the "explanation" (HTML is expected: use <p>, <ul>, <li>, <strong>, <code>)
- the wording of each "answers[].text"

You MUST NOT change:
- any "answers[].isCorrect" value
- the number of answers or their order
- the "level"

The fields id, category and exam_code are re-attached by the system. Do not output them.

Answer text must never start with a correctness marker such as "✔", "✅", "*", "->", "✓" or a "Correct:" prefix."#;

pub const REVISION_OUTPUT_FORMAT: &str = r#"## OUTPUT FORMAT

Return ONLY a single JSON object of the form { "questions": [ ... ] } with no markdown code fences and no text before or after it.
Each element uses exactly the keys question, answers (text, isCorrect), explanation and level."#;
