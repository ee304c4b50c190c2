use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*\n?(.*?)\s*```\s*$")
        .expect("CODE_FENCE is a valid regex pattern")
});

static ESCAPED_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\+([\[\]])").expect("ESCAPED_BRACKET is a valid regex pattern"));

static ESCAPED_UNDERSCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\+_").expect("ESCAPED_UNDERSCORE is a valid regex pattern"));

static BACKSLASH_RUN_BEFORE_QUOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\\{3,})""#).expect("BACKSLASH_RUN_BEFORE_QUOTE is a valid regex pattern")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    pub changed: bool,
}

/// Repairs escaping artifacts LLMs commonly leave in JSON output.
///
/// - markdown code fences wrapping the whole payload are removed, nested ones too
/// - backslashes directly before `[` or `]` are dropped
/// - `\_` becomes `_`
/// - an odd run of three or more backslashes before `"` collapses to `\"`
///
/// Even runs before a quote are left alone: those are escaped backslashes
/// followed by a closing quote. Every rule removes the pattern it matches, so
/// running the sanitizer on its own output is a no-op.
pub fn sanitize_llm_json(raw: &str) -> Sanitized {
    let mut unfenced = raw;
    while let Some(inner) = CODE_FENCE.captures(unfenced).and_then(|caps| caps.get(1)) {
        unfenced = inner.as_str();
    }

    let text = ESCAPED_BRACKET.replace_all(unfenced, "$1");
    let text = ESCAPED_UNDERSCORE.replace_all(&text, "_");
    let text = BACKSLASH_RUN_BEFORE_QUOTE.replace_all(&text, |caps: &Captures| {
        let run = caps.get(1).map_or(0, |m| m.as_str().len());
        if run % 2 == 1 {
            "\\\"".to_string()
        } else {
            caps[0].to_string()
        }
    });

    let text = text.into_owned();
    let changed = text != raw;
    Sanitized { text, changed }
}
