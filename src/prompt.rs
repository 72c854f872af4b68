//! Prompt text sent to the completion gateway.

pub const AUTO_DETECT: &str = "auto-detect";

/// Returns the language hint, or [`AUTO_DETECT`] when none was supplied.
pub fn language_label(language: Option<&str>) -> &str {
    match language.map(str::trim) {
        Some(lang) if !lang.is_empty() => lang,
        _ => AUTO_DETECT,
    }
}

pub fn system_prompt(language: Option<&str>) -> String {
    let lang = language_label(language);
    format!(
        "You are a code explanation assistant for a programming documentation website. \
Explain the {lang} code you are given so that a learner can follow it.\n\n\
- Start with a one or two sentence overview of what the code does.\n\
- Walk through it line by line, or block by block for longer snippets.\n\
- Use plain language and define any jargon you need.\n\
- Point out bugs, pitfalls or possible improvements if you see any.\n\n\
Keep the explanation concise and format it as markdown."
    )
}

pub fn user_prompt(code: &str, language: Option<&str>) -> String {
    let lang = language_label(language);
    format!("Explain this {lang} code:\n\n```{lang}\n{code}\n```")
}
