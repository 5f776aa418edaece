//! Prompt templates for dream edits.

pub const DREAM_PLACEHOLDER: &str = "{{DREAM}}";
pub const DEFAULT_TEMPLATE: &str = "Medium shot of this character {{DREAM}}";

/// Identity-preserving cinematic portrait. `{{DREAM}}` appears twice.
pub const CINEMATIC_TEMPLATE: &str = "Cinematic portrait of this EXACT SAME PERSON {{DREAM}}.
CRITICAL: The person in the output MUST be the SAME INDIVIDUAL as in the input image - same face structure, same nose, same eyes, same skin tone, same hair color and style. This is an identity-preserving edit.
Show the person from chest/shoulders up, naturally integrated into the dream scene.
The face should be clearly recognizable and well-lit, taking about 25-30% of the frame.
Create a balanced composition where both the person AND the \"{{DREAM}}\" environment are equally important.
The person should appear to be genuinely IN the scene, not just pasted on top.
The expression can be different (showing wonder, joy, achievement) but the IDENTITY must remain 100% consistent - it must be unmistakably the same human being.
Preserve: exact facial bone structure, eye shape and color, nose shape, lip shape, skin complexion, hair texture and color, any distinctive features like moles or freckles.
Dramatic cinematic lighting, photorealistic, epic movie poster quality. 8k, sharp details.";

/// `promptTemplate` value that selects [`CINEMATIC_TEMPLATE`].
pub const CINEMATIC_PRESET: &str = "cinematic";

/// Fills `template` (or the default one when absent or blank) with `dream`.
///
/// Only the first placeholder is replaced. A template without a
/// placeholder is returned as is.
pub fn craft(dream: &str, template: Option<&str>) -> String {
    let template = template
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(DEFAULT_TEMPLATE);
    template.replacen(DREAM_PLACEHOLDER, dream, 1)
}

pub fn cinematic(dream: &str) -> String {
    CINEMATIC_TEMPLATE.replace(DREAM_PLACEHOLDER, dream)
}

/// Resolves a request template: a preset name or a literal template.
pub fn render(dream: &str, template: Option<&str>) -> String {
    match template {
        Some(name) if name.trim().eq_ignore_ascii_case(CINEMATIC_PRESET) => cinematic(dream),
        _ => craft(dream, template),
    }
}

/// Prompt used when LLM enhancement is unavailable.
pub fn fallback(dream: &str) -> String {
    craft(dream, None)
}

/// Shortens a prompt for log lines without splitting a char.
pub fn preview(prompt: &str, max_chars: usize) -> String {
    match prompt.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &prompt[..idx]),
        None => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template() {
        assert_eq!(
            craft("flying through the clouds", None),
            "Medium shot of this character flying through the clouds"
        );
        assert_eq!(craft("x", Some("  ")), "Medium shot of this character x");
        assert_eq!(fallback("x"), craft("x", None));
    }

    #[test]
    fn test_custom_template() {
        assert_eq!(
            craft("on stage", Some("Close-up of {{DREAM}}, then wide of {{DREAM}}")),
            "Close-up of on stage, then wide of {{DREAM}}"
        );
        assert_eq!(craft("x", Some("{{DREAM}} and {{DREAM}}")), "x and {{DREAM}}");
        assert_eq!(craft("on stage", Some("No placeholder")), "No placeholder");
    }

    #[test]
    fn test_render_presets() {
        assert_eq!(render("on stage", Some(" Cinematic ")), cinematic("on stage"));
        assert_eq!(render("on stage", None), fallback("on stage"));
        assert_eq!(
            render("on stage", Some("Wide shot {{DREAM}}")),
            "Wide shot on stage"
        );
    }

    #[test]
    fn test_cinematic_mentions_dream_twice() {
        let prompt = cinematic("winning an Olympic medal");
        assert_eq!(prompt.matches("winning an Olympic medal").count(), 2);
        assert!(prompt.starts_with("Cinematic portrait of this EXACT SAME PERSON winning"));
        assert!(!prompt.contains(DREAM_PLACEHOLDER));
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ééééé", 2), "éé...");
    }
}
