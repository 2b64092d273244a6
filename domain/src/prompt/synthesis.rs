//! Prompt for the content synthesis tool

/// Templates for `synthesize_content`
pub struct SynthesisPrompt;

impl SynthesisPrompt {
    pub fn system() -> &'static str {
        r#"You are a research assistant. Merge the raw material you are given into one accurate, well-structured Markdown summary.
Keep concrete facts, names, numbers and dates. Drop duplicates, ads and navigation text.
Do not invent information that is not in the material."#
    }

    pub fn user(topic: &str, content: &str) -> String {
        format!(
            "Topic: {}\n\nRaw material:\n{}\n\nWrite the summary now.",
            topic, content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt() {
        let prompt = SynthesisPrompt::user("Rust", "fast\n\nsafe");
        assert!(prompt.starts_with("Topic: Rust"));
        assert!(prompt.contains("fast\n\nsafe"));
    }
}
