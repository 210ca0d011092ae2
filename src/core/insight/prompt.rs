//! Prompt assembly for speaker sentiment analysis.

use serde::Serialize;

/// Tunable parts of the analysis prompt.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    /// Reasoning the model is asked to apply.
    pub reasoning: String,
    /// Desired shape of the model's answer.
    pub output_format: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            reasoning: "Extract key points relevant to sentiment analysis.".to_string(),
            output_format: "Speaker name followed by the results.".to_string(),
        }
    }
}

/// One chat message in the completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Build the one-shot message sequence for a conversation: a system prompt
/// describing the task, the user prompt carrying the conversation, and a
/// single assistant exemplar showing the expected per-speaker format.
pub fn build_messages(conversation: &str, prompt: &PromptConfig) -> Vec<ChatMessage> {
    let system = format!(
        "You are an advanced AI language model designed to extract expert psychological \
         insights and sentiments of all the speakers in the given conversation flows. \
         Your goal is to distill complex information, identify key sentiment insights \
         about each speaker according to the following reasoning: {reasoning} \
         Generate concise and informative descriptions of the insights gathered, \
         formatted as: {output_format}",
        reasoning = prompt.reasoning,
        output_format = prompt.output_format,
    );

    let user = format!(
        "Write expert sentimental or psychological insights of each speaker involved \
         in the following conversational flow:\n{conversation}\n\
         Consider relevant {reasoning} and nuances in the content.",
        reasoning = prompt.reasoning,
    );

    let assistant = "[Speaker_2] likes a sport. It seems he cares about his health.\n\
                     [Speaker_1] pretends to be smart."
        .to_string();

    vec![
        ChatMessage {
            role: "system",
            content: system,
        },
        ChatMessage {
            role: "user",
            content: user,
        },
        ChatMessage {
            role: "assistant",
            content: assistant,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_conversation_and_config() {
        let prompt = PromptConfig {
            reasoning: "focus on frustration".to_string(),
            output_format: "bullet list".to_string(),
        };
        let messages = build_messages("A: hi\nB: hello", &prompt);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("focus on frustration"));
        assert!(messages[0].content.contains("bullet list"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.contains("A: hi\nB: hello"));
        assert_eq!(messages[2].role, "assistant");
    }
}
