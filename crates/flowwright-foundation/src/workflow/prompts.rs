//! Prompt templates
//!
//! Every template takes the response language so the same instructions work
//! for any locale the settings name.

/// System instruction for the generation call.
pub fn architect_instruction() -> String {
    "You are an AI workflow architect with deep experience in Coze, Dify and similar \
     bot-building platforms. You help users build AI applications from scratch, covering \
     node design, parameter tuning and code implementation."
        .to_string()
}

/// Task prompt embedding the user's goal and the authoring rules.
pub fn generation_prompt(goal: &str, language: &str) -> String {
    format!(
        "The user wants to build an AI bot or workflow on a Coze-like platform to achieve \
         the following goal: \"{goal}\".\n\
         \n\
         Acting as a senior AI workflow architect, break this goal down into concrete, \
         executable workflow nodes.\n\
         \n\
         Requirements:\n\
         1. Rigorous logic: the flow between nodes must be clear and ordered.\n\
         2. Concrete parameters: every LLM node must come with a recommended temperature, \
         top-p and core system prompt.\n\
         3. Code support: any step that needs logic processing (parsing JSON, polling an \
         API, computation) must include a JavaScript code snippet.\n\
         4. Clear explanations: explain what every node does.\n\
         5. Language: write all text in {language}."
    )
}

/// Hidden system instruction of a chat session grounded in `context`.
pub fn chat_instruction(context: &str, language: &str) -> String {
    format!(
        "You are a helpful AI workflow building assistant.\n\
         The user is looking at the design of an AI workflow.\n\
         \n\
         Context of the current workflow:\n\
         {context}\n\
         \n\
         Your duties:\n\
         1. Answer questions about how specific nodes are implemented.\n\
         2. Explain why particular parameters were chosen (for example why a temperature \
         is set low).\n\
         3. When the user asks about code, explain its logic or suggest changes.\n\
         4. Always answer in {language}, professionally and warmly."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prompt_embeds_goal_and_language() {
        let p = generation_prompt("summarize AI news daily", "English");
        assert!(p.contains("\"summarize AI news daily\""));
        assert!(p.contains("5. Language: write all text in English."));
        assert!(p.contains("JavaScript"));
    }

    #[test]
    fn chat_instruction_embeds_context() {
        let p = chat_instruction("Node Fetch (API 请求): GET feed", "简体中文");
        assert!(p.contains("Node Fetch (API 请求): GET feed"));
        assert!(p.contains("Always answer in 简体中文"));
    }
}
