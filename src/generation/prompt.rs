//! Prompt construction for goal decomposition.

use crate::llm::ChatMessage;

use super::types::GenerationRequest;

/// System instruction demanding exactly `duration_days` tasks as a bare JSON array.
pub fn system_prompt(duration_days: u32, minutes_per_task: u32) -> String {
    let noun = if duration_days == 1 { "task" } else { "tasks" };
    format!(
        r#"You break goals down into daily tasks. Break the user's {days}-day goal into exactly {days} daily {noun}, one per day, in the order they should be done.

Each task must be achievable in about {minutes} minutes.

Respond with a JSON array containing exactly {days} objects. Each object must have exactly two string fields:
- "description": a short title for the task
- "instructions": detailed, actionable steps for completing it

Output only the JSON array. Do not add explanations, markdown, or code fences."#,
        days = duration_days,
        noun = noun,
        minutes = minutes_per_task,
    )
}

/// Build the conversation sent on every attempt.
pub fn build_messages(request: &GenerationRequest, minutes_per_task: u32) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(request.duration_days, minutes_per_task)),
        ChatMessage::user(request.goal_description.trim()),
    ]
}
