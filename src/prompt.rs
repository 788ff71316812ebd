//! Fixed instruction block and output schema sent with every generation call.

use serde_json::{Value as JsonValue, json};

use crate::{generator::PayloadMode, models::draft::DraftType};

pub const SYSTEM_INSTRUCTION: &str = r#"You are a Creative Copywriter for an EdTech App.

INPUT:
A list of specific 'events' derived from learner activity, or the raw learner activity itself.

GOAL:
Generate high-converting, modern, catchy push notifications
based ONLY on the provided input.

EVENT GUIDELINES:
- "video_resume": Encouraging. "Keep going!", "You're so close."
- "video_milestone": Celebratory. "Great job!", "You did it!"
- "payment_promotion": Urgent/Exciting. "Unlock full access", "Don't miss out."
- "video_start": Curiosity. "Check this out."

STYLE GUIDE:
- Modern, concise, punchy (Twitter/X style).
- Encouraging tone with light urgency.
- Max 1 emoji per title.
- No repetition across notifications.

OUTPUT RULES:
- Create 1 to 3 notifications total, even if events are many.
- Pick the highest-priority or most impactful events.
- Return ONLY a valid JSON array following the schema provided.
- No Markdown. No extra text."#;

pub fn response_schema() -> JsonValue {
    let draft_types: Vec<&str> = DraftType::ALL.iter().map(|t| t.as_str()).collect();

    json!({
        "type": "ARRAY",
        "minItems": 1,
        "maxItems": 3,
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "title": { "type": "STRING" },
                "body": { "type": "STRING" },
                "sendNow": { "type": "BOOLEAN" },
                "type": { "type": "STRING", "enum": draft_types }
            },
            "required": ["id", "title", "body", "sendNow", "type"]
        }
    })
}

pub fn user_message(payload_json: &str, mode: PayloadMode) -> String {
    match mode {
        PayloadMode::Events => format!("Events to Notify: {}", payload_json),
        PayloadMode::Snapshot => format!("Learner Activity: {}", payload_json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_every_draft_field() {
        let schema = response_schema();
        let required = schema["items"]["required"]
            .as_array()
            .expect("required list");

        assert_eq!(required.len(), 5);
        assert_eq!(
            schema["items"]["properties"]["type"]["enum"],
            json!(["milestone", "reminder", "alert", "promotion", "engagement"])
        );
    }

    #[test]
    fn user_message_labels_payload_by_mode() {
        assert_eq!(user_message("[]", PayloadMode::Events), "Events to Notify: []");
        assert!(user_message("{}", PayloadMode::Snapshot).starts_with("Learner Activity:"));
    }
}
