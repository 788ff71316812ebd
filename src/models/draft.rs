use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftType {
    Milestone,
    Reminder,
    Alert,
    Promotion,
    Engagement,
}

impl DraftType {
    pub const ALL: [DraftType; 5] = [
        DraftType::Milestone,
        DraftType::Reminder,
        DraftType::Alert,
        DraftType::Promotion,
        DraftType::Engagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftType::Milestone => "milestone",
            DraftType::Reminder => "reminder",
            DraftType::Alert => "alert",
            DraftType::Promotion => "promotion",
            DraftType::Engagement => "engagement",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub id: String,
    pub title: String,
    pub body: String,
    pub send_now: bool,

    #[serde(rename = "type")]
    pub draft_type: DraftType,
}
