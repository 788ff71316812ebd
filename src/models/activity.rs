use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentActivity {
    pub count: u32,
    pub course_id: i64,
    pub course_name: String,
    pub last_visited_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoActivity {
    pub completion: u32,
    pub last_watched_at: i64,
    pub video_id: i64,
    pub video_name: String,
}

/// Per-request view of a learner's payment page visits and video progress.
///
/// Both mappings are keyed by an opaque client key and iterate in the order
/// the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerActivitySnapshot {
    pub payments: IndexMap<String, PaymentActivity>,
    pub videos: IndexMap<String, VideoActivity>,
}
