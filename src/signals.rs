use tracing::debug;

use crate::models::{
    activity::{LearnerActivitySnapshot, PaymentActivity, VideoActivity},
    event::{Event, EventType, Priority},
};

pub const DEFAULT_MILESTONE_THRESHOLD: u32 = 95;

const PAYMENT_ACTION: &str = "Offer a discount or nudge to complete purchase.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionPolicy {
    /// Completion at or above this percentage counts as a finished video.
    pub milestone_threshold: u32,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            milestone_threshold: DEFAULT_MILESTONE_THRESHOLD,
        }
    }
}

/// Derives notification-worthy events from a learner snapshot.
///
/// At most one payment event leads, followed by exactly one event per video
/// in the order the client listed them.
pub fn extract_events(snapshot: &LearnerActivitySnapshot, policy: &ExtractionPolicy) -> Vec<Event> {
    let mut events = Vec::with_capacity(snapshot.videos.len() + 1);

    if let Some(payment) = strongest_payment(snapshot) {
        events.push(payment_event(payment));
    }

    events.extend(
        snapshot
            .videos
            .values()
            .map(|video| video_event(video, policy)),
    );

    debug!(
        payments = snapshot.payments.len(),
        videos = snapshot.videos.len(),
        events = events.len(),
        "Extracted learner events"
    );

    events
}

// Highest visit count wins; the earliest entry wins a tie.
fn strongest_payment(snapshot: &LearnerActivitySnapshot) -> Option<&PaymentActivity> {
    snapshot
        .payments
        .values()
        .fold(None, |best: Option<&PaymentActivity>, candidate| match best {
            Some(current) if current.count >= candidate.count => Some(current),
            _ => Some(candidate),
        })
}

fn payment_event(payment: &PaymentActivity) -> Event {
    Event::new(
        EventType::PaymentPromotion,
        format!(
            "User visited payment page for {} {} times.",
            payment.course_name, payment.count
        ),
        Priority::Urgent,
    )
    .with_recommended_action(PAYMENT_ACTION)
}

fn video_event(video: &VideoActivity, policy: &ExtractionPolicy) -> Event {
    match video.completion {
        0 => Event::new(
            EventType::VideoStart,
            format!("Has not started {} yet.", video.video_name),
            Priority::Low,
        ),
        c if c < policy.milestone_threshold => Event::new(
            EventType::VideoResume,
            format!("Stopped watching {} at {}%.", video.video_name, c),
            Priority::High,
        ),
        _ => Event::new(
            EventType::VideoMilestone,
            format!("Finished watching {}.", video.video_name),
            Priority::Medium,
        ),
    }
}
