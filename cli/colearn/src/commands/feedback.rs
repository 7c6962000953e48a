//! Feedback command (coach grades a submission).

use anyhow::Result;
use clap::Args;
use colearn_bus::Topic;
use colearn_events::EventType;
use serde_json::json;

use super::deliver;
use crate::router::SyncContext;

#[derive(Debug, Args)]
pub struct FeedbackArgs {
    /// Grade for the submission (e.g. pass, revise).
    pub grade: String,

    /// Observed mistakes (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub mistakes: Vec<String>,

    /// Suggested next step for the student.
    #[arg(long, default_value = "")]
    pub next_step: String,

    /// Confidence adjustment applied to every tracked topic, clamped to
    /// [0, 1] on the receiving side.
    #[arg(long, default_value_t = 0.0)]
    pub confidence_delta: f64,
}

pub async fn run(ctx: &SyncContext, args: FeedbackArgs) -> Result<()> {
    let event = ctx.build_event(
        EventType::AssessmentFeedback,
        json!({
            "grade": args.grade,
            "mistakes": args.mistakes,
            "next_step": args.next_step,
            "confidence_delta": args.confidence_delta,
        }),
    );
    deliver(ctx, Topic::Feedback, &event).await?;

    let ack = ctx.build_event(EventType::AssessmentFeedbackAck, json!({ "status": "sent" }));
    deliver(ctx, Topic::Events, &ack).await?;

    println!("feedback sent");
    Ok(())
}
