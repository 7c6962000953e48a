//! Submit command (student answers an assigned exercise).

use anyhow::Result;
use clap::Args;
use colearn_bus::Topic;
use colearn_events::EventType;
use serde_json::json;

use super::deliver;
use crate::router::SyncContext;

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Id of the exercise being answered.
    pub exercise_id: String,

    /// The response text.
    pub response: String,
}

pub async fn run(ctx: &SyncContext, args: SubmitArgs) -> Result<()> {
    let event = ctx.build_event(
        EventType::ExerciseSubmission,
        json!({
            "exercise_id": args.exercise_id,
            "response": args.response,
        }),
    );
    deliver(ctx, Topic::Progress, &event).await?;

    let ack = ctx.build_event(EventType::ExerciseSubmissionAck, json!({ "status": "sent" }));
    deliver(ctx, Topic::Events, &ack).await?;

    println!("submission sent");
    Ok(())
}
