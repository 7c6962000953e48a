//! Assign command (coach sends an exercise).

use anyhow::Result;
use clap::Args;
use colearn_bus::Topic;
use colearn_events::EventType;
use serde_json::json;

use super::deliver;
use crate::router::SyncContext;

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Topic the exercise drills.
    pub topic: String,

    /// Exercise statement.
    pub exercise: String,

    /// Test names the submission should pass (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub tests: Vec<String>,
}

pub async fn run(ctx: &SyncContext, args: AssignArgs) -> Result<()> {
    let event = ctx.build_event(
        EventType::ExerciseAssigned,
        json!({
            "topic": args.topic,
            "exercise": args.exercise,
            "tests": args.tests,
        }),
    );
    deliver(ctx, Topic::Assignments, &event).await?;

    let ack = ctx.build_event(EventType::ExerciseAssignedAck, json!({ "status": "sent" }));
    deliver(ctx, Topic::Events, &ack).await?;

    println!("assignment sent");
    Ok(())
}
