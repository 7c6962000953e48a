//! Lifecycle command: journal a stage locally and announce it on the bus.

use anyhow::Result;
use clap::Args;
use colearn_bus::Topic;
use colearn_events::EventType;
use serde_json::json;

use super::deliver;
use crate::config::Paths;
use crate::lifecycle::{self, LifecycleEvent, Stage};
use crate::router::SyncContext;

#[derive(Debug, Args)]
pub struct LifecycleArgs {
    /// Stage the session has reached.
    #[arg(value_enum)]
    pub stage: Stage,
}

pub async fn run(ctx: &SyncContext, paths: &Paths, args: LifecycleArgs) -> Result<()> {
    lifecycle::append(
        &paths.lifecycle,
        &LifecycleEvent::now(&ctx.session_id, args.stage),
    )?;

    let event = ctx.build_event(
        EventType::Lifecycle,
        json!({ "stage": args.stage.to_string() }),
    );
    deliver(ctx, Topic::Events, &event).await?;

    println!("lifecycle: {}", args.stage);
    Ok(())
}
