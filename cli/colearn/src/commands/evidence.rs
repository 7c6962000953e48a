//! Evidence commands: share a snapshot, or request one from the other side.

use anyhow::Result;
use clap::Args;
use colearn_bus::Topic;
use colearn_events::EventType;
use serde_json::json;

use super::deliver;
use crate::router::SyncContext;

#[derive(Debug, Args)]
pub struct EvidenceArgs {
    /// Path being shared.
    pub path: String,

    /// Free-form note attached to the snapshot.
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(Debug, Args)]
pub struct RequestEvidenceArgs {
    /// Path the other side should share.
    pub path: String,

    /// Why the evidence is needed.
    #[arg(long, default_value = "")]
    pub reason: String,
}

pub async fn run_snapshot(ctx: &SyncContext, args: EvidenceArgs) -> Result<()> {
    let event = ctx.build_event(
        EventType::EvidenceSnapshot,
        json!({ "path": args.path, "note": args.note }),
    );
    deliver(ctx, Topic::Progress, &event).await?;

    println!("evidence snapshot sent");
    Ok(())
}

pub async fn run_request(ctx: &SyncContext, args: RequestEvidenceArgs) -> Result<()> {
    let event = ctx.build_event(
        EventType::EvidenceRequest,
        json!({ "path": args.path, "reason": args.reason }),
    );
    deliver(ctx, Topic::Assignments, &event).await?;

    println!("evidence request sent");
    Ok(())
}
