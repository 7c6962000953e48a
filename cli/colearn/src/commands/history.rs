//! History command: print journaled lifecycle events for a session.

use anyhow::Result;
use clap::Args;

use crate::config::Paths;
use crate::lifecycle;
use crate::router::SyncContext;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Session to show (defaults to the active session).
    pub session_id: Option<String>,
}

pub fn run(ctx: &SyncContext, paths: &Paths, args: HistoryArgs) -> Result<()> {
    let session_id = args.session_id.as_deref().unwrap_or(&ctx.session_id);
    let events = lifecycle::read_session(&paths.lifecycle, session_id);
    println!("{}", serde_json::to_string_pretty(&events)?);
    Ok(())
}
