//! Sync command: run one consumption cycle of the router.

use anyhow::Result;

use crate::router::SyncContext;

pub async fn run(ctx: &mut SyncContext) -> Result<()> {
    let lines = ctx.sync().await?;
    if lines.is_empty() {
        println!("nothing new");
        return Ok(());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
