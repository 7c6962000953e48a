//! CLI commands.

mod assign;
mod evidence;
mod feedback;
mod history;
mod lifecycle;
mod progress;
mod submit;
mod sync;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colearn_bus::{PublishOutcome, Topic};
use colearn_events::{Actor, EventEnvelope};

use crate::config::{self, Backend, Paths};
use crate::router::SyncContext;
use crate::scope;

/// colearn - coach/student learning sync over a shared message bus.
#[derive(Debug, Parser)]
#[command(name = "colearn")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Acting role for this invocation.
    #[arg(long, global = true, env = "COLEARN_ROLE", default_value = "student", value_parser = parse_actor)]
    role: Actor,

    /// Session id correlating this invocation's events (generated if omitted).
    #[arg(long, global = true, env = "COLEARN_SESSION")]
    session: Option<String>,

    /// Student id this invocation acts for or targets (generated if omitted).
    #[arg(long, global = true, env = "COLEARN_STUDENT")]
    student: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send an exercise assignment (coach side).
    Assign(assign::AssignArgs),

    /// Submit a response to an assigned exercise (student side).
    Submit(submit::SubmitArgs),

    /// Send assessment feedback for a submission (coach side).
    Feedback(feedback::FeedbackArgs),

    /// Publish an evidence snapshot of a path in the working tree.
    Evidence(evidence::EvidenceArgs),

    /// Ask the other side for an evidence snapshot.
    RequestEvidence(evidence::RequestEvidenceArgs),

    /// Pull new events for the active session and apply them locally.
    Sync,

    /// Record a lifecycle stage for the active session.
    Lifecycle(lifecycle::LifecycleArgs),

    /// Show journaled lifecycle events for a session.
    History(history::HistoryArgs),

    /// Show the local learning state.
    Progress,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let paths = Paths::from_env();
        let bus = config::make_bus(Backend::from_env(), &paths.bus_root);

        let mut ctx = SyncContext::new(
            bus,
            self.role,
            self.session.unwrap_or_else(config::default_session_id),
            self.student.unwrap_or_else(config::default_student_id),
            paths.state.clone(),
            scope::scope_root(),
        );

        match self.command {
            Commands::Assign(args) => assign::run(&ctx, args).await,
            Commands::Submit(args) => submit::run(&ctx, args).await,
            Commands::Feedback(args) => feedback::run(&ctx, args).await,
            Commands::Evidence(args) => evidence::run_snapshot(&ctx, args).await,
            Commands::RequestEvidence(args) => evidence::run_request(&ctx, args).await,
            Commands::Sync => sync::run(&mut ctx).await,
            Commands::Lifecycle(args) => lifecycle::run(&ctx, &paths, args).await,
            Commands::History(args) => history::run(&ctx, &paths, args),
            Commands::Progress => progress::run(&paths),
        }
    }
}

/// Publishes through the validating router wrapper, surfacing rejection as
/// a command failure instead of a silent drop.
async fn deliver(ctx: &SyncContext, topic: Topic, event: &EventEnvelope) -> Result<()> {
    match ctx.publish(topic, event).await? {
        PublishOutcome::Delivered => Ok(()),
        PublishOutcome::Rejected(reason) => bail!("event rejected: {reason}"),
    }
}

fn parse_actor(raw: &str) -> Result<Actor, String> {
    match raw {
        "coach" => Ok(Actor::Coach),
        "student" => Ok(Actor::Student),
        other => Err(format!("unknown role: {other} (expected coach or student)")),
    }
}
