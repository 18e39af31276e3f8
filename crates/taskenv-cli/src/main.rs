//! Reference driver for the task execution environment: reads action lines
//! from stdin, feeds them to one `Session`, and prints the observation for
//! each. Intended for manual poking and integration smoke tests, not as a
//! production harness (task-dataset loading and the planner itself are out
//! of scope — see spec.md §1).

use std::collections::HashMap;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use taskenv_core::{Config, TaskRecord};
use taskenv_runtime::LocalProcessRuntime;
use taskenv_session::{NoOpProvisioner, RepoSource, Session};

#[derive(Debug, Parser)]
#[command(name = "taskenv", about = "Drive a task execution environment session from stdin")]
struct Cli {
    /// Container image name. Ignored by the local-process stand-in, kept
    /// for parity with a real `ContainerRuntime`.
    #[arg(long, default_value = "local")]
    image: String,

    /// Local git mirror to clone from. If omitted, the repo is assumed to
    /// already be checked out in the container root.
    #[arg(long)]
    repo_mirror: Option<PathBuf>,

    #[arg(long)]
    base_commit: String,

    #[arg(long, default_value = "cli-task")]
    instance_id: String,

    #[arg(long, default_value = "local/repo")]
    repo_slug: String,

    #[arg(long, default_value = "")]
    problem_statement: String,

    /// Apply the task's test patch after reset (oracle mode).
    #[arg(long)]
    oracle: bool,

    /// Pause rather than remove the container on close.
    #[arg(long)]
    persistent: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    taskenv_core::init_tracing();
    let cli = Cli::parse();

    let runtime = Arc::new(LocalProcessRuntime::new());
    let session = Session::new(runtime, cli.image, Config::default(), cli.persistent);

    let task = TaskRecord {
        instance_id: cli.instance_id,
        repo_slug: cli.repo_slug,
        base_commit: cli.base_commit,
        problem_statement: cli.problem_statement,
        test_patch: None,
        version: None,
    };
    let repo_source = match cli.repo_mirror {
        Some(path) => RepoSource::LocalMirror(path),
        None => RepoSource::AlreadyPresent,
    };
    session
        .reset(task, repo_source, &HashMap::new(), &NoOpProvisioner, cli.oracle)
        .await?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let action = line.trim();
        if action.is_empty() {
            continue;
        }
        let outcome = session.step(action, None).await;
        println!("{}", outcome.observation);
        if outcome.done {
            if let Some(status) = &outcome.exit_status {
                println!("[exit_status: {status}]");
            }
            if let Some(patch) = &outcome.patch {
                println!("[patch]\n{patch}");
            }
            break;
        }
    }

    session.close().await?;
    Ok(())
}
