use clap::Args;
use focuscycle_core::timer::lock_session;
use focuscycle_core::{Config, NewCycle, Poller, PollerExit, Presenter, SystemClock, TimerSession};
use tracing::{info, warn};

use super::{intake, runtime};
use crate::output::{print_event, print_history, TerminalPresenter};

#[derive(Args)]
pub struct RunArgs {
    /// Task to work on
    #[arg(long, short)]
    pub task: String,
    /// Cycle length in minutes, 1-60 (default: timer.default_minutes)
    #[arg(long, short, value_parser = clap::value_parser!(i64).range(1..=60))]
    pub minutes: Option<i64>,
    /// Stream events and print history as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let minutes = args
        .minutes
        .unwrap_or_else(|| i64::from(config.timer.default_minutes));
    let intake = intake(&args.task, minutes)?;

    runtime()?.block_on(countdown(intake, config, args.json))
}

async fn countdown(
    intake: NewCycle,
    config: Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TimerSession::new(SystemClock);
    let mut presenter = TerminalPresenter::countdown(json, config.ui.terminal_title);
    for event in session.start_validated(intake)? {
        presenter.on_event(&event);
    }

    let session = session.shared();
    let mut poller = Poller::spawn(session.clone(), config.poller_config(), presenter);

    let interrupted = tokio::select! {
        _ = poller.wait() => false,
        signal = tokio::signal::ctrl_c() => is_user_interrupt(signal),
    };
    if interrupted {
        info!("interrupt requested");
        if let Some(event) = poller.interrupt().await {
            print_event(&event, json);
        }
    }

    let exit = poller.wait().await;
    if exit == PollerExit::Cancelled {
        return Err("countdown stopped unexpectedly".into());
    }

    let rows = lock_session(&session).history();
    print_history(&rows, json)?;
    Ok(())
}

/// Only a delivered Ctrl-C interrupts; without a handler the countdown runs on.
fn is_user_interrupt(signal: std::io::Result<()>) -> bool {
    match signal {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "could not listen for Ctrl-C");
            false
        }
    }
}
