//! Watch command implementation
//!
//! Full-screen live view: every account's code redrawn at each 30-second
//! boundary, with a once-a-second countdown bar in between. Ctrl-C stops
//! the scheduler, waits for its task to end, and saves state on the way
//! out.

use std::io::{self, Write};

use chrono::Local;
use colored::Colorize;
use keyfob_core::error::KeyfobError;
use keyfob_core::otp::STEP_SECS;
use keyfob_core::persist::{self, PersistedState};
use keyfob_core::scheduler::{AccountCode, RefreshScheduler, SchedulerEvent};
use keyfob_core::store::{CredentialStore, SharedStore};
use tracing::info;

/// Countdown bar width: one cell per second of the window
const BAR_WIDTH: usize = 30;

/// Run the watch command
pub async fn run_watch() -> Result<(), KeyfobError> {
    let path = persist::default_store_path()?;
    let state = super::load_state_or_empty(&path)?;
    let store = SharedStore::new(CredentialStore::from_accounts(state.accounts.clone()));

    let (handle, mut events) = RefreshScheduler::new(store.clone()).start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            maybe_event = events.recv() => match maybe_event {
                Some(SchedulerEvent::Refresh(codes)) => render_refresh(&codes),
                Some(SchedulerEvent::Countdown { fraction }) => render_countdown(fraction),
                None => break,
            },

            _ = &mut ctrl_c => break,
        }
    }

    // Both timers must be gone before the final save
    handle.shutdown().await;

    let final_state = PersistedState {
        accounts: store.to_accounts(),
        width: state.width,
        height: state.height,
    };
    persist::save(&path, &final_state)?;

    println!();
    info!("Watch session ended, state saved");
    Ok(())
}

/// Redraw the whole view with a fresh batch of codes
fn render_refresh(codes: &[AccountCode]) {
    // Clear screen and home the cursor, watch(1) style
    print!("\x1b[2J\x1b[H");
    println!(
        "{}",
        format!("keyfob  {}  (Ctrl-C to quit)", Local::now().format("%H:%M:%S")).dimmed()
    );
    println!();

    if codes.is_empty() {
        println!("  No accounts yet. Add one with 'keyfob add <name> <secret>'.");
    }

    for entry in codes {
        match &entry.code {
            Ok(code) => println!("  {}  {}", code.grouped().bold(), entry.name),
            Err(_) => println!("  {}  {}", "invalid".red(), entry.name),
        }
    }

    println!();
}

/// Redraw the countdown bar in place
fn render_countdown(fraction: f64) {
    let filled = ((fraction * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let seconds_left = (fraction * STEP_SECS as f64).ceil() as u32;

    print!(
        "\r  [{}{}] {:>2}s ",
        "=".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        seconds_left
    );
    let _ = io::stdout().flush();
}
