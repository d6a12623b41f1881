//! Refresh scheduling
//!
//! Drives the two recurring jobs behind the live view from one task: a
//! wall-clock-aligned refresh that regenerates every account's code at
//! each 30-second boundary, and a ~1 Hz countdown tick that animates the
//! remaining-time indicator between refreshes.
//!
//! Both timers are one-shot sleeps rescheduled after every firing, and
//! both are arms of a single `select!` loop. Countdown state therefore
//! needs no locking, and shutdown is a plain `break` that silences both
//! timers at once.

pub mod clock;
pub mod countdown;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::error::OtpError;
use crate::otp;
use crate::store::SharedStore;
use crate::types::Code;

use countdown::CountdownState;

/// One account's entry in a refresh event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountCode {
    pub name: String,
    /// Generation outcome; an account whose secret no longer decodes
    /// carries its error here instead of poisoning the whole batch
    pub code: Result<Code, OtpError>,
}

/// Events emitted by a running scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    /// Fresh codes for every account, in name order
    Refresh(Vec<AccountCode>),

    /// Countdown update; `fraction` is the share of the current window
    /// still remaining, in `[0, 1]`
    Countdown { fraction: f64 },
}

/// Commands accepted by a running scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Regenerate codes now, outside the normal cadence
    RefreshNow,

    /// Stop both timers and end the task
    Shutdown,
}

/// Control handle for a running scheduler
pub struct SchedulerHandle {
    command_tx: mpsc::UnboundedSender<SchedulerCommand>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Request an immediate out-of-cadence refresh
    pub fn refresh_now(&self) {
        let _ = self.command_tx.send(SchedulerCommand::RefreshNow);
    }

    /// Stop the scheduler and wait for its task to finish
    ///
    /// Returns only once both timers are gone, so a state save performed
    /// afterwards cannot race a concurrent refresh pass.
    pub async fn shutdown(self) {
        let _ = self.command_tx.send(SchedulerCommand::Shutdown);
        let _ = self.task.await;
    }
}

/// Epoch-aligned refresh scheduler over a shared credential store
pub struct RefreshScheduler {
    store: SharedStore,
}

impl RefreshScheduler {
    /// Create a scheduler reading from `store`
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Start the scheduler as a background tokio task
    ///
    /// An initial `Refresh` and `Countdown` are emitted immediately so
    /// subscribers have something to show before the first boundary.
    /// The task ends on [`SchedulerHandle::shutdown`] or when the
    /// returned receiver is dropped.
    pub fn start(self) -> (SchedulerHandle, mpsc::UnboundedReceiver<SchedulerEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(self.store, event_tx, command_rx));

        (SchedulerHandle { command_tx, task }, event_rx)
    }
}

async fn run(
    store: SharedStore,
    event_tx: mpsc::UnboundedSender<SchedulerEvent>,
    mut command_rx: mpsc::UnboundedReceiver<SchedulerCommand>,
) {
    let mut state = CountdownState::primed(clock::unix_now());

    // Subscribers render from these instead of waiting out the first interval
    if !emit_refresh(&store, &event_tx) {
        return;
    }
    let initial = SchedulerEvent::Countdown {
        fraction: state.fraction(),
    };
    if event_tx.send(initial).is_err() {
        return;
    }

    let refresh = sleep_until(Instant::now() + clock::until_next_refresh(clock::unix_now()));
    let tick = sleep_until(Instant::now() + clock::until_next_countdown_tick(clock::unix_now()));
    tokio::pin!(refresh);
    tokio::pin!(tick);

    loop {
        tokio::select! {
            () = &mut refresh => {
                if !emit_refresh(&store, &event_tx) {
                    break;
                }
                state.arm_reset();
                refresh
                    .as_mut()
                    .reset(Instant::now() + clock::until_next_refresh(clock::unix_now()));
            }

            () = &mut tick => {
                let fraction = state.tick(clock::unix_now());
                if event_tx.send(SchedulerEvent::Countdown { fraction }).is_err() {
                    break;
                }
                tick.as_mut()
                    .reset(Instant::now() + clock::until_next_countdown_tick(clock::unix_now()));
            }

            cmd = command_rx.recv() => {
                match cmd {
                    Some(SchedulerCommand::RefreshNow) => {
                        if !emit_refresh(&store, &event_tx) {
                            break;
                        }
                    }
                    Some(SchedulerCommand::Shutdown) | None => {
                        debug!("Scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// Generate codes for every stored account and emit one `Refresh`
///
/// Returns false when the event receiver is gone, which ends the loop.
fn emit_refresh(store: &SharedStore, event_tx: &mpsc::UnboundedSender<SchedulerEvent>) -> bool {
    let accounts = store.list();
    let mut codes = Vec::with_capacity(accounts.len());

    for account in accounts {
        let code = otp::totp(&account.secret, None);
        if let Err(ref err) = code {
            warn!(account = %account.name, error = %err, "Skipping code for unusable secret");
        }
        codes.push(AccountCode {
            name: account.name,
            code,
        });
    }

    debug!(accounts = codes.len(), "Refresh pass complete");
    event_tx.send(SchedulerEvent::Refresh(codes)).is_ok()
}
