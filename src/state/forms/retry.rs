//! Delayed resubmission
//!
//! A progress reply asks the client to try again later. The scheduler turns
//! that into a timer task which, unless cancelled, posts a `FormEvent` back
//! to whichever loop owns the form. Every timer hangs off the scheduler's
//! lifecycle token, so dropping the scheduler (and with it the form) cancels
//! anything still pending.

use super::form_state::SubmitEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Events the form asks its owner to process later
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    /// Run `submit` again with the original triggering event
    Resubmit(SubmitEvent),
}

pub struct RetryScheduler {
    events: mpsc::UnboundedSender<FormEvent>,
    lifecycle: CancellationToken,
}

impl RetryScheduler {
    /// Create a scheduler and the receiving end its events arrive on
    pub fn new() -> (Self, mpsc::UnboundedReceiver<FormEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            events,
            lifecycle: CancellationToken::new(),
        };
        (scheduler, receiver)
    }

    /// Post `Resubmit(event)` after `delay` unless cancelled first
    pub fn schedule(&self, event: SubmitEvent, delay: Duration) -> RetryHandle {
        let token = self.lifecycle.child_token();
        let cancelled = token.clone();
        let events = self.events.clone();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!("Pending resubmit cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if events.send(FormEvent::Resubmit(event)).is_err() {
                        debug!("Form event receiver dropped, resubmit discarded");
                    }
                }
            }
        });

        RetryHandle { token, task }
    }

    /// Cancel every pending timer created by this scheduler
    pub fn shutdown(&self) {
        self.lifecycle.cancel();
    }
}

impl Drop for RetryScheduler {
    fn drop(&mut self) {
        self.lifecycle.cancel();
    }
}

/// Cancellation handle for one scheduled resubmit
#[derive(Debug)]
pub struct RetryHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RetryHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the timer fired or observed its cancellation
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
