/*!
 * Debounce scheduler.
 *
 * Owns at most one armed timer. Arming always aborts the previous timer
 * first, so only the most recent edit survives the quiet period. When the
 * timer expires it posts a ticketed event to the owner's channel; the
 * owner hands the ticket back through [`DebounceScheduler::accept`] and
 * anything but the current ticket is ignored.
 */

use log::debug;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Default quiet period before a transformation request fires
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

#[derive(Debug)]
struct ArmedTimer {
    ticket: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug)]
pub struct DebounceScheduler<E> {
    quiet_period: Duration,
    sender: UnboundedSender<E>,
    make_event: fn(u64) -> E,
    armed: Option<ArmedTimer>,
    next_ticket: u64,
}

impl<E: Send + 'static> DebounceScheduler<E> {
    pub fn new(quiet_period: Duration, sender: UnboundedSender<E>, make_event: fn(u64) -> E) -> Self {
        Self {
            quiet_period,
            sender,
            make_event,
            armed: None,
            next_ticket: 0,
        }
    }

    /// Cancel any pending timer and start a new one. Returns its ticket.
    pub fn arm(&mut self) -> u64 {
        self.cancel();

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let delay = self.quiet_period;
        let deadline = Instant::now() + delay;
        let sender = self.sender.clone();
        let event = (self.make_event)(ticket);

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // The owner may be gone already
            let _ = sender.send(event);
        });

        debug!("Armed debounce timer #{} ({} ms)", ticket, delay.as_millis());
        self.armed = Some(ArmedTimer { ticket, handle });
        ticket
    }

    /// Abort the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.armed.take() {
            Some(timer) => {
                timer.handle.abort();
                debug!("Cancelled debounce timer #{}", timer.ticket);
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Claim an expiry event. Only the currently armed ticket is accepted.
    pub fn accept(&mut self, ticket: u64) -> bool {
        match &self.armed {
            Some(timer) if timer.ticket == ticket => {
                self.armed = None;
                true
            }
            _ => {
                debug!("Ignoring expired debounce ticket #{}", ticket);
                false
            }
        }
    }
}

impl<E> Drop for DebounceScheduler<E> {
    fn drop(&mut self) {
        if let Some(timer) = self.armed.take() {
            timer.handle.abort();
        }
    }
}
