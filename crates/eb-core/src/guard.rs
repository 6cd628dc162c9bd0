//! # Rate/Duplicate Guard
//!
//! Per-IP memory of the last accepted post. Decisions are taken under the
//! map's entry lock, so two racing requests from one client cannot both pass.
//!
//! A successful check hands out a [`Reservation`]. The new "last post" is
//! visible to other requests immediately; dropping the reservation without
//! [`Reservation::commit`] puts the previous state back. This lets the handler
//! reject a post later (banned word, storage failure) without leaving the
//! client locked out by a post that never landed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    /// Posted again before the interval elapsed
    RateLimited { retry_after: Duration },
    /// Identical to this client's previous accepted message
    Duplicate,
}

#[derive(Debug, Clone)]
struct LastPost {
    at: Instant,
    message: String,
    ticket: u64,
}

pub struct RateGuard {
    interval: Duration,
    last: DashMap<String, LastPost>,
    next_ticket: AtomicU64,
}

impl RateGuard {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: DashMap::new(),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Checks `message` from `ip` and records it on acceptance.
    pub fn check_and_record(&self, ip: &str, message: &str, now: Instant) -> Decision {
        match self.try_reserve(ip, message, now) {
            Ok(reservation) => {
                reservation.commit();
                Decision::Accept
            }
            Err(rejected) => rejected,
        }
    }

    /// Checks `message` from `ip` and tentatively records it.
    ///
    /// Rate limiting is evaluated before duplicate detection. On rejection the
    /// stored state is untouched and the returned value is the rejecting
    /// [`Decision`].
    pub fn try_reserve(
        &self,
        ip: &str,
        message: &str,
        now: Instant,
    ) -> Result<Reservation<'_>, Decision> {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let record = LastPost {
            at: now,
            message: message.to_string(),
            ticket,
        };

        let previous = match self.last.entry(ip.to_string()) {
            Entry::Occupied(mut entry) => {
                let last = entry.get();
                let elapsed = now.saturating_duration_since(last.at);
                if elapsed < self.interval {
                    return Err(Decision::RateLimited {
                        retry_after: self.interval - elapsed,
                    });
                }
                if last.message == message {
                    return Err(Decision::Duplicate);
                }
                Some(entry.insert(record))
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
                None
            }
        };

        Ok(Reservation {
            guard: self,
            ip: ip.to_string(),
            ticket,
            previous,
            committed: false,
        })
    }

    fn release(&self, ip: &str, ticket: u64, previous: Option<LastPost>) {
        if let Entry::Occupied(mut entry) = self.last.entry(ip.to_string()) {
            // A later post from the same client already replaced ours.
            if entry.get().ticket != ticket {
                return;
            }
            match previous {
                Some(prev) => {
                    entry.insert(prev);
                }
                None => {
                    entry.remove();
                }
            }
        }
    }
}

/// Tentative acceptance held while the rest of the post pipeline runs.
#[must_use = "dropping a reservation without commit() rolls it back"]
pub struct Reservation<'a> {
    guard: &'a RateGuard,
    ip: String,
    ticket: u64,
    previous: Option<LastPost>,
    committed: bool,
}

impl Reservation<'_> {
    /// Makes the recorded post permanent.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.guard
                .release(&self.ip, self.ticket, self.previous.take());
        }
    }
}
