//! Agenda reminders.
//!
//! [`ReminderTracker::check`] is a pure function of the event list and a
//! clock reading; [`ReminderScheduler`] drives it on a background thread.
//! Fired reminders are tracked in memory only, so a restart re-notifies.
//! That is the intended contract.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::AgendaEvent;

/// How often the scheduler re-checks the event list.
pub const CHECK_INTERVAL: StdDuration = StdDuration::from_secs(30);

/// Fired keys older than this are dropped from the tracking set.
const PRUNE_HORIZON_HOURS: i64 = 24;

/// The one-minute window inside which a due notification fires.
const FIRE_WINDOW: Duration = Duration::minutes(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    /// `minutes` before the event starts.
    Lead { minutes: i64 },
    /// The event is starting now.
    Start,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub event_id: Uuid,
    pub title: String,
    pub kind: ReminderKind,
    pub starts_at: DateTime<Utc>,
}

/// Remembers which (event, offset) pairs already fired so every
/// notification is delivered at most once per process.
#[derive(Debug, Default)]
pub struct ReminderTracker {
    fired: HashSet<String>,
}

impl ReminderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `events` against `now`, returning the reminders that became
    /// due since the last call. Events without a positive lead never fire.
    pub fn check(&mut self, events: &[AgendaEvent], now: DateTime<Utc>) -> Vec<Reminder> {
        self.prune(events, now);

        let mut due = Vec::new();
        for event in events {
            if !event.active || event.reminder_minutes <= 0 {
                continue;
            }
            let lead = event.reminder_minutes;
            let lead_opens = event.starts_at - Duration::minutes(lead);
            if now >= lead_opens && now < lead_opens + FIRE_WINDOW {
                let key = format!("{}-{lead}", event.id);
                if self.fired.insert(key) {
                    due.push(Reminder {
                        event_id: event.id,
                        title: event.title.clone(),
                        kind: ReminderKind::Lead { minutes: lead },
                        starts_at: event.starts_at,
                    });
                }
            }
            if now >= event.starts_at && now < event.starts_at + FIRE_WINDOW {
                let key = format!("{}-start", event.id);
                if self.fired.insert(key) {
                    due.push(Reminder {
                        event_id: event.id,
                        title: event.title.clone(),
                        kind: ReminderKind::Start,
                        starts_at: event.starts_at,
                    });
                }
            }
        }
        due
    }

    /// Drops keys for events that no longer exist or started more than the
    /// prune horizon ago.
    fn prune(&mut self, events: &[AgendaEvent], now: DateTime<Utc>) {
        let horizon = now - Duration::hours(PRUNE_HORIZON_HOURS);
        let live: Vec<String> = events
            .iter()
            .filter(|event| event.starts_at >= horizon)
            .map(|event| event.id.to_string())
            .collect();
        self.fired
            .retain(|key| live.iter().any(|id| key.starts_with(id.as_str())));
    }

    #[cfg(test)]
    fn fired_count(&self) -> usize {
        self.fired.len()
    }
}

/// Background thread that runs the tracker on a fixed interval and pushes
/// due reminders into an `mpsc` channel. Disabling stops the thread but
/// keeps the tracking set, so re-enabling does not re-fire.
pub struct ReminderScheduler {
    events: Arc<Mutex<Vec<AgendaEvent>>>,
    tracker: Arc<Mutex<ReminderTracker>>,
    sender: Sender<Reminder>,
    interval: StdDuration,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    pub fn new() -> (Self, Receiver<Reminder>) {
        Self::with_interval(CHECK_INTERVAL)
    }

    /// Same scheduler with a custom check interval, used by tests.
    pub fn with_interval(interval: StdDuration) -> (Self, Receiver<Reminder>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                events: Arc::new(Mutex::new(Vec::new())),
                tracker: Arc::new(Mutex::new(ReminderTracker::new())),
                sender,
                interval,
                stop: None,
                handle: None,
            },
            receiver,
        )
    }

    /// Replaces the event list the background thread watches.
    pub fn set_events(&self, events: Vec<AgendaEvent>) {
        if let Ok(mut guard) = self.events.lock() {
            *guard = events;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    pub fn enable(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let events = Arc::clone(&self.events);
        let tracker = Arc::clone(&self.tracker);
        let sender = self.sender.clone();
        let interval = self.interval;

        let handle = std::thread::spawn(move || loop {
            {
                let due = match (events.lock(), tracker.lock()) {
                    (Ok(events), Ok(mut tracker)) => tracker.check(&events, Utc::now()),
                    _ => Vec::new(),
                };
                for reminder in due {
                    if sender.send(reminder).is_err() {
                        return;
                    }
                }
            }
            // recv_timeout doubles as the interval sleep and the stop
            // signal: a send or a disconnected sender ends the loop.
            match stop_rx.recv_timeout(interval) {
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                _ => return,
            }
        });

        self.stop = Some(stop_tx);
        self.handle = Some(handle);
        tracing::debug!("reminder scheduler enabled");
    }

    pub fn disable(&mut self) {
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            tracing::debug!("reminder scheduler disabled");
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.disable();
    }
}
