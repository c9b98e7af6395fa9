//! Post-commit booking events.
//!
//! Read-side caches of availability subscribe to these. An event is only
//! published after the transaction that produced it has committed, so a
//! subscriber never sees a change that was later rolled back.

use std::sync::mpsc::Sender;
use std::sync::Mutex;

use serde::Serialize;

use crate::booking::BookingId;
use crate::interval::StayInterval;
use crate::room::RoomId;

/// What happened to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A booking was created.
    Created,
    /// A booking's interval or guest changed.
    Updated,
    /// A pending booking was confirmed.
    Confirmed,
    /// A booking was cancelled.
    Cancelled,
    /// A booking was soft-deleted.
    SoftDeleted,
    /// A soft-deleted booking was restored.
    Restored,
    /// A booking was removed for good.
    Purged,
}

/// Signals that availability of `room_id` during `interval` may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingEvent {
    /// What happened.
    pub kind: EventKind,
    /// The affected room.
    pub room_id: RoomId,
    /// The affected booking.
    pub booking_id: BookingId,
    /// The nights whose availability changed.
    pub interval: StayInterval,
}

/// Receives booking events after commit.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink: Send + Sync {
    /// Handles one event. Must not fail the operation that produced it.
    fn publish(&self, event: &BookingEvent);
}

/// Drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: &BookingEvent) {}
}

/// Writes each event as an info-level log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &BookingEvent) {
        log::info!(
            "booking {} {:?} on room {} for {}",
            event.booking_id,
            event.kind,
            event.room_id,
            event.interval
        );
    }
}

/// Forwards events to an `mpsc` channel.
///
/// A disconnected receiver is logged and otherwise ignored.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Mutex<Sender<BookingEvent>>,
}

impl ChannelSink {
    /// Wraps the sending half of a channel.
    #[must_use]
    pub const fn new(sender: Sender<BookingEvent>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl EventSink for ChannelSink {
    fn publish(&self, event: &BookingEvent) {
        let Ok(sender) = self.sender.lock() else {
            log::warn!("event channel poisoned; dropping {:?}", event.kind);
            return;
        };
        if sender.send(*event).is_err() {
            log::debug!("event receiver gone; dropping {:?}", event.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::mpsc;

    fn event(kind: EventKind) -> BookingEvent {
        let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        BookingEvent {
            kind,
            room_id: RoomId::from(1),
            booking_id: BookingId::from(9),
            interval: StayInterval::new(d(1), d(4)).unwrap(),
        }
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (tx, rx) = mpsc::channel();
        let sink = ChannelSink::new(tx);

        sink.publish(&event(EventKind::Created));
        sink.publish(&event(EventKind::Cancelled));

        assert_eq!(rx.recv().unwrap().kind, EventKind::Created);
        assert_eq!(rx.recv().unwrap().kind, EventKind::Cancelled);
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelSink::new(tx).publish(&event(EventKind::Purged));
    }

    #[test]
    fn test_event_serializes_kind_snake_case() {
        let json = serde_json::to_string(&event(EventKind::SoftDeleted)).unwrap();
        assert!(json.contains("\"soft_deleted\""));
        assert!(json.contains("\"booking_id\":9"));
    }
}
