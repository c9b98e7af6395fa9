//! Optimistic locking of rooms across connections.

mod common;

use std::time::Duration;

use chrono::{DateTime, Utc};

use common::{add_room, day, guest, quiet_context, TestStore};
use staylock::engine::CreateOptions;
use staylock::{
    Booking, BookingCoordinator, BookingId, BookingStore, BookingTxn, Database, EngineContext,
    Error, NewRoom, Room, RoomChanges, RoomId, RoomStatus, RoomStore, RoomVersion,
    RoomVersionGuard,
};

/// A connection whose next locking transaction starts right after another
/// client deactivates `room`.
struct ClosingStore {
    inner: Database,
    closer: Database,
    room: Option<Room>,
}

impl RoomStore for ClosingStore {
    fn insert_room(&mut self, room: &NewRoom, now: DateTime<Utc>) -> staylock::Result<Room> {
        self.inner.insert_room(room, now)
    }

    fn find_room(&self, id: RoomId) -> staylock::Result<Option<Room>> {
        self.inner.find_room(id)
    }

    fn list_rooms(&self) -> staylock::Result<Vec<Room>> {
        self.inner.list_rooms()
    }

    fn compare_and_update_room(
        &mut self,
        id: RoomId,
        expected: RoomVersion,
        changes: &RoomChanges,
        now: DateTime<Utc>,
    ) -> staylock::Result<Option<Room>> {
        self.inner.compare_and_update_room(id, expected, changes, now)
    }

    fn compare_and_delete_room(&mut self, id: RoomId, expected: RoomVersion) -> staylock::Result<bool> {
        self.inner.compare_and_delete_room(id, expected)
    }

    fn count_active_bookings(&self, id: RoomId) -> staylock::Result<u64> {
        self.inner.count_active_bookings(id)
    }
}

impl BookingStore for ClosingStore {
    fn lock_wait(&self) -> Duration {
        self.inner.lock_wait()
    }

    fn set_lock_wait(&mut self, wait: Duration) -> staylock::Result<()> {
        self.inner.set_lock_wait(wait)
    }

    fn begin_locked(&mut self) -> staylock::Result<Box<dyn BookingTxn + '_>> {
        if let Some(room) = self.room.take() {
            let ctx = quiet_context();
            RoomVersionGuard::new(&mut self.closer, &ctx).update_with_version(
                room.id(),
                room.version(),
                RoomChanges::new().status(RoomStatus::Inactive),
            )?;
        }
        self.inner.begin_locked()
    }

    fn find_booking(&self, id: BookingId) -> staylock::Result<Option<Booking>> {
        self.inner.find_booking(id)
    }

    fn list_bookings_for_room(&self, room_id: RoomId, include_deleted: bool) -> staylock::Result<Vec<Booking>> {
        self.inner.list_bookings_for_room(room_id, include_deleted)
    }
}

/// Two clients read the same version; the second writer is refused.
#[test]
fn test_lost_update_prevented() {
    let store = TestStore::new();
    let ctx = quiet_context();
    let mut alice = store.open();
    let mut bob = store.open();
    let room = add_room(&mut alice, &ctx, "Shared View");

    let alice_view = RoomVersionGuard::new(&mut alice, &ctx).get_room(room.id()).unwrap();
    let bob_view = RoomVersionGuard::new(&mut bob, &ctx).get_room(room.id()).unwrap();

    RoomVersionGuard::new(&mut alice, &ctx)
        .update_with_version(alice_view.id(), alice_view.version(), RoomChanges::new().price(11_000))
        .unwrap();
    let err = RoomVersionGuard::new(&mut bob, &ctx)
        .update_with_version(bob_view.id(), bob_view.version(), RoomChanges::new().capacity(4))
        .unwrap_err();

    assert!(err.is_conflict());
    let stored = RoomVersionGuard::new(&mut bob, &ctx).get_room(room.id()).unwrap();
    assert_eq!(stored.price(), 11_000);
    assert_eq!(stored.capacity(), 2);
}

/// Every successful write advances the version by exactly one.
#[test]
fn test_version_is_monotonic() {
    let store = TestStore::new();
    let ctx = quiet_context();
    let mut db = store.open();
    let mut room = add_room(&mut db, &ctx, "Counter");
    let mut guard = RoomVersionGuard::new(&mut db, &ctx);

    for price in 1..=5 {
        let before = room.version();
        room = guard
            .update_with_version(room.id(), before, RoomChanges::new().price(price))
            .unwrap();
        assert_eq!(room.version().get(), before.get() + 1);
    }
    assert_eq!(room.version(), RoomVersion::from(6));
}

/// A refused write changes nothing, not even the timestamp.
#[test]
fn test_conflict_leaves_row_untouched() {
    let store = TestStore::new();
    let ctx = quiet_context();
    let mut db = store.open();
    let room = add_room(&mut db, &ctx, "Untouched");
    let mut guard = RoomVersionGuard::new(&mut db, &ctx);
    let current = guard
        .update_with_version(room.id(), room.version(), RoomChanges::new().name("Renamed"))
        .unwrap();

    guard
        .update_with_version(room.id(), room.version(), RoomChanges::new().name("Stale"))
        .unwrap_err();

    assert_eq!(guard.get_room(room.id()).unwrap(), current);
}

/// Deactivating a room stops new bookings but keeps existing ones.
#[test]
fn test_deactivated_room_refuses_bookings() {
    let store = TestStore::new();
    let ctx = quiet_context();
    let mut db = store.open();
    let room = add_room(&mut db, &ctx, "Closing");
    let existing = BookingCoordinator::new(&mut db, &ctx)
        .create(room.id(), day(2, 1), day(2, 3), guest("Early"), CreateOptions::default())
        .unwrap();

    RoomVersionGuard::new(&mut db, &ctx)
        .update_with_version(room.id(), room.version(), RoomChanges::new().status(RoomStatus::Inactive))
        .unwrap();
    let err = BookingCoordinator::new(&mut db, &ctx)
        .create(room.id(), day(2, 5), day(2, 6), guest("Late"), CreateOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Validation { ref field, .. } if field == "room_id"));
    assert!(BookingCoordinator::new(&mut db, &ctx).get(existing.id()).is_ok());
}

/// A room closed after the request's first look but before its
/// transaction takes no booking.
#[test]
fn test_room_closed_mid_request_refuses_booking() {
    let store = TestStore::new();
    let ctx = quiet_context();
    let mut inner = store.open();
    let room = add_room(&mut inner, &ctx, "Closing Soon");
    let mut closing = ClosingStore {
        inner,
        closer: store.open(),
        room: Some(room.clone()),
    };

    let err = BookingCoordinator::new(&mut closing, &ctx)
        .create(room.id(), day(4, 1), day(4, 3), guest("Late"), CreateOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Validation { ref field, .. } if field == "room_id"));
    assert_eq!(closing.find_room(room.id()).unwrap().unwrap().status(), RoomStatus::Inactive);
    assert!(closing.list_bookings_for_room(room.id(), true).unwrap().is_empty());
}

/// A room whose only booking was soft-deleted can be removed; the
/// deleted booking goes with it.
#[test]
fn test_delete_room_after_bookings_end() {
    let store = TestStore::new();
    let ctx = quiet_context();
    let mut db = store.open();
    let room = add_room(&mut db, &ctx, "Retired");
    let booking = BookingCoordinator::new(&mut db, &ctx)
        .create(room.id(), day(3, 1), day(3, 2), guest("Last"), CreateOptions::default())
        .unwrap();

    let err = RoomVersionGuard::new(&mut db, &ctx)
        .delete_with_version(room.id(), room.version())
        .unwrap_err();
    assert!(matches!(err, Error::RoomInUse { active_bookings: 1, .. }));

    BookingCoordinator::new(&mut db, &ctx)
        .soft_delete(booking.id(), "desk")
        .unwrap();
    RoomVersionGuard::new(&mut db, &ctx)
        .delete_with_version(room.id(), room.version())
        .unwrap();

    let err = BookingCoordinator::new(&mut db, &ctx).get(booking.id()).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

/// With the fallback enabled, a write without a version uses the view.
#[test]
fn test_implicit_version_uses_view() {
    let store = TestStore::new();
    let ctx = EngineContext {
        allow_implicit_version: true,
        ..quiet_context()
    };
    let mut db = store.open();
    let room = add_room(&mut db, &ctx, "Implicit");
    let mut guard = RoomVersionGuard::new(&mut db, &ctx);

    let updated = guard
        .update_from_view(&room, None, RoomChanges::new().name("Still Implicit"))
        .unwrap();
    assert_eq!(updated.version(), RoomVersion::from(2));

    // The old view is now stale, fallback or not.
    let err = guard
        .update_from_view(&room, None, RoomChanges::new().name("Too Late"))
        .unwrap_err();
    assert!(matches!(err, Error::OptimisticLockConflict { .. }));
}
