//! Optimistic locking on rooms.
//!
//! A room write carries the version the caller last read. The store applies
//! it in one conditional statement that also advances the version, so of two
//! writers holding the same version exactly one wins. The loser gets the
//! current version back and decides for itself whether to re-read and try
//! again; the guard never retries.

use crate::error::{Error, Result, ValidationError};
use crate::retry::ErrorClass;
use crate::room::{NewRoom, Room, RoomChanges, RoomId, RoomVersion};
use crate::store::RoomStore;

use super::EngineContext;

/// Version-checked room operations.
///
/// # Examples
///
/// ```no_run
/// use staylock::{Database, DatabaseConfig, EngineContext, NewRoom, RoomChanges, RoomVersionGuard};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/staylock.db")).unwrap();
/// let ctx = EngineContext::default();
/// let mut guard = RoomVersionGuard::new(&mut db, &ctx);
///
/// let room = guard.create_room(&NewRoom::builder("Sea View").build().unwrap()).unwrap();
/// let updated = guard
///     .update_with_version(room.id(), room.version(), RoomChanges::new().price(12_000))
///     .unwrap();
/// assert_eq!(updated.version().get(), room.version().get() + 1);
/// ```
pub struct RoomVersionGuard<'a, S: RoomStore + ?Sized> {
    store: &'a mut S,
    ctx: &'a EngineContext,
}

impl<'a, S: RoomStore + ?Sized> RoomVersionGuard<'a, S> {
    /// Creates a guard over `store`.
    pub fn new(store: &'a mut S, ctx: &'a EngineContext) -> Self {
        Self { store, ctx }
    }

    /// Creates a room at the initial version.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_room(&mut self, room: &NewRoom) -> Result<Room> {
        let created = self.store.insert_room(room, self.ctx.clock.now())?;
        log::info!("created room {} '{}'", created.id(), created.name());
        Ok(created)
    }

    /// Reads a room.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the room does not exist.
    pub fn get_room(&self, room_id: RoomId) -> Result<Room> {
        self.store
            .find_room(room_id)?
            .ok_or_else(|| Error::not_found(format!("room {room_id}")))
    }

    /// Lists every room.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_rooms(&self) -> Result<Vec<Room>> {
        self.store.list_rooms()
    }

    /// Applies `changes` iff the room is still at `expected`.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for an empty or invalid change set
    /// - [`Error::OptimisticLockConflict`] if the room moved past `expected`
    /// - [`Error::NotFound`] if the room is gone
    pub fn update_with_version(
        &mut self,
        room_id: RoomId,
        expected: RoomVersion,
        changes: RoomChanges,
    ) -> Result<Room> {
        let changes = changes.validate()?;
        let now = self.ctx.clock.now();
        match self.store.compare_and_update_room(room_id, expected, &changes, now)? {
            Some(room) => {
                debug_assert_eq!(room.version(), expected.next());
                log::debug!("room {room_id} advanced to version {}", room.version());
                Ok(room)
            }
            None => Err(self.diagnose(room_id, expected)?),
        }
    }

    /// Deletes the room iff it is still at `expected` and no active booking
    /// references it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the room is gone
    /// - [`Error::OptimisticLockConflict`] if the room moved past `expected`
    /// - [`Error::RoomInUse`] while active bookings reference it
    /// - [`Error::RetryExhausted`] if the delete keeps failing while the
    ///   room shows no active booking, which means booking writes are
    ///   racing it
    pub fn delete_with_version(&mut self, room_id: RoomId, expected: RoomVersion) -> Result<()> {
        // The second pass covers a booking released between the failed
        // delete and the count.
        for _ in 0..2 {
            if self.store.compare_and_delete_room(room_id, expected)? {
                log::info!("deleted room {room_id} at version {expected}");
                return Ok(());
            }
            let err = self.diagnose(room_id, expected)?;
            if !matches!(err, Error::RoomInUse { active_bookings: 0, .. }) {
                return Err(err);
            }
        }
        log::warn!("delete of room {room_id} kept losing to concurrent booking writes");
        Err(Error::RetryExhausted {
            attempts: 2,
            last: ErrorClass::SerializationFailure,
        })
    }

    /// Updates a room the caller holds in memory.
    ///
    /// `expected` is the version the client submitted. When it is omitted
    /// the version on `room` is used, but only if implicit versions are
    /// enabled.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if `expected` is omitted and implicit
    ///   versions are disabled
    /// - Everything [`update_with_version`](Self::update_with_version)
    ///   returns
    pub fn update_from_view(
        &mut self,
        room: &Room,
        expected: Option<RoomVersion>,
        changes: RoomChanges,
    ) -> Result<Room> {
        let expected = self.resolve_version(room, expected)?;
        self.update_with_version(room.id(), expected, changes)
    }

    /// Deletes a room the caller holds in memory.
    ///
    /// # Errors
    ///
    /// Same as [`update_from_view`](Self::update_from_view) and
    /// [`delete_with_version`](Self::delete_with_version).
    pub fn delete_from_view(&mut self, room: &Room, expected: Option<RoomVersion>) -> Result<()> {
        let expected = self.resolve_version(room, expected)?;
        self.delete_with_version(room.id(), expected)
    }

    fn resolve_version(&self, room: &Room, expected: Option<RoomVersion>) -> Result<RoomVersion> {
        if let Some(version) = expected {
            return Ok(version);
        }
        if !self.ctx.allow_implicit_version {
            return Err(ValidationError::new(
                "lock_version",
                format!("room {} requires the version it was read at", room.id()),
            )
            .into());
        }
        log::warn!(
            "room {} written without a version; assuming {} from the caller's copy",
            room.id(),
            room.version()
        );
        Ok(room.version())
    }

    /// Explains why a conditional write matched no row.
    fn diagnose(&self, room_id: RoomId, expected: RoomVersion) -> Result<Error> {
        let Some(current) = self.store.find_room(room_id)? else {
            return Ok(Error::not_found(format!("room {room_id}")));
        };
        if current.version() != expected {
            log::debug!(
                "room {room_id} version conflict: expected {expected}, found {}",
                current.version()
            );
            return Ok(Error::OptimisticLockConflict {
                room_id,
                expected,
                actual: current.version(),
            });
        }
        Ok(Error::RoomInUse {
            room_id,
            active_bookings: self.store.count_active_bookings(room_id)?,
        })
    }
}
