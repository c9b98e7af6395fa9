//! Room statements, including the version-guarded update and delete.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::room::{NewRoom, Room, RoomChanges, RoomId, RoomVersion};
use crate::store::RoomStore;

use super::connection::Database;
use super::rows::{row_to_room, timestamp_to_sql};
use super::schema::ROOM_COLUMNS;

fn insert_room_sql() -> String {
    format!(
        "INSERT INTO rooms (name, price, capacity, status, lock_version, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
         RETURNING {ROOM_COLUMNS}"
    )
}

fn select_room_sql() -> String {
    format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1")
}

fn list_rooms_sql() -> String {
    format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY id")
}

// One statement reads, compares and bumps the version.
fn compare_and_update_sql() -> String {
    format!(
        "UPDATE rooms SET
             name = COALESCE(?3, name),
             price = COALESCE(?4, price),
             capacity = COALESCE(?5, capacity),
             status = COALESCE(?6, status),
             lock_version = lock_version + 1,
             updated_at = ?7
         WHERE id = ?1 AND lock_version = ?2
         RETURNING {ROOM_COLUMNS}"
    )
}

const COMPARE_AND_DELETE: &str = r"
    DELETE FROM rooms
    WHERE id = ?1
      AND lock_version = ?2
      AND NOT EXISTS (
          SELECT 1 FROM bookings
          WHERE room_id = ?1 AND status != 'cancelled' AND deleted_at IS NULL
      )
";

const COUNT_ACTIVE_BOOKINGS: &str = r"
    SELECT COUNT(*) FROM bookings
    WHERE room_id = ?1 AND status != 'cancelled' AND deleted_at IS NULL
";

/// Reads a room on `conn`, which may be inside an open transaction.
pub(super) fn find_room(conn: &Connection, id: RoomId) -> Result<Option<Room>> {
    let room = conn
        .query_row(&select_room_sql(), [id.value()], row_to_room)
        .optional()?;
    Ok(room)
}

impl RoomStore for Database {
    fn insert_room(&mut self, room: &NewRoom, now: DateTime<Utc>) -> Result<Room> {
        let room = self.conn.query_row(
            &insert_room_sql(),
            params![
                room.name(),
                room.price(),
                room.capacity(),
                room.status().as_str(),
                RoomVersion::INITIAL.as_sql(),
                timestamp_to_sql(now),
            ],
            row_to_room,
        )?;
        Ok(room)
    }

    fn find_room(&self, id: RoomId) -> Result<Option<Room>> {
        find_room(&self.conn, id)
    }

    fn list_rooms(&self) -> Result<Vec<Room>> {
        let mut stmt = self.conn.prepare(&list_rooms_sql())?;
        let rooms = stmt
            .query_map([], row_to_room)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    fn compare_and_update_room(
        &mut self,
        id: RoomId,
        expected: RoomVersion,
        changes: &RoomChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Room>> {
        let room = self
            .conn
            .query_row(
                &compare_and_update_sql(),
                params![
                    id.value(),
                    expected.as_sql(),
                    changes.name,
                    changes.price,
                    changes.capacity,
                    changes.status.map(|s| s.as_str()),
                    timestamp_to_sql(now),
                ],
                row_to_room,
            )
            .optional()?;
        Ok(room)
    }

    fn compare_and_delete_room(&mut self, id: RoomId, expected: RoomVersion) -> Result<bool> {
        let deleted = self
            .conn
            .execute(COMPARE_AND_DELETE, params![id.value(), expected.as_sql()])?;
        Ok(deleted == 1)
    }

    fn count_active_bookings(&self, id: RoomId) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(COUNT_ACTIVE_BOOKINGS, [id.value()], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, test_now};
    use crate::room::RoomStatus;

    fn room(db: &mut Database) -> Room {
        let new = NewRoom::builder("Suite").price(20_000).capacity(2).build().unwrap();
        db.insert_room(&new, test_now()).unwrap()
    }

    #[test]
    fn test_insert_starts_at_version_one() {
        let (_dir, mut db) = create_test_database();
        let room = room(&mut db);
        assert_eq!(room.version(), RoomVersion::from(1));
        assert_eq!(room.name(), "Suite");
        assert_eq!(db.find_room(room.id()).unwrap(), Some(room));
    }

    #[test]
    fn test_find_missing_room() {
        let (_dir, db) = create_test_database();
        assert!(db.find_room(RoomId::from(42)).unwrap().is_none());
    }

    #[test]
    fn test_compare_and_update_bumps_version() {
        let (_dir, mut db) = create_test_database();
        let room = room(&mut db);
        let changes = RoomChanges::new().price(18_000).status(RoomStatus::Inactive);

        let updated = db
            .compare_and_update_room(room.id(), room.version(), &changes, test_now())
            .unwrap()
            .unwrap();
        assert_eq!(updated.version(), RoomVersion::from(2));
        assert_eq!(updated.price(), 18_000);
        assert_eq!(updated.status(), RoomStatus::Inactive);
        assert_eq!(updated.name(), "Suite");
    }

    #[test]
    fn test_compare_and_update_stale_version() {
        let (_dir, mut db) = create_test_database();
        let room = room(&mut db);
        let changes = RoomChanges::new().price(1);

        db.compare_and_update_room(room.id(), room.version(), &changes, test_now())
            .unwrap()
            .unwrap();
        let stale = db
            .compare_and_update_room(room.id(), room.version(), &changes, test_now())
            .unwrap();
        assert!(stale.is_none());
        assert_eq!(
            db.find_room(room.id()).unwrap().unwrap().version(),
            RoomVersion::from(2)
        );
    }

    #[test]
    fn test_compare_and_delete() {
        let (_dir, mut db) = create_test_database();
        let room = room(&mut db);

        assert!(!db.compare_and_delete_room(room.id(), RoomVersion::from(9)).unwrap());
        assert!(db.compare_and_delete_room(room.id(), room.version()).unwrap());
        assert!(db.find_room(room.id()).unwrap().is_none());
    }

    #[test]
    fn test_list_rooms_ordered() {
        let (_dir, mut db) = create_test_database();
        let a = room(&mut db);
        let b = room(&mut db);
        let ids: Vec<_> = db.list_rooms().unwrap().iter().map(Room::id).collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
        assert_eq!(db.count_active_bookings(a.id()).unwrap(), 0);
    }
}
