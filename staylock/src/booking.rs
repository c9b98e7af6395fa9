//! Booking records and their lifecycle.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationError;
use crate::interval::StayInterval;
use crate::room::RoomId;

/// Identifier of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BookingId(i64);

impl BookingId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for BookingId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a booking.
///
/// `Pending` and `Confirmed` bookings hold their nights. `Cancelled` is
/// terminal and releases them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting confirmation.
    Pending,
    /// Confirmed by the guest or the front desk.
    Confirmed,
    /// Cancelled; no longer occupies the room.
    Cancelled,
}

impl BookingStatus {
    /// Returns true when a booking with this status occupies its nights.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true when the lifecycle allows moving from `self` to `to`.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(ValidationError::new(
                "status",
                format!("unknown booking status '{other}'"),
            )),
        }
    }
}

/// Who the booking is for.
///
/// # Examples
///
/// ```
/// use staylock::GuestInfo;
///
/// let guest = GuestInfo::new(" Ada ", "ada@example.com").unwrap();
/// assert_eq!(guest.name(), "Ada");
/// assert!(GuestInfo::new("Ada", "not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestInfo {
    name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
}

impl GuestInfo {
    /// Creates guest details from a name and email.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is blank after trimming or the email
    /// has no `@`.
    pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::new("guest_name", "guest name must be non-empty"));
        }
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(ValidationError::new("guest_email", "guest email must be non-empty"));
        }
        if !email.contains('@') {
            return Err(ValidationError::new(
                "guest_email",
                format!("'{email}' is not an email address"),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        })
    }

    /// Adds a phone number. Blank input clears it.
    #[must_use]
    pub fn with_phone(mut self, phone: impl AsRef<str>) -> Self {
        let phone = phone.as_ref().trim();
        self.phone = (!phone.is_empty()).then(|| phone.to_string());
        self
    }

    /// Returns the guest name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the guest email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the phone number, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub(crate) fn from_parts(name: String, email: String, phone: Option<String>) -> Self {
        Self { name, email, phone }
    }
}

/// A booking as last read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub(crate) id: BookingId,
    pub(crate) room_id: RoomId,
    pub(crate) interval: StayInterval,
    pub(crate) guest: GuestInfo,
    pub(crate) status: BookingStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) deleted_at: Option<DateTime<Utc>>,
    pub(crate) deleted_by: Option<String>,
    pub(crate) restored_at: Option<DateTime<Utc>>,
    pub(crate) restored_by: Option<String>,
}

impl Booking {
    /// Returns the booking id.
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// Returns the booked room.
    #[must_use]
    pub const fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Returns the stay.
    #[must_use]
    pub const fn interval(&self) -> &StayInterval {
        &self.interval
    }

    /// Returns the guest details.
    #[must_use]
    pub const fn guest(&self) -> &GuestInfo {
        &self.guest
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the booking was soft-deleted.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns who soft-deleted the booking.
    #[must_use]
    pub fn deleted_by(&self) -> Option<&str> {
        self.deleted_by.as_deref()
    }

    /// Returns when the booking was last restored.
    #[must_use]
    pub const fn restored_at(&self) -> Option<DateTime<Utc>> {
        self.restored_at
    }

    /// Returns who last restored the booking.
    #[must_use]
    pub fn restored_by(&self) -> Option<&str> {
        self.restored_by.as_deref()
    }

    /// Returns true when the booking carries a soft-delete marker.
    #[must_use]
    pub const fn is_soft_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns true when the booking takes part in the no-overlap rule.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active() && !self.is_soft_deleted()
    }

    #[cfg(test)]
    pub(crate) fn for_test(
        id: BookingId,
        room_id: RoomId,
        interval: StayInterval,
        guest: GuestInfo,
        status: BookingStatus,
    ) -> Self {
        let now = DateTime::<Utc>::UNIX_EPOCH;
        Self {
            id,
            room_id,
            interval,
            guest,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
            restored_at: None,
            restored_by: None,
        }
    }
}

/// A request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// The room to book.
    pub room_id: RoomId,
    /// The stay.
    pub interval: StayInterval,
    /// The guest.
    pub guest: GuestInfo,
    /// Initial status, `Pending` unless the caller confirms up front.
    pub status: BookingStatus,
}

impl NewBooking {
    /// Creates a pending booking request.
    #[must_use]
    pub const fn new(room_id: RoomId, interval: StayInterval, guest: GuestInfo) -> Self {
        Self {
            room_id,
            interval,
            guest,
            status: BookingStatus::Pending,
        }
    }

    /// Requests the booking be created already confirmed.
    #[must_use]
    pub const fn confirmed(mut self) -> Self {
        self.status = BookingStatus::Confirmed;
        self
    }
}

/// Non-interval fields an update may change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingChanges {
    /// Replacement guest details.
    pub guest: Option<GuestInfo>,
}
