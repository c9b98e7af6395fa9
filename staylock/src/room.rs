//! Room records and their optimistic-lock version token.
//!
//! A [`Room`] can only be obtained from the store. Its [`RoomVersion`] has no
//! public way to be advanced: the only path that increments it is the
//! compare-and-swap statement behind [`crate::RoomVersionGuard`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ValidationError;

/// Identifier of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for RoomId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The optimistic-lock version of a room.
///
/// Versions start at 1 and grow by exactly one per successful mutation.
/// Values received from clients are wrapped with `RoomVersion::from` and
/// compared against the store; nothing outside this crate can bump one.
///
/// # Examples
///
/// ```
/// use staylock::RoomVersion;
///
/// let submitted = RoomVersion::from(5);
/// assert_eq!(submitted.get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomVersion(u64);

impl RoomVersion {
    /// Version assigned to a freshly created room.
    pub(crate) const INITIAL: Self = Self(1);

    /// Returns the numeric version.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The version a successful compare-and-swap produces.
    pub(crate) const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[allow(clippy::cast_possible_wrap)]
    pub(crate) const fn as_sql(self) -> i64 {
        self.0 as i64
    }

    #[allow(clippy::cast_sign_loss)]
    pub(crate) const fn from_sql(value: i64) -> Self {
        Self(value as u64)
    }
}

impl From<u64> for RoomVersion {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RoomVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a room can currently be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// The room is in service.
    Active,
    /// The room is out of service.
    Inactive,
}

impl RoomStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(ValidationError::new(
                "status",
                format!("unknown room status '{other}' (expected active or inactive)"),
            )),
        }
    }
}

/// A room as last read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub(crate) id: RoomId,
    pub(crate) name: String,
    pub(crate) price: i64,
    pub(crate) capacity: u32,
    pub(crate) status: RoomStatus,
    pub(crate) version: RoomVersion,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Room {
    /// Returns the room id.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the nightly price in minor currency units.
    #[must_use]
    pub const fn price(&self) -> i64 {
        self.price
    }

    /// Returns the guest capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the service status.
    #[must_use]
    pub const fn status(&self) -> RoomStatus {
        self.status
    }

    /// Returns the version this view was read at.
    #[must_use]
    pub const fn version(&self) -> RoomVersion {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the timestamp of the last successful mutation.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A validated request to create a room.
///
/// # Examples
///
/// ```
/// use staylock::NewRoom;
///
/// let room = NewRoom::builder("Harbour View")
///     .price(12_500)
///     .capacity(2)
///     .build()
///     .unwrap();
/// assert_eq!(room.name(), "Harbour View");
///
/// assert!(NewRoom::builder("  ").build().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    name: String,
    price: i64,
    capacity: u32,
    status: RoomStatus,
}

impl NewRoom {
    /// Starts building a room with the given name.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> NewRoomBuilder {
        NewRoomBuilder {
            name: name.into(),
            price: 0,
            capacity: 1,
            status: RoomStatus::Active,
        }
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price in minor units.
    #[must_use]
    pub const fn price(&self) -> i64 {
        self.price
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn status(&self) -> RoomStatus {
        self.status
    }
}

/// Builder for [`NewRoom`].
#[derive(Debug)]
pub struct NewRoomBuilder {
    name: String,
    price: i64,
    capacity: u32,
    status: RoomStatus,
}

impl NewRoomBuilder {
    /// Sets the nightly price in minor units.
    #[must_use]
    pub const fn price(mut self, price: i64) -> Self {
        self.price = price;
        self
    }

    /// Sets the guest capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn status(mut self, status: RoomStatus) -> Self {
        self.status = status;
        self
    }

    /// Validates and builds the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the price is negative or the
    /// capacity is zero.
    pub fn build(self) -> Result<NewRoom, ValidationError> {
        let name = validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_capacity(self.capacity)?;
        Ok(NewRoom {
            name,
            price: self.price,
            capacity: self.capacity,
            status: self.status,
        })
    }
}

/// A partial update to a room, applied under a version check.
///
/// # Examples
///
/// ```
/// use staylock::RoomChanges;
///
/// let changes = RoomChanges::new().price(9_900);
/// assert!(changes.validate().is_ok());
/// assert!(RoomChanges::new().validate().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomChanges {
    pub(crate) name: Option<String>,
    pub(crate) price: Option<i64>,
    pub(crate) capacity: Option<u32>,
    pub(crate) status: Option<RoomStatus>,
}

impl RoomChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Changes the price.
    #[must_use]
    pub const fn price(mut self, price: i64) -> Self {
        self.price = Some(price);
        self
    }

    /// Changes the capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Changes the status.
    #[must_use]
    pub const fn status(mut self, status: RoomStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true when nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.capacity.is_none() && self.status.is_none()
    }

    /// Checks every present field and normalizes the name.
    ///
    /// # Errors
    ///
    /// Returns an error if the change set is empty or any field is invalid.
    pub fn validate(&self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::new("changes", "no fields to update"));
        }
        let name = self.name.as_deref().map(validate_name).transpose()?;
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(capacity) = self.capacity {
            validate_capacity(capacity)?;
        }
        Ok(Self {
            name,
            price: self.price,
            capacity: self.capacity,
            status: self.status,
        })
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            "name",
            "name must be non-empty after trimming whitespace",
        ));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: i64) -> Result<(), ValidationError> {
    if price < 0 {
        return Err(ValidationError::new("price", "price must not be negative"));
    }
    Ok(())
}

fn validate_capacity(capacity: u32) -> Result<(), ValidationError> {
    if capacity == 0 {
        return Err(ValidationError::new("capacity", "capacity must be at least 1"));
    }
    Ok(())
}
