//! Shared primitive types used across the entire game core.

/// A clock tick. One tick = one second of game time.
pub type Tick = u64;

/// A stable, unique identifier for buildings, units and missions.
pub type EntityId = String;

/// Identifier of one engine boot, used to key the event audit trail.
pub type SessionId = String;
