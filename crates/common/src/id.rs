//! ID generation utilities.

use ulid::Ulid;
use uuid::Uuid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable, so ordering by ID follows
    /// creation order at millisecond granularity.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate a new random UUID v4, used as a user's public guid.
    #[must_use]
    pub fn generate_uuid_v4(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Generate an opaque bearer token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // No time component, unlike ULIDs
        Uuid::new_v4().simple().to_string()
    }
}

/// Whether `id` has the shape of an ID produced by [`IdGenerator::generate`].
///
/// Lookups short-circuit to "not found" for malformed IDs instead of
/// querying the store.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    id.len() == 26 && Ulid::from_string(id).is_ok()
}
