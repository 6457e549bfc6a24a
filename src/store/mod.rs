//! Access Entry Store abstraction.
//!
//! The engine never owns persistence. It reads resources and access entries
//! through [`AccessStore`], whose implementation lives with the caller (a
//! relational database in production). Reads only need read-committed
//! visibility; serializing concurrent grants and revocations is the store's
//! own business.

use crate::error::StoreError;
use crate::resource::{AccessEntry, Resource};
use crate::types::{Principal, ResourceId};

/// Read-only view of resources and their access entries.
pub trait AccessStore {
    /// Loads a resource with its hierarchy link and deletion timestamps.
    fn resource(&self, id: ResourceId) -> Result<Option<Resource>, StoreError>;

    /// Entries on exactly `resource` whose principal is one of `principals`.
    ///
    /// Callers pass the already expanded `{user} ∪ teams(user)` set, so
    /// implementations only need a membership filter.
    fn entries_for(
        &self,
        resource: ResourceId,
        principals: &[Principal],
    ) -> Result<Vec<AccessEntry>, StoreError>;

    /// Number of entries granting `Owner` directly on `resource`.
    fn owner_count(&self, resource: ResourceId) -> Result<usize, StoreError>;
}

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
