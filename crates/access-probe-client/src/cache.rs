// crates/access-probe-client/src/cache.rs
// ============================================================================
// Module: Single-Flight Cache
// Description: Per-key once-cells keyed by identity key.
// Purpose: Collapse concurrent provisioning calls for one key into a single
// backend operation.
// Dependencies: access-probe-core, tokio
// ============================================================================

//! ## Overview
//! The cache is an explicit map of identity key to a per-key
//! [`tokio::sync::OnceCell`]. Callers fetch the cell under a short-lived
//! synchronous lock and then initialize it outside the lock, so concurrent
//! requests for the same key await one initialization while requests for
//! different keys proceed independently. A failed initialization leaves the
//! cell empty, so the next caller retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use access_probe_core::IdentityKey;
use tokio::sync::OnceCell;

// ============================================================================
// SECTION: Keyed Cells
// ============================================================================

/// Map of identity key to a shared single-flight cell.
///
/// # Invariants
/// - The mutex is never held across an await point.
#[derive(Debug)]
pub(crate) struct KeyedCells<T> {
    /// Cells keyed by identity key.
    cells: Mutex<HashMap<IdentityKey, Arc<OnceCell<T>>>>,
}

impl<T> KeyedCells<T> {
    /// Creates an empty cell map.
    pub(crate) fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cell for `key`, creating it on first use.
    pub(crate) fn cell(&self, key: &IdentityKey) -> Arc<OnceCell<T>> {
        let mut cells = match self.cells.lock() {
            Ok(guard) => guard,
            // A poisoned map only means another caller panicked while
            // inserting; the map itself stays structurally valid.
            Err(poisoned) => poisoned.into_inner(),
        };
        cells.entry(key.clone()).or_insert_with(|| Arc::new(OnceCell::new())).clone()
    }

    /// Drops every cell, forgetting all cached values.
    pub(crate) fn clear(&self) {
        let mut cells = match self.cells.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        cells.clear();
    }
}
