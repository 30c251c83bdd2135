//! The authoritative ship collection.
//!
//! [`ShipStore`] owns the ordered list of [`ShipRecord`]s and mirrors it, in
//! full, under [`SHIPS_KEY`] after every mutation. The new list is written
//! first and only then adopted in memory, so a failed write leaves both
//! copies as they were.

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::ship::{ShipFields, ShipRecord, ShipStatus};
use crate::storage::{LocalStorage, SHIPS_KEY};

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    /// Number of ships on record.
    pub total_ships: usize,
    /// Ships with [`ShipStatus::Active`].
    pub active: usize,
    /// Ships with [`ShipStatus::Inactive`].
    pub inactive: usize,
    /// Ships with [`ShipStatus::Maintenance`].
    pub maintenance: usize,
}

impl FleetSummary {
    /// Count for one status.
    #[must_use]
    pub fn count(&self, status: ShipStatus) -> usize {
        match status {
            ShipStatus::Active => self.active,
            ShipStatus::Inactive => self.inactive,
            ShipStatus::Maintenance => self.maintenance,
        }
    }
}

/// CRUD over the persisted ship list.
#[derive(Debug)]
pub struct ShipStore<S> {
    storage: S,
    ships: Vec<ShipRecord>,
}

impl<S: LocalStorage> ShipStore<S> {
    /// An empty store over `storage`. Call [`load`](Self::load) to read the
    /// persisted collection.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            ships: Vec::new(),
        }
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Missing, unreadable or malformed data yields an empty list.
    pub fn load(&mut self) {
        self.ships = match self.storage.get_item(SHIPS_KEY) {
            Ok(Some(payload)) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                warn!("Ignoring malformed ship collection: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Could not read stored ships: {e}");
                Vec::new()
            }
        };
        debug!("Loaded {} ships", self.ships.len());
    }

    /// All records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[ShipRecord] {
        &self.ships
    }

    /// The record with `id`, if any.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&ShipRecord> {
        self.ships.iter().find(|ship| ship.id == id)
    }

    /// Append a new record with a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted; nothing is
    /// added in that case.
    pub fn create(&mut self, fields: ShipFields) -> Result<ShipRecord> {
        let record = ShipRecord::from_fields(self.next_id(), fields);

        let mut next = self.ships.clone();
        next.push(record.clone());
        self.commit(next)?;

        info!("Created ship {} ({})", record.id, record.name);
        Ok(record)
    }

    /// Replace the record that has `record.id`, keeping its position.
    ///
    /// Returns `None`, and leaves the collection unchanged, when no record
    /// has that id. The collection is written either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    pub fn update(&mut self, record: ShipRecord) -> Result<Option<ShipRecord>> {
        let id = record.id.clone();
        let mut next = self.ships.clone();
        let updated = match next.iter_mut().find(|ship| ship.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                Some(record)
            }
            None => None,
        };
        self.commit(next)?;

        if updated.is_some() {
            info!("Updated ship {id}");
        } else {
            warn!("Update ignored: no ship with id {id}");
        }
        Ok(updated)
    }

    /// Remove the record with `id`. Returns whether one was removed.
    ///
    /// Confirming the deletion is the caller's job. The collection is
    /// written even when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be persisted.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut next = self.ships.clone();
        next.retain(|ship| ship.id != id);
        let removed = next.len() != self.ships.len();
        self.commit(next)?;

        if removed {
            info!("Deleted ship {id}");
        } else {
            warn!("Delete ignored: no ship with id {id}");
        }
        Ok(removed)
    }

    /// Dashboard counts over the current list.
    #[must_use]
    pub fn summary(&self) -> FleetSummary {
        self.ships
            .iter()
            .fold(FleetSummary::default(), |mut summary, ship| {
                summary.total_ships += 1;
                match ship.status {
                    ShipStatus::Active => summary.active += 1,
                    ShipStatus::Inactive => summary.inactive += 1,
                    ShipStatus::Maintenance => summary.maintenance += 1,
                }
                summary
            })
    }

    /// Persist `next` in full, then adopt it.
    fn commit(&mut self, next: Vec<ShipRecord>) -> Result<()> {
        let payload = serde_json::to_string(&next)?;
        self.storage.set_item(SHIPS_KEY, &payload)?;
        self.ships = next;
        Ok(())
    }

    /// A time-ordered UUID not used by any record in the list.
    fn next_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.find_by_id(&id).is_none() {
                return id;
            }
        }
    }
}
