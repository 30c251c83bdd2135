//! `fleetdesk` - sessions, role gating and ship records over local storage
//!
//! The library holds the two stateful components of the fleet desk: the
//! [`SessionManager`], which authenticates one of the seeded identities and
//! remembers it across restarts, and the [`ShipStore`], which owns the
//! persisted ship collection. Both take their [`LocalStorage`] backend as a
//! constructor argument.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod access;
pub mod cli;
pub mod config;
pub mod error;
pub mod fleet;
pub mod identity;
pub mod logging;
pub mod session;
pub mod ship;
pub mod storage;

pub use access::{Access, View};
pub use config::Config;
pub use error::{Error, Result};
pub use fleet::{FleetSummary, ShipStore};
pub use identity::{Identity, IdentityDirectory, Role};
pub use logging::init_logging;
pub use session::{Session, SessionManager};
pub use ship::{ShipFields, ShipPatch, ShipRecord, ShipStatus};
pub use storage::{LocalStorage, MemoryStorage, SqliteStorage, StorageStats};
