pub mod roster_manager;

pub use roster_manager::{create_shared_roster_manager, SharedRosterManager};
