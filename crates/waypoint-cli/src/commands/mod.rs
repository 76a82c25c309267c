//! Command implementations.

pub mod analyze;
pub mod collect;
pub mod schedule;
pub mod sources;

pub use self::analyze::execute_analyze;
pub use self::collect::execute_collect;
pub use self::schedule::execute_schedule;
pub use self::sources::execute_sources;
