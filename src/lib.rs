//! Meeting-scheduling core: room and attendee conflict detection with an
//! atomic, WAL-backed booking commit, plus the interactive driver's
//! command parser.

pub mod command;
pub mod engine;
pub mod model;
pub mod observability;
pub mod store;
pub mod wal;
