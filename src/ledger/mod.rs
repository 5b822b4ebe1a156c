//! Persistent single-writer ledgers for gallery metadata and content reports
//!
//! Each ledger is a spawned task with exclusive ownership of its key-value
//! store; callers hold a cloneable handle and communicate over an mpsc
//! channel with oneshot replies, so operations against one ledger never
//! interleave their storage mutations.

pub mod gallery;
pub mod report;
pub mod store;

pub use gallery::{GalleryItem, GalleryLedger};
pub use report::{NewReport, ReportItem, ReportLedger};
pub use store::{FsKvStore, KeyValueStore, MemoryKvStore};
