//! Blackbox Transport - Local report database
//!
//! The default [`ReportTransport`](blackbox_core::ports::ReportTransport)
//! implementation: assembled reports are persisted as JSON files in a local
//! reports directory, one file per crash event, where an out-of-process
//! uploader (or a support workflow) can pick them up later. Keeping the
//! transport local means the crash path never touches the network.

pub mod local;

pub use local::{LocalReportDatabase, ReportEntry};
