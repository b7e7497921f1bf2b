//! Line-oriented text search over research documents
//!
//! # Error Handling Strategy
//!
//! - **Oversized files** (above the byte threshold) are never read; they are
//!   reported as skipped with the size in MiB
//! - **Undecodable files** (not UTF-8, unreadable) are reported as skipped with the reason
//! - **Files that vanish** between the walk and the stat are logged and left out
//! - **Walk or stat failures** of any other kind propagate and abort the search
//!
//! Files with zero matching lines appear in neither the results nor the skipped list.

pub mod scanner;

pub use scanner::{ScanOutcome, TextQuery, scan_file, search_documents};
