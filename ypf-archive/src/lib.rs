//! YPF archive codec for the YU-RIS visual novel engine
//!
//! YPF is the single-file container format game data ships in. The layout
//! changed several times across engine versions 234 through 500: checksum
//! algorithms, filename obfuscation keys, length permutation tables and the
//! width of content offsets all vary. This crate resolves those rules per
//! version and provides the three archive operations on top of them:
//! creation (with content deduplication), extraction and inspection.

pub mod checksum;
pub mod compress;
mod create;
pub mod entry;
pub mod error;
mod extract;
pub mod header;
pub mod name;
pub mod profile;

pub use create::create_archive;
pub use entry::{ArchiveEntry, FileType};
pub use error::{Error, Result};
pub use extract::{extract_archive, inspect_archive};
pub use header::{ArchiveHeader, MAGIC, PREAMBLE_SIZE};
pub use profile::{MAX_VERSION, MIN_VERSION, VersionProfile};
