//! Storage module
//!
//! File metadata lookup and listing line rendering.

pub mod listing;
pub mod metadata;

pub use listing::{format_listing, format_metadata, format_record};
pub use metadata::{FsMetadataSource, MetadataRecord, MetadataSource};
