//! Parsers for biological source files.
//!
//! Each parser normalizes an external format into records from the canonical
//! data model: KGML pathway documents become pathways, genes, memberships,
//! and flattened interaction edges; GAF files become a lazy stream of
//! gene-to-GO-term associations.

pub mod gaf;
pub mod kgml;

pub use gaf::{GafRecord, GafRecords, GafSource};
pub use kgml::{
    KgmlParseError,
    KgmlParseOptions,
    KgmlParseOutput,
    KgmlParser,
};
