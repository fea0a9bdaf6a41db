//! Query contracts for the two upstream data sources.
//!
//! The reconciler never talks to a network itself: it is handed one
//! implementation of [`AccessionSource`] and one of [`WarehouseSource`] at
//! construction and issues blocking queries against them. Transport,
//! authentication and retry policy all live behind these traits.

pub mod accessioning;
pub mod warehouse;

pub use accessioning::{AccessionData, AccessionRecord, AccessionSource, MockAccessionSource};
pub use warehouse::{
    Annotation, ConsequenceType, MockWarehouseSource, PositionRecord, QueryParams, SoTerm,
    SourceEntry, WarehouseSource,
};
