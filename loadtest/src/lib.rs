//! This is a load-generation library which can run simulated user
//! [`Workload`]s against a ChecklistBank-style dataset service.
//!
//! A [`Workload`] pairs a population of concurrently simulated users with
//! one of two task profiles: *browsing*, a weighted mix of dataset, taxon
//! and image lookups with a short think time between actions, and
//! *matching*, back-to-back scientific-name queries against the names
//! index.
//!
//! Request parameters are randomized: taxon lookups use freshly generated
//! short identifiers, and match queries pair a random scientific name with
//! a random authorship plus a cache-busting value.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod generate;
pub mod http;
pub mod loadtest;
pub mod workload;

pub use crate::loadtest::run;
pub use crate::workload::{Profile, Workload};
