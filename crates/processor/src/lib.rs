#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Document processing pipeline
//!
//! For each document: fingerprint the bytes, resolve the version, skip
//! content that was already validated, otherwise open the workbook, run every
//! registered check, stamp the outcomes and hand them to a [`ResultSink`].
//! Content counts as validated only once the sink accepted its results.
//!
//! A document that cannot be read or opened is marked failed and the batch
//! moves on. A sink failure aborts the batch.

mod entity;
mod processor;
mod sink;
mod source;

pub use entity::{EntityExtractor, SeparatorExtractor};
pub use processor::DocumentProcessor;
pub use sink::{MemorySink, ResultSink};
pub use source::{DirectorySource, DocumentSource};
