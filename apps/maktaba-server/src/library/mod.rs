//! Library module for book records
//!
//! Maps book ids to the EPUB files served by the reader.

mod book;
mod catalog;

pub use book::*;
pub use catalog::*;
