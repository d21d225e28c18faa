//! Reciprocal rank fusion for merging ranked document lists.

pub mod fusion;
