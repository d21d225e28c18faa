//! Reciprocal rank fusion over ranked document lists.
//!
//! Each position `rank` (0-based) in each list contributes `1 / (rank + k)`
//! to the document at that position. Documents are identified by their
//! canonical key, so the same content retrieved by different queries
//! accumulates into a single entry.
//!
//! Equal scores are ordered by first appearance across the flattened input:
//! list 0 in rank order, then list 1, and so on.

mod canonical;
mod error;
mod finite;
mod input;

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use tracing::debug;

pub use canonical::{CanonicalKey, canonical_key};
pub use error::{FusionError, Result};
pub use input::ranked_lists_from_value;

pub const DEFAULT_RRF_K: f64 = 60.0;

/// Name of the tie-break rule, as reported to callers.
pub const TIE_BREAK_POLICY: &str = "first_seen";

/// One observation of a document in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Appearance {
    pub list_index: usize,
    pub rank: usize,
}

/// A unique document with its accumulated score.
///
/// `document` borrows the first occurrence from the input; later
/// occurrences only contribute score.
#[derive(Debug, Clone)]
pub struct FusedDocument<'a, T> {
    pub document: &'a T,
    pub score: f64,
    pub key: CanonicalKey,
    pub first_seen: usize,
    pub appearances: Vec<Appearance>,
}

impl<T: Clone> FusedDocument<'_, T> {
    pub fn to_document(&self) -> T {
        self.document.clone()
    }

    pub fn to_scored(&self) -> (T, f64) {
        (self.document.clone(), self.score)
    }
}

/// Fuse `lists` into one ranking, best first.
pub fn fuse<T: Serialize>(lists: &[Vec<T>], k: f64) -> Result<Vec<FusedDocument<'_, T>>> {
    validate_k(k)?;

    let mut slots = HashMap::<CanonicalKey, usize>::new();
    let mut fused = Vec::<FusedDocument<'_, T>>::new();
    let mut observations = 0_usize;

    for (list_index, list) in lists.iter().enumerate() {
        for (rank, document) in list.iter().enumerate() {
            let key = canonical_key(document)?;
            let slot = match slots.entry(key) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let slot = fused.len();
                    fused.push(FusedDocument {
                        document,
                        score: 0.0,
                        key: entry.key().clone(),
                        first_seen: slot,
                        appearances: Vec::new(),
                    });
                    entry.insert(slot);
                    slot
                }
            };

            let contribution = 1.0 / (rank as f64 + k);
            let entry = &mut fused[slot];
            entry.score += contribution;
            entry.appearances.push(Appearance { list_index, rank });
            observations += 1;
        }
    }

    sort_fused(&mut fused);

    debug!(
        lists = lists.len(),
        observations,
        unique = fused.len(),
        k,
        "reciprocal rank fusion complete"
    );

    Ok(fused)
}

/// Fuse and keep `(document, score)` pairs.
pub fn fuse_scored<T: Serialize + Clone>(lists: &[Vec<T>], k: f64) -> Result<Vec<(T, f64)>> {
    Ok(fuse(lists, k)?
        .iter()
        .map(FusedDocument::to_scored)
        .collect())
}

/// Fuse and keep documents only.
pub fn fuse_documents<T: Serialize + Clone>(lists: &[Vec<T>], k: f64) -> Result<Vec<T>> {
    Ok(fuse(lists, k)?
        .iter()
        .map(FusedDocument::to_document)
        .collect())
}

fn validate_k(k: f64) -> Result<()> {
    if k.is_finite() && k > 0.0 {
        return Ok(());
    }

    Err(FusionError::InvalidInput(format!(
        "rrf k must be a finite positive number, got {k}"
    )))
}

fn sort_fused<T>(fused: &mut [FusedDocument<'_, T>]) {
    fused.sort_by(|left, right| {
        right
            .score
            .total_cmp(&left.score)
            .then(left.first_seen.cmp(&right.first_seen))
    });
}
