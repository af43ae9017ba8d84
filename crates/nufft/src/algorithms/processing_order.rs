//! Load-balanced processing order for balanced operator variants.
//!
//! ## Purpose
//!
//! Splits oversized sectors into chunks of at most `maximum_payload` samples
//! and orders the chunks so that the heaviest sectors are scheduled first.
//! Each chunk maps one-to-one onto a work unit of a balanced gridding kernel.
//!
//! ## Design notes
//!
//! * **Heuristic ordering**: Sectors are visited by sample count descending
//!   (ties by sector id). Chunks are independent, so the order only affects
//!   scheduling quality, never correctness.
//! * **Early exit**: Once a zero-count sector is reached every later sector is
//!   empty too, so the scan stops.
//!
//! ## Invariants
//!
//! * For each non-empty sector the chunk sizes sum to its sample count.
//! * No chunk holds more than `maximum_payload` samples.
//! * Empty sectors never appear.
//!
//! [`check_processing_order`] enforces the first three on orders that were not
//! computed here (loaded or replaced by the caller).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::histogram::samples_in_sector;
use crate::primitives::errors::NufftError;

/// Default upper bound on samples per balanced work unit.
pub const DEFAULT_MAXIMUM_PAYLOAD: usize = 1024;

/// One balanced work unit: a sector and the offset of the chunk inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProcessingChunk {
    /// Linear sector id.
    pub sector: usize,

    /// Offset of the first sample of this chunk, relative to the sector start.
    pub offset: usize,
}

impl ProcessingChunk {
    /// Create a chunk.
    #[inline]
    pub fn new(sector: usize, offset: usize) -> Self {
        Self { sector, offset }
    }
}

/// Compute the chunk list from a sector offset table.
pub fn compute_processing_order(
    sector_data_count: &[usize],
    maximum_payload: usize,
) -> Vec<ProcessingChunk> {
    let sector_count = sector_data_count.len().saturating_sub(1);

    let mut count_per_sector: Vec<(usize, usize)> = (0..sector_count)
        .map(|s| (s, samples_in_sector(sector_data_count, s)))
        .collect();
    count_per_sector.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut order = Vec::with_capacity(sector_count);
    for &(sector, count) in &count_per_sector {
        if count == 0 {
            break;
        }

        order.push(ProcessingChunk::new(sector, 0));

        // Split the sector
        let mut remaining = count;
        let mut offset = 0;
        while remaining > maximum_payload {
            remaining -= maximum_payload;
            offset += maximum_payload;
            order.push(ProcessingChunk::new(sector, offset));
        }
    }

    order
}

/// Number of samples covered by `chunk`.
#[inline]
pub fn chunk_size(
    chunk: &ProcessingChunk,
    sector_data_count: &[usize],
    maximum_payload: usize,
) -> usize {
    let count = samples_in_sector(sector_data_count, chunk.sector);
    count.saturating_sub(chunk.offset).min(maximum_payload)
}

/// Check that `order` schedules every sample exactly once for `maximum_payload`.
///
/// A non-empty sector with `c` samples must appear in exactly the chunks
/// starting at `0, P, 2P, ...` below `c`, in any order. Empty sectors and
/// out-of-range sectors must not appear. `sector_data_count` must already be
/// a valid offset table.
pub fn check_processing_order(
    order: &[ProcessingChunk],
    sector_data_count: &[usize],
    maximum_payload: usize,
) -> Result<(), NufftError> {
    if maximum_payload == 0 {
        return Err(NufftError::InvalidMaximumPayload(maximum_payload));
    }
    let sector_count = sector_data_count.len().saturating_sub(1);

    let mut scheduled = vec![0usize; sector_count];
    let mut keys = Vec::with_capacity(order.len());
    for (k, chunk) in order.iter().enumerate() {
        let starts_chunk = chunk.sector < sector_count
            && chunk.offset < samples_in_sector(sector_data_count, chunk.sector)
            && chunk.offset % maximum_payload == 0;
        if !starts_chunk {
            return Err(NufftError::InvalidPrecomputed(format!(
                "processing chunk {k} ({}, {}) does not start a chunk of payload {maximum_payload}",
                chunk.sector, chunk.offset
            )));
        }
        scheduled[chunk.sector] += 1;
        keys.push((chunk.sector, chunk.offset));
    }

    keys.sort_unstable();
    if let Some(w) = keys.windows(2).find(|w| w[0] == w[1]) {
        return Err(NufftError::InvalidPrecomputed(format!(
            "processing chunk ({}, {}) is scheduled twice",
            w[0].0, w[0].1
        )));
    }

    // Distinct valid starts, so the count alone decides coverage
    for (sector, &got) in scheduled.iter().enumerate() {
        let expected = samples_in_sector(sector_data_count, sector).div_ceil(maximum_payload);
        if got != expected {
            return Err(NufftError::InvalidPrecomputed(format!(
                "sector {sector} is covered by {got} chunks, expected {expected}"
            )));
        }
    }

    Ok(())
}
