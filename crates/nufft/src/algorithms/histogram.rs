//! Per-sector offsets (CSR-style histogram).
//!
//! ## Purpose
//!
//! Turns the sector ids of the sorted samples into an offset table: the
//! samples of sector `s` occupy sorted positions `offsets[s]..offsets[s + 1]`.
//!
//! ## Design notes
//!
//! * Single forward scan with a cursor that advances over each sector's run,
//!   O(n + sector_count).
//!
//! ## Invariants
//!
//! * Output length is `sector_count + 1`.
//! * `offsets[0] == 0`, `offsets[sector_count] == n` and the table is
//!   non-decreasing.
//! * Empty sectors produce `offsets[s] == offsets[s + 1]`.
//!
//! ## Non-goals
//!
//! * This module does not sort; the input must already be non-decreasing.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Compute the offset table for sorted sector ids.
pub fn sector_data_count(sorted_sectors: &[usize], sector_count: usize) -> Vec<usize> {
    let n = sorted_sectors.len();
    let mut offsets = Vec::with_capacity(sector_count + 1);
    let mut cursor = 0usize;

    offsets.push(0);
    for sector in 0..sector_count {
        while cursor < n && sorted_sectors[cursor] == sector {
            cursor += 1;
        }
        offsets.push(cursor);
    }

    offsets
}

/// Number of samples in sector `s` according to an offset table.
#[inline]
pub fn samples_in_sector(offsets: &[usize], s: usize) -> usize {
    offsets[s + 1] - offsets[s]
}
