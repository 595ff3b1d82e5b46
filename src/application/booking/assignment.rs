//! Table assigner
//!
//! Best-fit bin packing: among bookable tables that seat the whole party,
//! the smallest one that is free for the slot wins. Ties go to the lower
//! table id so the choice never depends on storage iteration order.

use tracing::debug;

use crate::domain::{DomainError, DomainResult, ReservationReader, Table, TimeSlot};

/// Tables able to seat `party_size`, best fit first.
pub fn best_fit_candidates(tables: &[Table], party_size: u32) -> Vec<&Table> {
    let mut candidates: Vec<&Table> = tables.iter().filter(|t| t.seats(party_size)).collect();
    candidates.sort_by_key(|t| (t.capacity, t.id));
    candidates
}

/// Picks a single table for a party.
///
/// Reads through whatever [`ReservationReader`] it is handed; the booking
/// guard passes its open transaction so the choice is checked against the
/// same state the insert will be.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableAssigner;

impl TableAssigner {
    pub fn new() -> Self {
        Self
    }

    /// First best-fit candidate with no confirmed overlap on `slot`.
    ///
    /// `FragmentationConflict` when every candidate is busy or none is large
    /// enough, even if the restaurant's aggregate free capacity would suffice.
    pub async fn assign<R>(
        &self,
        reader: &R,
        tables: &[Table],
        slot: &TimeSlot,
        party_size: u32,
    ) -> DomainResult<Table>
    where
        R: ReservationReader + ?Sized,
    {
        for candidate in best_fit_candidates(tables, party_size) {
            let overlapping = reader.count_overlapping(candidate.id, slot).await?;
            if overlapping == 0 {
                debug!(
                    table_id = candidate.id,
                    capacity = candidate.capacity,
                    party_size,
                    "Table assigned"
                );
                return Ok(candidate.clone());
            }
            debug!(table_id = candidate.id, overlapping, "Table busy, trying next");
        }
        Err(DomainError::FragmentationConflict)
    }
}
