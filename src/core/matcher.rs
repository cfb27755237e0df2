use crate::core::pool::WaitingPool;
use crate::models::{PlayerId, WaitingEntry};

/// Result of a successful partner search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub requester: PlayerId,
    pub partner: PlayerId,
}

/// Partner selection over the waiting pool
///
/// # Pipeline Stages
/// 1. Exclude the requester's own entry
/// 2. Exclude entries sharing the requester's stable profile id
/// 3. Pick the earliest `joined_at` (FIFO)
///
/// Ties on `joined_at` fall back to pool iteration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matchmaker;

impl Matchmaker {
    pub fn new() -> Self {
        Self
    }

    /// Find a partner for `requester`, or `None` if it is not waiting or
    /// nobody eligible is.
    pub fn find_partner(&self, pool: &WaitingPool, requester: PlayerId) -> Option<MatchResult> {
        let current = pool.get(&requester)?;

        pool.iter()
            // Stage 1: never pair with yourself
            .filter(|(id, _)| **id != requester)
            // Stage 2: never pair two connections of the same profile
            .filter(|(_, entry)| is_distinct_profile(current, entry))
            // Stage 3: longest waiting first
            .min_by_key(|(_, entry)| entry.joined_at)
            .map(|(partner, _)| MatchResult {
                requester,
                partner: *partner,
            })
    }
}

#[inline]
fn is_distinct_profile(current: &WaitingEntry, candidate: &WaitingEntry) -> bool {
    current.profile.unique_id != candidate.profile.unique_id
}
