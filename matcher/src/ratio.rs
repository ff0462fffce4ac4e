use crate::{MatchError, Result};
use bfmatch_core::{Matches, NeighborList};

pub const DEFAULT_RATIO: f64 = 0.75;

/// Lowe's ratio test.
///
/// Keeps the nearest neighbor of a query only when it is strictly closer than
/// `ratio` times the second-nearest. Queries with fewer than two neighbors are
/// skipped. Accepted matches keep the order of `neighbor_lists`.
pub fn ratio_test(neighbor_lists: &[NeighborList], ratio: f64) -> Result<Matches> {
    validate_ratio(ratio)?;

    let mut good_matches = Matches::with_capacity(neighbor_lists.len());

    for list in neighbor_lists {
        let (best, second) = match (list.best(), list.second()) {
            (Some(best), Some(second)) => (best, second),
            _ => continue,
        };

        if best.distance < ratio * second.distance {
            good_matches.push(*best);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "ratio test: {} of {} queries accepted at ratio {}",
        good_matches.len(),
        neighbor_lists.len(),
        ratio
    );

    Ok(good_matches)
}

pub(crate) fn validate_ratio(ratio: f64) -> Result<()> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(MatchError::InvalidArgument(format!(
            "ratio must be a finite value > 0, got {}",
            ratio
        )));
    }

    if ratio >= 1.0 {
        #[cfg(feature = "tracing")]
        tracing::debug!("ratio {} >= 1 accepts ambiguous matches", ratio);
    }

    Ok(())
}
