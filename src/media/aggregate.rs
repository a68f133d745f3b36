use super::MediaError;

/// Lowest accepted rating, inclusive
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted rating, inclusive
pub const MAX_RATING: f64 = 10.0;

const AVERAGE_TOLERANCE: f64 = 1e-9;

/// Running rating aggregate of a media record.
///
/// Only the sum and count of submitted ratings are kept; the average is
/// derived from them on every submission.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingAggregate {
    pub ratings_count: u64,
    pub unprocessed_rating: f64,
    pub average_rating: f64,
}

impl RatingAggregate {
    /// Fold one submitted rating into the aggregate
    pub fn apply(self, submitted: f64) -> Self {
        let ratings_count = self.ratings_count + 1;
        let unprocessed_rating = self.unprocessed_rating + submitted;

        Self {
            ratings_count,
            unprocessed_rating,
            average_rating: unprocessed_rating / ratings_count as f64,
        }
    }

    /// Mean of all submitted ratings, `None` while nothing has been rated
    pub fn average(&self) -> Option<f64> {
        if self.ratings_count == 0 {
            return None;
        }
        Some(self.unprocessed_rating / self.ratings_count as f64)
    }

    /// Whether the stored average agrees with sum / count
    pub fn is_consistent(&self) -> bool {
        match self.average() {
            Some(expected) => (self.average_rating - expected).abs() <= AVERAGE_TOLERANCE,
            None => self.unprocessed_rating == 0.0 && self.average_rating == 0.0,
        }
    }
}

/// Check that a submitted rating lies in `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rating: f64) -> Result<f64, MediaError> {
    if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(MediaError::InvalidArgument(format!(
            "mediaRating must be between {} and {}, inclusive",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating)
}
