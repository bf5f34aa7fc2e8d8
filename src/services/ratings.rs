/// Mean of the star ratings, or `None` when there are no reviews.
pub fn average_stars(ratings: &[i64]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }

    let sum: i64 = ratings.iter().sum();
    Some(sum as f64 / ratings.len() as f64)
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
