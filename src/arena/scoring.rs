//! Very small Elo helper (K-factor 32 by default)

/// Rating assigned to a profile that has never battled.
pub const DEFAULT_RATING: i32 = 1000;

/// Default K-factor.
pub const DEFAULT_K: f64 = 32.0;

/// Probability that a profile rated `a` beats a profile rated `b`.
/// Complement-symmetric: `expected(a, b) + expected(b, a) == 1`.
pub fn expected_score(a: i32, b: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((b - a) as f64 / 400.0))
}

/// Returns (new_winner, new_loser) ratings after one decided battle.
/// Each rating is rounded exactly once, so the two deltas stay equal
/// and opposite before rounding.
pub fn rating_update(winner: i32, loser: i32, k: f64) -> (i32, i32) {
    debug_assert!(k.is_finite() && k > 0.0);
    let e_winner = expected_score(winner, loser);
    let e_loser = expected_score(loser, winner);
    let new_winner = (winner as f64 + k * (1.0 - e_winner)).round() as i32;
    let new_loser = (loser as f64 + k * (0.0 - e_loser)).round() as i32;
    (new_winner, new_loser)
}
