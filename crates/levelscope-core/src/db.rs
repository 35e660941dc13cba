//! Decibel range shared by every meter.

/// Top of the meter scale.
pub const MAX_DECIBELS: f32 = 6.0;

/// Bottom of the meter scale. Anything quieter reads as this floor.
pub const NEGATIVE_INFINITY_DB: f32 = -48.0;

/// Convert linear gain to dB, returning `floor` for silence.
#[inline]
pub fn gain_to_db(gain: f32, floor: f32) -> f32 {
    if gain > 0.0 {
        (20.0 * gain.log10()).max(floor)
    } else {
        floor
    }
}

/// Convert dB to linear gain.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Clamp to the meter scale.
#[inline]
pub fn clamp_to_scale(db: f32) -> f32 {
    db.clamp(NEGATIVE_INFINITY_DB, MAX_DECIBELS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gain_to_db() {
        assert_relative_eq!(gain_to_db(1.0, NEGATIVE_INFINITY_DB), 0.0);
        assert_relative_eq!(gain_to_db(0.5, NEGATIVE_INFINITY_DB), -6.0206, epsilon = 1e-3);
        assert_eq!(gain_to_db(0.0, NEGATIVE_INFINITY_DB), NEGATIVE_INFINITY_DB);
        assert_eq!(gain_to_db(1e-9, NEGATIVE_INFINITY_DB), NEGATIVE_INFINITY_DB);
    }

    #[test]
    fn test_db_to_gain_inverts() {
        assert_relative_eq!(db_to_gain(-3.0), 0.70795, epsilon = 1e-4);
        assert_relative_eq!(gain_to_db(db_to_gain(-12.0), -100.0), -12.0, epsilon = 1e-4);
    }
}
