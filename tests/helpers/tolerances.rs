//! Tolerance constants for metering tests.

/// Floating point rounding errors.
/// Use for operations that should be mathematically exact.
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Level conversions (gain to dB and back).
pub const DB_EPSILON: f32 = 0.01;

/// Correlation once the low-pass filters have settled.
/// Zero crossings contribute a few degenerate samples per block.
pub const CORRELATION_EPSILON: f32 = 0.01;
