//! Window-method FIR low-pass design and filtering.

use std::f64::consts::PI;
use std::sync::Arc;

/// Hann window of `size` points, not normalised: `0.5 - 0.5 cos(2πi / (size - 1))`.
pub fn hann_window(size: usize) -> Vec<f64> {
    match size {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => (0..size)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (size - 1) as f64).cos())
            .collect(),
    }
}

/// Design an `order + 1` tap low-pass with the window method (Hann window).
///
/// The ideal sinc response is sampled around the centre tap and tapered by the
/// window. Very low orders degenerate to a scaled delay: order 2 yields
/// `[0, 2 * cutoff / sample_rate, 0]`.
pub fn design_fir_lowpass(cutoff_hz: f32, sample_rate: f64, order: usize) -> Arc<[f32]> {
    let normalised = cutoff_hz as f64 / sample_rate;
    let centre = 0.5 * order as f64;
    let window = hann_window(order + 1);

    (0..=order)
        .map(|i| {
            let ideal = if i == order / 2 {
                2.0 * normalised
            } else {
                let indice = PI * (i as f64 - centre);
                (2.0 * indice * normalised).sin() / indice
            };
            (ideal * window[i]) as f32
        })
        .collect()
}

/// Direct-form FIR filter over a shared coefficient set.
#[derive(Debug, Clone)]
pub struct FirFilter {
    coefficients: Arc<[f32]>,
    history: Vec<f32>,
    pos: usize,
}

impl FirFilter {
    pub fn new(coefficients: Arc<[f32]>) -> Self {
        let len = coefficients.len().max(1);
        Self {
            coefficients,
            history: vec![0.0; len],
            pos: 0,
        }
    }

    /// Install new coefficients and clear the delay line.
    pub fn set_coefficients(&mut self, coefficients: Arc<[f32]>) {
        let len = coefficients.len().max(1);
        self.coefficients = coefficients;
        self.history.clear();
        self.history.resize(len, 0.0);
        self.pos = 0;
    }

    pub fn coefficients(&self) -> &Arc<[f32]> {
        &self.coefficients
    }

    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.pos = 0;
    }

    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let len = self.history.len();
        self.history[self.pos] = input;

        // y[n] = sum_k c[k] * x[n - k]
        let mut out = 0.0f32;
        let mut idx = self.pos;
        for &c in self.coefficients.iter() {
            out += c * self.history[idx];
            idx = if idx == 0 { len - 1 } else { idx - 1 };
        }

        self.pos = (self.pos + 1) % len;
        out
    }
}
