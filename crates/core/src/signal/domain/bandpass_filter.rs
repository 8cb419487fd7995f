//! Zero-phase Butterworth bandpass for the heart-rate band.
//!
//! Coefficients follow the classic analog-prototype design: Butterworth
//! poles, lowpass-to-bandpass transform, then a prewarped bilinear
//! transform. Filtering runs forward and backward over an odd-extended
//! signal with steady-state initial conditions, so a constant input maps to
//! zero and passband components keep their timing.

use std::f64::consts::PI;

use rustfft::num_complex::Complex64;

use crate::shared::error::VitalsError;
use crate::signal::domain::signal::{FilteredSignal, RawSignal};

pub const DEFAULT_LOW_CUTOFF_HZ: f64 = 0.75;
pub const DEFAULT_HIGH_CUTOFF_HZ: f64 = 4.0;
pub const DEFAULT_ORDER: usize = 1;
pub const DEFAULT_MIN_SAMPLES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandpassConfig {
    pub low_cutoff_hz: f64,
    pub high_cutoff_hz: f64,
    pub order: usize,
    pub min_samples: usize,
}

impl Default for BandpassConfig {
    fn default() -> Self {
        Self {
            low_cutoff_hz: DEFAULT_LOW_CUTOFF_HZ,
            high_cutoff_hz: DEFAULT_HIGH_CUTOFF_HZ,
            order: DEFAULT_ORDER,
            min_samples: DEFAULT_MIN_SAMPLES,
        }
    }
}

impl BandpassConfig {
    /// Checks the parts of the config that do not depend on the sampling rate.
    pub fn validate(&self) -> Result<(), String> {
        if self.order == 0 {
            return Err("Filter order must be at least 1".to_string());
        }
        if !(self.low_cutoff_hz > 0.0 && self.low_cutoff_hz < self.high_cutoff_hz) {
            return Err(format!(
                "Cutoffs must satisfy 0 < low < high, got {} and {}",
                self.low_cutoff_hz, self.high_cutoff_hz
            ));
        }
        Ok(())
    }
}

/// Transfer function coefficients, `a[0] == 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Coefficients {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct BandpassFilter {
    config: BandpassConfig,
}

impl BandpassFilter {
    pub fn new(config: BandpassConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BandpassConfig {
        &self.config
    }

    /// Filters `raw` at its own sampling rate.
    ///
    /// Every precondition or numerical failure is reported as
    /// `VitalsError::InsufficientSignal`.
    pub fn apply(&self, raw: &RawSignal) -> Result<FilteredSignal, VitalsError> {
        let insufficient = VitalsError::InsufficientSignal;
        let n = raw.len();
        if n < self.config.min_samples {
            return Err(insufficient(format!(
                "signal has {n} samples, need at least {}",
                self.config.min_samples
            )));
        }
        if !(raw.fps.is_finite() && raw.fps > 0.0) {
            return Err(insufficient(format!("invalid sampling rate {}", raw.fps)));
        }
        self.config.validate().map_err(insufficient)?;

        let nyquist = 0.5 * raw.fps;
        let low = self.config.low_cutoff_hz / nyquist;
        let high = self.config.high_cutoff_hz / nyquist;
        if !(0.0 < low && low < high && high < 1.0) {
            return Err(insufficient(format!(
                "cutoffs {}-{} Hz do not fit below Nyquist {nyquist} Hz",
                self.config.low_cutoff_hz, self.config.high_cutoff_hz
            )));
        }

        let coeffs = butter_bandpass(self.config.order, low, high).map_err(insufficient)?;
        let samples = filtfilt(&coeffs, &raw.samples).map_err(insufficient)?;
        log::debug!(
            "Bandpass {}-{} Hz (order {}) over {n} samples at {:.2} fps",
            self.config.low_cutoff_hz,
            self.config.high_cutoff_hz,
            self.config.order,
            raw.fps
        );

        Ok(FilteredSignal {
            samples,
            fps: raw.fps,
        })
    }
}

/// Digital Butterworth bandpass of the given order.
///
/// `low` and `high` are normalized to Nyquist and must satisfy `0 < low < high < 1`.
pub fn butter_bandpass(order: usize, low: f64, high: f64) -> Result<Coefficients, String> {
    if order == 0 {
        return Err("filter order must be at least 1".to_string());
    }
    if !(0.0 < low && low < high && high < 1.0) {
        return Err(format!("normalized cutoffs {low}, {high} outside (0, 1)"));
    }

    // Analog lowpass prototype with unit cutoff
    let n = order as f64;
    let prototype: Vec<Complex64> = (0..order)
        .map(|k| {
            let m = -n + 1.0 + 2.0 * k as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect();

    // Prewarp for a bilinear transform at fs = 2
    let warped_low = 4.0 * (PI * low / 2.0).tan();
    let warped_high = 4.0 * (PI * high / 2.0).tan();
    let bandwidth = warped_high - warped_low;
    let center_sq = warped_low * warped_high;

    // Lowpass -> bandpass: each pole splits in two, `order` zeros at s = 0
    let mut analog_poles = Vec::with_capacity(2 * order);
    for p in &prototype {
        let scaled = p * (bandwidth / 2.0);
        let offset = (scaled * scaled - center_sq).sqrt();
        analog_poles.push(scaled + offset);
        analog_poles.push(scaled - offset);
    }
    let analog_gain = bandwidth.powi(order as i32);

    // Bilinear: s = 0 maps to z = 1, the excess degree lands at z = -1
    let four = Complex64::new(4.0, 0.0);
    let poles: Vec<Complex64> = analog_poles.iter().map(|p| (four + p) / (four - p)).collect();
    let mut zeros = vec![Complex64::new(1.0, 0.0); order];
    zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(order));

    let denominator: Complex64 = analog_poles.iter().map(|p| four - p).product();
    let gain = (Complex64::new(analog_gain * 4f64.powi(order as i32), 0.0) / denominator).re;

    let b: Vec<f64> = poly(&zeros).iter().map(|c| c.re * gain).collect();
    let a: Vec<f64> = poly(&poles).iter().map(|c| c.re).collect();

    if b.iter().chain(a.iter()).any(|v| !v.is_finite()) {
        return Err("filter design produced non-finite coefficients".to_string());
    }
    Ok(Coefficients { b, a })
}

/// Monic polynomial with the given roots, highest power first.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for r in roots {
        let mut next = coeffs.clone();
        next.push(Complex64::new(0.0, 0.0));
        for i in 1..next.len() {
            next[i] -= r * coeffs[i - 1];
        }
        coeffs = next;
    }
    coeffs
}

/// Forward-backward filtering with odd extension of `3 * len(a)` samples.
pub fn filtfilt(coeffs: &Coefficients, x: &[f64]) -> Result<Vec<f64>, String> {
    let pad = 3 * coeffs.a.len().max(coeffs.b.len());
    if x.len() <= pad {
        return Err(format!(
            "signal has {} samples, filter needs more than {pad}",
            x.len()
        ));
    }

    let zi = lfilter_zi(coeffs)?;
    let ext = odd_extend(x, pad);

    let forward_zi: Vec<f64> = zi.iter().map(|z| z * ext[0]).collect();
    let mut y = lfilter(coeffs, &ext, forward_zi);
    y.reverse();

    let backward_zi: Vec<f64> = zi.iter().map(|z| z * y[0]).collect();
    let mut y = lfilter(coeffs, &y, backward_zi);
    y.reverse();

    let out = y[pad..y.len() - pad].to_vec();
    if out.iter().any(|v| !v.is_finite()) {
        return Err("filter output is not finite".to_string());
    }
    Ok(out)
}

/// Extends `x` by `n` samples on each side, mirrored through the end points.
fn odd_extend(x: &[f64], n: usize) -> Vec<f64> {
    let last = x.len() - 1;
    let mut ext = Vec::with_capacity(x.len() + 2 * n);
    ext.extend((1..=n).rev().map(|i| 2.0 * x[0] - x[i]));
    ext.extend_from_slice(x);
    ext.extend((1..=n).map(|i| 2.0 * x[last] - x[last - i]));
    ext
}

/// Initial state giving the steady-state response to a unit step.
fn lfilter_zi(coeffs: &Coefficients) -> Result<Vec<f64>, String> {
    let (b, a) = (&coeffs.b, &coeffs.a);
    let n = a.len().max(b.len());
    if n < 2 {
        return Ok(Vec::new());
    }

    let a_sum: f64 = a.iter().sum();
    if a_sum.abs() < 1e-12 {
        return Err("filter has a pole at z = 1".to_string());
    }

    let b0 = b[0];
    let forcing: f64 = (1..n).map(|k| b[k] - a[k] * b0).sum();
    let mut zi = vec![0.0; n - 1];
    zi[0] = forcing / a_sum;

    let mut a_acc = 1.0;
    let mut c_acc = 0.0;
    for k in 1..n - 1 {
        a_acc += a[k];
        c_acc += b[k] - a[k] * b0;
        zi[k] = a_acc * zi[0] - c_acc;
    }
    Ok(zi)
}

/// Direct form II transposed IIR filter.
fn lfilter(coeffs: &Coefficients, x: &[f64], mut z: Vec<f64>) -> Vec<f64> {
    let (b, a) = (&coeffs.b, &coeffs.a);
    let order = z.len();
    let mut y = Vec::with_capacity(x.len());

    for &xn in x {
        let yn = b[0] * xn + z.first().copied().unwrap_or(0.0);
        for i in 0..order {
            let next = if i + 1 < order { z[i + 1] } else { 0.0 };
            z[i] = b[i + 1] * xn + next - a[i + 1] * yn;
        }
        y.push(yn);
    }
    y
}
