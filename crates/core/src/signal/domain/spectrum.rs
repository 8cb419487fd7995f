//! Spectral pulse-rate estimate from a filtered signal.
//!
//! Diagnostic only; the predicted heart rate comes from the regressor.

use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::signal::domain::signal::FilteredSignal;

/// Minimum FFT length, so short clips still get sub-bpm bin spacing.
const MIN_FFT_LEN: usize = 1024;

/// Strongest frequency within `[low_hz, high_hz]`, in beats per minute.
///
/// Returns `None` for an empty or silent signal, an invalid rate, or a band
/// that falls outside the spectrum.
pub fn dominant_frequency_bpm(signal: &FilteredSignal, low_hz: f64, high_hz: f64) -> Option<f64> {
    if signal.is_empty() || !(signal.fps.is_finite() && signal.fps > 0.0) {
        return None;
    }

    let spectrum = power_spectrum(&signal.samples);
    let n = spectrum.len() * 2;
    let resolution = signal.fps / n as f64;

    let min_bin = (low_hz / resolution).ceil().max(1.0) as usize;
    let max_bin = ((high_hz / resolution).floor() as usize).min(spectrum.len() - 1);
    if min_bin > max_bin {
        return None;
    }

    let (peak_bin, peak_power) = (min_bin..=max_bin)
        .map(|i| (i, spectrum[i]))
        .fold((min_bin, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if peak_power <= f64::EPSILON {
        return None;
    }

    Some(peak_bin as f64 * resolution * 60.0)
}

/// One-sided power spectrum of the Hann-windowed, zero-padded signal.
fn power_spectrum(samples: &[f64]) -> Vec<f64> {
    let len = samples.len();
    let n = len.next_power_of_two().max(MIN_FFT_LEN);
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let window = if len > 1 {
                0.5 - 0.5 * (2.0 * PI * i as f64 / (len - 1) as f64).cos()
            } else {
                1.0
            };
            Complex::new(x * window, 0.0)
        })
        .collect();
    buffer.resize(n, Complex::new(0.0, 0.0));

    fft.process(&mut buffer);

    buffer.iter().take(n / 2).map(|c| c.norm_sqr()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sine(freq_hz: f64, fps: f64, n: usize) -> FilteredSignal {
        FilteredSignal {
            samples: (0..n)
                .map(|i| (2.0 * PI * freq_hz * i as f64 / fps).sin())
                .collect(),
            fps,
        }
    }

    #[rstest]
    #[case(1.2, 72.0)]
    #[case(1.0, 60.0)]
    #[case(2.5, 150.0)]
    fn test_finds_pulse_frequency(#[case] freq_hz: f64, #[case] expected_bpm: f64) {
        let bpm = dominant_frequency_bpm(&sine(freq_hz, 30.0, 300), 0.75, 4.0).unwrap();
        // 1024-point FFT at 30 fps: bins are ~1.76 bpm apart
        assert!((bpm - expected_bpm).abs() < 2.0, "got {bpm}");
    }

    #[test]
    fn test_ignores_out_of_band_peak() {
        let mut signal = sine(1.2, 30.0, 300);
        for (i, s) in signal.samples.iter_mut().enumerate() {
            *s += 3.0 * (2.0 * PI * 8.0 * i as f64 / 30.0).sin();
        }
        let bpm = dominant_frequency_bpm(&signal, 0.75, 4.0).unwrap();
        assert!((bpm - 72.0).abs() < 2.0);
    }

    #[test]
    fn test_silent_signal_has_no_peak() {
        let signal = FilteredSignal {
            samples: vec![0.0; 120],
            fps: 30.0,
        };
        assert_eq!(dominant_frequency_bpm(&signal, 0.75, 4.0), None);
    }

    #[test]
    fn test_empty_signal_or_bad_rate() {
        let empty = FilteredSignal {
            samples: Vec::new(),
            fps: 30.0,
        };
        assert_eq!(dominant_frequency_bpm(&empty, 0.75, 4.0), None);
        let mut no_rate = sine(1.2, 30.0, 100);
        no_rate.fps = 0.0;
        assert_eq!(dominant_frequency_bpm(&no_rate, 0.75, 4.0), None);
    }

    #[test]
    fn test_band_above_nyquist() {
        assert_eq!(dominant_frequency_bpm(&sine(1.2, 30.0, 100), 20.0, 25.0), None);
    }
}
