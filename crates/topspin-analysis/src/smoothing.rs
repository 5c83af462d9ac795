//! Signal smoothing for angular-velocity analysis.

/// Edge-clamped moving average.
///
/// Each element becomes the mean of the window centered on it, clamped to
/// the signal bounds, so the output keeps the input's length. Signals
/// shorter than the window are returned unchanged.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || signal.len() < window {
        return signal.to_vec();
    }

    let half = window / 2;
    (0..signal.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(signal.len());
            let slice = &signal[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_window_three() {
        let smoothed = moving_average(&[0.0, 3.0, 6.0, 9.0], 3);
        let expected = [1.5, 3.0, 6.0, 7.5];
        for (got, want) in smoothed.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {:?}", smoothed);
        }
    }

    #[test]
    fn test_moving_average_preserves_length() {
        assert_eq!(moving_average(&[1.0; 50], 3).len(), 50);
    }

    #[test]
    fn test_short_signal_unchanged() {
        assert_eq!(moving_average(&[5.0, 7.0], 3), vec![5.0, 7.0]);
        assert!(moving_average(&[], 3).is_empty());
    }
}
