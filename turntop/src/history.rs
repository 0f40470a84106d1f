//! Small utilities to manage bounded history buffers for charts.

use std::collections::VecDeque;

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

fn window(dq: &VecDeque<f64>, width: usize) -> impl Iterator<Item = f64> + '_ {
    dq.iter().skip(dq.len().saturating_sub(width)).copied()
}

/// Largest of the newest `width` samples, the same window the sparkline shows.
pub fn window_peak(dq: &VecDeque<f64>, width: usize) -> Option<f64> {
    window(dq, width).reduce(f64::max)
}

/// Scale the newest `width` samples into 0..=100 against the window's own peak,
/// which is what the sparkline widget expects.
pub fn sparkline_points(dq: &VecDeque<f64>, width: usize) -> Vec<u64> {
    let peak = window_peak(dq, width).unwrap_or(0.0);
    if peak <= 0.0 {
        return vec![0; window(dq, width).count()];
    }
    window(dq, width)
        .map(|v| ((v.max(0.0) / peak) * 100.0).round() as u64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_capped_drops_oldest() {
        let mut dq = VecDeque::new();
        for v in 0..5 {
            push_capped(&mut dq, v, 3);
        }
        assert_eq!(dq, VecDeque::from(vec![2, 3, 4]));
    }

    #[test]
    fn sparkline_scales_to_window_peak() {
        let dq: VecDeque<f64> = vec![1.0, 2.0, 4.0].into();
        assert_eq!(sparkline_points(&dq, 10), vec![25, 50, 100]);
        assert_eq!(sparkline_points(&dq, 2), vec![50, 100]);
    }

    #[test]
    fn peak_covers_only_the_drawn_window() {
        let dq: VecDeque<f64> = vec![9.0, 2.0, 4.0].into();
        assert_eq!(window_peak(&dq, 120), Some(9.0));
        assert_eq!(window_peak(&dq, 2), Some(4.0));
        assert_eq!(window_peak(&dq, 0), None);
        assert_eq!(window_peak(&VecDeque::new(), 10), None);
    }
}
