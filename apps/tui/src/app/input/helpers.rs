pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Slider step: move by `delta`, snap to hundredths, stay inside `range`.
pub fn step_clamped(value: f64, delta: f64, range: (f64, f64)) -> f64 {
    let stepped = ((value + delta) * 100.0).round() / 100.0;
    stepped.clamp(range.0, range.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_handles_empty_and_edges() {
        assert_eq!(wrap_increment(0, 0), 0);
        assert_eq!(wrap_decrement(0, 0), 0);
        assert_eq!(wrap_increment(2, 3), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
    }

    #[test]
    fn slider_steps_snap_to_hundredths() {
        assert!((step_clamped(0.15, 0.01, (0.0, 0.5)) - 0.16).abs() < f64::EPSILON);
        assert!((step_clamped(0.5, 0.01, (0.0, 0.5)) - 0.5).abs() < f64::EPSILON);
        assert!((step_clamped(-0.5, -0.01, (-0.5, 0.5)) + 0.5).abs() < f64::EPSILON);
        assert!((step_clamped(0.07, 0.01, (0.0, 0.5)) - 0.08).abs() < f64::EPSILON);
    }
}
