use super::*;

#[test]
fn out_of_range_selectors_fall_back_to_beats() {
    assert_eq!(WaveType::from_index(0), WaveType::Sine);
    assert_eq!(WaveType::from_index(2), WaveType::Square);
    assert_eq!(WaveType::from_index(22), WaveType::Beats);
    assert_eq!(WaveType::from_index(23), WaveType::Beats);
    assert_eq!(WaveType::from_index(-1), WaveType::Beats);
    for (i, w) in WaveType::ALL.iter().enumerate() {
        assert_eq!(w.index(), i);
    }
}

#[test]
fn phase_is_reduced_over_one_period() {
    let period = 2.0 * 3.14159_f32;
    for kind in [WaveType::Triangle, WaveType::Sawtooth, WaveType::Stairs] {
        let a = wave(0.7, kind);
        let b = wave(0.7 + period * 3.0, kind);
        assert!((a - b).abs() < 1e-3, "{kind:?}: {a} vs {b}");
    }
}

#[test]
fn known_values() {
    assert_eq!(wave(0.0, WaveType::Sawtooth), -1.0);
    assert_eq!(wave(0.0, WaveType::InverseSawtooth), 1.0);
    assert_eq!(wave(0.0, WaveType::Triangle), -1.0);
    assert_eq!(wave(0.0, WaveType::Square), 1.0);
    assert_eq!(wave(4.0, WaveType::Square), -1.0);
    assert_eq!(wave(0.0, WaveType::Stairs), -1.0);
    // Pulse peaks at mid-cycle.
    assert!((wave(3.14159, WaveType::Pulse) - 1.0).abs() < 1e-4);
}

#[test]
fn tent_matches_triangle() {
    for i in 0..200 {
        let t = i as f32 * 0.05;
        assert_eq!(wave(t, WaveType::Tent), wave(t, WaveType::Triangle));
    }
}

#[test]
fn heartbeat_has_a_peak_then_a_sharp_drop() {
    assert!((heartbeat(0.2999) - heartbeat(0.3)).abs() < 1e-2);
    assert!((heartbeat(0.3) - 1.0).abs() < 1e-6);
    assert!((heartbeat(0.3999) + 1.0).abs() < 1e-2);
    assert!((heartbeat(0.4) + 0.3).abs() < 1e-6);
    assert!((heartbeat(1.0) + 1.0).abs() < 1e-6);
}
