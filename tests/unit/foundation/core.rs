use super::*;

#[test]
fn ms_to_frames_rounds_half_away_from_zero() {
    let fps = Fps { num: 25, den: 1 };
    assert_eq!(fps.ms_to_frames_round(0), 0);
    assert_eq!(fps.ms_to_frames_round(19), 0);
    // 20ms is exactly half a frame at 25fps.
    assert_eq!(fps.ms_to_frames_round(20), 1);
    assert_eq!(fps.ms_to_frames_round(60), 2);
    assert_eq!(fps.ms_to_frames_round(999), 25);
    assert_eq!(fps.ms_to_frames_round(1000), 25);
}

#[test]
fn ms_to_frames_handles_fractional_rates() {
    let fps = Fps {
        num: 30000,
        den: 1001,
    };
    assert_eq!(fps.ms_to_frames_round(1001), 30);
}

#[test]
fn default_profile_is_full_hd_25() {
    let p = Profile::default();
    assert_eq!(p.canvas.width, 1920);
    assert_eq!(p.canvas.height, 1080);
    assert_eq!(p.fps, Fps { num: 25, den: 1 });
    assert_eq!(p.colorspace, "709");
}
