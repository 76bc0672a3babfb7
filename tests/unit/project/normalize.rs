use super::*;
use crate::project::dsl::{BeatBuilder, ProjectBuilder, title_card};

#[test]
fn drops_ineligible_beats_and_keeps_order() {
    let project = ProjectBuilder::new()
        .beat(BeatBuilder::new().title(title_card("a", 1000)).build())
        .beat(Beat {
            sound_url: Some("/api/audios/orphan.mp3".to_string()),
            sound_volume: Some(100.0),
            ..Beat::default()
        })
        .beat(BeatBuilder::new().gap(2000).build())
        .build();

    let norm = normalize(&project);
    assert_eq!(norm.skipped, 1);
    assert_eq!(
        norm.beats.iter().map(|b| b.index).collect::<Vec<_>>(),
        vec![0, 2]
    );
    assert_eq!(norm.authored_frames, 25 + 50);
}

#[test]
fn rounds_each_segment_independently() {
    // Three 20ms plans: 1 frame each, not round(60ms) = 2 frames once.
    let project = ProjectBuilder::new()
        .beat(BeatBuilder::new().gap(20).gap(20).gap(20).build())
        .build();
    let norm = normalize(&project);
    assert_eq!(norm.beats[0].plan_frames, vec![1, 1, 1]);
    assert_eq!(norm.beats[0].total_frames(), 3);
    assert_eq!(norm.authored_frames, 3);
}

#[test]
fn empty_project_normalizes_to_nothing() {
    let project = Project::default();
    let norm = normalize(&project);
    assert!(norm.beats.is_empty());
    assert_eq!(norm.authored_frames, 0);
}
