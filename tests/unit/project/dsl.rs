use super::*;

#[test]
fn builders_assemble_project() {
    let project = ProjectBuilder::new()
        .beat(
            BeatBuilder::new()
                .title(title_card("Hello", 2000))
                .image("/api/images/a.jpg", 3000)
                .gap(1000)
                .voice("/api/audios/v.mp3", 80.0, 250)
                .build(),
        )
        .sound("/api/audios/m.mp3", 30.0, -1000)
        .build();

    assert_eq!(project.beats.len(), 1);
    let beat = &project.beats[0];
    assert_eq!(beat.plans.len(), 2);
    assert_eq!(beat.plans[1].image(), None);
    assert_eq!(beat.sound().unwrap().begin_offset_ms, 250);
    assert_eq!(project.sound().unwrap().volume, 30.0);
}
