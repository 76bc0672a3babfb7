use super::*;
use crate::{
    project::dsl::{BeatBuilder, ProjectBuilder, title_card},
    project::normalize::normalize,
    resources::collector::UrlMode,
};

fn build(project: &crate::Project) -> (Timeline, crate::Manifest) {
    let mut resources = ResourceCollector::new(UrlMode::Local, "/api", "");
    let normalized = normalize(project);
    let timeline = build_timeline(&normalized, project.sound(), Profile::HD_25, &mut resources);
    (timeline, resources.into_manifest())
}

fn entry(producer: &str, in_frame: u64, out_frame: u64) -> PlaylistItem {
    PlaylistItem::Entry {
        producer: producer.to_string(),
        in_frame,
        out_frame,
    }
}

#[test]
fn title_then_image_fill_video_track() {
    let project = ProjectBuilder::new()
        .beat(
            BeatBuilder::new()
                .title(title_card("Hi", 2000))
                .image("/api/images/x.png", 3000)
                .build(),
        )
        .build();
    let (tl, manifest) = build(&project);

    assert_eq!(
        tl.video.items,
        vec![entry("producer1", 0, 50), entry("producer2", 0, 75)]
    );
    assert_eq!(tl.beat_audio.items, vec![PlaylistItem::Blank { length: 125 }]);
    assert!(tl.project_audio.items.is_empty());
    assert_eq!(tl.durations.total_frames(), 125);
    assert_eq!(manifest.files[0].assigned_name, "image_1.png");

    let Filter::DynamicText(text) = &tl.producers[0].filters[0] else {
        panic!("expected text filter on title producer");
    };
    assert_eq!(text.id, "filterForProducer1");
    assert_eq!(text.text, "Hi");
    assert_eq!(text.family, "Arial");
    assert_eq!(
        tl.producers[1].source,
        ProducerSource::Image {
            resource: "image_1.png".to_string()
        }
    );
}

#[test]
fn plan_without_image_is_a_blank() {
    let project = ProjectBuilder::new()
        .beat(BeatBuilder::new().gap(1000).image("/api/images/a.jpg", 1000).build())
        .build();
    let (tl, _) = build(&project);
    assert_eq!(
        tl.video.items,
        vec![PlaylistItem::Blank { length: 25 }, entry("producer1", 0, 25)]
    );
    assert_eq!(tl.producers.len(), 1);
}

#[test]
fn positive_offset_adds_leading_blank() {
    let project = ProjectBuilder::new()
        .beat(
            BeatBuilder::new()
                .image("/api/images/a.jpg", 4000)
                .voice("/api/audios/v.mp3", 100.0, 500)
                .build(),
        )
        .build();
    let (tl, _) = build(&project);

    assert_eq!(
        tl.beat_audio.items,
        vec![PlaylistItem::Blank { length: 13 }, entry("producer2", 0, 87)]
    );
    let audio = &tl.producers[1];
    assert_eq!((audio.in_frame, audio.out_frame, audio.length), (0, 87, 87));
    assert!(audio.filters.is_empty(), "unity gain has no volume filter");
}

#[test]
fn negative_offset_trims_clip_start() {
    let project = ProjectBuilder::new()
        .beat(
            BeatBuilder::new()
                .image("/api/images/a.jpg", 4000)
                .voice("/api/audios/v.mp3", 50.0, -500)
                .build(),
        )
        .build();
    let (tl, _) = build(&project);

    assert_eq!(tl.beat_audio.items, vec![entry("producer2", 0, 100)]);
    let audio = &tl.producers[1];
    assert_eq!(audio.in_frame, 13);
    assert_eq!(audio.out_frame, 113);
    assert_eq!(audio.length, 100);
    assert_eq!(audio.filters.len(), 1);
    let Filter::Volume(v) = &audio.filters[0] else {
        panic!("expected volume filter");
    };
    assert_eq!(v.level_db, -6.02);
    assert_eq!(v.out_frame, 100);
    assert_eq!(v.id, "filterForProducer2");
}

#[test]
fn offset_longer_than_beat_leaves_empty_clip() {
    let project = ProjectBuilder::new()
        .beat(
            BeatBuilder::new()
                .image("/api/images/a.jpg", 1000)
                .voice("/api/audios/v.mp3", 100.0, 3000)
                .build(),
        )
        .build();
    let (tl, _) = build(&project);
    assert_eq!(
        tl.beat_audio.items,
        vec![PlaylistItem::Blank { length: 25 }, entry("producer2", 0, 0)]
    );
    assert_eq!(tl.beat_audio.total_frames(), tl.video.total_frames());
}

#[test]
fn project_sound_spans_whole_composition() {
    let project = ProjectBuilder::new()
        .beat(BeatBuilder::new().title(title_card("a", 1000)).build())
        .beat(BeatBuilder::new().image("/api/images/a.jpg", 2000).build())
        .sound("/api/audios/music.ogg", 30.0, 1000)
        .build();
    let (tl, manifest) = build(&project);

    assert_eq!(
        tl.project_audio.items,
        vec![PlaylistItem::Blank { length: 25 }, entry("producer3", 0, 50)]
    );
    assert_eq!(manifest.files.last().unwrap().assigned_name, "audio_1.ogg");
    assert_eq!(tl.video.total_frames(), 75);
    assert_eq!(tl.beat_audio.total_frames(), 75);
}

#[test]
fn shared_image_is_registered_once() {
    let project = ProjectBuilder::new()
        .beat(BeatBuilder::new().image("/api/images/same.jpg", 1000).build())
        .beat(BeatBuilder::new().image("/api/images/same.jpg", 2000).build())
        .build();
    let (tl, manifest) = build(&project);
    assert_eq!(manifest.len(), 1);
    assert_eq!(tl.producers.len(), 2);
    assert_eq!(tl.producers[0].source, tl.producers[1].source);
}

#[test]
fn durations_take_the_larger_total() {
    let d = Durations {
        spent_frames: 10,
        authored_frames: 12,
    };
    assert_eq!(d.total_frames(), 12);
}
