use super::*;

#[test]
fn parses_app_field_names() {
    let json = r##"{
        "themeId": 3,
        "questions": [{
            "id": 1,
            "question": "Why?",
            "title": { "text": "Intro", "duration": 2000, "x": 10, "y": 20, "width": 50,
                       "fontSize": 8, "fontFamily": "serif", "color": "#fff",
                       "backgroundColor": "#000", "textAlign": "left" },
            "plans": [{ "id": 4, "description": "", "imageUrl": "/api/images/a.png", "duration": 3000 }],
            "soundUrl": "/api/audios/v.mp3",
            "soundVolume": 80,
            "voiceOffBeginTime": -250
        }],
        "soundUrl": "https://cdn.example.com/music.mp3",
        "soundBeginTime": 1200
    }"##;
    let project: Project = serde_json::from_str(json).unwrap();
    assert_eq!(project.beats.len(), 1);
    let beat = &project.beats[0];
    let title = beat.title.as_ref().unwrap();
    assert_eq!(title.duration_ms, 2000);
    assert_eq!(title.text_align, TextAlign::Left);
    assert_eq!(title.render_family(), "Times New Roman");
    assert_eq!(beat.plans[0].image(), Some("/api/images/a.png"));
    assert_eq!(beat.voice_off_begin_time_ms, -250);
    assert_eq!(project.sound_begin_time_ms, 1200);
}

#[test]
fn missing_durations_default_to_one_second() {
    let plan: Plan = serde_json::from_str(r#"{ "imageUrl": "x.png" }"#).unwrap();
    assert_eq!(plan.duration_ms, DEFAULT_SEGMENT_MS);
    let title: TitleCard = serde_json::from_str(r#"{ "text": "t" }"#).unwrap();
    assert_eq!(title.duration_ms, DEFAULT_SEGMENT_MS);
    assert_eq!(title.text_align, TextAlign::Center);
    assert_eq!(title.render_family(), "Arial");
}

#[test]
fn eligibility_needs_title_or_plan() {
    let empty = Beat::default();
    assert!(!empty.is_eligible());

    let with_plan = Beat {
        plans: vec![Plan {
            image_url: None,
            duration_ms: 500,
        }],
        ..Beat::default()
    };
    assert!(with_plan.is_eligible());
}

#[test]
fn beat_sound_requires_url_and_positive_volume() {
    let mut beat = Beat {
        sound_url: Some("/api/audios/v.mp3".to_string()),
        ..Beat::default()
    };
    assert!(beat.sound().is_none(), "absent volume disables the sound");

    beat.sound_volume = Some(0.0);
    assert!(beat.sound().is_none());

    beat.sound_volume = Some(40.0);
    let cue = beat.sound().unwrap();
    assert_eq!(cue.url, "/api/audios/v.mp3");
    assert_eq!(cue.volume, 40.0);

    beat.sound_url = Some(String::new());
    assert!(beat.sound().is_none());
}

#[test]
fn project_sound_defaults_to_full_volume() {
    let mut project = Project {
        sound_url: Some("m.mp3".to_string()),
        sound_begin_time_ms: -400,
        ..Project::default()
    };
    let cue = project.sound().unwrap();
    assert_eq!(cue.volume, 100.0);
    assert_eq!(cue.begin_offset_ms, -400);

    project.sound_volume = Some(0.0);
    let cue = project.sound().unwrap();
    assert_eq!(cue.volume, 0.0, "quiet music is kept and attenuated by the gain clamp");

    project.sound_url = Some(String::new());
    assert!(project.sound().is_none());
}

#[test]
fn fractional_times_round_to_whole_milliseconds() {
    let json = r#"{
        "questions": [{
            "plans": [{ "imageUrl": "/api/images/a.png", "duration": 2000.5 }],
            "title": { "text": "t", "duration": 999.4 },
            "soundUrl": "/api/audios/v.mp3",
            "soundVolume": 50,
            "voiceOffBeginTime": -250.5
        }],
        "soundUrl": "/api/audios/m.mp3",
        "soundBeginTime": 1234.56
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();
    let beat = &project.beats[0];
    assert_eq!(beat.plans[0].duration_ms, 2001);
    assert_eq!(beat.title.as_ref().unwrap().duration_ms, 999);
    assert_eq!(beat.voice_off_begin_time_ms, -251);
    assert_eq!(project.sound_begin_time_ms, 1235);
}

#[test]
fn negative_durations_are_rejected_at_parse_time() {
    let err = serde_json::from_str::<Plan>(r#"{ "duration": -5 }"#).unwrap_err();
    assert!(err.to_string().contains("non-negative"));
}

#[test]
fn validate_rejects_bad_numbers() {
    let mut project = Project {
        sound_volume: Some(120.0),
        ..Project::default()
    };
    assert!(project.validate().is_err());

    project.sound_volume = Some(50.0);
    assert!(project.validate().is_ok());

    project.beats.push(Beat {
        title: Some(TitleCard {
            text: "t".to_string(),
            duration_ms: 1000,
            x: f64::NAN,
            y: 0.0,
            width: 10.0,
            font_size: 5.0,
            font_family: "sans-serif".to_string(),
            color: "#fff".to_string(),
            background_color: "#000".to_string(),
            text_align: TextAlign::Center,
        }),
        ..Beat::default()
    });
    let err = project.validate().unwrap_err();
    assert!(err.to_string().contains("beat 0 title x"));
}
