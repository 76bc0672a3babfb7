use crate::{
    foundation::clock::{Gain, TitleGeometry, offset_frames},
    foundation::core::Profile,
    project::model::{SoundCue, TitleCard},
    project::normalize::{NormalizedBeat, NormalizedProject},
    resources::collector::{ResourceCollector, ResourceKind},
    timeline::node::{
        BEAT_AUDIO_PLAYLIST, Filter, PROJECT_AUDIO_PLAYLIST, Playlist, PlaylistItem, Producer,
        ProducerSource, TextFilter, VIDEO_PLAYLIST, VolumeFilter,
    },
};

/// Transparent base under title text.
const TITLE_BASE_COLOR: &str = "#00000000";

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// The two timeline lengths tracked while building.
pub struct Durations {
    /// Frames emitted to the video track.
    pub spent_frames: u64,
    /// Frames authored across eligible beats.
    pub authored_frames: u64,
}

impl Durations {
    /// Composite length: the larger of the two. They only differ on inconsistent input, which
    /// is tolerated rather than rejected.
    pub fn total_frames(self) -> u64 {
        self.spent_frames.max(self.authored_frames)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Content tracks and producers of a compiled project, before document assembly.
pub struct Timeline {
    /// Segment producers in emission order.
    pub producers: Vec<Producer>,
    /// Titles, images and gaps.
    pub video: Playlist,
    /// Voice-overs, padded with blanks to the video length beat by beat.
    pub beat_audio: Playlist,
    /// Background music; empty when the project has none.
    pub project_audio: Playlist,
    /// Spent and authored lengths.
    pub durations: Durations,
}

#[derive(Clone, Copy, Debug)]
enum AudioLane {
    Beat,
    Project,
}

/// Single-pass emitter of producers and playlist items, beat by beat.
pub struct TimelineBuilder<'r, 'a> {
    profile: Profile,
    resources: &'r mut ResourceCollector<'a>,
    producers: Vec<Producer>,
    video: Playlist,
    beat_audio: Playlist,
    project_audio: Playlist,
    last_producer: u32,
}

impl<'r, 'a> TimelineBuilder<'r, 'a> {
    /// Start an empty timeline registering media into `resources`.
    pub fn new(profile: Profile, resources: &'r mut ResourceCollector<'a>) -> Self {
        Self {
            profile,
            resources,
            producers: Vec::new(),
            video: Playlist::new(VIDEO_PLAYLIST),
            beat_audio: Playlist::new(BEAT_AUDIO_PLAYLIST),
            project_audio: Playlist::new(PROJECT_AUDIO_PLAYLIST),
            last_producer: 0,
        }
    }

    /// Emit one eligible beat and return the frames it added to the video track.
    pub fn push_beat(&mut self, beat: &NormalizedBeat<'_>) -> u64 {
        let mut spent = 0u64;

        if let (Some(title), Some(frames)) = (&beat.beat.title, beat.title_frames) {
            self.push_title(title, frames);
            spent += frames;
        }

        for (plan, &frames) in beat.beat.plans.iter().zip(&beat.plan_frames) {
            match plan.image() {
                Some(url) => {
                    let resource = self.resources.register(url, ResourceKind::Image).to_string();
                    let id = self.next_producer_id();
                    self.producers.push(Producer {
                        id: id.clone(),
                        in_frame: 0,
                        out_frame: frames,
                        length: frames,
                        source: ProducerSource::Image { resource },
                        filters: Vec::new(),
                    });
                    self.video.items.push(PlaylistItem::Entry {
                        producer: id,
                        in_frame: 0,
                        out_frame: frames,
                    });
                }
                None => self.video.items.push(PlaylistItem::Blank { length: frames }),
            }
            spent += frames;
        }

        match beat.beat.sound() {
            Some(cue) => self.place_sound(cue, spent, AudioLane::Beat),
            None => self
                .beat_audio
                .items
                .push(PlaylistItem::Blank { length: spent }),
        }

        spent
    }

    /// Lay the project background music across `total_frames`.
    pub fn push_project_sound(&mut self, cue: SoundCue<'_>, total_frames: u64) {
        self.place_sound(cue, total_frames, AudioLane::Project);
    }

    /// Finish building.
    pub fn into_timeline(self, durations: Durations) -> Timeline {
        Timeline {
            producers: self.producers,
            video: self.video,
            beat_audio: self.beat_audio,
            project_audio: self.project_audio,
            durations,
        }
    }

    fn next_producer_id(&mut self) -> String {
        self.last_producer += 1;
        format!("producer{}", self.last_producer)
    }

    fn filter_id(&self) -> String {
        format!("filterForProducer{}", self.last_producer)
    }

    fn push_title(&mut self, title: &TitleCard, frames: u64) {
        let geometry = TitleGeometry::from_percent(
            title.x,
            title.y,
            title.width,
            title.font_size,
            self.profile.canvas,
        );
        let id = self.next_producer_id();
        let text = TextFilter {
            id: self.filter_id(),
            text: title.text.clone(),
            geometry: geometry.to_geometry_string(),
            size: geometry.font_px,
            fg_colour: title.color.clone(),
            bg_colour: title.background_color.clone(),
            halign: title.text_align.as_str(),
            family: title.render_family(),
        };
        self.producers.push(Producer {
            id: id.clone(),
            in_frame: 0,
            out_frame: frames,
            length: frames,
            source: ProducerSource::Color {
                resource: TITLE_BASE_COLOR.to_string(),
            },
            filters: vec![Filter::DynamicText(text)],
        });
        self.video.items.push(PlaylistItem::Entry {
            producer: id,
            in_frame: 0,
            out_frame: frames,
        });
    }

    /// Blank-then-clip placement over `span` frames.
    ///
    /// A positive offset becomes a leading blank; a negative one moves the producer's in point
    /// into the source so playback starts mid-clip. The blank never runs past `span`, so the
    /// lane stays aligned with the video track.
    fn place_sound(&mut self, cue: SoundCue<'_>, span: u64, lane: AudioLane) {
        let (lead_in, trim) = offset_frames(cue.begin_offset_ms);
        let lead_in = lead_in.min(span);
        let length = span - lead_in;

        let resource = self
            .resources
            .register(cue.url, ResourceKind::Audio)
            .to_string();
        let id = self.next_producer_id();
        let gain = Gain::from_volume_percent(cue.volume);
        let filters = if gain.is_unity() {
            Vec::new()
        } else {
            vec![Filter::Volume(VolumeFilter {
                id: self.filter_id(),
                out_frame: length,
                level_db: gain.db,
            })]
        };
        self.producers.push(Producer {
            id: id.clone(),
            in_frame: trim,
            out_frame: length + trim,
            length,
            source: ProducerSource::Audio { resource },
            filters,
        });

        let playlist = match lane {
            AudioLane::Beat => &mut self.beat_audio,
            AudioLane::Project => &mut self.project_audio,
        };
        if lead_in > 0 {
            playlist.items.push(PlaylistItem::Blank { length: lead_in });
        }
        playlist.items.push(PlaylistItem::Entry {
            producer: id,
            in_frame: 0,
            out_frame: length,
        });
    }
}

/// Walk the normalized beats once, then lay the project music over the resulting length.
pub fn build_timeline(
    normalized: &NormalizedProject<'_>,
    project_sound: Option<SoundCue<'_>>,
    profile: Profile,
    resources: &mut ResourceCollector<'_>,
) -> Timeline {
    let mut builder = TimelineBuilder::new(profile, resources);

    let spent_frames = normalized
        .beats
        .iter()
        .fold(0u64, |spent, beat| spent + builder.push_beat(beat));
    let durations = Durations {
        spent_frames,
        authored_frames: normalized.authored_frames,
    };
    if durations.spent_frames != durations.authored_frames {
        tracing::warn!(
            spent = durations.spent_frames,
            authored = durations.authored_frames,
            "spent and authored durations differ; using the larger"
        );
    }

    if let Some(cue) = project_sound {
        builder.push_project_sound(cue, durations.total_frames());
    }

    builder.into_timeline(durations)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;
