//! Typed MLT document tree. Every element the serializer can write has a variant here.

use crate::foundation::core::Profile;

/// Playlist ids, in tractor track order.
pub const BACKGROUND_PLAYLIST: &str = "background";
/// Title and image segments.
pub const VIDEO_PLAYLIST: &str = "video";
/// Per-beat voice-overs.
pub const BEAT_AUDIO_PLAYLIST: &str = "audio1";
/// Project background music.
pub const PROJECT_AUDIO_PLAYLIST: &str = "audio2";
/// Id of the full-length background color producer.
pub const BACKGROUND_PRODUCER: &str = "black";

#[derive(Clone, Debug, PartialEq)]
/// A complete document: profile, producers, the four playlists and the mixing tractor.
pub struct MltDocument {
    /// Composition title.
    pub title: String,
    /// Output profile.
    pub profile: Profile,
    /// Full-length background producer.
    pub background: Producer,
    /// Segment producers in emission order.
    pub producers: Vec<Producer>,
    /// `background`, `video`, `audio1`, `audio2`.
    pub playlists: [Playlist; 4],
    /// Multitrack mixing all playlists.
    pub tractor: Tractor,
    /// Optional render consumer.
    pub consumer: Option<Consumer>,
}

impl MltDocument {
    /// Look up a playlist by id.
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Look up a segment producer (or the background) by id.
    pub fn producer(&self, id: &str) -> Option<&Producer> {
        std::iter::once(&self.background)
            .chain(&self.producers)
            .find(|p| p.id == id)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A media source with its frame range.
pub struct Producer {
    /// Document-unique id.
    pub id: String,
    /// First source frame.
    pub in_frame: u64,
    /// Last source frame.
    pub out_frame: u64,
    /// Length in frames.
    pub length: u64,
    /// Source kind and resource.
    pub source: ProducerSource,
    /// Attached filters.
    pub filters: Vec<Filter>,
}

#[derive(Clone, Debug, PartialEq)]
/// What a producer reads from.
pub enum ProducerSource {
    /// Flat color fill (`color` service). `resource` is the color.
    Color {
        /// Color value, `0` or `#aarrggbb`.
        resource: String,
    },
    /// Still image held for the whole range (`qimage`, `ttl=1`).
    Image {
        /// File name or URL.
        resource: String,
    },
    /// Audio-only clip (`avformat-novalidate`).
    Audio {
        /// File name or URL.
        resource: String,
    },
}

impl ProducerSource {
    /// MLT service name.
    pub fn service(&self) -> &'static str {
        match self {
            ProducerSource::Color { .. } => "color",
            ProducerSource::Image { .. } => "qimage",
            ProducerSource::Audio { .. } => "avformat-novalidate",
        }
    }

    /// Resource string.
    pub fn resource(&self) -> &str {
        match self {
            ProducerSource::Color { resource }
            | ProducerSource::Image { resource }
            | ProducerSource::Audio { resource } => resource,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Effect attached to a producer.
pub enum Filter {
    /// Text overlay.
    DynamicText(TextFilter),
    /// Gain adjustment.
    Volume(VolumeFilter),
}

impl Filter {
    /// Filter id.
    pub fn id(&self) -> &str {
        match self {
            Filter::DynamicText(f) => &f.id,
            Filter::Volume(f) => &f.id,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Parameters of a `dynamictext` filter.
pub struct TextFilter {
    /// Filter id.
    pub id: String,
    /// Displayed text.
    pub text: String,
    /// `"x y w h 1"` box.
    pub geometry: String,
    /// Font size in pixels.
    pub size: i64,
    /// Text color.
    pub fg_colour: String,
    /// Box color (also used for the outline).
    pub bg_colour: String,
    /// Horizontal alignment keyword.
    pub halign: &'static str,
    /// Font family.
    pub family: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
/// Parameters of a `volume` filter.
pub struct VolumeFilter {
    /// Filter id.
    pub id: String,
    /// Last frame the gain applies to.
    pub out_frame: u64,
    /// Gain in dB.
    pub level_db: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// Sequence of entries and gaps.
pub struct Playlist {
    /// Playlist id.
    pub id: &'static str,
    /// Items in timeline order.
    pub items: Vec<PlaylistItem>,
}

impl Playlist {
    /// Empty playlist.
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            items: Vec::new(),
        }
    }

    /// Timeline frames covered by this playlist.
    pub fn total_frames(&self) -> u64 {
        self.items.iter().map(PlaylistItem::frames).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Element of a playlist.
pub enum PlaylistItem {
    /// Plays a producer between `in_frame` and `out_frame`.
    Entry {
        /// Producer id.
        producer: String,
        /// Start frame.
        in_frame: u64,
        /// End frame.
        out_frame: u64,
    },
    /// Empty gap.
    Blank {
        /// Gap length in frames.
        length: u64,
    },
}

impl PlaylistItem {
    /// Frames this item occupies on the timeline.
    pub fn frames(&self) -> u64 {
        match self {
            PlaylistItem::Entry {
                in_frame,
                out_frame,
                ..
            } => out_frame.saturating_sub(*in_frame),
            PlaylistItem::Blank { length } => *length,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Multitrack with mix transitions.
pub struct Tractor {
    /// Tractor id.
    pub id: String,
    /// Tracks, background first.
    pub tracks: Vec<Track>,
    /// Mix transitions.
    pub transitions: Vec<Transition>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Media type a track hides.
pub enum Hide {
    /// Hide audio (video-only track).
    Audio,
    /// Hide video (audio-only track).
    Video,
}

impl Hide {
    /// Attribute value.
    pub fn as_str(self) -> &'static str {
        match self {
            Hide::Audio => "audio",
            Hide::Video => "video",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Tractor track referencing a playlist.
pub struct Track {
    /// Playlist id.
    pub producer: &'static str,
    /// Hidden media type.
    pub hide: Option<Hide>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Additive `mix` transition between the background and one content track.
pub struct Transition {
    /// Transition id.
    pub id: String,
    /// Lower track index.
    pub a_track: u32,
    /// Upper track index.
    pub b_track: u32,
}

impl Tractor {
    /// The fixed four-track mixer: background plus video, beat audio and project audio.
    pub fn standard() -> Self {
        let tracks = vec![
            Track {
                producer: BACKGROUND_PLAYLIST,
                hide: None,
            },
            Track {
                producer: VIDEO_PLAYLIST,
                hide: Some(Hide::Audio),
            },
            Track {
                producer: BEAT_AUDIO_PLAYLIST,
                hide: Some(Hide::Video),
            },
            Track {
                producer: PROJECT_AUDIO_PLAYLIST,
                hide: Some(Hide::Video),
            },
        ];
        let transitions = (1..tracks.len() as u32)
            .map(|b| Transition {
                id: format!("transition{}", b - 1),
                a_track: 0,
                b_track: b,
            })
            .collect();
        Self {
            id: "tractor0".to_string(),
            tracks,
            transitions,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Render target for an `avformat` consumer.
pub struct Consumer {
    /// Output file name.
    pub target: String,
    /// Output frame rate.
    pub rate: u32,
}

impl Consumer {
    /// Consumer writing `<sanitized name>.mp4`.
    pub fn mp4_for(name: &str, rate: u32) -> Self {
        Self {
            target: format!("{}.mp4", sanitize_file_stem(name)),
            rate,
        }
    }
}

/// Make `name` usable as a file name: whitespace becomes `-`, unsafe characters are dropped.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_control()
                || matches!(c, '/' | '\\' | '?' | '<' | '>' | ':' | '*' | '|' | '"')
            {
                None
            } else {
                Some(c)
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "output".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/node.rs"]
mod tests;
