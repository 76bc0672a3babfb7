//! Storyreel compiles storyboard projects into MLT timelines.
//!
//! A project is an ordered list of beats, each with an optional title card, image plans and an
//! optional voice-over, plus optional background music. Compilation turns it into a
//! frame-accurate, four-track MLT document and a manifest of the media files it references.
//!
//! # Pipeline overview
//!
//! 1. **Normalize**: drop beats with neither title nor plans, convert durations to frames
//! 2. **Build**: walk the beats once, emitting producers and playlist items for the `video`,
//!    `audio1` (voice-overs) and `audio2` (music) tracks while deduplicating media
//! 3. **Assemble**: add the full-length `background` track and the fixed mixing tractor
//! 4. **Serialize**: write the document tree as MLT XML
//!
//! Compilation is pure: it does no IO and keeps no state between calls. Fetching the media
//! listed in the [`Manifest`] and rendering the document are left to the caller.
//!
//! ```
//! use storyreel::{BeatBuilder, CompileOptions, ProjectBuilder, compile, title_card};
//!
//! let project = ProjectBuilder::new()
//!     .beat(
//!         BeatBuilder::new()
//!             .title(title_card("Chapter one", 2000))
//!             .image("/api/images/users/castle.jpg", 3000)
//!             .build(),
//!     )
//!     .build();
//!
//! let out = compile(&project, "My film", &CompileOptions::local()).unwrap();
//! assert_eq!(out.durations.total_frames(), 125);
//! assert_eq!(out.manifest.files[0].assigned_name, "image_1.jpg");
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compile;
mod encode;
mod foundation;
mod project;
mod resources;
mod timeline;

pub use compile::{Compilation, CompileOptions, DEFAULT_MEDIA_PREFIX, compile};
pub use encode::mlt_xml::to_mlt_xml;
pub use foundation::clock::{
    Gain, MAX_GAIN_FACTOR, MIN_FONT_PX, MIN_GAIN_FACTOR, TitleGeometry, clamp, frames_for,
    offset_frames,
};
pub use foundation::core::{Canvas, Fps, Profile};
pub use foundation::error::{StoryreelError, StoryreelResult};
pub use project::dsl::{BeatBuilder, ProjectBuilder, title_card};
pub use project::model::{Beat, DEFAULT_SEGMENT_MS, Plan, Project, SoundCue, TextAlign, TitleCard};
pub use project::normalize::{NormalizedBeat, NormalizedProject, normalize};
pub use resources::collector::{
    Classification, FetchFile, FetchPlan, Manifest, ManifestEntry, ResourceCollector,
    ResourceKind, UrlMode,
};
pub use timeline::builder::{Durations, Timeline, TimelineBuilder, build_timeline};
pub use timeline::node::{
    BACKGROUND_PLAYLIST, BACKGROUND_PRODUCER, BEAT_AUDIO_PLAYLIST, Consumer, Filter, Hide,
    MltDocument, PROJECT_AUDIO_PLAYLIST, Playlist, PlaylistItem, Producer, ProducerSource,
    TextFilter, Tractor, Track, Transition, VIDEO_PLAYLIST, VolumeFilter, sanitize_file_stem,
};
