use crate::{
    encode::mlt_xml::to_mlt_xml,
    foundation::core::Profile,
    foundation::error::{StoryreelError, StoryreelResult},
    project::model::Project,
    project::normalize::normalize,
    resources::collector::{Manifest, ResourceCollector, UrlMode},
    timeline::builder::{Durations, build_timeline},
    timeline::node::{
        BACKGROUND_PLAYLIST, BACKGROUND_PRODUCER, Consumer, MltDocument, Playlist, PlaylistItem,
        Producer, ProducerSource, Tractor,
    },
};

/// URL prefix of media served from the app's own storage.
pub const DEFAULT_MEDIA_PREFIX: &str = "/api";

fn default_media_prefix() -> String {
    DEFAULT_MEDIA_PREFIX.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Options for one compilation.
pub struct CompileOptions {
    /// How media URLs are written into producers.
    #[serde(default)]
    pub mode: UrlMode,
    /// URLs starting with this prefix are local to the app's storage.
    #[serde(default = "default_media_prefix")]
    pub media_prefix: String,
    /// Host prepended to local URLs in [`UrlMode::Full`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_url: Option<String>,
    /// Append an `avformat` consumer rendering `<name>.mp4`.
    #[serde(default)]
    pub render_target: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            mode: UrlMode::Local,
            media_prefix: default_media_prefix(),
            host_url: None,
            render_target: false,
        }
    }
}

impl CompileOptions {
    /// Options for a self-contained archive with synthetic file names.
    pub fn local() -> Self {
        Self::default()
    }

    /// Options for a renderer that fetches media from `host_url`.
    pub fn full(host_url: impl Into<String>) -> Self {
        Self {
            mode: UrlMode::Full,
            host_url: Some(host_url.into()),
            ..Self::default()
        }
    }

    /// Reject option combinations that cannot produce a usable document.
    pub fn validate(&self) -> StoryreelResult<()> {
        if self.media_prefix.is_empty() {
            return Err(StoryreelError::validation("media_prefix must be non-empty"));
        }
        if self.mode == UrlMode::Full && self.host_url.as_deref().is_none_or(str::is_empty) {
            return Err(StoryreelError::validation("full url mode requires a host_url"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
/// Result of compiling a project.
pub struct Compilation {
    /// Document tree.
    pub document: MltDocument,
    /// Serialized document.
    pub xml: String,
    /// Distinct media files referenced by the document, in first-seen order.
    pub manifest: Manifest,
    /// Spent and authored timeline lengths.
    pub durations: Durations,
}

/// Compile `project` into an MLT document titled `name`.
///
/// Pure and deterministic: no IO, and no state outlives the call. Fails only on invalid
/// `opts` or a serializer error; project data is trusted (see
/// [`Project::validate`](crate::Project::validate)).
#[tracing::instrument(skip(project, opts), fields(beats = project.beats.len()))]
pub fn compile(
    project: &Project,
    name: &str,
    opts: &CompileOptions,
) -> StoryreelResult<Compilation> {
    opts.validate()?;
    let profile = Profile::HD_25;

    let mut resources = ResourceCollector::new(
        opts.mode,
        &opts.media_prefix,
        opts.host_url.as_deref().unwrap_or_default(),
    );
    let normalized = normalize(project);
    let timeline = build_timeline(&normalized, project.sound(), profile, &mut resources);
    let total = timeline.durations.total_frames();

    let background = Producer {
        id: BACKGROUND_PRODUCER.to_string(),
        in_frame: 0,
        out_frame: total,
        length: total,
        source: ProducerSource::Color {
            resource: "0".to_string(),
        },
        filters: Vec::new(),
    };
    let mut background_playlist = Playlist::new(BACKGROUND_PLAYLIST);
    background_playlist.items.push(PlaylistItem::Entry {
        producer: BACKGROUND_PRODUCER.to_string(),
        in_frame: 0,
        out_frame: total,
    });

    let document = MltDocument {
        title: name.to_string(),
        profile,
        background,
        producers: timeline.producers,
        playlists: [
            background_playlist,
            timeline.video,
            timeline.beat_audio,
            timeline.project_audio,
        ],
        tractor: Tractor::standard(),
        consumer: opts
            .render_target
            .then(|| Consumer::mp4_for(name, profile.fps.num / profile.fps.den)),
    };
    let xml = to_mlt_xml(&document)?;
    let manifest = resources.into_manifest();

    tracing::debug!(
        frames = total,
        producers = document.producers.len(),
        files = manifest.len(),
        skipped = normalized.skipped,
        "compiled project"
    );

    Ok(Compilation {
        document,
        xml,
        manifest,
        durations: timeline.durations,
    })
}

#[cfg(test)]
#[path = "../tests/unit/compile.rs"]
mod tests;
