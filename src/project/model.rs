use serde::{Deserialize, Deserializer, de::Error as _};

use crate::foundation::error::{StoryreelError, StoryreelResult};

/// Duration assumed for a title or plan whose duration was never authored.
pub const DEFAULT_SEGMENT_MS: u64 = 1000;

fn default_segment_ms() -> u64 {
    DEFAULT_SEGMENT_MS
}

// The app stores times as plain JS numbers, fractional after a drag on the mounting table.
// They are rounded to whole milliseconds on the way in.

fn round_duration_ms<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
    let ms = f64::deserialize(de)?;
    if !ms.is_finite() || ms < 0.0 {
        return Err(D::Error::custom(format!(
            "duration must be a non-negative number of milliseconds, got {ms}"
        )));
    }
    Ok(ms.round() as u64)
}

fn round_offset_ms<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    let ms = f64::deserialize(de)?;
    if !ms.is_finite() {
        return Err(D::Error::custom(format!("offset must be finite, got {ms}")));
    }
    Ok(ms.round() as i64)
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A storyboard project: ordered beats plus optional background music.
///
/// The JSON shape matches what the authoring app stores, including its older field names.
pub struct Project {
    /// Ordered narrative beats.
    #[serde(default, alias = "questions")]
    pub beats: Vec<Beat>,
    /// Background music URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    /// Background music volume, 0–100 (100 when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_volume: Option<f64>,
    /// Start offset of the background music; negative trims its lead-in.
    #[serde(default, alias = "soundBeginTime", deserialize_with = "round_offset_ms")]
    pub sound_begin_time_ms: i64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One narrative beat: a title card, image plans and an optional voice-over.
pub struct Beat {
    /// Title card shown before the plans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<TitleCard>,
    /// Ordered image plans.
    #[serde(default)]
    pub plans: Vec<Plan>,
    /// Voice-over or sound URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_url: Option<String>,
    /// Voice-over volume, 0–100. Absent or zero disables the sound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound_volume: Option<f64>,
    /// Start offset of the voice-over within the beat; negative trims its lead-in.
    #[serde(default, alias = "voiceOffBeginTime", deserialize_with = "round_offset_ms")]
    pub voice_off_begin_time_ms: i64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Text card rendered over a transparent background.
pub struct TitleCard {
    /// Displayed text.
    pub text: String,
    /// Display duration.
    #[serde(
        default = "default_segment_ms",
        alias = "duration",
        deserialize_with = "round_duration_ms"
    )]
    pub duration_ms: u64,
    /// Left edge, percent of canvas width.
    #[serde(default)]
    pub x: f64,
    /// Top edge, percent of canvas height.
    #[serde(default)]
    pub y: f64,
    /// Box width, percent of canvas width.
    #[serde(default)]
    pub width: f64,
    /// Font size, percent of canvas height.
    #[serde(default)]
    pub font_size: f64,
    /// CSS-ish family name; `sans-serif` or anything else (serif).
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Text color (`#rrggbb` / `#aarrggbb`).
    #[serde(default = "default_color")]
    pub color: String,
    /// Box background color.
    #[serde(default = "default_background")]
    pub background_color: String,
    /// Horizontal alignment.
    #[serde(default)]
    pub text_align: TextAlign,
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_color() -> String {
    "#ffffff".to_string()
}

fn default_background() -> String {
    "#00000000".to_string()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal text alignment of a title card.
pub enum TextAlign {
    /// Left aligned.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Justify,
}

impl TextAlign {
    /// Keyword used by the text filter.
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A still shot. Without an image it still occupies timeline space as a gap.
pub struct Plan {
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Display duration.
    #[serde(
        default = "default_segment_ms",
        alias = "duration",
        deserialize_with = "round_duration_ms"
    )]
    pub duration_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// A sound resolved from a beat or the project, ready for placement.
pub struct SoundCue<'a> {
    /// Source URL.
    pub url: &'a str,
    /// Volume percentage.
    pub volume: f64,
    /// Signed start offset in milliseconds.
    pub begin_offset_ms: i64,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl Project {
    /// Background music whenever it has a URL. Low volumes are left to the gain clamp.
    pub fn sound(&self) -> Option<SoundCue<'_>> {
        Some(SoundCue {
            url: non_empty(&self.sound_url)?,
            volume: self.sound_volume.unwrap_or(100.0),
            begin_offset_ms: self.sound_begin_time_ms,
        })
    }

    /// Check the numeric fields the compiler trusts to be well-formed.
    ///
    /// The compiler itself never calls this; it is the caller's gate before compiling.
    pub fn validate(&self) -> StoryreelResult<()> {
        validate_volume("project sound", self.sound_volume)?;

        for (idx, beat) in self.beats.iter().enumerate() {
            validate_volume(&format!("beat {idx} sound"), beat.sound_volume)?;

            if let Some(title) = &beat.title {
                for (name, v) in [
                    ("x", title.x),
                    ("y", title.y),
                    ("width", title.width),
                    ("fontSize", title.font_size),
                ] {
                    if !v.is_finite() {
                        return Err(StoryreelError::validation(format!(
                            "beat {idx} title {name} must be finite"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn validate_volume(what: &str, volume: Option<f64>) -> StoryreelResult<()> {
    match volume {
        Some(v) if !v.is_finite() || !(0.0..=100.0).contains(&v) => Err(
            StoryreelError::validation(format!("{what} volume must be within 0..=100, got {v}")),
        ),
        _ => Ok(()),
    }
}

impl Beat {
    /// A beat is compiled only when it has a title card or at least one plan.
    pub fn is_eligible(&self) -> bool {
        self.title.is_some() || !self.plans.is_empty()
    }

    /// Voice-over, when it has a URL and a positive volume.
    pub fn sound(&self) -> Option<SoundCue<'_>> {
        let url = non_empty(&self.sound_url)?;
        let volume = self.sound_volume.filter(|v| *v > 0.0)?;
        Some(SoundCue {
            url,
            volume,
            begin_offset_ms: self.voice_off_begin_time_ms,
        })
    }
}

impl TitleCard {
    /// Font family name understood by the renderer.
    pub fn render_family(&self) -> &'static str {
        if self.font_family == "sans-serif" {
            "Arial"
        } else {
            "Times New Roman"
        }
    }
}

impl Plan {
    /// Image URL, treating an empty string as absent.
    pub fn image(&self) -> Option<&str> {
        non_empty(&self.image_url)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/model.rs"]
mod tests;
