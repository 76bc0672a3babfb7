use crate::project::model::{Beat, Plan, Project, TextAlign, TitleCard};

/// Builder for [`Project`](crate::Project).
#[derive(Default)]
pub struct ProjectBuilder {
    beats: Vec<Beat>,
    sound_url: Option<String>,
    sound_volume: Option<f64>,
    sound_begin_time_ms: i64,
}

impl ProjectBuilder {
    /// Create an empty project builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a beat.
    pub fn beat(mut self, beat: Beat) -> Self {
        self.beats.push(beat);
        self
    }

    /// Set background music with its volume and start offset.
    pub fn sound(mut self, url: impl Into<String>, volume: f64, begin_time_ms: i64) -> Self {
        self.sound_url = Some(url.into());
        self.sound_volume = Some(volume);
        self.sound_begin_time_ms = begin_time_ms;
        self
    }

    /// Build the final [`Project`](crate::Project).
    pub fn build(self) -> Project {
        Project {
            beats: self.beats,
            sound_url: self.sound_url,
            sound_volume: self.sound_volume,
            sound_begin_time_ms: self.sound_begin_time_ms,
        }
    }
}

/// Builder for [`Beat`](crate::Beat) values.
#[derive(Default)]
pub struct BeatBuilder {
    beat: Beat,
}

impl BeatBuilder {
    /// Create an empty beat builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title card.
    pub fn title(mut self, title: TitleCard) -> Self {
        self.beat.title = Some(title);
        self
    }

    /// Append an image plan.
    pub fn image(mut self, url: impl Into<String>, duration_ms: u64) -> Self {
        self.beat.plans.push(Plan {
            image_url: Some(url.into()),
            duration_ms,
        });
        self
    }

    /// Append a plan without an image (a gap on the video track).
    pub fn gap(mut self, duration_ms: u64) -> Self {
        self.beat.plans.push(Plan {
            image_url: None,
            duration_ms,
        });
        self
    }

    /// Set the voice-over with its volume and start offset.
    pub fn voice(mut self, url: impl Into<String>, volume: f64, begin_time_ms: i64) -> Self {
        self.beat.sound_url = Some(url.into());
        self.beat.sound_volume = Some(volume);
        self.beat.voice_off_begin_time_ms = begin_time_ms;
        self
    }

    /// Build the final [`Beat`](crate::Beat).
    pub fn build(self) -> Beat {
        self.beat
    }
}

/// Create a centered white title card covering the canvas.
pub fn title_card(text: impl Into<String>, duration_ms: u64) -> TitleCard {
    TitleCard {
        text: text.into(),
        duration_ms,
        x: 0.0,
        y: 0.0,
        width: 100.0,
        font_size: 10.0,
        font_family: "sans-serif".to_string(),
        color: "#ffffff".to_string(),
        background_color: "#00000000".to_string(),
        text_align: TextAlign::Center,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/dsl.rs"]
mod tests;
