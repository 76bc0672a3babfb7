use crate::{
    foundation::clock::frames_for,
    project::model::{Beat, Project},
};

#[derive(Clone, Debug)]
/// An eligible beat with its per-segment frame counts resolved.
pub struct NormalizedBeat<'a> {
    /// Index of the beat in the source project.
    pub index: usize,
    /// Source beat.
    pub beat: &'a Beat,
    /// Title frames, if the beat has a title card.
    pub title_frames: Option<u64>,
    /// Frames per plan, in plan order.
    pub plan_frames: Vec<u64>,
}

impl NormalizedBeat<'_> {
    /// Title plus plan frames: the beat's length on the video track.
    pub fn total_frames(&self) -> u64 {
        self.title_frames.unwrap_or(0) + self.plan_frames.iter().sum::<u64>()
    }
}

#[derive(Clone, Debug)]
/// Eligible beats in source order plus the authored timeline length.
pub struct NormalizedProject<'a> {
    /// Beats that carry a title or at least one plan.
    pub beats: Vec<NormalizedBeat<'a>>,
    /// Sum of every eligible beat's title and plan frames.
    pub authored_frames: u64,
    /// Number of beats dropped as ineligible.
    pub skipped: usize,
}

/// Select eligible beats and convert their durations to frames.
///
/// No schema validation happens here; see [`Project::validate`](crate::Project::validate).
pub fn normalize(project: &Project) -> NormalizedProject<'_> {
    let mut beats = Vec::with_capacity(project.beats.len());
    let mut skipped = 0usize;

    for (index, beat) in project.beats.iter().enumerate() {
        if !beat.is_eligible() {
            tracing::debug!(beat = index, "skipping beat without title or plans");
            skipped += 1;
            continue;
        }
        beats.push(NormalizedBeat {
            index,
            beat,
            title_frames: beat.title.as_ref().map(|t| frames_for(t.duration_ms)),
            plan_frames: beat.plans.iter().map(|p| frames_for(p.duration_ms)).collect(),
        });
    }

    let authored_frames = beats.iter().map(NormalizedBeat::total_frames).sum();
    NormalizedProject {
        beats,
        authored_frames,
        skipped,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/normalize.rs"]
mod tests;
