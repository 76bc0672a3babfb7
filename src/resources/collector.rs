use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// How producer resources are written into the document.
pub enum UrlMode {
    /// Fully-qualified URLs, for a renderer that fetches media itself.
    Full,
    /// Synthetic file names, for an archive that bundles media next to the document.
    #[default]
    Local,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Media kind of a referenced resource.
pub enum ResourceKind {
    /// Still image.
    Image,
    /// Audio clip.
    Audio,
}

impl ResourceKind {
    /// Prefix of the synthetic file names assigned to this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Audio => "audio",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One distinct media file referenced by the document.
pub struct ManifestEntry {
    /// URL as authored.
    pub source_url: String,
    /// Synthetic name, `"{kind}_{n}.{ext}"`.
    pub assigned_name: String,
    /// Whether the file lives in the app's own storage.
    pub is_local_to_app_storage: bool,
    /// Media kind.
    pub kind: ResourceKind,
    /// Storage key for local files (the URL without its leading `/`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Distinct media files in first-seen order.
pub struct Manifest {
    /// Entries in the order they were first referenced.
    pub files: Vec<ManifestEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A file the render worker downloads before rendering.
pub struct FetchFile {
    /// Storage key or HTTP URL to fetch from.
    pub path: String,
    /// File name to save it under.
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Manifest split by where each file has to be fetched from.
pub struct FetchPlan {
    /// Files read from the app's storage.
    pub storage_files: Vec<FetchFile>,
    /// Files fetched over HTTP.
    pub http_files: Vec<FetchFile>,
}

impl Manifest {
    /// Number of distinct files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the document references no media.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.files.iter()
    }

    /// Split into storage and HTTP downloads, preserving first-seen order within each.
    pub fn fetch_plan(&self) -> FetchPlan {
        let mut plan = FetchPlan::default();
        for entry in &self.files {
            let name = entry.assigned_name.clone();
            match &entry.storage_key {
                Some(key) if entry.is_local_to_app_storage => plan.storage_files.push(FetchFile {
                    path: key.clone(),
                    name,
                }),
                _ => plan.http_files.push(FetchFile {
                    path: entry.source_url.clone(),
                    name,
                }),
            }
        }
        plan
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a URL resolves to.
pub struct Classification {
    /// URL starts with the app media prefix.
    pub is_local: bool,
    /// Storage key when local.
    pub storage_key: Option<String>,
}

/// Deduplicates media URLs for one compilation and rewrites them for the document.
///
/// Constructed fresh per compile call; nothing is shared between calls.
pub struct ResourceCollector<'a> {
    mode: UrlMode,
    media_prefix: &'a str,
    host_url: &'a str,
    index_by_url: HashMap<String, usize>,
    entries: Vec<ManifestEntry>,
    resources: Vec<String>,
    image_count: u32,
    audio_count: u32,
}

impl<'a> ResourceCollector<'a> {
    /// Create a collector. `host_url` is only used in [`UrlMode::Full`].
    pub fn new(mode: UrlMode, media_prefix: &'a str, host_url: &'a str) -> Self {
        Self {
            mode,
            media_prefix,
            host_url,
            index_by_url: HashMap::new(),
            entries: Vec::new(),
            resources: Vec::new(),
            image_count: 0,
            audio_count: 0,
        }
    }

    /// Classify `url` against the app media prefix.
    pub fn classify(&self, url: &str) -> Classification {
        let is_local = url.starts_with(self.media_prefix);
        Classification {
            is_local,
            storage_key: is_local.then(|| url.trim_start_matches('/').to_string()),
        }
    }

    /// Register `url` and return the resource string producers should reference.
    ///
    /// Idempotent: a URL seen before returns the same resource and adds no manifest entry.
    pub fn register(&mut self, url: &str, kind: ResourceKind) -> &str {
        if let Some(&idx) = self.index_by_url.get(url) {
            return &self.resources[idx];
        }

        let n = match kind {
            ResourceKind::Image => {
                self.image_count += 1;
                self.image_count
            }
            ResourceKind::Audio => {
                self.audio_count += 1;
                self.audio_count
            }
        };
        let assigned_name = match url_extension(url) {
            Some(ext) => format!("{}_{n}.{ext}", kind.as_str()),
            None => format!("{}_{n}", kind.as_str()),
        };
        let Classification {
            is_local,
            storage_key,
        } = self.classify(url);

        let resource = match self.mode {
            UrlMode::Local => assigned_name.clone(),
            UrlMode::Full if is_local => format!("{}{url}", self.host_url.trim_end_matches('/')),
            UrlMode::Full => url.to_string(),
        };
        tracing::trace!(url, name = %assigned_name, is_local, "registered resource");

        let idx = self.entries.len();
        self.entries.push(ManifestEntry {
            source_url: url.to_string(),
            assigned_name,
            is_local_to_app_storage: is_local,
            kind,
            storage_key,
        });
        self.resources.push(resource);
        self.index_by_url.insert(url.to_string(), idx);
        &self.resources[idx]
    }

    /// Finish collection and hand back the manifest.
    pub fn into_manifest(self) -> Manifest {
        Manifest {
            files: self.entries,
        }
    }
}

/// Extension of the last path segment of `url`, ignoring query and fragment.
pub(crate) fn url_extension(url: &str) -> Option<&str> {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let path = match url.split_once("://") {
        Some((_, rest)) => &rest[rest.find('/')?..],
        None => url,
    };
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}

#[cfg(test)]
#[path = "../../tests/unit/resources/collector.rs"]
mod tests;
