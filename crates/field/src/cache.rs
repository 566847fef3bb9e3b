use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use foundation::math::Viewport;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{ExclusionZone, FieldConfig};
use crate::placement::{DecorFeature, generate_field};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCacheError {
    Io(String),
    Corrupt(String),
}

impl std::fmt::Display for FieldCacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldCacheError::Io(msg) => write!(f, "field cache error: {msg}"),
            FieldCacheError::Corrupt(msg) => write!(f, "field cache corrupt: {msg}"),
        }
    }
}

impl std::error::Error for FieldCacheError {}

/// `{namespace}_v{version}_{floor(w/100)}_{floor(h/100)}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldCacheKey(String);

impl FieldCacheKey {
    pub fn new(namespace: &str, version: u32, viewport: Viewport) -> Self {
        let (bw, bh) = viewport.size_bucket();
        Self(format!("{namespace}_v{version}_{bw}_{bh}"))
    }

    pub fn for_config(config: &FieldConfig, viewport: Viewport) -> Self {
        Self::new(&config.cache_namespace, config.cache_version, viewport)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key-value store for generated fields. Each `set` replaces the entry as a
/// whole; concurrent writers resolve last-writer-wins.
pub trait FieldCache {
    fn get(&self, key: &FieldCacheKey) -> Result<Option<Vec<DecorFeature>>, FieldCacheError>;
    fn set(&mut self, key: &FieldCacheKey, features: &[DecorFeature]) -> Result<(), FieldCacheError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryFieldCache {
    entries: BTreeMap<FieldCacheKey, Vec<DecorFeature>>,
}

impl InMemoryFieldCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FieldCache for InMemoryFieldCache {
    fn get(&self, key: &FieldCacheKey) -> Result<Option<Vec<DecorFeature>>, FieldCacheError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &FieldCacheKey, features: &[DecorFeature]) -> Result<(), FieldCacheError> {
        self.entries.insert(key.clone(), features.to_vec());
        Ok(())
    }
}

/// One JSON file per key under `root`, written through a temp file and a
/// rename so readers never observe a partial entry.
#[derive(Debug, Clone)]
pub struct JsonDirFieldCache {
    root: PathBuf,
}

impl JsonDirFieldCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &FieldCacheKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl FieldCache for JsonDirFieldCache {
    fn get(&self, key: &FieldCacheKey) -> Result<Option<Vec<DecorFeature>>, FieldCacheError> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FieldCacheError::Io(format!("read {path:?}: {e}"))),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| FieldCacheError::Corrupt(format!("{path:?}: {e}")))
    }

    fn set(&mut self, key: &FieldCacheKey, features: &[DecorFeature]) -> Result<(), FieldCacheError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| FieldCacheError::Io(format!("create {:?}: {e}", self.root)))?;
        let raw = serde_json::to_string(features).map_err(|e| FieldCacheError::Io(e.to_string()))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, raw).map_err(|e| FieldCacheError::Io(format!("write {tmp:?}: {e}")))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| FieldCacheError::Io(format!("rename {tmp:?}: {e}")))
    }
}

/// Returns the cached field for this viewport's size bucket, generating and
/// storing a new one on a miss. An empty cached field counts as a miss.
/// Cache failures are logged and only cost a regeneration.
pub fn obtain_field<C, R>(
    cache: &mut C,
    config: &FieldConfig,
    viewport: Viewport,
    zones: &[ExclusionZone],
    rng: &mut R,
) -> Vec<DecorFeature>
where
    C: FieldCache + ?Sized,
    R: Rng + ?Sized,
{
    let key = FieldCacheKey::for_config(config, viewport);
    match cache.get(&key) {
        Ok(Some(features)) if !features.is_empty() => {
            debug!(%key, count = features.len(), "using cached decorative field");
            return features;
        }
        Ok(_) => {}
        Err(err) => warn!("ignoring unreadable decorative field cache: {err}"),
    }

    let field = generate_field(config, viewport, zones, rng);
    if let Err(err) = cache.set(&key, &field.features) {
        warn!("could not store decorative field: {err}");
    } else {
        info!(%key, count = field.features.len(), "generated and cached decorative field");
    }
    field.features
}
