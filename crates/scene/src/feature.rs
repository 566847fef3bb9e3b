use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub String);

impl FeatureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureMetadata {
    pub description: Option<String>,
    /// Opaque image reference (URL or asset key); never dereferenced here.
    pub image: Option<String>,
    pub category: Option<String>,
}

/// A named point on the sphere.
///
/// Deserializes from the flat host record `{ id, label, lat, lon, metadata? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFeature {
    pub id: FeatureId,
    pub label: String,
    #[serde(flatten)]
    pub position: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FeatureMetadata>,
}

impl SceneFeature {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            id: FeatureId::new(id),
            label: label.into(),
            position,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: FeatureMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A conference/travel record as published by the host site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelEvent {
    pub id: String,
    pub event: String,
    #[serde(default)]
    pub year: Option<i32>,
    pub city: String,
    #[serde(default)]
    pub province_state: Option<String>,
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub presentation_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl TravelEvent {
    /// `"city, state, country"`, or `"city, country"` without a state.
    pub fn place_label(&self) -> String {
        match self.province_state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {}, {}", self.city, state, self.country),
            None => format!("{}, {}", self.city, self.country),
        }
    }

    pub fn into_feature(self) -> SceneFeature {
        let label = self.place_label();
        let description = match (self.title, self.description) {
            (Some(title), Some(desc)) => Some(format!("{title}\n{desc}")),
            (Some(title), None) => Some(title),
            (None, desc) => desc,
        };
        SceneFeature {
            id: FeatureId(self.id),
            label,
            position: GeoPoint::new(self.lat, self.lon),
            metadata: Some(FeatureMetadata {
                description,
                image: self.image,
                category: self.presentation_type,
            }),
        }
    }
}
