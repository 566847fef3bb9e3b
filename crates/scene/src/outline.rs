//! Optional landmass/country outlines loaded from GeoJSON.
//!
//! Outlines are decoration: a failed load leaves the globe without them and
//! is only logged.

use foundation::math::GeoPoint;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    Parse(String),
    MissingFeatures,
    UnsupportedGeometry(String),
}

impl std::fmt::Display for OutlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlineError::Parse(msg) => write!(f, "outline parse error: {msg}"),
            OutlineError::MissingFeatures => write!(f, "outline data has no features array"),
            OutlineError::UnsupportedGeometry(ty) => {
                write!(f, "unsupported outline geometry: {ty}")
            }
        }
    }
}

impl std::error::Error for OutlineError {}

/// A polygon as an outer ring followed by its holes.
pub type Polygon = Vec<Vec<GeoPoint>>;

#[derive(Debug, Clone, PartialEq)]
pub enum OutlineShape {
    Area(Vec<Polygon>),
    Lines(Vec<Vec<GeoPoint>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub name: Option<String>,
    pub shape: OutlineShape,
}

impl Outline {
    /// Every ring or line, for stroking.
    pub fn paths(&self) -> Vec<&[GeoPoint]> {
        match &self.shape {
            OutlineShape::Area(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::as_slice))
                .collect(),
            OutlineShape::Lines(lines) => lines.iter().map(Vec::as_slice).collect(),
        }
    }

    /// Planar even-odd test on (lon, lat). Lines never contain anything.
    pub fn contains(&self, p: GeoPoint) -> bool {
        match &self.shape {
            OutlineShape::Area(polys) => polys.iter().any(|rings| {
                rings.iter().filter(|ring| ring_crosses(ring, p)).count() % 2 == 1
            }),
            OutlineShape::Lines(_) => false,
        }
    }
}

fn ring_crosses(ring: &[GeoPoint], p: GeoPoint) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.lat_deg > p.lat_deg) != (b.lat_deg > p.lat_deg) {
            let t = (p.lat_deg - a.lat_deg) / (b.lat_deg - a.lat_deg);
            if p.lon_deg < a.lon_deg + t * (b.lon_deg - a.lon_deg) {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlineSet {
    pub outlines: Vec<Outline>,
}

impl OutlineSet {
    /// Parses a GeoJSON `FeatureCollection` of (Multi)Polygon and
    /// (Multi)LineString features. Features with a `null` geometry are skipped.
    pub fn from_geojson_str(payload: &str) -> Result<Self, OutlineError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| OutlineError::Parse(e.to_string()))?;
        let features = value
            .get("features")
            .and_then(Value::as_array)
            .ok_or(OutlineError::MissingFeatures)?;

        let mut outlines = Vec::with_capacity(features.len());
        for feat in features {
            let geometry = match feat.get("geometry") {
                None | Some(Value::Null) => continue,
                Some(g) => g,
            };
            let ty = geometry
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| OutlineError::Parse("geometry missing type".to_string()))?;
            let coords = geometry
                .get("coordinates")
                .ok_or_else(|| OutlineError::Parse(format!("{ty} missing coordinates")))?;

            let shape = match ty {
                "Polygon" => OutlineShape::Area(vec![rings(coords)]),
                "MultiPolygon" => OutlineShape::Area(
                    coords
                        .as_array()
                        .map(|polys| polys.iter().map(rings).collect())
                        .unwrap_or_default(),
                ),
                "LineString" => OutlineShape::Lines(line(coords).into_iter().collect()),
                "MultiLineString" => OutlineShape::Lines(rings(coords)),
                other => return Err(OutlineError::UnsupportedGeometry(other.to_string())),
            };

            let name = feat
                .get("properties")
                .and_then(|p| p.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string);
            outlines.push(Outline { name, shape });
        }

        debug!(count = outlines.len(), "parsed outlines");
        Ok(Self { outlines })
    }

    /// First area outline containing `p`.
    pub fn containing(&self, p: GeoPoint) -> Option<&Outline> {
        self.outlines.iter().find(|o| o.contains(p))
    }
}

fn rings(value: &Value) -> Vec<Vec<GeoPoint>> {
    value
        .as_array()
        .map(|arr| arr.iter().filter_map(line).collect())
        .unwrap_or_default()
}

/// `[[lon, lat], ...]`; malformed positions are dropped.
fn line(value: &Value) -> Option<Vec<GeoPoint>> {
    let points: Vec<GeoPoint> = value
        .as_array()?
        .iter()
        .filter_map(|p| {
            let a = p.as_array()?;
            Some(GeoPoint::new(a.get(1)?.as_f64()?, a.first()?.as_f64()?))
        })
        .collect();
    (!points.is_empty()).then_some(points)
}

/// Load state of the outline resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OutlineState {
    #[default]
    NotLoaded,
    Loaded(OutlineSet),
    Failed,
}

impl OutlineState {
    /// Records a load result. Failures are logged and otherwise ignored.
    pub fn from_load(result: Result<OutlineSet, OutlineError>) -> Self {
        match result {
            Ok(set) => OutlineState::Loaded(set),
            Err(err) => {
                warn!("outline load failed, rendering without outlines: {err}");
                OutlineState::Failed
            }
        }
    }

    pub fn outlines(&self) -> Option<&OutlineSet> {
        match self {
            OutlineState::Loaded(set) => Some(set),
            _ => None,
        }
    }
}
