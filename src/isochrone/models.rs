// isochrone/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::isochrone::IsochroneError;

/// GeoJSON FeatureCollection of walk-time polygons, one feature per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSet {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<IsochroneFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsochroneFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: FeatureProperties,
    pub geometry: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Travel time in seconds that produced this polygon.
    pub value: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolygonSet {
    pub fn from_json(body: &str) -> Result<Self, IsochroneError> {
        serde_json::from_str(body).map_err(|e| IsochroneError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, IsochroneError> {
        serde_json::to_string(self).map_err(|e| IsochroneError::Parse(e.to_string()))
    }

    /// Every feature must answer one of the requested bands.
    pub fn check_bands(&self, bands: &[u32]) -> Result<(), IsochroneError> {
        if self.kind != "FeatureCollection" {
            return Err(IsochroneError::UnexpectedShape(format!(
                "expected FeatureCollection, got {}",
                self.kind
            )));
        }
        if self.features.is_empty() {
            return Err(IsochroneError::UnexpectedShape("no features".into()));
        }
        for feature in &self.features {
            let value = feature.properties.value;
            if !bands.iter().any(|b| f64::from(*b) == value) {
                return Err(IsochroneError::UnexpectedShape(format!(
                    "feature for unrequested band {value}"
                )));
            }
        }
        Ok(())
    }
}
