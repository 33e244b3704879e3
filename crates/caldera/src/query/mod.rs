//! Query intents and the validating request boundary.
//!
//! A [`QueryIntent`] is the normalized description of what spatial query to
//! run, independent of how it was produced (language model, form
//! parameters, library code). The loose `{kind, parameters}` objects an
//! intent-resolution collaborator emits go through [`IntentRequest`], which
//! applies the documented defaults, coerces numeric strings, and rejects
//! malformed input before anything reaches the dispatcher.

pub mod engine;
mod normalize;

pub use engine::RawCandidate;
pub use normalize::{ResultRecord, normalize};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    config::QueryConfig,
    geo::{BoundingBox, Coord},
};

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("unsupported intent kind `{0}`")]
    InvalidIntentKind(String),
}

impl QueryError {
    fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// A validated spatial query.
///
/// The serialized form matches the structured wire contract:
/// `{"kind": "nearest", "origin": {...}, "count": 5}` and so on, with the
/// bounding-box variant spelled `"bounding-box"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QueryIntent {
    /// The `count` catalog entries closest to `origin`.
    Nearest { origin: Coord, count: usize },
    /// Every catalog entry within `radius_km` of `origin`. A zero radius
    /// returns everything, annotated with distances.
    Radius { origin: Coord, radius_km: f64 },
    /// Every catalog entry inside the box. Inclusive edges, no distances.
    BoundingBox { bbox: BoundingBox },
}

impl QueryIntent {
    /// Check the parameter invariants for this intent's kind.
    ///
    /// A degenerate bounding box passes validation: it runs and yields an
    /// empty result rather than an error.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Nearest { origin, count } => {
                if !origin.is_finite() {
                    return Err(QueryError::invalid("origin", "coordinates must be finite"));
                }
                if *count == 0 {
                    return Err(QueryError::invalid("count", "must be at least 1"));
                }
            }
            Self::Radius { origin, radius_km } => {
                if !origin.is_finite() {
                    return Err(QueryError::invalid("origin", "coordinates must be finite"));
                }
                if !radius_km.is_finite() || *radius_km < 0.0 {
                    return Err(QueryError::invalid(
                        "radius_km",
                        format!("must be a non-negative number, got {radius_km}"),
                    ));
                }
            }
            Self::BoundingBox { bbox } => {
                if !bbox.is_finite() {
                    return Err(QueryError::invalid("bbox", "corners must be finite"));
                }
            }
        }
        Ok(())
    }
}

/// The loose `{kind, parameters}` object produced by an intent-resolution
/// collaborator.
///
/// Liberal in what it accepts, strict in what it emits:
/// - `kind` (alias `choice`) takes the bare form (`"nearest"`, `"radius"`,
///   `"bounding-box"`) or the endpoint-path spelling
///   (`"/volcanoes/nearest"`); the last path segment decides.
/// - parameters live in the nested `parameters` object or at the top level.
/// - numbers coerce from JSON numbers or numeric strings; anything else is
///   an [`QueryError::InvalidParameter`].
/// - missing parameters fall back to the defaults in [`QueryConfig`].
///
/// # Examples
///
/// ```rust
/// use caldera::{IntentRequest, QueryConfig, QueryIntent};
///
/// let request: IntentRequest = serde_json::from_str(
///     r#"{"kind": "/volcanoes/nearest", "parameters": {"latitude": 1.264, "longitude": "103.840", "nearest": 3}}"#,
/// )?;
/// let intent = request.resolve(&QueryConfig::default())?;
/// assert!(matches!(intent, QueryIntent::Nearest { count: 3, .. }));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct IntentRequest {
    #[serde(alias = "choice")]
    pub kind: String,
    /// Nested parameter object, when the collaborator nests.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Top-level leftovers; checked after `parameters`.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl IntentRequest {
    /// Parse a request from raw JSON.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Resolve this request into a validated [`QueryIntent`], filling gaps
    /// from `config`.
    pub fn resolve(&self, config: &QueryConfig) -> Result<QueryIntent> {
        let kind = self.kind.trim();
        let kind = kind.rsplit('/').next().unwrap_or(kind);

        let intent = match kind {
            "nearest" => QueryIntent::Nearest {
                origin: self.origin_param(config)?,
                count: self.count_param(config.default_nearest_count)?,
            },
            "radius" => QueryIntent::Radius {
                origin: self.origin_param(config)?,
                radius_km: self.f64_param(
                    "radius_km",
                    &["radius_km", "radius"],
                    config.default_radius_km,
                )?,
            },
            "bounding-box" => QueryIntent::BoundingBox {
                bbox: BoundingBox::new(
                    self.f64_param("min_lat", &["min_lat"], config.default_bbox.min_lat)?,
                    self.f64_param("min_lon", &["min_lon"], config.default_bbox.min_lon)?,
                    self.f64_param("max_lat", &["max_lat"], config.default_bbox.max_lat)?,
                    self.f64_param("max_lon", &["max_lon"], config.default_bbox.max_lon)?,
                ),
            },
            other => return Err(QueryError::InvalidIntentKind(other.to_string())),
        };

        intent.validate()?;
        Ok(intent)
    }

    fn param(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .find_map(|key| self.parameters.get(*key).or_else(|| self.extra.get(*key)))
    }

    fn origin_param(&self, config: &QueryConfig) -> Result<Coord> {
        Ok(Coord::new(
            self.f64_param("latitude", &["latitude"], config.default_origin.latitude)?,
            self.f64_param(
                "longitude",
                &["longitude"],
                config.default_origin.longitude,
            )?,
        ))
    }

    fn f64_param(&self, name: &'static str, keys: &[&str], default: f64) -> Result<f64> {
        let Some(value) = self.param(keys) else {
            return Ok(default);
        };
        coerce_f64(value)
            .ok_or_else(|| QueryError::invalid(name, format!("cannot read {value} as a number")))
    }

    fn count_param(&self, default: usize) -> Result<usize> {
        let Some(value) = self.param(&["count", "nearest"]) else {
            return Ok(default);
        };
        coerce_count(value).ok_or_else(|| {
            QueryError::invalid("count", format!("cannot read {value} as a whole number"))
        })
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
    .filter(|parsed: &f64| parsed.is_finite())
}

fn coerce_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && *float >= 0.0)
                .map(|float| float as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
    .map(|count| count as usize)
}
