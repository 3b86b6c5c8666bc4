//! Catalog intake: validate the trail service response and give every trail
//! its decorative image roll.

use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::model::{CatalogEntry, DecorativeImage, Trail};

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads the catalog as a keyed collection and returns its values in server
/// order. Keys are ignored. An array counts as a collection keyed by index.
/// Every record-shaped entry yields a trail, whatever its field types.
///
/// # Errors
///
/// Returns [`CatalogError`] when the body is missing or is not a collection.
pub fn parse_catalog(response: Option<Value>) -> Result<Vec<Trail>, CatalogError> {
    let values: Vec<Value> = match response {
        None | Some(Value::Null) => return Err(CatalogError::Missing),
        Some(Value::Object(map)) => map.into_iter().map(|(_, v)| v).collect(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(CatalogError::NotACollection {
                found: kind_of(&other),
            })
        }
    };

    let total = values.len();
    let trails: Vec<Trail> = values
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| {
            if !value.is_object() {
                warn!(position, found = kind_of(&value), "skipping non-record catalog entry");
                return None;
            }
            match serde_json::from_value::<Trail>(value) {
                Ok(trail) => Some(trail),
                Err(e) => {
                    warn!(position, error = %e, "skipping undecodable catalog entry");
                    None
                }
            }
        })
        .collect();

    debug!(total, kept = trails.len(), "catalog parsed");
    Ok(trails)
}

/// Uniform pick from `1..=pool_size`.
#[must_use]
pub fn roll_image<R: Rng + ?Sized>(rng: &mut R, pool_size: u8) -> DecorativeImage {
    DecorativeImage(rng.gen_range(1..=pool_size.max(1)))
}

#[must_use]
pub fn decorate<R: Rng + ?Sized>(
    trails: Vec<Trail>,
    rng: &mut R,
    pool_size: u8,
) -> Vec<CatalogEntry> {
    trails
        .into_iter()
        .map(|trail| CatalogEntry {
            trail,
            image: roll_image(rng, pool_size),
        })
        .collect()
}

/// # Errors
///
/// Same as [`parse_catalog`].
pub fn load_catalog<R: Rng + ?Sized>(
    response: Option<Value>,
    rng: &mut R,
    pool_size: u8,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    Ok(decorate(parse_catalog(response)?, rng, pool_size))
}
