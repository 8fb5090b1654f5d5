//! Facet results of a search response.

use crate::result::{Constraint, FacetResult};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct RawFacet {
    #[serde(default)]
    constraints: Vec<Constraint>,
}

/// Decode the `facets` object of a response.
///
/// Any malformed facet empties the whole list rather than failing the
/// search. Facets keep the order the service returned them in.
pub fn read_facets(facets: Option<&Value>) -> Vec<FacetResult> {
    let Some(facets) = facets else {
        return Vec::new();
    };

    match decode_facets(facets) {
        Ok(results) => results,
        Err(reason) => {
            tracing::warn!(%reason, "ignoring malformed facet payload");
            Vec::new()
        }
    }
}

fn decode_facets(facets: &Value) -> std::result::Result<Vec<FacetResult>, String> {
    let object = facets
        .as_object()
        .ok_or_else(|| "facets is not an object".to_string())?;

    object
        .iter()
        .map(|(name, body)| {
            let raw = RawFacet::deserialize(body).map_err(|e| format!("facet {}: {}", name, e))?;
            Ok(FacetResult {
                name: name.clone(),
                constraints: raw.constraints,
            })
        })
        .collect()
}
