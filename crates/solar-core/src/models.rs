//! Solar model catalog and API defaults.

use serde::Serialize;

/// Model used when a tool call does not name one.
pub const DEFAULT_MODEL: &str = "solar-pro2";

/// Base URL of the Upstage API.
pub const API_BASE_URL: &str = "https://api.upstage.ai/v1";

/// A chat model offered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SolarModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// Every model listed by the `solar://models` resource.
pub const SOLAR_MODELS: &[SolarModel] = &[
    SolarModel {
        id: "solar-pro2",
        name: "Solar Pro2",
        description: "Upstage Solar Pro2 - High performance model",
    },
    SolarModel {
        id: "solar-mini",
        name: "Solar Mini",
        description: "Upstage Solar Mini - Fast and efficient model",
    },
];

/// Look up a catalog entry by model id.
pub fn find_model(id: &str) -> Option<&'static SolarModel> {
    SOLAR_MODELS.iter().find(|m| m.id == id)
}
