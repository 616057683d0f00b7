//! Saved world positions.

use serde::{Deserialize, Serialize};

use crate::LocationId;

/// A named point in a world, with an optional facing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    pub world: Option<String>,
}

impl Location {
    pub fn new(id: LocationId) -> Self {
        Self {
            id,
            name: None,
            x: None,
            y: None,
            z: None,
            yaw: None,
            pitch: None,
            world: None,
        }
    }

    pub fn at(mut self, world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        self.world = Some(world.into());
        self.x = Some(x);
        self.y = Some(y);
        self.z = Some(z);
        self
    }

    /// `(x, y, z)` when all three coordinates are known.
    pub fn coordinates(&self) -> Option<(f64, f64, f64)> {
        Some((self.x?, self.y?, self.z?))
    }
}
