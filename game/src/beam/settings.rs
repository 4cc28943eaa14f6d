use fyrox::core::algebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BeamSettings {
    /// Muzzle offset from the actor location, used when there is no muzzle.
    pub gun_offset: [f32; 3],
    pub beam_range: f32,
    /// Scale units per second.
    pub beam_scale_speed: f32,
    /// Length of the scale vector an object cannot be diminished past.
    pub min_size: f32,
    /// Seconds a carried object may lag behind before it is dropped.
    pub disconnection_time: f32,
    /// How far a carried object may lag behind its hold point.
    pub disconnection_tolerance: f32,
    pub handle_stiffness: f32,
    pub handle_linear_damping: f32,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            gun_offset: [0.0, 0.1, 1.0],
            beam_range: 10.0,
            beam_scale_speed: 0.5,
            min_size: 0.1,
            disconnection_time: 2.0,
            disconnection_tolerance: 2.0,
            handle_stiffness: 150.0,
            handle_linear_damping: 100.0,
        }
    }
}

impl BeamSettings {
    pub fn gun_offset(&self) -> Vector3<f32> {
        Vector3::from(self.gun_offset)
    }
}
