use crate::beam::timer::TimerHandle;
use fyrox::{
    core::{
        algebra::{UnitQuaternion, Vector3},
        pool::Handle,
    },
    scene::node::Node,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TraceChannel {
    /// Everything that blocks visibility.
    Visibility,
    /// Only geometry that is not simulated by physics.
    WorldStatic,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TraceHit {
    pub position: Vector3<f32>,
    pub collider: Handle<Node>,
    pub is_simulating_physics: bool,
    /// Part of the collider that was hit, `Handle::NONE` if it has no parts.
    pub bone: Handle<Node>,
}

pub trait RayCaster {
    /// Returns the nearest hit along the segment `origin..end`, skipping
    /// everything in `ignore`.
    fn trace(
        &self,
        origin: Vector3<f32>,
        end: Vector3<f32>,
        channel: TraceChannel,
        ignore: &[Handle<Node>],
    ) -> Option<TraceHit>;
}

/// Access to collidable objects. Every query yields `None` for a collider
/// that no longer exists.
pub trait ColliderAccess {
    fn relative_scale(&self, collider: Handle<Node>) -> Option<Vector3<f32>>;

    fn set_relative_scale(&mut self, collider: Handle<Node>, scale: Vector3<f32>);

    fn set_simulate_physics(&mut self, collider: Handle<Node>, simulate: bool);

    fn is_simulating_physics(&self, collider: Handle<Node>) -> bool;

    fn bounding_sphere_radius(&self, collider: Handle<Node>) -> Option<f32>;

    fn world_location(&self, collider: Handle<Node>) -> Option<Vector3<f32>>;

    fn world_rotation(&self, collider: Handle<Node>) -> Option<UnitQuaternion<f32>>;
}

pub trait BeamWorld: RayCaster + ColliderAccess {}

impl<T: RayCaster + ColliderAccess> BeamWorld for T {}

/// Spring-damper handle that carries at most one collider.
pub trait GrabConstraint {
    fn activate(&mut self, active: bool);

    fn is_active(&self) -> bool;

    fn grabbed(&self) -> Option<Handle<Node>>;

    fn grab(
        &mut self,
        collider: Handle<Node>,
        bone: Handle<Node>,
        position: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
    );

    fn set_target(&mut self, position: Vector3<f32>, rotation: UnitQuaternion<f32>);

    fn release(&mut self);
}

/// Single-shot deferred tasks. The host reports fired tasks back to the beam.
pub trait DeferredTimer {
    fn schedule(&mut self, delay: f32) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);

    fn is_armed(&self, handle: TimerHandle) -> bool;
}

pub trait AimSource {
    fn control_rotation(&self) -> UnitQuaternion<f32>;

    fn muzzle_world_location(&self) -> Option<Vector3<f32>>;

    fn actor_location(&self) -> Vector3<f32>;
}

/// Aim captured once per frame.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AimSnapshot {
    pub control_rotation: UnitQuaternion<f32>,
    pub muzzle: Option<Vector3<f32>>,
    pub actor_location: Vector3<f32>,
}

impl AimSource for AimSnapshot {
    fn control_rotation(&self) -> UnitQuaternion<f32> {
        self.control_rotation
    }

    fn muzzle_world_location(&self) -> Option<Vector3<f32>> {
        self.muzzle
    }

    fn actor_location(&self) -> Vector3<f32> {
        self.actor_location
    }
}
