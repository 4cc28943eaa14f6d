use crate::beam::world::GrabConstraint;
use fyrox::{
    core::{
        algebra::{UnitQuaternion, Vector3},
        pool::Handle,
    },
    graph::SceneGraph,
    scene::{graph::Graph, node::Node, rigidbody::RigidBody},
};

#[derive(Clone, Debug, Default)]
pub struct PhysicsHandle {
    active: bool,
    grabbed: Option<Handle<Node>>,
    target_position: Vector3<f32>,
    target_rotation: UnitQuaternion<f32>,
    stiffness: f32,
    damping: f32,
}

/// Semi-implicit spring step, stays stable for any `dt`.
fn spring_velocity(
    velocity: Vector3<f32>,
    error: Vector3<f32>,
    k: f32,
    c: f32,
    dt: f32,
) -> Vector3<f32> {
    (velocity + error.scale(dt * k)) / (1.0 + dt * c + dt * dt * k)
}

impl PhysicsHandle {
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            ..Default::default()
        }
    }

    /// Drives the grabbed body velocity towards the target pose.
    pub fn update(&self, graph: &mut Graph, dt: f32) {
        let Some(grabbed) = self.grabbed.filter(|_| self.active) else {
            return;
        };
        if graph.try_get_of_type::<RigidBody>(grabbed).is_none() {
            return;
        }
        let rotation = graph.global_rotation(grabbed);
        let Some(body) = graph.try_get_mut_of_type::<RigidBody>(grabbed) else {
            return;
        };

        let position_error = self.target_position - body.global_position();
        let rotation_error = (self.target_rotation * rotation.inverse())
            .axis_angle()
            .map(|(axis, angle)| axis.scale(angle))
            .unwrap_or_default();

        let k = self.stiffness;
        let c = self.damping;
        let lin_vel = spring_velocity(body.lin_vel(), position_error, k, c, dt);
        let ang_vel = spring_velocity(body.ang_vel(), rotation_error, k, c, dt);

        body.set_lin_vel(lin_vel);
        body.set_ang_vel(ang_vel);
        body.wake_up();
    }
}

impl GrabConstraint for PhysicsHandle {
    fn activate(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn grabbed(&self) -> Option<Handle<Node>> {
        self.grabbed
    }

    fn grab(
        &mut self,
        collider: Handle<Node>,
        _bone: Handle<Node>,
        position: Vector3<f32>,
        rotation: UnitQuaternion<f32>,
    ) {
        self.grabbed = Some(collider);
        self.target_position = position;
        self.target_rotation = rotation;
    }

    fn set_target(&mut self, position: Vector3<f32>, rotation: UnitQuaternion<f32>) {
        self.target_position = position;
        self.target_rotation = rotation;
    }

    fn release(&mut self) {
        self.grabbed = None;
    }
}
