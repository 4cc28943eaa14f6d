use crate::beam::world::{ColliderAccess, RayCaster, TraceChannel, TraceHit};
use fyrox::{
    core::{
        algebra::{Point3, UnitQuaternion, Vector3},
        arrayvec::ArrayVec,
        pool::Handle,
    },
    graph::{BaseSceneGraph, SceneGraph},
    scene::{
        collider::{Collider, ColliderShape, InteractionGroups},
        graph::{physics::RayCastOptions, Graph},
        node::Node,
        rigidbody::{RigidBody, RigidBodyType},
    },
};

pub struct SceneBridge<'a> {
    pub graph: &'a mut Graph,
}

impl<'a> SceneBridge<'a> {
    pub fn new(graph: &'a mut Graph) -> Self {
        Self { graph }
    }

    /// Body that owns `collider`, or the collider itself if it is free-standing.
    fn resolve(&self, collider: Handle<Node>) -> Handle<Node> {
        match self.graph.try_get(collider) {
            Some(node) if self.graph.try_get_of_type::<RigidBody>(node.parent()).is_some() => {
                node.parent()
            }
            _ => collider,
        }
    }

    fn body(&self, handle: Handle<Node>) -> Option<&RigidBody> {
        self.graph.try_get_of_type::<RigidBody>(handle)
    }

    /// Resolved hit target and whether it is simulated, `None` if the hit
    /// does not count for `channel`.
    fn classify_hit(
        &self,
        collider: Handle<Node>,
        channel: TraceChannel,
        ignore: &[Handle<Node>],
    ) -> Option<(Handle<Node>, bool)> {
        if ignore.contains(&collider) {
            return None;
        }

        let target = self.resolve(collider);
        if ignore.contains(&target) {
            return None;
        }

        let is_simulating_physics = self.is_simulating_physics(target);
        if channel == TraceChannel::WorldStatic && is_simulating_physics {
            return None;
        }

        Some((target, is_simulating_physics))
    }
}

fn shape_radius(shape: &ColliderShape) -> Option<f32> {
    match shape {
        ColliderShape::Ball(ball) => Some(ball.radius),
        ColliderShape::Cuboid(cuboid) => Some(cuboid.half_extents.norm()),
        ColliderShape::Capsule(capsule) => {
            Some((capsule.end - capsule.begin).norm() * 0.5 + capsule.radius)
        }
        ColliderShape::Cylinder(cylinder) => {
            Some(Vector3::new(cylinder.radius, cylinder.half_height, cylinder.radius).norm())
        }
        ColliderShape::Cone(cone) => {
            Some(Vector3::new(cone.radius, cone.half_height, cone.radius).norm())
        }
        _ => None,
    }
}

impl RayCaster for SceneBridge<'_> {
    fn trace(
        &self,
        origin: Vector3<f32>,
        end: Vector3<f32>,
        channel: TraceChannel,
        ignore: &[Handle<Node>],
    ) -> Option<TraceHit> {
        let delta = end - origin;
        let max_len = delta.norm();
        let direction = delta.try_normalize(f32::EPSILON)?;

        let mut intersections = ArrayVec::<_, 64>::new();
        self.graph.physics.cast_ray(
            RayCastOptions {
                ray_origin: Point3::from(origin),
                ray_direction: direction,
                max_len,
                groups: InteractionGroups::default(),
                sort_results: true,
            },
            &mut intersections,
        );

        intersections.into_iter().find_map(|intersection| {
            self.classify_hit(intersection.collider, channel, ignore)
                .map(|(collider, is_simulating_physics)| TraceHit {
                    position: intersection.position.coords,
                    collider,
                    is_simulating_physics,
                    bone: Handle::NONE,
                })
        })
    }
}

impl ColliderAccess for SceneBridge<'_> {
    fn relative_scale(&self, collider: Handle<Node>) -> Option<Vector3<f32>> {
        self.graph
            .try_get(collider)
            .map(|node| **node.local_transform().scale())
    }

    fn set_relative_scale(&mut self, collider: Handle<Node>, scale: Vector3<f32>) {
        if let Some(node) = self.graph.try_get_mut(collider) {
            node.local_transform_mut().set_scale(scale);
        }
    }

    fn set_simulate_physics(&mut self, collider: Handle<Node>, simulate: bool) {
        if let Some(body) = self.graph.try_get_mut_of_type::<RigidBody>(collider) {
            body.set_body_type(if simulate {
                RigidBodyType::Dynamic
            } else {
                RigidBodyType::KinematicPositionBased
            });
            if simulate {
                body.wake_up();
            }
        }
    }

    fn is_simulating_physics(&self, collider: Handle<Node>) -> bool {
        self.body(collider)
            .is_some_and(|body| body.body_type() == RigidBodyType::Dynamic)
    }

    fn bounding_sphere_radius(&self, collider: Handle<Node>) -> Option<f32> {
        let node = self.graph.try_get(collider)?;
        let scale = (**node.local_transform().scale()).max();

        if let Some(own) = self.graph.try_get_of_type::<Collider>(collider) {
            return shape_radius(own.shape()).map(|r| r * scale);
        }

        node.children()
            .iter()
            .filter_map(|child| {
                let child_collider = self.graph.try_get_of_type::<Collider>(*child)?;
                let offset = child_collider.local_transform().position().norm();
                shape_radius(child_collider.shape()).map(|r| r + offset)
            })
            .reduce(f32::max)
            .map(|r| r * scale)
    }

    fn world_location(&self, collider: Handle<Node>) -> Option<Vector3<f32>> {
        self.graph
            .try_get(collider)
            .map(|node| node.global_position())
    }

    fn world_rotation(&self, collider: Handle<Node>) -> Option<UnitQuaternion<f32>> {
        self.graph
            .try_get(collider)
            .map(|_| self.graph.global_rotation(collider))
    }
}
