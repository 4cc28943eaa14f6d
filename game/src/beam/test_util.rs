use crate::beam::{
    settings::BeamSettings,
    state_machine::BeamMode,
    timer::TimerQueue,
    world::{AimSnapshot, ColliderAccess, GrabConstraint, RayCaster, TraceChannel, TraceHit},
    BeamComponent, BeamContext, BeamTrace,
};
use fyrox::{
    core::{
        algebra::{UnitQuaternion, Vector3},
        pool::Handle,
    },
    fxhash::FxHashMap,
    scene::node::Node,
};
use std::cell::Cell;

#[derive(Clone, Debug)]
pub struct StubBody {
    position: Vector3<f32>,
    /// Half extent at unit scale.
    half_extent: Vector3<f32>,
    scale: Vector3<f32>,
    simulating: bool,
    alive: bool,
    physics_toggles: Vec<bool>,
}

impl StubBody {
    pub fn dynamic(position: Vector3<f32>, half_extent: f32) -> Self {
        Self {
            position,
            half_extent: Vector3::repeat(half_extent),
            scale: Vector3::repeat(1.0),
            simulating: true,
            alive: true,
            physics_toggles: Vec::new(),
        }
    }

    pub fn wall(position: Vector3<f32>, half_extent: Vector3<f32>) -> Self {
        Self {
            position,
            half_extent,
            scale: Vector3::repeat(1.0),
            simulating: false,
            alive: true,
            physics_toggles: Vec::new(),
        }
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    fn world_half_extent(&self) -> Vector3<f32> {
        self.half_extent.component_mul(&self.scale)
    }

    /// Entry parameter of the segment `begin + t * (end - begin)`, `t` in `0..=1`.
    fn intersect(&self, begin: &Vector3<f32>, end: &Vector3<f32>) -> Option<f32> {
        let half = self.world_half_extent();
        let min = self.position - half;
        let max = self.position + half;
        let dir = end - begin;

        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;
        for i in 0..3 {
            if dir[i].abs() < f32::EPSILON {
                if begin[i] < min[i] || begin[i] > max[i] {
                    return None;
                }
            } else {
                let inv = 1.0 / dir[i];
                let mut t0 = (min[i] - begin[i]) * inv;
                let mut t1 = (max[i] - begin[i]) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return None;
                }
            }
        }
        Some(t_min)
    }
}

#[derive(Default, Debug)]
pub struct StubScene {
    bodies: FxHashMap<Handle<Node>, StubBody>,
    next_index: u32,
    traces: Cell<usize>,
}

impl StubScene {
    pub fn add(&mut self, body: StubBody) -> Handle<Node> {
        self.next_index += 1;
        let handle = Handle::new(self.next_index, 1);
        self.bodies.insert(handle, body);
        handle
    }

    pub fn destroy(&mut self, handle: Handle<Node>) {
        if let Some(body) = self.bodies.get_mut(&handle) {
            body.alive = false;
        }
    }

    pub fn set_position(&mut self, handle: Handle<Node>, position: Vector3<f32>) {
        self.bodies.get_mut(&handle).unwrap().position = position;
    }

    pub fn scale(&self, handle: Handle<Node>) -> Vector3<f32> {
        self.bodies[&handle].scale
    }

    pub fn is_simulating(&self, handle: Handle<Node>) -> bool {
        self.bodies[&handle].simulating
    }

    pub fn physics_toggles(&self, handle: Handle<Node>) -> Vec<bool> {
        self.bodies[&handle].physics_toggles.clone()
    }

    pub fn trace_count(&self) -> usize {
        self.traces.get()
    }

    fn alive(&self, handle: Handle<Node>) -> Option<&StubBody> {
        self.bodies.get(&handle).filter(|b| b.alive)
    }
}

impl RayCaster for StubScene {
    fn trace(
        &self,
        origin: Vector3<f32>,
        end: Vector3<f32>,
        channel: TraceChannel,
        ignore: &[Handle<Node>],
    ) -> Option<TraceHit> {
        self.traces.set(self.traces.get() + 1);

        self.bodies
            .iter()
            .filter(|(handle, body)| body.alive && !ignore.contains(*handle))
            .filter(|(_, body)| channel == TraceChannel::Visibility || !body.simulating)
            .filter_map(|(handle, body)| body.intersect(&origin, &end).map(|t| (*handle, body, t)))
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(collider, body, t)| TraceHit {
                position: origin + (end - origin).scale(t),
                collider,
                is_simulating_physics: body.simulating,
                bone: Handle::NONE,
            })
    }
}

impl ColliderAccess for StubScene {
    fn relative_scale(&self, collider: Handle<Node>) -> Option<Vector3<f32>> {
        self.alive(collider).map(|b| b.scale)
    }

    fn set_relative_scale(&mut self, collider: Handle<Node>, scale: Vector3<f32>) {
        if let Some(body) = self.bodies.get_mut(&collider) {
            body.scale = scale;
        }
    }

    fn set_simulate_physics(&mut self, collider: Handle<Node>, simulate: bool) {
        if let Some(body) = self.bodies.get_mut(&collider) {
            body.simulating = simulate;
            body.physics_toggles.push(simulate);
        }
    }

    fn is_simulating_physics(&self, collider: Handle<Node>) -> bool {
        self.alive(collider).is_some_and(|b| b.simulating)
    }

    fn bounding_sphere_radius(&self, collider: Handle<Node>) -> Option<f32> {
        self.alive(collider).map(|b| b.world_half_extent().norm())
    }

    fn world_location(&self, collider: Handle<Node>) -> Option<Vector3<f32>> {
        self.alive(collider).map(|b| b.position)
    }

    fn world_rotation(&self, collider: Handle<Node>) -> Option<UnitQuaternion<f32>> {
        self.alive(collider).map(|_| UnitQuaternion::identity())
    }
}

#[derive(Default, Debug)]
pub struct RecordingGrab {
    active: bool,
    grabbed: Option<Handle<Node>>,
    pub target_position: Option<Vector3<f32>>,
    pub grab_count: usize,
    pub release_count: usize,
}

impl GrabConstraint for RecordingGrab {
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
        _rotation: UnitQuaternion<f32>,
    ) {
        self.grabbed = Some(collider);
        self.target_position = Some(position);
        self.grab_count += 1;
    }

    fn set_target(&mut self, position: Vector3<f32>, _rotation: UnitQuaternion<f32>) {
        self.target_position = Some(position);
    }

    fn release(&mut self) {
        self.grabbed = None;
        self.target_position = None;
        self.release_count += 1;
    }
}

/// Beam aimed along +Z from the world origin with all collaborators stubbed.
pub struct Rig {
    pub beam: BeamComponent,
    pub scene: StubScene,
    pub grab: RecordingGrab,
    pub timers: TimerQueue,
    pub aim: AimSnapshot,
}

impl Rig {
    pub fn new(settings: BeamSettings) -> Self {
        let mut rig = Self {
            beam: BeamComponent::new(Handle::NONE, settings),
            scene: Default::default(),
            grab: Default::default(),
            timers: Default::default(),
            aim: AimSnapshot {
                control_rotation: UnitQuaternion::identity(),
                muzzle: Some(Vector3::zeros()),
                actor_location: Vector3::zeros(),
            },
        };
        let mut ctx = BeamContext {
            world: &mut rig.scene,
            grab: &mut rig.grab,
            timers: &mut rig.timers,
            aim: &rig.aim,
        };
        rig.beam.init(&mut ctx);
        rig
    }

    fn with_context<R>(&mut self, func: impl FnOnce(&mut BeamComponent, &mut BeamContext) -> R) -> R {
        let mut ctx = BeamContext {
            world: &mut self.scene,
            grab: &mut self.grab,
            timers: &mut self.timers,
            aim: &self.aim,
        };
        func(&mut self.beam, &mut ctx)
    }

    pub fn press(&mut self, mode: BeamMode) {
        self.with_context(|beam, ctx| beam.on_start_fire(mode, ctx))
    }

    pub fn release(&mut self, mode: BeamMode) {
        self.with_context(|beam, ctx| beam.on_stop_fire(mode, ctx))
    }

    pub fn step(&mut self, dt: f32) -> Option<BeamTrace> {
        self.with_context(|beam, ctx| beam.step(dt, ctx))
    }

    pub fn advance_timers(&mut self, dt: f32) {
        for timer in self.timers.advance(dt) {
            self.with_context(|beam, ctx| beam.on_timer_fired(timer, ctx));
        }
    }
}
