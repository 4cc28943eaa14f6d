//! Beam that diminishes, augments or carries whatever it points at.
//!
//! [`BeamComponent`] owns the beam state and the grabbed target. Everything it
//! touches in the world comes in through a [`BeamContext`] on every call, so
//! the component itself holds no engine references between frames.

pub mod guard;
pub mod settings;
pub mod state_machine;
#[cfg(test)]
pub mod test_util;
pub mod timer;
pub mod world;

use crate::beam::{
    settings::BeamSettings,
    state_machine::{transition, BeamMode, BeamState, TriggerSet},
    timer::TimerHandle,
    world::{AimSource, BeamWorld, DeferredTimer, GrabConstraint, TraceChannel, TraceHit},
};
use fyrox::{
    core::{
        algebra::Vector3, arrayvec::ArrayVec, color::Color, log::Log, math::ray::Ray,
        pool::Handle,
    },
    scene::node::Node,
};

pub struct BeamContext<'a> {
    pub world: &'a mut dyn BeamWorld,
    pub grab: &'a mut dyn GrabConstraint,
    pub timers: &'a mut dyn DeferredTimer,
    pub aim: &'a dyn AimSource,
}

/// Object that is currently carried by the beam.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub collider: Handle<Node>,
    /// Distance from the beam origin to the object at the moment it was grabbed.
    pub grab_distance: f32,
    pub hit_location: Vector3<f32>,
}

/// Beam segment of the current frame, for rendering.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BeamTrace {
    pub begin: Vector3<f32>,
    pub end: Vector3<f32>,
    pub color: Color,
}

#[derive(Clone, Debug, Default)]
pub struct BeamComponent {
    /// Firing actor, never hit by its own beam.
    owner: Handle<Node>,
    settings: BeamSettings,
    state: BeamState,
    triggers: TriggerSet,
    target: Option<Target>,
    stuck_timer: Option<TimerHandle>,
}

impl BeamComponent {
    pub fn new(owner: Handle<Node>, settings: BeamSettings) -> Self {
        Self {
            owner,
            settings,
            ..Default::default()
        }
    }

    pub fn init(&mut self, ctx: &mut BeamContext) {
        self.release_target(ctx);
        ctx.grab.activate(false);
        self.triggers.clear();
        self.state = BeamState::Off;
        Log::info(format!("Beam of {} is initialized.", self.owner));
    }

    pub fn state(&self) -> BeamState {
        self.state
    }

    pub fn triggers(&self) -> TriggerSet {
        self.triggers
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn grab_distance(&self) -> Option<f32> {
        self.target.as_ref().map(|t| t.grab_distance)
    }

    pub fn stuck_timer(&self) -> Option<TimerHandle> {
        self.stuck_timer
    }

    pub fn settings(&self) -> &BeamSettings {
        &self.settings
    }

    pub fn on_start_fire(&mut self, mode: BeamMode, ctx: &mut BeamContext) {
        if self.triggers.set(mode, true) {
            self.apply_edge(mode, ctx);
        }
    }

    pub fn on_stop_fire(&mut self, mode: BeamMode, ctx: &mut BeamContext) {
        if self.triggers.set(mode, false) {
            self.apply_edge(mode, ctx);
        }
    }

    fn apply_edge(&mut self, mode: BeamMode, ctx: &mut BeamContext) {
        let previous = self.state;
        self.state = transition(previous, mode);

        let implied = self.triggers.implied_state();
        if implied != self.state {
            Log::warn(format!(
                "Beam state {} does not match the held triggers ({}).",
                self.state.as_ref(),
                implied.as_ref()
            ));
        }

        if self.state != BeamState::Grab {
            self.release_target(ctx);
        }

        Log::info(format!(
            "Beam switched from {} to {} on {} edge.",
            previous.as_ref(),
            self.state.as_ref(),
            mode.as_ref()
        ));
    }

    /// Called by the host when a scheduled task fires.
    pub fn on_timer_fired(&mut self, timer: TimerHandle, ctx: &mut BeamContext) {
        if self.stuck_timer != Some(timer) {
            Log::warn(format!("Stale timer {timer} is ignored."));
            return;
        }

        self.stuck_timer = None;
        if let Some(target) = self.target.as_ref() {
            Log::info(format!(
                "Object {} lagged behind for too long and is dropped.",
                target.collider
            ));
        }
        self.release_target(ctx);
    }

    /// Runs one frame of the beam. Returns the beam segment if the beam is on.
    pub fn step(&mut self, dt: f32, ctx: &mut BeamContext) -> Option<BeamTrace> {
        if !self.state.is_active() {
            return None;
        }

        self.drop_lost_target(ctx);

        let ray = self.aim_ray(ctx.aim);
        let (hit, range) = self.acquire(&ray, ctx);

        match hit {
            None => {
                if self.target.is_none() {
                    self.clear_stuck_timer(ctx.timers);
                }
            }
            Some(hit) if hit.is_simulating_physics => match self.state.scale_mode() {
                Some(mode) => {
                    self.release_target(ctx);
                    self.scale(hit.collider, mode, dt, ctx);
                }
                None => self.grab(&hit, &ray, ctx),
            },
            Some(hit) => self.handle_static_hit(&hit, ctx),
        }

        if self.target.is_some() {
            if self.carry(&ray, ctx) {
                self.arm_stuck_timer(ctx.timers);
            } else {
                self.clear_stuck_timer(ctx.timers);
            }
        }

        Some(BeamTrace {
            begin: ray.origin,
            end: hit.map_or_else(|| point_at(&ray, range), |h| h.position),
            color: self.state.color(),
        })
    }

    /// Unit ray from the muzzle along the aim.
    fn aim_ray(&self, aim: &dyn AimSource) -> Ray {
        let rotation = aim.control_rotation();
        let origin = aim
            .muzzle_world_location()
            .unwrap_or_else(|| aim.actor_location() + rotation * self.settings.gun_offset());
        Ray::new(origin, rotation * Vector3::z())
    }

    fn acquire(&self, ray: &Ray, ctx: &BeamContext) -> (Option<TraceHit>, f32) {
        let mut ignore = ArrayVec::<Handle<Node>, 2>::new();
        ignore.push(self.owner);

        // While carrying, only look for something between the muzzle and the
        // carried object.
        let range = match self.target.as_ref() {
            Some(target) if ctx.grab.is_active() => {
                ignore.push(target.collider);
                target.grab_distance
            }
            _ => self.settings.beam_range,
        };

        let hit = ctx
            .world
            .trace(
                ray.origin,
                point_at(ray, range),
                TraceChannel::Visibility,
                &ignore,
            )
            .filter(|hit| {
                hit.collider != self.owner && ctx.world.world_location(hit.collider).is_some()
            });

        (hit, range)
    }

    fn grab(&mut self, hit: &TraceHit, ray: &Ray, ctx: &mut BeamContext) {
        if ctx.grab.is_active() && ctx.grab.grabbed() == Some(hit.collider) {
            return;
        }

        let (Some(location), Some(rotation)) = (
            ctx.world.world_location(hit.collider),
            ctx.world.world_rotation(hit.collider),
        ) else {
            return;
        };

        self.clear_stuck_timer(ctx.timers);
        if ctx.grab.grabbed().is_some() {
            ctx.grab.release();
        }
        ctx.grab.activate(true);
        ctx.grab.grab(hit.collider, hit.bone, location, rotation);

        let grab_distance = (ray.origin - location).norm();
        Log::info(format!(
            "Object {} is grabbed at distance {grab_distance}.",
            hit.collider
        ));

        self.target = Some(Target {
            collider: hit.collider,
            grab_distance,
            hit_location: hit.position,
        });
    }

    /// While carrying, the trace never reaches past the carried object, so any
    /// static hit lies between the muzzle and the object.
    fn handle_static_hit(&mut self, hit: &TraceHit, ctx: &mut BeamContext) {
        if self.target.is_none() || !ctx.grab.is_active() {
            return;
        }

        Log::info(format!(
            "Beam is interrupted by {}, carried object is dropped.",
            hit.collider
        ));
        self.release_target(ctx);
    }

    /// Moves the hold point of the carried object. Returns `true` if the object
    /// lags behind it for more than the tolerance.
    fn carry(&mut self, ray: &Ray, ctx: &mut BeamContext) -> bool {
        let Some(target) = self.target.as_ref() else {
            return false;
        };

        let collider = target.collider;
        let hold_point = point_at(ray, target.grab_distance);
        let (Some(location), Some(rotation)) = (
            ctx.world.world_location(collider),
            ctx.world.world_rotation(collider),
        ) else {
            Log::warn(format!("Carried object {collider} is gone."));
            self.release_target(ctx);
            return false;
        };

        ctx.grab.set_target(hold_point, rotation);

        let radius = ctx.world.bounding_sphere_radius(collider).unwrap_or_default();
        let lag = (location - hold_point).norm() - radius;
        lag > self.settings.disconnection_tolerance
    }

    fn scale(&mut self, collider: Handle<Node>, mode: BeamMode, dt: f32, ctx: &mut BeamContext) {
        if !ctx.world.is_simulating_physics(collider) {
            return;
        }
        let Some(scale) = ctx.world.relative_scale(collider) else {
            return;
        };

        let delta = mode.scale_sign() * self.settings.beam_scale_speed * dt;
        let new_scale = scale.add_scalar(delta);

        let allowed = match mode {
            BeamMode::Diminish => new_scale.norm() > self.settings.min_size,
            BeamMode::Augment => {
                new_scale.norm() > scale.norm()
                    && !guard::would_collide_on_scale_up(&*ctx.world, collider)
            }
        };
        if !allowed {
            return;
        }

        // Physics must be off while the extents change, otherwise the solver
        // resolves penetration against the old shape.
        ctx.world.set_simulate_physics(collider, false);
        ctx.world.set_relative_scale(collider, new_scale);
        ctx.world.set_simulate_physics(collider, true);
    }

    fn drop_lost_target(&mut self, ctx: &mut BeamContext) {
        let Some(target) = self.target.as_ref() else {
            return;
        };

        let lost = ctx.world.world_location(target.collider).is_none();
        let detached = !ctx.grab.is_active() || ctx.grab.grabbed() != Some(target.collider);
        if lost || detached {
            Log::warn(format!("Carried object {} is lost.", target.collider));
            self.release_target(ctx);
        }
    }

    fn release_target(&mut self, ctx: &mut BeamContext) {
        self.clear_stuck_timer(ctx.timers);

        if ctx.grab.is_active() || ctx.grab.grabbed().is_some() {
            ctx.grab.activate(false);
            ctx.grab.release();
        }

        if let Some(target) = self.target.take() {
            Log::info(format!("Object {} is released.", target.collider));
        }
    }

    fn arm_stuck_timer(&mut self, timers: &mut dyn DeferredTimer) {
        if self.stuck_timer.is_some_and(|timer| timers.is_armed(timer)) {
            return;
        }
        self.stuck_timer = Some(timers.schedule(self.settings.disconnection_time));
    }

    fn clear_stuck_timer(&mut self, timers: &mut dyn DeferredTimer) {
        if let Some(timer) = self.stuck_timer.take() {
            timers.cancel(timer);
        }
    }
}

fn point_at(ray: &Ray, distance: f32) -> Vector3<f32> {
    ray.origin + ray.dir.scale(distance)
}
