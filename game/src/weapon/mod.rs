//! Beam gun script that hooks a [`BeamComponent`] into a Fyrox scene.

use crate::{
    beam::{timer::TimerQueue, world::AimSnapshot, BeamComponent, BeamContext},
    control_scheme::{ControlButton, ControlScheme},
    weapon::{physics_handle::PhysicsHandle, scene::SceneBridge},
    Game,
};
use fyrox::{
    core::{
        algebra::UnitQuaternion,
        pool::Handle,
        reflect::prelude::*,
        type_traits::prelude::*,
        variable::InheritableVariable,
        visitor::prelude::*,
    },
    event::{ElementState, Event},
    graph::BaseSceneGraph,
    scene::{debug::Line, graph::Graph, node::Node},
    script::{ScriptContext, ScriptDeinitContext, ScriptTrait},
};

pub mod physics_handle;
pub mod scene;

#[derive(Visit, Reflect, Debug, Clone, TypeUuidProvider, ComponentProvider)]
#[type_uuid(id = "6f4bd3a4-2c67-4b0e-9e5f-1d0a8e0c7b21")]
#[visit(optional)]
pub struct BeamGun {
    #[reflect(description = "Node whose rotation is the aim, usually the camera.")]
    aim_pivot: InheritableVariable<Handle<Node>>,

    #[reflect(description = "Beam origin. The gun offset from the owner is used if unset.")]
    muzzle: InheritableVariable<Handle<Node>>,

    #[reflect(description = "Body of the actor holding the gun, never hit by the beam.")]
    owner: InheritableVariable<Handle<Node>>,

    draw_beam: InheritableVariable<bool>,

    #[reflect(hidden)]
    #[visit(skip)]
    beam: BeamComponent,

    #[reflect(hidden)]
    #[visit(skip)]
    handle: PhysicsHandle,

    #[reflect(hidden)]
    #[visit(skip)]
    timers: TimerQueue,

    #[reflect(hidden)]
    #[visit(skip)]
    controls: ControlScheme,
}

impl Default for BeamGun {
    fn default() -> Self {
        Self {
            aim_pivot: Default::default(),
            muzzle: Default::default(),
            owner: Default::default(),
            draw_beam: true.into(),
            beam: Default::default(),
            handle: Default::default(),
            timers: Default::default(),
            controls: Default::default(),
        }
    }
}

impl BeamGun {
    fn aim_snapshot(&self, graph: &Graph) -> AimSnapshot {
        let pivot = graph.try_get(*self.aim_pivot);
        let actor_location = graph
            .try_get(*self.owner)
            .or(pivot)
            .map(|node| node.global_position())
            .unwrap_or_default();

        AimSnapshot {
            control_rotation: pivot
                .map(|_| graph.global_rotation(*self.aim_pivot))
                .unwrap_or_else(UnitQuaternion::identity),
            muzzle: graph
                .try_get(*self.muzzle)
                .map(|node| node.global_position()),
            actor_location,
        }
    }

    fn with_context<R>(
        &mut self,
        graph: &mut Graph,
        func: impl FnOnce(&mut BeamComponent, &mut BeamContext) -> R,
    ) -> R {
        let aim = self.aim_snapshot(graph);
        let mut world = SceneBridge::new(graph);
        let mut ctx = BeamContext {
            world: &mut world,
            grab: &mut self.handle,
            timers: &mut self.timers,
            aim: &aim,
        };
        func(&mut self.beam, &mut ctx)
    }
}

impl ScriptTrait for BeamGun {
    fn on_start(&mut self, ctx: &mut ScriptContext) {
        let config = &ctx.plugins.get::<Game>().config;
        let settings = config.beam.clone();
        self.controls = config.controls.clone();

        self.handle = PhysicsHandle::new(settings.handle_stiffness, settings.handle_linear_damping);
        self.timers = TimerQueue::default();
        self.beam = BeamComponent::new(*self.owner, settings);
        self.with_context(&mut ctx.scene.graph, |beam, beam_ctx| beam.init(beam_ctx));
    }

    fn on_deinit(&mut self, ctx: &mut ScriptDeinitContext) {
        self.with_context(&mut ctx.scene.graph, |beam, beam_ctx| beam.init(beam_ctx));
    }

    fn on_os_event(&mut self, event: &Event<()>, ctx: &mut ScriptContext) {
        let Some((button, state)) = ControlButton::from_event(event) else {
            return;
        };
        let Some(mode) = self.controls.mode_of(button) else {
            return;
        };

        self.with_context(&mut ctx.scene.graph, |beam, beam_ctx| match state {
            ElementState::Pressed => beam.on_start_fire(mode, beam_ctx),
            ElementState::Released => beam.on_stop_fire(mode, beam_ctx),
        });
    }

    fn on_update(&mut self, ctx: &mut ScriptContext) {
        let dt = ctx.dt;

        let trace = self.with_context(&mut ctx.scene.graph, |beam, beam_ctx| {
            beam.step(dt, beam_ctx)
        });

        for timer in self.timers.advance(dt) {
            self.with_context(&mut ctx.scene.graph, |beam, beam_ctx| {
                beam.on_timer_fired(timer, beam_ctx)
            });
        }

        self.handle.update(&mut ctx.scene.graph, dt);

        if let Some(trace) = trace.filter(|_| *self.draw_beam) {
            ctx.scene.drawing_context.add_line(Line {
                begin: trace.begin,
                end: trace.end,
                color: trace.color,
            });
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use fyrox::core::algebra::Vector3;
    use fyrox::scene::{base::BaseBuilder, pivot::PivotBuilder, transform::TransformBuilder};

    #[test]
    fn aim_is_read_from_pivot_and_muzzle() {
        let mut graph = Graph::new();
        let rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 1.0);
        let pivot = PivotBuilder::new(
            BaseBuilder::new().with_local_transform(
                TransformBuilder::new()
                    .with_local_position(Vector3::new(1.0, 2.0, 3.0))
                    .with_local_rotation(rotation)
                    .build(),
            ),
        )
        .build(&mut graph);
        let muzzle = PivotBuilder::new(
            BaseBuilder::new().with_local_transform(
                TransformBuilder::new()
                    .with_local_position(Vector3::new(4.0, 5.0, 6.0))
                    .build(),
            ),
        )
        .build(&mut graph);
        graph.update_hierarchical_data();

        let mut gun = BeamGun::default();
        gun.aim_pivot.set_value_and_mark_modified(pivot);

        let aim = gun.aim_snapshot(&graph);
        assert!(aim.muzzle.is_none());
        assert_eq!(aim.actor_location, Vector3::new(1.0, 2.0, 3.0));
        assert!(aim.control_rotation.angle_to(&rotation) < 1.0e-5);

        gun.muzzle.set_value_and_mark_modified(muzzle);
        let aim = gun.aim_snapshot(&graph);
        assert_eq!(aim.muzzle, Some(Vector3::new(4.0, 5.0, 6.0)));
    }
}
