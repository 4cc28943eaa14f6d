pub mod beam;
pub mod config;
pub mod control_scheme;
pub mod weapon;

use crate::{config::Config, weapon::BeamGun};
use fyrox::{
    core::{log::Log, pool::Handle, reflect::prelude::*, visitor::prelude::*},
    plugin::{Plugin, PluginContext, PluginRegistrationContext},
    scene::Scene,
};
use std::path::Path;

// Re-export the engine.
pub use fyrox;

#[derive(Visit, Reflect, Debug, Default)]
pub struct Game {
    #[visit(skip)]
    #[reflect(hidden)]
    pub config: Config,
    scene: Handle<Scene>,
}

impl Game {
    pub const DEFAULT_SCENE: &'static str = "data/scene.rgs";
}

impl Plugin for Game {
    fn register(&self, context: PluginRegistrationContext) {
        context
            .serialization_context
            .script_constructors
            .add::<BeamGun>("Beam Gun");
    }

    fn init(&mut self, scene_path: Option<&str>, context: PluginContext) {
        self.config = Config::load();
        context
            .async_scene_loader
            .request(scene_path.unwrap_or(Self::DEFAULT_SCENE));
    }

    fn on_deinit(&mut self, _context: PluginContext) {
        self.config.save_if_needed();
    }

    fn on_scene_loaded(
        &mut self,
        path: &Path,
        scene: Handle<Scene>,
        _data: &[u8],
        context: &mut PluginContext,
    ) {
        if self.scene.is_some() {
            context.scenes.remove(self.scene);
        }
        self.scene = scene;
        Log::info(format!("Scene {} is loaded.", path.display()));
    }
}
