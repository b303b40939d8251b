mod config;
mod dispatch;
mod error;
mod events;
mod handlers;
mod kitchen;
mod processing;
mod proximity;
mod scene;
mod types;

use engine::Scene;
use rand::rngs::StdRng;

pub(crate) use config::{load_kitchen_config, ConfigError, KitchenConfig};

pub(crate) fn build_kitchen_scene(config: KitchenConfig, rng: StdRng) -> Box<dyn Scene> {
    Box::new(scene::KitchenScene::new(config, rng))
}
