use engine::{InputAction, InputSnapshot, Scene, SceneCommand, SceneWorld, Vec2};
use rand::rngs::StdRng;
use tracing::{debug, info};

use super::config::KitchenConfig;
use super::dispatch::dispatch_interaction;
use super::events::{KitchenEvent, KitchenEventBus};
use super::handlers::{InteractionContext, InteractionOutcome, InteractionResult};
use super::kitchen::Kitchen;
use super::processing::{ProcessingCompleted, ProcessingDurations, ProcessingEngine};
use super::types::Item;

pub(crate) struct KitchenScene {
    config: KitchenConfig,
    kitchen: Kitchen,
    processing: ProcessingEngine,
    events: KitchenEventBus,
    rng: StdRng,
}

impl KitchenScene {
    pub(crate) fn new(config: KitchenConfig, rng: StdRng) -> Self {
        let kitchen = Kitchen::new(&config);
        let processing = ProcessingEngine::new(durations_from(&config));
        Self {
            config,
            kitchen,
            processing,
            events: KitchenEventBus::default(),
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn kitchen(&self) -> &Kitchen {
        &self.kitchen
    }

    #[cfg(test)]
    pub(crate) fn processing(&self) -> &ProcessingEngine {
        &self.processing
    }

    #[cfg(test)]
    pub(crate) fn events(&self) -> &KitchenEventBus {
        &self.events
    }

    #[cfg(test)]
    pub(crate) fn kitchen_mut(&mut self) -> &mut Kitchen {
        &mut self.kitchen
    }

    pub(crate) fn interact(&mut self, world: &mut SceneWorld) -> InteractionResult {
        let mut ctx = InteractionContext {
            kitchen: &mut self.kitchen,
            processing: &mut self.processing,
            world,
            events: &mut self.events,
            rng: &mut self.rng,
        };
        dispatch_interaction(
            &mut ctx,
            self.config.interaction_radius,
            self.config.toast_seconds,
        )
    }

    fn move_player(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot, world: &mut SceneWorld) {
        let direction = movement_direction(input);
        if direction == Vec2::default() {
            return;
        }
        let step = self.config.player_speed * fixed_dt_seconds;
        self.kitchen
            .move_player(world, Vec2::new(direction.x * step, direction.y * step));
    }

    fn tick_processing(&mut self, fixed_dt_seconds: f32, world: &mut SceneWorld) {
        let Some(ProcessingCompleted {
            handle,
            kind,
            counter,
            item_kind,
            consumed,
            produced,
        }) = self.processing.tick(fixed_dt_seconds, &mut self.kitchen, world)
        else {
            return;
        };
        self.events.emit(KitchenEvent::TaskCompleted {
            handle,
            kind,
            counter,
            consumed,
            produced,
        });
        self.events.emit(KitchenEvent::ItemCreated {
            item: produced,
            kind: item_kind,
            state: kind.target_state(),
        });
    }
}

impl Scene for KitchenScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.kitchen = Kitchen::new(&self.config);
        self.processing = ProcessingEngine::new(durations_from(&self.config));
        self.events.clear();
        self.kitchen.spawn_fixture_visuals(world);
        info!(
            stations = self.kitchen.stations().len(),
            counters = self.kitchen.counters().len(),
            "kitchen_loaded"
        );
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        if input.reset_pressed() {
            info!("kitchen_reset_requested");
            return SceneCommand::HardReset;
        }

        self.move_player(fixed_dt_seconds, input, world);
        // Rejections are already surfaced as toasts by the dispatcher.
        let started_task = input.interact_pressed()
            && matches!(
                self.interact(world),
                Ok(InteractionOutcome::StartedTask { .. })
            );
        // A task accrues progress from the tick after the one that started it.
        if !started_task {
            self.tick_processing(fixed_dt_seconds, world);
        }
        world.tick_toasts(fixed_dt_seconds);

        for event in self.events.iter_emitted_so_far() {
            event.trace();
        }
        self.events.finish_tick_rollover();
        let counts = self.events.last_tick_counts();
        if counts.total > 0 {
            debug!(
                total = counts.total,
                item_created = counts.item_created,
                task_started = counts.task_started,
                task_completed = counts.task_completed,
                ingredient_plated = counts.ingredient_plated,
                plate_served = counts.plate_served,
                "kitchen_tick_events"
            );
        }
        SceneCommand::None
    }

    fn render(&mut self, _world: &SceneWorld) {}

    fn unload(&mut self, world: &mut SceneWorld) {
        self.processing.abort(world);
        info!(items = self.kitchen.item_count(), "kitchen_unloaded");
    }

    fn debug_title(&self, world: &SceneWorld) -> Option<String> {
        let holding = self
            .kitchen
            .held_item()
            .map_or_else(|| "nothing".to_string(), describe_item);
        let mut title = format!("Kitchen Rush | holding: {holding}");
        if let Some(task) = self.processing.active() {
            title.push_str(&format!(
                " | {} {:.0}%",
                task.kind.as_token(),
                task.progress * 100.0
            ));
        }
        if let Some(toast) = world.latest_toast() {
            title.push_str(" | ");
            title.push_str(&toast.text);
        }
        Some(title)
    }
}

fn durations_from(config: &KitchenConfig) -> ProcessingDurations {
    ProcessingDurations {
        chop_seconds: config.chop_seconds,
        cook_seconds: config.cook_seconds,
    }
}

fn movement_direction(input: &InputSnapshot) -> Vec2 {
    let mut x: f32 = 0.0;
    let mut y: f32 = 0.0;
    if input.is_down(InputAction::MoveUp) {
        y += 1.0;
    }
    if input.is_down(InputAction::MoveDown) {
        y -= 1.0;
    }
    if input.is_down(InputAction::MoveRight) {
        x += 1.0;
    }
    if input.is_down(InputAction::MoveLeft) {
        x -= 1.0;
    }
    let length = (x * x + y * y).sqrt();
    if length <= f32::EPSILON {
        return Vec2::default();
    }
    Vec2::new(x / length, y / length)
}

fn describe_item(item: &Item) -> String {
    if !item.kind.is_plate() {
        return item.as_ingredient().to_string();
    }
    if item.contents.is_empty() {
        return "Plate (empty)".to_string();
    }
    let contents: Vec<String> = item.contents.iter().map(ToString::to_string).collect();
    format!("Plate [{}]", contents.join(", "))
}
