use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardReset,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    interact_pressed: bool,
    reset_pressed: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(interact_pressed: bool, reset_pressed: bool, actions: ActionStates) -> Self {
        Self {
            interact_pressed,
            reset_pressed,
            actions,
        }
    }

    /// True for exactly one tick per interact key press.
    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    pub fn reset_pressed(&self) -> bool {
        self.reset_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_interact_pressed(mut self, interact_pressed: bool) -> Self {
        self.interact_pressed = interact_pressed;
        self
    }

    pub fn with_reset_pressed(mut self, reset_pressed: bool) -> Self {
        self.reset_pressed = reset_pressed;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Vec2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Vec2) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn offset(self, dx: f32, dy: f32) -> Vec2 {
        Vec2 {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Camera2D {
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Transform {
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderableKind {
    Block {
        color: [u8; 4],
        half_size_world: f32,
    },
    ProgressBar {
        progress: f32,
    },
}

#[derive(Debug, Clone)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub debug_name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub text: String,
    pub ttl_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub transform: Transform,
    pub renderable: RenderableDesc,
    applied_spawn_order: u64,
}

impl Entity {
    pub fn applied_spawn_order(&self) -> u64 {
        self.applied_spawn_order
    }
}

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Visual state owned by the active scene.
///
/// Spawns and despawns are deferred until [`SceneWorld::apply_pending`], which the loop
/// runner calls after every tick. Position and progress updates apply to pending spawns too,
/// so a scene can spawn a visual and configure it within the same tick.
#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    pending_spawns: Vec<Entity>,
    pending_despawns: Vec<EntityId>,
    next_applied_spawn_order: u64,
    camera: Camera2D,
    toasts: Vec<Toast>,
}

impl SceneWorld {
    pub fn spawn(&mut self, transform: Transform, renderable: RenderableDesc) -> EntityId {
        let id = self.allocator.allocate();
        self.pending_spawns.push(Entity {
            id,
            transform,
            renderable,
            applied_spawn_order: 0,
        });
        id
    }

    pub fn spawn_progress_bar(&mut self, position: Vec2) -> EntityId {
        self.spawn(
            Transform { position },
            RenderableDesc {
                kind: RenderableKind::ProgressBar { progress: 0.0 },
                debug_name: "progress_bar",
            },
        )
    }

    pub fn despawn(&mut self, id: EntityId) -> bool {
        let exists_now = self.entities.iter().any(|entity| entity.id == id);
        let pending_spawn = self.pending_spawns.iter().any(|entity| entity.id == id);
        if !exists_now && !pending_spawn {
            return false;
        }
        self.pending_despawns.push(id);
        true
    }

    pub fn apply_pending(&mut self) {
        if !self.pending_spawns.is_empty() {
            for mut entity in self.pending_spawns.drain(..) {
                entity.applied_spawn_order = self.next_applied_spawn_order;
                self.next_applied_spawn_order = self.next_applied_spawn_order.saturating_add(1);
                self.entities.push(entity);
            }
        }

        if !self.pending_despawns.is_empty() {
            self.pending_despawns.sort();
            self.pending_despawns.dedup();
            let pending = &self.pending_despawns;
            self.entities
                .retain(|entity| pending.binary_search(&entity.id).is_err());
            self.pending_despawns.clear();
        }
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending_spawns.clear();
        self.pending_despawns.clear();
        self.next_applied_spawn_order = 0;
        self.camera = Camera2D::default();
        self.toasts.clear();
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        match self.find_any_mut(id) {
            Some(entity) => {
                entity.transform.position = position;
                true
            }
            None => false,
        }
    }

    /// Updates a progress bar's fill fraction, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, id: EntityId, fraction: f32) -> bool {
        let Some(entity) = self.find_any_mut(id) else {
            return false;
        };
        match &mut entity.renderable.kind {
            RenderableKind::ProgressBar { progress } => {
                *progress = clamp_fraction(fraction);
                true
            }
            RenderableKind::Block { .. } => false,
        }
    }

    pub fn progress(&self, id: EntityId) -> Option<f32> {
        let entity = self
            .entities
            .iter()
            .chain(self.pending_spawns.iter())
            .find(|entity| entity.id == id)?;
        match entity.renderable.kind {
            RenderableKind::ProgressBar { progress } => Some(progress),
            RenderableKind::Block { .. } => None,
        }
    }

    pub fn push_toast(&mut self, text: impl Into<String>, ttl_seconds: f32) {
        self.toasts.push(Toast {
            text: text.into(),
            ttl_seconds,
        });
    }

    pub fn tick_toasts(&mut self, fixed_dt_seconds: f32) {
        self.toasts.retain_mut(|toast| {
            toast.ttl_seconds -= fixed_dt_seconds;
            toast.ttl_seconds > 0.0
        });
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn latest_toast(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    fn find_any_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .chain(self.pending_spawns.iter_mut())
            .find(|entity| entity.id == id)
    }
}

fn clamp_fraction(fraction: f32) -> f32 {
    if !fraction.is_finite() {
        return 0.0;
    }
    fraction.clamp(0.0, 1.0)
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn render(&mut self, world: &SceneWorld);
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

pub(crate) struct SceneMachine {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneMachine {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        self.scene.update(fixed_dt_seconds, input, &mut self.world)
    }

    pub(crate) fn apply_pending(&mut self) {
        self.world.apply_pending();
    }

    pub(crate) fn hard_reset(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
        }
        self.world.clear();
        self.is_loaded = false;
        self.load();
        self.world.apply_pending();
    }

    pub(crate) fn render(&mut self) {
        self.scene.render(&self.world);
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title(&self.world)
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload(&mut self.world);
            self.is_loaded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(debug_name: &'static str) -> RenderableDesc {
        RenderableDesc {
            kind: RenderableKind::Block {
                color: [255, 255, 255, 255],
                half_size_world: 0.5,
            },
            debug_name,
        }
    }

    struct SteppingScene {
        spawn_count: usize,
        step_x: f32,
        first: Option<EntityId>,
    }

    impl Scene for SteppingScene {
        fn load(&mut self, world: &mut SceneWorld) {
            self.first = None;
            for _ in 0..self.spawn_count {
                let id = world.spawn(Transform::default(), block("step"));
                self.first.get_or_insert(id);
            }
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f32,
            input: &InputSnapshot,
            world: &mut SceneWorld,
        ) -> SceneCommand {
            if input.reset_pressed() {
                return SceneCommand::HardReset;
            }
            if let Some(id) = self.first {
                let x = world.find_entity(id).map_or(0.0, |e| e.transform.position.x);
                world.set_position(id, Vec2::new(x + self.step_x, 0.0));
            }
            SceneCommand::None
        }

        fn render(&mut self, _world: &SceneWorld) {}

        fn unload(&mut self, _world: &mut SceneWorld) {}
    }

    #[test]
    fn allocator_never_reuses_ids() {
        let mut allocator = EntityIdAllocator::default();
        let first = allocator.allocate();
        let second = allocator.allocate();
        let third = allocator.allocate();

        assert_eq!(first.0, 0);
        assert_eq!(second.0, 1);
        assert_eq!(third.0, 2);
    }

    #[test]
    fn scene_world_spawn_and_despawn_updates_count() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Transform::default(), block("spawned"));
        world.apply_pending();
        assert_eq!(world.entity_count(), 1);

        assert!(world.despawn(id));
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
        assert!(!world.despawn(id));
    }

    #[test]
    fn duplicate_pending_despawns_are_idempotent() {
        let mut world = SceneWorld::default();
        let doomed = world.spawn(Transform::default(), block("doomed"));
        let survivor = world.spawn(Transform::default(), block("survivor"));
        world.apply_pending();

        world.despawn(doomed);
        world.despawn(doomed);
        world.apply_pending();

        assert_eq!(world.entity_count(), 1);
        assert!(world.find_entity(survivor).is_some());
    }

    #[test]
    fn despawn_of_pending_spawn_removes_it_on_apply() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Transform::default(), block("short_lived"));
        assert!(world.despawn(id));
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn set_position_reaches_pending_spawns() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Transform::default(), block("moved"));
        assert!(world.set_position(id, Vec2::new(3.0, -2.0)));
        world.apply_pending();

        let entity = world.find_entity(id).expect("entity");
        assert_eq!(entity.transform.position, Vec2::new(3.0, -2.0));
    }

    #[test]
    fn progress_bar_fraction_is_clamped() {
        let mut world = SceneWorld::default();
        let bar = world.spawn_progress_bar(Vec2::default());
        assert_eq!(world.progress(bar), Some(0.0));

        assert!(world.set_progress(bar, 0.25));
        assert_eq!(world.progress(bar), Some(0.25));
        world.apply_pending();

        world.set_progress(bar, 1.7);
        assert_eq!(world.progress(bar), Some(1.0));
        world.set_progress(bar, f32::NAN);
        assert_eq!(world.progress(bar), Some(0.0));
    }

    #[test]
    fn set_progress_rejects_non_bar_entities() {
        let mut world = SceneWorld::default();
        let id = world.spawn(Transform::default(), block("block"));
        assert!(!world.set_progress(id, 0.5));
        assert_eq!(world.progress(id), None);
    }

    #[test]
    fn toasts_expire_after_ttl() {
        let mut world = SceneWorld::default();
        world.push_toast("Hands full!", 0.1);
        world.push_toast("Nothing nearby!", 0.3);
        assert_eq!(world.latest_toast().map(|t| t.text.as_str()), Some("Nothing nearby!"));

        world.tick_toasts(0.15);
        assert_eq!(world.toasts().len(), 1);

        world.tick_toasts(0.15);
        assert!(world.toasts().is_empty());
        assert!(world.latest_toast().is_none());
    }

    #[test]
    fn clear_drops_entities_and_toasts() {
        let mut world = SceneWorld::default();
        world.spawn(Transform::default(), block("a"));
        world.apply_pending();
        world.spawn(Transform::default(), block("b"));
        world.push_toast("x", 1.0);

        world.clear();
        world.apply_pending();
        assert_eq!(world.entity_count(), 0);
        assert!(world.toasts().is_empty());
    }

    #[test]
    fn scene_machine_update_mutates_world() {
        let mut machine = SceneMachine::new(Box::new(SteppingScene {
            spawn_count: 2,
            step_x: 1.5,
            first: None,
        }));
        machine.load();
        machine.apply_pending();

        let command = machine.update(1.0 / 60.0, &InputSnapshot::empty());
        machine.apply_pending();
        assert_eq!(command, SceneCommand::None);
        assert_eq!(machine.world().entity_count(), 2);
        let moved = machine.world().entities()[0].transform.position.x;
        assert!((moved - 1.5).abs() < 0.0001);
    }

    #[test]
    fn hard_reset_recreates_scene_state() {
        let mut machine = SceneMachine::new(Box::new(SteppingScene {
            spawn_count: 1,
            step_x: 1.0,
            first: None,
        }));
        machine.load();
        machine.apply_pending();
        machine.update(1.0 / 60.0, &InputSnapshot::empty());
        machine.apply_pending();

        let command = machine.update(1.0 / 60.0, &InputSnapshot::empty().with_reset_pressed(true));
        assert_eq!(command, SceneCommand::HardReset);
        machine.hard_reset();

        assert_eq!(machine.world().entity_count(), 1);
        let entity = &machine.world().entities()[0];
        assert_eq!(entity.transform.position, Vec2::default());
        assert_eq!(entity.applied_spawn_order(), 0);
    }

    #[test]
    fn vec2_distance_is_euclidean() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < 0.0001);
        assert!((a.distance_sq(b) - 25.0).abs() < 0.0001);
        assert_eq!(a.offset(1.0, -1.0), Vec2::new(1.0, -1.0));
    }
}
