use std::collections::BTreeMap;

use engine::{RenderableDesc, RenderableKind, SceneWorld, Transform, Vec2};

use super::config::KitchenConfig;
use super::error::{EmptyTarget, InteractionError};
use super::types::{
    Counter, CounterId, Ingredient, Item, ItemId, ItemKind, ItemState, Player, Station, StationKind,
};

const STATION_SIZE: f32 = 1.0;
const COUNTER_SIZE: f32 = 0.8;
const PLAYER_SIZE: f32 = 0.6;
const ITEM_SIZE: f32 = 0.4;
const PLATE_SIZE: f32 = 0.5;
const HELD_ITEM_OFFSET: Vec2 = Vec2::new(0.0, 0.45);

const PANTRY_COLOR: u32 = 0x228B22;
const CHOPPING_COLOR: u32 = 0xFF5252;
const COOKING_COLOR: u32 = 0xFF9800;
const PLATE_DISPENSER_COLOR: u32 = 0xC0C0C0;
const SERVING_COLOR: u32 = 0x2196F3;
const COUNTER_COLOR: u32 = 0x8B4513;
const PLAYER_COLOR: u32 = 0xFFFFFF;
const ONION_COLOR: u32 = 0xFFEB3B;
const TOMATO_COLOR: u32 = 0xFF5252;
const MEAT_COLOR: u32 = 0x8B4513;
const PLATE_COLOR: u32 = 0xFFFFFF;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct KitchenBounds {
    pub(crate) half_extents: Vec2,
}

impl KitchenBounds {
    pub(crate) fn clamp(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.clamp(-self.half_extents.x, self.half_extents.x),
            position.y.clamp(-self.half_extents.y, self.half_extents.y),
        )
    }
}

/// Owns every logical object in the kitchen: the player, the static stations and counters,
/// and the registry of live items.
///
/// Every mutation keeps two invariants: a counter is occupied exactly when it references an
/// item, and an item is never both held and placed.
#[derive(Debug)]
pub(crate) struct Kitchen {
    player: Player,
    stations: Vec<Station>,
    counters: Vec<Counter>,
    items: BTreeMap<ItemId, Item>,
    next_item_id: u64,
    chopping_counter: Option<CounterId>,
    cooking_counter: Option<CounterId>,
    bounds: KitchenBounds,
}

impl Kitchen {
    pub(crate) fn new(config: &KitchenConfig) -> Self {
        let counters: Vec<Counter> = config
            .counters
            .iter()
            .map(|position| Counter {
                position: position.to_vec2(),
                item: None,
            })
            .collect();
        let chopping = config.chopping_counter.to_vec2();
        let cooking = config.cooking_counter.to_vec2();
        let mut kitchen = Self {
            player: Player::new(config.player_spawn.to_vec2()),
            stations: config
                .stations
                .iter()
                .map(|station| Station {
                    kind: station.kind,
                    position: station.position.to_vec2(),
                })
                .collect(),
            counters,
            items: BTreeMap::new(),
            next_item_id: 0,
            chopping_counter: None,
            cooking_counter: None,
            bounds: KitchenBounds {
                half_extents: config.bounds_half_extents.to_vec2(),
            },
        };
        kitchen.chopping_counter = kitchen.counter_at(chopping);
        kitchen.cooking_counter = kitchen.counter_at(cooking);
        kitchen
    }

    pub(crate) fn spawn_fixture_visuals(&mut self, world: &mut SceneWorld) {
        for station in &self.stations {
            world.spawn(
                Transform {
                    position: station.position,
                },
                block(
                    station_color(station.kind),
                    STATION_SIZE,
                    station.kind.as_token(),
                ),
            );
        }
        for counter in &self.counters {
            world.spawn(
                Transform {
                    position: counter.position,
                },
                block(COUNTER_COLOR, COUNTER_SIZE, "counter"),
            );
        }
        let player_visual = world.spawn(
            Transform {
                position: self.player.position,
            },
            block(PLAYER_COLOR, PLAYER_SIZE, "player"),
        );
        self.player.visual = Some(player_visual);
    }

    pub(crate) fn player(&self) -> &Player {
        &self.player
    }

    pub(crate) fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub(crate) fn station(&self, kind: StationKind) -> Option<&Station> {
        self.stations.iter().find(|station| station.kind == kind)
    }

    pub(crate) fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub(crate) fn counter(&self, id: CounterId) -> Option<&Counter> {
        self.counters.get(id.0)
    }

    pub(crate) fn counter_ids(&self) -> impl Iterator<Item = CounterId> {
        (0..self.counters.len()).map(CounterId)
    }

    pub(crate) fn counter_at(&self, position: Vec2) -> Option<CounterId> {
        self.counters
            .iter()
            .position(|counter| counter.position == position)
            .map(CounterId)
    }

    pub(crate) fn chopping_counter(&self) -> Option<CounterId> {
        self.chopping_counter
    }

    pub(crate) fn cooking_counter(&self) -> Option<CounterId> {
        self.cooking_counter
    }

    pub(crate) fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub(crate) fn item_count(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn held_item(&self) -> Option<&Item> {
        self.player.holding.and_then(|id| self.items.get(&id))
    }

    pub(crate) fn counter_item(&self, counter: CounterId) -> Option<(ItemId, &Item)> {
        let id = self.counter(counter)?.item?;
        self.items.get(&id).map(|item| (id, item))
    }

    pub(crate) fn move_player(&mut self, world: &mut SceneWorld, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        let next = self
            .bounds
            .clamp(self.player.position.offset(delta.x, delta.y));
        if next == self.player.position {
            return;
        }
        self.player.position = next;
        if let Some(visual) = self.player.visual {
            world.set_position(visual, next);
        }
        self.sync_held_item_visual(world);
    }

    pub(crate) fn create_item(
        &mut self,
        world: &mut SceneWorld,
        kind: ItemKind,
        state: ItemState,
    ) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id = self.next_item_id.saturating_add(1);
        let visual = world.spawn(
            Transform {
                position: self.player.position,
            },
            item_renderable(kind, state),
        );
        self.items.insert(
            id,
            Item {
                kind,
                state,
                contents: Vec::new(),
                visual,
            },
        );
        id
    }

    pub(crate) fn attach_to_player(
        &mut self,
        world: &mut SceneWorld,
        item: ItemId,
    ) -> Result<(), InteractionError> {
        if self.player.is_holding() {
            return Err(InteractionError::HandsFull);
        }
        if !self.items.contains_key(&item) {
            return Err(InteractionError::NothingThere(EmptyTarget::PickUp));
        }
        self.release_from_counters(item);
        self.player.holding = Some(item);
        self.sync_held_item_visual(world);
        Ok(())
    }

    pub(crate) fn place_on_counter(
        &mut self,
        world: &mut SceneWorld,
        counter: CounterId,
        item: ItemId,
    ) -> Result<(), InteractionError> {
        let Some(slot) = self.counters.get(counter.0) else {
            return Err(InteractionError::NothingNearby);
        };
        if slot.is_occupied() {
            return Err(InteractionError::CounterOccupied);
        }
        let position = slot.position;
        let Some(visual) = self.items.get(&item).map(|record| record.visual) else {
            return Err(InteractionError::NothingThere(EmptyTarget::PickUp));
        };
        if self.player.holding == Some(item) {
            self.player.holding = None;
        }
        self.release_from_counters(item);
        if let Some(slot) = self.counters.get_mut(counter.0) {
            slot.item = Some(item);
        }
        world.set_position(visual, position);
        Ok(())
    }

    pub(crate) fn pick_up_from_counter(
        &mut self,
        world: &mut SceneWorld,
        counter: CounterId,
    ) -> Result<ItemId, InteractionError> {
        if self.player.is_holding() {
            return Err(InteractionError::HandsFull);
        }
        let item = self
            .counters
            .get_mut(counter.0)
            .and_then(|slot| slot.item.take())
            .ok_or(InteractionError::NothingThere(EmptyTarget::PickUp))?;
        self.player.holding = Some(item);
        self.sync_held_item_visual(world);
        Ok(item)
    }

    pub(crate) fn merge_into_plate(
        &mut self,
        plate: ItemId,
        ingredient: ItemId,
    ) -> Result<Ingredient, InteractionError> {
        if plate == ingredient {
            return Err(InteractionError::MergeRejected);
        }
        let addition = match self.items.get(&ingredient) {
            Some(item) if !item.kind.is_plate() && item.state.is_processed() => item.as_ingredient(),
            _ => return Err(InteractionError::MergeRejected),
        };
        let Some(target) = self.items.get_mut(&plate) else {
            return Err(InteractionError::MergeRejected);
        };
        if !target.kind.is_plate()
            || target
                .contents
                .iter()
                .any(|existing| existing.kind == addition.kind)
        {
            return Err(InteractionError::MergeRejected);
        }
        target.contents.push(addition);
        Ok(addition)
    }

    pub(crate) fn destroy_item(&mut self, world: &mut SceneWorld, item: ItemId) -> Option<Item> {
        let record = self.items.remove(&item)?;
        if self.player.holding == Some(item) {
            self.player.holding = None;
        }
        self.release_from_counters(item);
        world.despawn(record.visual);
        Some(record)
    }

    fn release_from_counters(&mut self, item: ItemId) {
        for counter in &mut self.counters {
            if counter.item == Some(item) {
                counter.item = None;
            }
        }
    }

    fn sync_held_item_visual(&self, world: &mut SceneWorld) {
        let Some(item) = self.held_item() else {
            return;
        };
        let position = self
            .player
            .position
            .offset(HELD_ITEM_OFFSET.x, HELD_ITEM_OFFSET.y);
        world.set_position(item.visual, position);
    }
}

fn block(color: u32, size: f32, debug_name: &'static str) -> RenderableDesc {
    RenderableDesc {
        kind: RenderableKind::Block {
            color: rgba_from_hex(color),
            half_size_world: size * 0.5,
        },
        debug_name,
    }
}

fn item_renderable(kind: ItemKind, state: ItemState) -> RenderableDesc {
    let (base, size) = match kind {
        ItemKind::Onion => (ONION_COLOR, ITEM_SIZE),
        ItemKind::Tomato => (TOMATO_COLOR, ITEM_SIZE),
        ItemKind::Meat => (MEAT_COLOR, ITEM_SIZE),
        ItemKind::Plate => (PLATE_COLOR, PLATE_SIZE),
    };
    let shade = match state {
        ItemState::Raw | ItemState::Plated => 1.0,
        ItemState::Chopped => 0.8,
        ItemState::Cooked => 0.55,
    };
    RenderableDesc {
        kind: RenderableKind::Block {
            color: shaded(rgba_from_hex(base), shade),
            half_size_world: size * 0.5,
        },
        debug_name: kind.as_token(),
    }
}

fn station_color(kind: StationKind) -> u32 {
    match kind {
        StationKind::Pantry => PANTRY_COLOR,
        StationKind::PlateDispenser => PLATE_DISPENSER_COLOR,
        StationKind::Chopping => CHOPPING_COLOR,
        StationKind::Cooking => COOKING_COLOR,
        StationKind::Serving => SERVING_COLOR,
    }
}

fn rgba_from_hex(hex: u32) -> [u8; 4] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 255]
}

fn shaded(color: [u8; 4], factor: f32) -> [u8; 4] {
    let scale = |channel: u8| (channel as f32 * factor).round().clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen_with_world() -> (Kitchen, SceneWorld) {
        let mut world = SceneWorld::default();
        let mut kitchen = Kitchen::new(&KitchenConfig::default());
        kitchen.spawn_fixture_visuals(&mut world);
        world.apply_pending();
        (kitchen, world)
    }

    fn assert_invariants(kitchen: &Kitchen) {
        for counter in kitchen.counters() {
            if let Some(id) = counter.item {
                assert!(kitchen.item(id).is_some(), "counter references dead item");
                assert_ne!(kitchen.player().holding, Some(id), "item both held and placed");
            }
        }
        let placed = kitchen
            .counters()
            .iter()
            .filter(|counter| counter.is_occupied())
            .count();
        let held = usize::from(kitchen.player().is_holding());
        assert_eq!(placed + held, kitchen.item_count());
    }

    #[test]
    fn designated_counters_resolve_by_exact_position() {
        let (kitchen, _) = kitchen_with_world();
        let chopping = kitchen.chopping_counter().expect("chopping counter");
        let cooking = kitchen.cooking_counter().expect("cooking counter");
        assert_eq!(
            kitchen.counter(chopping).map(|c| c.position),
            Some(Vec2::new(-4.0, 0.0))
        );
        assert_eq!(
            kitchen.counter(cooking).map(|c| c.position),
            Some(Vec2::new(4.0, -4.0))
        );
        assert_eq!(kitchen.counter_at(Vec2::new(-4.0, 0.01)), None);
    }

    #[test]
    fn fixture_visuals_cover_stations_counters_and_player() {
        let (kitchen, world) = kitchen_with_world();
        let expected = kitchen.stations().len() + kitchen.counters().len() + 1;
        assert_eq!(world.entity_count(), expected);
        assert!(kitchen.player().visual.is_some());
    }

    #[test]
    fn place_and_pick_up_move_item_between_hands_and_counter() {
        let (mut kitchen, mut world) = kitchen_with_world();
        let counter = CounterId(2);
        let onion = kitchen.create_item(&mut world, ItemKind::Onion, ItemState::Raw);
        kitchen.attach_to_player(&mut world, onion).expect("attach");
        assert_invariants(&kitchen);

        kitchen
            .place_on_counter(&mut world, counter, onion)
            .expect("place");
        assert!(!kitchen.player().is_holding());
        assert_eq!(kitchen.counter(counter).and_then(|c| c.item), Some(onion));
        assert_invariants(&kitchen);

        let picked = kitchen
            .pick_up_from_counter(&mut world, counter)
            .expect("pick up");
        assert_eq!(picked, onion);
        assert!(!kitchen.counter(counter).expect("counter").is_occupied());
        assert_invariants(&kitchen);
    }

    #[test]
    fn place_on_occupied_counter_is_rejected() {
        let (mut kitchen, mut world) = kitchen_with_world();
        let counter = CounterId(3);
        let first = kitchen.create_item(&mut world, ItemKind::Meat, ItemState::Raw);
        kitchen
            .place_on_counter(&mut world, counter, first)
            .expect("place");
        let second = kitchen.create_item(&mut world, ItemKind::Tomato, ItemState::Raw);
        kitchen.attach_to_player(&mut world, second).expect("attach");

        assert_eq!(
            kitchen.place_on_counter(&mut world, counter, second),
            Err(InteractionError::CounterOccupied)
        );
        assert_eq!(kitchen.player().holding, Some(second));
    }

    #[test]
    fn attach_with_full_hands_is_rejected() {
        let (mut kitchen, mut world) = kitchen_with_world();
        let first = kitchen.create_item(&mut world, ItemKind::Plate, ItemState::Plated);
        kitchen.attach_to_player(&mut world, first).expect("attach");
        let second = kitchen.create_item(&mut world, ItemKind::Plate, ItemState::Plated);
        assert_eq!(
            kitchen.attach_to_player(&mut world, second),
            Err(InteractionError::HandsFull)
        );
    }

    #[test]
    fn merge_rejects_duplicates_raw_plates_and_non_plate_targets() {
        let (mut kitchen, mut world) = kitchen_with_world();
        let plate = kitchen.create_item(&mut world, ItemKind::Plate, ItemState::Plated);
        let tomato = kitchen.create_item(&mut world, ItemKind::Tomato, ItemState::Chopped);
        let second_tomato = kitchen.create_item(&mut world, ItemKind::Tomato, ItemState::Cooked);
        let raw_onion = kitchen.create_item(&mut world, ItemKind::Onion, ItemState::Raw);
        let other_plate = kitchen.create_item(&mut world, ItemKind::Plate, ItemState::Plated);

        let added = kitchen.merge_into_plate(plate, tomato).expect("merge");
        assert_eq!(
            added,
            Ingredient {
                kind: ItemKind::Tomato,
                state: ItemState::Chopped
            }
        );
        assert_eq!(
            kitchen.merge_into_plate(plate, second_tomato),
            Err(InteractionError::MergeRejected)
        );
        assert_eq!(
            kitchen.merge_into_plate(plate, raw_onion),
            Err(InteractionError::MergeRejected)
        );
        assert_eq!(
            kitchen.merge_into_plate(plate, other_plate),
            Err(InteractionError::MergeRejected)
        );
        assert_eq!(
            kitchen.merge_into_plate(tomato, second_tomato),
            Err(InteractionError::MergeRejected)
        );

        let plate_item = kitchen.item(plate).expect("plate");
        assert_eq!(plate_item.contents.len(), 1);
        assert_eq!(plate_item.state, ItemState::Plated);
    }

    #[test]
    fn destroy_item_clears_references_and_despawns_visual() {
        let (mut kitchen, mut world) = kitchen_with_world();
        let baseline = world.entity_count();
        let counter = CounterId(4);
        let meat = kitchen.create_item(&mut world, ItemKind::Meat, ItemState::Chopped);
        kitchen
            .place_on_counter(&mut world, counter, meat)
            .expect("place");
        world.apply_pending();
        assert_eq!(world.entity_count(), baseline + 1);

        let removed = kitchen.destroy_item(&mut world, meat).expect("destroyed");
        world.apply_pending();
        assert_eq!(removed.kind, ItemKind::Meat);
        assert!(!kitchen.counter(counter).expect("counter").is_occupied());
        assert_eq!(world.entity_count(), baseline);
        assert!(kitchen.destroy_item(&mut world, meat).is_none());
    }

    #[test]
    fn held_item_follows_player_and_bounds_clamp() {
        let (mut kitchen, mut world) = kitchen_with_world();
        let plate = kitchen.create_item(&mut world, ItemKind::Plate, ItemState::Plated);
        kitchen.attach_to_player(&mut world, plate).expect("attach");
        world.apply_pending();

        kitchen.move_player(&mut world, Vec2::new(100.0, 0.5));
        let half = KitchenConfig::default().bounds_half_extents.to_vec2();
        assert_eq!(kitchen.player().position, Vec2::new(half.x, 0.5));

        let visual = kitchen.item(plate).expect("plate").visual;
        let held_at = world.find_entity(visual).expect("visual").transform.position;
        assert_eq!(
            held_at,
            Vec2::new(half.x, 0.5).offset(HELD_ITEM_OFFSET.x, HELD_ITEM_OFFSET.y)
        );
    }

    #[test]
    fn hex_colors_unpack_to_rgba() {
        assert_eq!(rgba_from_hex(0x228B22), [0x22, 0x8B, 0x22, 255]);
        assert_eq!(shaded([200, 100, 0, 255], 0.5), [100, 50, 0, 255]);
    }
}
