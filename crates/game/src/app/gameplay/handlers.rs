use std::fmt;

use engine::SceneWorld;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::info;

use super::error::{EmptyTarget, InteractionError, StateMismatch};
use super::events::{KitchenEvent, KitchenEventBus};
use super::kitchen::Kitchen;
use super::processing::{ProcessingEngine, TaskHandle, TaskKind};
use super::types::{CounterId, Ingredient, ItemId, ItemKind, ItemState};

pub(crate) struct InteractionContext<'a> {
    pub(crate) kitchen: &'a mut Kitchen,
    pub(crate) processing: &'a mut ProcessingEngine,
    pub(crate) world: &'a mut SceneWorld,
    pub(crate) events: &'a mut KitchenEventBus,
    pub(crate) rng: &'a mut StdRng,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum InteractionOutcome {
    TookIngredient {
        item: ItemId,
        kind: ItemKind,
    },
    TookPlate {
        item: ItemId,
    },
    PlacedOnCounter {
        counter: CounterId,
        item: ItemId,
    },
    PickedUpFromCounter {
        counter: CounterId,
        item: ItemId,
    },
    PlatedFromCounter {
        counter: CounterId,
        plate: ItemId,
        ingredient: Ingredient,
    },
    PlatedOntoCounter {
        counter: CounterId,
        plate: ItemId,
        ingredient: Ingredient,
    },
    StartedTask {
        handle: TaskHandle,
        kind: TaskKind,
    },
    Served {
        plate: ItemId,
        ingredient_count: usize,
    },
}

impl InteractionOutcome {
    pub(crate) fn as_token(&self) -> &'static str {
        match self {
            Self::TookIngredient { .. } => "took_ingredient",
            Self::TookPlate { .. } => "took_plate",
            Self::PlacedOnCounter { .. } => "placed_on_counter",
            Self::PickedUpFromCounter { .. } => "picked_up_from_counter",
            Self::PlatedFromCounter { .. } => "plated_from_counter",
            Self::PlatedOntoCounter { .. } => "plated_onto_counter",
            Self::StartedTask { .. } => "started_task",
            Self::Served { .. } => "served",
        }
    }
}

impl fmt::Display for InteractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TookIngredient { item, kind } => write!(f, "took {kind} as item {}", item.0),
            Self::TookPlate { item } => write!(f, "took plate {}", item.0),
            Self::PlacedOnCounter { counter, item } => {
                write!(f, "placed item {} on counter {}", item.0, counter.0)
            }
            Self::PickedUpFromCounter { counter, item } => {
                write!(f, "picked up item {} from counter {}", item.0, counter.0)
            }
            Self::PlatedFromCounter {
                counter,
                plate,
                ingredient,
            }
            | Self::PlatedOntoCounter {
                counter,
                plate,
                ingredient,
            } => write!(
                f,
                "plated {ingredient} onto plate {} at counter {}",
                plate.0, counter.0
            ),
            Self::StartedTask { handle, kind } => {
                write!(f, "started {} task {}", kind.as_token(), handle.0)
            }
            Self::Served {
                plate,
                ingredient_count,
            } => write!(f, "served plate {} with {ingredient_count} ingredients", plate.0),
        }
    }
}

pub(crate) type InteractionResult = Result<InteractionOutcome, InteractionError>;

pub(crate) fn handle_pantry(ctx: &mut InteractionContext<'_>) -> InteractionResult {
    if ctx.kitchen.player().is_holding() {
        return Err(InteractionError::HandsFull);
    }
    let kind = ItemKind::INGREDIENTS[ctx.rng.gen_range(0..ItemKind::INGREDIENTS.len())];
    let item = spawn_into_hands(ctx, kind, ItemState::Raw)?;
    Ok(InteractionOutcome::TookIngredient { item, kind })
}

pub(crate) fn handle_plate_dispenser(ctx: &mut InteractionContext<'_>) -> InteractionResult {
    if ctx.kitchen.player().is_holding() {
        return Err(InteractionError::HandsFull);
    }
    let item = spawn_into_hands(ctx, ItemKind::Plate, ItemState::Plated)?;
    Ok(InteractionOutcome::TookPlate { item })
}

pub(crate) fn handle_counter(
    ctx: &mut InteractionContext<'_>,
    counter: CounterId,
) -> InteractionResult {
    if ctx.processing.is_locking(counter) {
        return Err(InteractionError::AlreadyProcessing);
    }

    let held = ctx
        .kitchen
        .held_item()
        .map(|item| (item.kind, item.state));
    let on_counter = ctx
        .kitchen
        .counter_item(counter)
        .map(|(id, item)| (id, item.kind, item.state));
    let held_id = ctx.kitchen.player().holding;

    match (held_id.zip(held), on_counter) {
        // Player's plate takes a processed ingredient off the counter.
        (Some((plate, (ItemKind::Plate, _))), Some((ingredient, _, state)))
            if state.is_processed() =>
        {
            let added = ctx.kitchen.merge_into_plate(plate, ingredient)?;
            ctx.kitchen.destroy_item(ctx.world, ingredient);
            record_plated(ctx, plate, added);
            Ok(InteractionOutcome::PlatedFromCounter {
                counter,
                plate,
                ingredient: added,
            })
        }
        // Held processed ingredient goes onto the plate sitting on the counter.
        (Some((ingredient, (_, state))), Some((plate, ItemKind::Plate, _)))
            if state.is_processed() =>
        {
            let added = ctx.kitchen.merge_into_plate(plate, ingredient)?;
            ctx.kitchen.destroy_item(ctx.world, ingredient);
            record_plated(ctx, plate, added);
            Ok(InteractionOutcome::PlatedOntoCounter {
                counter,
                plate,
                ingredient: added,
            })
        }
        (Some((item, _)), None) => {
            ctx.kitchen.place_on_counter(ctx.world, counter, item)?;
            Ok(InteractionOutcome::PlacedOnCounter { counter, item })
        }
        (None, Some(_)) => {
            let item = ctx.kitchen.pick_up_from_counter(ctx.world, counter)?;
            Ok(InteractionOutcome::PickedUpFromCounter { counter, item })
        }
        (Some(_), Some(_)) => Err(InteractionError::CounterOccupied),
        (None, None) => Err(InteractionError::NothingThere(EmptyTarget::PickUp)),
    }
}

pub(crate) fn handle_chopping(ctx: &mut InteractionContext<'_>) -> InteractionResult {
    if ctx.processing.is_busy() {
        return Err(InteractionError::AlreadyProcessing);
    }
    let (counter, item, state) = designated_counter_item(ctx.kitchen.chopping_counter(), ctx)
        .ok_or(InteractionError::NothingThere(EmptyTarget::Chop))?;
    if state != ItemState::Raw {
        return Err(InteractionError::WrongState(StateMismatch::AlreadyProcessed));
    }
    start(ctx, TaskKind::Chop, counter, item)
}

pub(crate) fn handle_cooking(ctx: &mut InteractionContext<'_>) -> InteractionResult {
    if ctx.processing.is_busy() {
        return Err(InteractionError::AlreadyProcessing);
    }
    let (counter, item, state) = designated_counter_item(ctx.kitchen.cooking_counter(), ctx)
        .ok_or(InteractionError::NothingThere(EmptyTarget::Cook))?;
    match state {
        ItemState::Chopped => start(ctx, TaskKind::Cook, counter, item),
        ItemState::Raw => Err(InteractionError::WrongState(StateMismatch::NotChopped)),
        ItemState::Cooked | ItemState::Plated => {
            Err(InteractionError::WrongState(StateMismatch::AlreadyCooked))
        }
    }
}

pub(crate) fn handle_serving(ctx: &mut InteractionContext<'_>) -> InteractionResult {
    let Some(plate) = ctx.kitchen.player().holding else {
        return Err(InteractionError::NothingThere(EmptyTarget::Serve));
    };
    let ingredient_count = match ctx.kitchen.item(plate) {
        Some(item) if !item.kind.is_plate() => {
            return Err(InteractionError::WrongState(StateMismatch::NotPlate))
        }
        Some(item) if item.contents.is_empty() => {
            return Err(InteractionError::WrongState(StateMismatch::EmptyPlate))
        }
        Some(item) => item.contents.len(),
        None => return Err(InteractionError::NothingThere(EmptyTarget::Serve)),
    };

    ctx.kitchen.destroy_item(ctx.world, plate);
    ctx.events.emit(KitchenEvent::PlateServed {
        plate,
        ingredient_count,
    });
    info!(plate = plate.0, ingredient_count, "plate_served");
    Ok(InteractionOutcome::Served {
        plate,
        ingredient_count,
    })
}

fn spawn_into_hands(
    ctx: &mut InteractionContext<'_>,
    kind: ItemKind,
    state: ItemState,
) -> Result<ItemId, InteractionError> {
    let item = ctx.kitchen.create_item(ctx.world, kind, state);
    if let Err(error) = ctx.kitchen.attach_to_player(ctx.world, item) {
        ctx.kitchen.destroy_item(ctx.world, item);
        return Err(error);
    }
    ctx.events.emit(KitchenEvent::ItemCreated { item, kind, state });
    Ok(item)
}

fn designated_counter_item(
    counter: Option<CounterId>,
    ctx: &InteractionContext<'_>,
) -> Option<(CounterId, ItemId, ItemState)> {
    let counter = counter?;
    let (item, record) = ctx.kitchen.counter_item(counter)?;
    Some((counter, item, record.state))
}

fn start(
    ctx: &mut InteractionContext<'_>,
    kind: TaskKind,
    counter: CounterId,
    item: ItemId,
) -> InteractionResult {
    let bar_position = ctx.kitchen.player().position;
    let handle = ctx
        .processing
        .start_task(kind, counter, item, bar_position, ctx.world)?;
    ctx.events.emit(KitchenEvent::TaskStarted {
        handle,
        kind,
        counter,
    });
    Ok(InteractionOutcome::StartedTask { handle, kind })
}

fn record_plated(ctx: &mut InteractionContext<'_>, plate: ItemId, ingredient: Ingredient) {
    ctx.events
        .emit(KitchenEvent::IngredientPlated { plate, ingredient });
    info!(
        plate = plate.0,
        kind = ingredient.kind.as_token(),
        state = ingredient.state.as_token(),
        "ingredient_plated"
    );
}
