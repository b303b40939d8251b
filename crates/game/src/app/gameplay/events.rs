use tracing::debug;

use super::processing::{TaskHandle, TaskKind};
use super::types::{CounterId, Ingredient, ItemId, ItemKind, ItemState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum KitchenEvent {
    ItemCreated {
        item: ItemId,
        kind: ItemKind,
        state: ItemState,
    },
    TaskStarted {
        handle: TaskHandle,
        kind: TaskKind,
        counter: CounterId,
    },
    TaskCompleted {
        handle: TaskHandle,
        kind: TaskKind,
        counter: CounterId,
        consumed: ItemId,
        produced: ItemId,
    },
    IngredientPlated {
        plate: ItemId,
        ingredient: Ingredient,
    },
    PlateServed {
        plate: ItemId,
        ingredient_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KitchenEventKind {
    ItemCreated,
    TaskStarted,
    TaskCompleted,
    IngredientPlated,
    PlateServed,
}

impl KitchenEvent {
    pub(crate) fn kind(self) -> KitchenEventKind {
        match self {
            Self::ItemCreated { .. } => KitchenEventKind::ItemCreated,
            Self::TaskStarted { .. } => KitchenEventKind::TaskStarted,
            Self::TaskCompleted { .. } => KitchenEventKind::TaskCompleted,
            Self::IngredientPlated { .. } => KitchenEventKind::IngredientPlated,
            Self::PlateServed { .. } => KitchenEventKind::PlateServed,
        }
    }

    pub(crate) fn trace(&self) {
        match *self {
            Self::ItemCreated { item, kind, state } => debug!(
                item = item.0,
                kind = kind.as_token(),
                state = state.as_token(),
                "kitchen_event_item_created"
            ),
            Self::TaskStarted {
                handle,
                kind,
                counter,
            } => debug!(
                task = handle.0,
                kind = kind.as_token(),
                counter = counter.0,
                "kitchen_event_task_started"
            ),
            Self::TaskCompleted {
                handle,
                kind,
                counter,
                consumed,
                produced,
            } => debug!(
                task = handle.0,
                kind = kind.as_token(),
                counter = counter.0,
                consumed = consumed.0,
                produced = produced.0,
                "kitchen_event_task_completed"
            ),
            Self::IngredientPlated { plate, ingredient } => debug!(
                plate = plate.0,
                ingredient = %ingredient,
                "kitchen_event_ingredient_plated"
            ),
            Self::PlateServed {
                plate,
                ingredient_count,
            } => debug!(
                plate = plate.0,
                ingredient_count,
                "kitchen_event_plate_served"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KitchenEventCounts {
    pub(crate) total: u32,
    pub(crate) item_created: u32,
    pub(crate) task_started: u32,
    pub(crate) task_completed: u32,
    pub(crate) ingredient_plated: u32,
    pub(crate) plate_served: u32,
}

impl KitchenEventCounts {
    fn record(&mut self, kind: KitchenEventKind) {
        self.total = self.total.saturating_add(1);
        let slot = match kind {
            KitchenEventKind::ItemCreated => &mut self.item_created,
            KitchenEventKind::TaskStarted => &mut self.task_started,
            KitchenEventKind::TaskCompleted => &mut self.task_completed,
            KitchenEventKind::IngredientPlated => &mut self.ingredient_plated,
            KitchenEventKind::PlateServed => &mut self.plate_served,
        };
        *slot = slot.saturating_add(1);
    }
}

#[derive(Debug, Default)]
pub(crate) struct KitchenEventBus {
    current_tick_events: Vec<KitchenEvent>,
    last_tick_counts: KitchenEventCounts,
}

impl KitchenEventBus {
    pub(crate) fn emit(&mut self, event: KitchenEvent) {
        self.current_tick_events.push(event);
    }

    pub(crate) fn iter_emitted_so_far(&self) -> impl Iterator<Item = &KitchenEvent> {
        self.current_tick_events.iter()
    }

    pub(crate) fn finish_tick_rollover(&mut self) {
        let mut counts = KitchenEventCounts::default();
        for event in &self.current_tick_events {
            counts.record(event.kind());
        }
        self.last_tick_counts = counts;
        self.current_tick_events.clear();
    }

    pub(crate) fn last_tick_counts(&self) -> KitchenEventCounts {
        self.last_tick_counts
    }

    pub(crate) fn clear(&mut self) {
        self.current_tick_events.clear();
        self.last_tick_counts = KitchenEventCounts::default();
    }
}
