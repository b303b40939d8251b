use engine::{EntityId, SceneWorld, Vec2};
use tracing::{info, warn};

use super::error::InteractionError;
use super::kitchen::Kitchen;
use super::types::{CounterId, ItemId, ItemKind, ItemState};

/// Progress within this distance of 1.0 counts as finished. Absorbs f32 drift from summing
/// many fixed deltas.
const COMPLETION_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TaskKind {
    Chop,
    Cook,
}

impl TaskKind {
    pub(crate) fn target_state(self) -> ItemState {
        match self {
            Self::Chop => ItemState::Chopped,
            Self::Cook => ItemState::Cooked,
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Chop => "chop",
            Self::Cook => "cook",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TaskHandle(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProcessingDurations {
    pub(crate) chop_seconds: f32,
    pub(crate) cook_seconds: f32,
}

impl ProcessingDurations {
    fn seconds_for(self, kind: TaskKind) -> f32 {
        match kind {
            TaskKind::Chop => self.chop_seconds,
            TaskKind::Cook => self.cook_seconds,
        }
    }
}

impl Default for ProcessingDurations {
    fn default() -> Self {
        Self {
            chop_seconds: 3.0,
            cook_seconds: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProcessingTask {
    pub(crate) handle: TaskHandle,
    pub(crate) kind: TaskKind,
    pub(crate) target_counter: CounterId,
    pub(crate) source_item: ItemId,
    pub(crate) progress: f32,
    pub(crate) rate: f32,
    pub(crate) progress_bar: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProcessingCompleted {
    pub(crate) handle: TaskHandle,
    pub(crate) kind: TaskKind,
    pub(crate) counter: CounterId,
    pub(crate) item_kind: ItemKind,
    pub(crate) consumed: ItemId,
    pub(crate) produced: ItemId,
}

/// Single global slot for timed chop/cook work. Admission is checked synchronously in
/// [`ProcessingEngine::start_task`], so there is never more than one task in flight.
#[derive(Debug)]
pub(crate) struct ProcessingEngine {
    durations: ProcessingDurations,
    active: Option<ProcessingTask>,
    next_handle: u64,
}

impl ProcessingEngine {
    pub(crate) fn new(durations: ProcessingDurations) -> Self {
        Self {
            durations,
            active: None,
            next_handle: 0,
        }
    }

    pub(crate) fn active(&self) -> Option<&ProcessingTask> {
        self.active.as_ref()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub(crate) fn is_locking(&self, counter: CounterId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|task| task.target_counter == counter)
    }

    pub(crate) fn start_task(
        &mut self,
        kind: TaskKind,
        target_counter: CounterId,
        source_item: ItemId,
        bar_position: Vec2,
        world: &mut SceneWorld,
    ) -> Result<TaskHandle, InteractionError> {
        if self.active.is_some() {
            return Err(InteractionError::AlreadyProcessing);
        }

        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        let seconds = self.durations.seconds_for(kind);
        let progress_bar = world.spawn_progress_bar(bar_position);
        self.active = Some(ProcessingTask {
            handle,
            kind,
            target_counter,
            source_item,
            progress: 0.0,
            rate: 1.0 / seconds,
            progress_bar,
        });
        info!(
            task = handle.0,
            kind = kind.as_token(),
            counter = target_counter.0,
            item = source_item.0,
            duration_seconds = seconds,
            "processing_started"
        );
        Ok(handle)
    }

    pub(crate) fn tick(
        &mut self,
        dt_seconds: f32,
        kitchen: &mut Kitchen,
        world: &mut SceneWorld,
    ) -> Option<ProcessingCompleted> {
        let task = self.active.as_mut()?;
        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            task.progress = (task.progress + task.rate * dt_seconds).min(1.0);
        }
        if task.progress >= 1.0 - COMPLETION_EPSILON {
            task.progress = 1.0;
        }
        world.set_progress(task.progress_bar, task.progress);
        if task.progress < 1.0 {
            return None;
        }

        let task = self.active.take()?;
        world.despawn(task.progress_bar);
        let Some(item_kind) = kitchen.item(task.source_item).map(|item| item.kind) else {
            warn!(
                task = task.handle.0,
                item = task.source_item.0,
                "processing_source_missing"
            );
            return None;
        };

        kitchen.destroy_item(world, task.source_item);
        let produced = kitchen.create_item(world, item_kind, task.kind.target_state());
        if let Err(error) = kitchen.place_on_counter(world, task.target_counter, produced) {
            warn!(
                task = task.handle.0,
                counter = task.target_counter.0,
                error = %error,
                "processing_output_unplaced"
            );
        }

        info!(
            task = task.handle.0,
            kind = task.kind.as_token(),
            item_kind = item_kind.as_token(),
            consumed = task.source_item.0,
            produced = produced.0,
            "processing_completed"
        );
        Some(ProcessingCompleted {
            handle: task.handle,
            kind: task.kind,
            counter: task.target_counter,
            item_kind,
            consumed: task.source_item,
            produced,
        })
    }

    pub(crate) fn abort(&mut self, world: &mut SceneWorld) -> Option<ProcessingTask> {
        let task = self.active.take()?;
        world.despawn(task.progress_bar);
        info!(
            task = task.handle.0,
            kind = task.kind.as_token(),
            progress = task.progress,
            "processing_aborted"
        );
        Some(task)
    }
}
