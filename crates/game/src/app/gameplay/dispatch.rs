use tracing::{debug, info};

use super::error::InteractionError;
use super::handlers::{
    handle_chopping, handle_cooking, handle_counter, handle_pantry, handle_plate_dispenser,
    handle_serving, InteractionContext, InteractionResult,
};
use super::kitchen::Kitchen;
use super::proximity::is_near;
use super::types::{CounterId, StationKind};

const STATION_PRIORITY: [StationKind; 4] = [
    StationKind::Pantry,
    StationKind::PlateDispenser,
    StationKind::Chopping,
    StationKind::Cooking,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InteractionTarget {
    Station(StationKind),
    Counter(CounterId),
}

impl InteractionTarget {
    fn as_token(self) -> &'static str {
        match self {
            Self::Station(kind) => kind.as_token(),
            Self::Counter(_) => "counter",
        }
    }
}

pub(crate) fn find_target(kitchen: &Kitchen, radius: f32) -> Option<InteractionTarget> {
    let player = kitchen.player().position;
    let station_in_reach = |kind: StationKind| {
        kitchen
            .station(kind)
            .is_some_and(|station| is_near(player, station.position, radius))
    };

    if let Some(kind) = STATION_PRIORITY
        .into_iter()
        .find(|kind| station_in_reach(*kind))
    {
        return Some(InteractionTarget::Station(kind));
    }
    if let Some(counter) = kitchen.counter_ids().find(|id| {
        kitchen
            .counter(*id)
            .is_some_and(|counter| is_near(player, counter.position, radius))
    }) {
        return Some(InteractionTarget::Counter(counter));
    }
    station_in_reach(StationKind::Serving).then_some(InteractionTarget::Station(StationKind::Serving))
}

pub(crate) fn dispatch_interaction(
    ctx: &mut InteractionContext<'_>,
    radius: f32,
    toast_seconds: f32,
) -> InteractionResult {
    let result = match find_target(ctx.kitchen, radius) {
        Some(target) => {
            let result = run_handler(ctx, target);
            if let Ok(outcome) = &result {
                info!(
                    target = target.as_token(),
                    outcome = outcome.as_token(),
                    detail = %outcome,
                    "interaction_dispatched"
                );
            }
            result
        }
        None => Err(InteractionError::NothingNearby),
    };

    if let Err(error) = &result {
        debug!(
            reason = error.as_token(),
            message = %error,
            "interaction_rejected"
        );
        ctx.world.push_toast(error.to_string(), toast_seconds);
    }
    result
}

fn run_handler(ctx: &mut InteractionContext<'_>, target: InteractionTarget) -> InteractionResult {
    match target {
        InteractionTarget::Station(StationKind::Pantry) => handle_pantry(ctx),
        InteractionTarget::Station(StationKind::PlateDispenser) => handle_plate_dispenser(ctx),
        InteractionTarget::Station(StationKind::Chopping) => handle_chopping(ctx),
        InteractionTarget::Station(StationKind::Cooking) => handle_cooking(ctx),
        InteractionTarget::Station(StationKind::Serving) => handle_serving(ctx),
        InteractionTarget::Counter(counter) => handle_counter(ctx, counter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gameplay::config::{ConfigVec2, KitchenConfig, StationConfig};
    use engine::{SceneWorld, Vec2};

    fn kitchen_at(config: &KitchenConfig, position: Vec2) -> Kitchen {
        let mut kitchen = Kitchen::new(config);
        let mut world = SceneWorld::default();
        let delta = Vec2::new(
            position.x - kitchen.player().position.x,
            position.y - kitchen.player().position.y,
        );
        kitchen.move_player(&mut world, delta);
        kitchen
    }

    #[test]
    fn nothing_in_reach_yields_none() {
        let config = KitchenConfig::default();
        let kitchen = kitchen_at(&config, Vec2::new(0.0, 0.0));
        assert_eq!(find_target(&kitchen, config.interaction_radius), None);
    }

    #[test]
    fn station_beats_counter_when_both_in_reach() {
        let config = KitchenConfig::default();
        // Halfway between the chopping station (-4, 1.5) and its counter (-4, 0).
        let kitchen = kitchen_at(&config, Vec2::new(-4.0, 0.75));
        assert_eq!(
            find_target(&kitchen, config.interaction_radius),
            Some(InteractionTarget::Station(StationKind::Chopping))
        );

        let kitchen = kitchen_at(&config, Vec2::new(-4.0, -0.5));
        assert_eq!(
            find_target(&kitchen, config.interaction_radius),
            kitchen
                .chopping_counter()
                .map(InteractionTarget::Counter)
        );
    }

    #[test]
    fn pantry_outranks_plate_dispenser_when_overlapping() {
        let mut config = KitchenConfig::default();
        config.stations = vec![
            StationConfig {
                kind: StationKind::PlateDispenser,
                position: ConfigVec2::new(0.5, 0.0),
            },
            StationConfig {
                kind: StationKind::Pantry,
                position: ConfigVec2::new(-0.5, 0.0),
            },
        ];
        let kitchen = kitchen_at(&config, Vec2::new(0.0, 0.0));
        assert_eq!(
            find_target(&kitchen, config.interaction_radius),
            Some(InteractionTarget::Station(StationKind::Pantry))
        );
    }

    #[test]
    fn counters_outrank_serving_and_use_registration_order() {
        let mut config = KitchenConfig::default();
        config.stations = vec![StationConfig {
            kind: StationKind::Serving,
            position: ConfigVec2::new(0.0, 0.0),
        }];
        config.counters = vec![ConfigVec2::new(0.5, 0.0), ConfigVec2::new(-0.5, 0.0)];
        let kitchen = kitchen_at(&config, Vec2::new(0.0, 0.0));
        assert_eq!(
            find_target(&kitchen, config.interaction_radius),
            Some(InteractionTarget::Counter(CounterId(0)))
        );

        config.counters = vec![ConfigVec2::new(5.0, 0.0)];
        let kitchen = kitchen_at(&config, Vec2::new(0.0, 0.0));
        assert_eq!(
            find_target(&kitchen, config.interaction_radius),
            Some(InteractionTarget::Station(StationKind::Serving))
        );
    }
}
