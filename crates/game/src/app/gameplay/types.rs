use std::fmt;

use engine::{EntityId, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ItemId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ItemKind {
    Onion,
    Tomato,
    Meat,
    Plate,
}

impl ItemKind {
    pub(crate) const INGREDIENTS: [ItemKind; 3] = [ItemKind::Onion, ItemKind::Tomato, ItemKind::Meat];

    pub(crate) fn is_plate(self) -> bool {
        matches!(self, Self::Plate)
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Onion => "onion",
            Self::Tomato => "tomato",
            Self::Meat => "meat",
            Self::Plate => "plate",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Onion => "Onion",
            Self::Tomato => "Tomato",
            Self::Meat => "Meat",
            Self::Plate => "Plate",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ItemState {
    Raw,
    Chopped,
    Cooked,
    Plated,
}

impl ItemState {
    pub(crate) fn is_processed(self) -> bool {
        matches!(self, Self::Chopped | Self::Cooked)
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Chopped => "chopped",
            Self::Cooked => "cooked",
            Self::Plated => "plated",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Raw => "Raw",
            Self::Chopped => "Chopped",
            Self::Cooked => "Cooked",
            Self::Plated => "Plated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ingredient {
    pub(crate) kind: ItemKind,
    pub(crate) state: ItemState,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) state: ItemState,
    pub(crate) contents: Vec<Ingredient>,
    pub(crate) visual: EntityId,
}

impl Item {
    pub(crate) fn as_ingredient(&self) -> Ingredient {
        Ingredient {
            kind: self.kind,
            state: self.state,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct CounterId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Counter {
    pub(crate) position: Vec2,
    pub(crate) item: Option<ItemId>,
}

impl Counter {
    pub(crate) fn is_occupied(&self) -> bool {
        self.item.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum StationKind {
    Pantry,
    PlateDispenser,
    Chopping,
    Cooking,
    Serving,
}

impl StationKind {
    pub(crate) const ALL: [StationKind; 5] = [
        StationKind::Pantry,
        StationKind::PlateDispenser,
        StationKind::Chopping,
        StationKind::Cooking,
        StationKind::Serving,
    ];

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Pantry => "pantry",
            Self::PlateDispenser => "plate_dispenser",
            Self::Chopping => "chopping",
            Self::Cooking => "cooking",
            Self::Serving => "serving",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Station {
    pub(crate) kind: StationKind,
    pub(crate) position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) holding: Option<ItemId>,
    pub(crate) visual: Option<EntityId>,
}

impl Player {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            holding: None,
            visual: None,
        }
    }

    pub(crate) fn is_holding(&self) -> bool {
        self.holding.is_some()
    }
}
