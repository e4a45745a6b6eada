use ai_core::{ObjectRef, Vec3};

#[cfg(feature = "serde")]
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Point,
    Actor(ObjectRef),
}

/// One candidate produced by a generator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EnvQueryItem {
    kind: ItemKind,
    location: Vec3,
    score: f32,
    discarded: bool,
    index: usize,
}

impl EnvQueryItem {
    pub fn point(location: Vec3) -> Self {
        Self::new(ItemKind::Point, location)
    }

    pub fn actor(actor: ObjectRef, location: Vec3) -> Self {
        Self::new(ItemKind::Actor(actor), location)
    }

    fn new(kind: ItemKind, location: Vec3) -> Self {
        Self {
            kind,
            location,
            score: 0.0,
            discarded: false,
            index: 0,
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn location(&self) -> Vec3 {
        self.location
    }

    pub fn actor_ref(&self) -> Option<ObjectRef> {
        match self.kind {
            ItemKind::Actor(actor) => Some(actor),
            ItemKind::Point => None,
        }
    }

    /// Sum of all weighted test contributions so far.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// `false` once a filtering test rejected the item.
    pub fn is_valid(&self) -> bool {
        !self.discarded
    }

    /// Position in the generator's output.
    pub fn generation_index(&self) -> usize {
        self.index
    }

    pub(crate) fn discard(&mut self) {
        self.discarded = true;
    }

    pub(crate) fn add_score(&mut self, contribution: f32) {
        self.score += contribution;
    }

    pub(crate) fn set_generation_index(&mut self, index: usize) {
        self.index = index;
    }
}
