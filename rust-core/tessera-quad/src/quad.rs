// SPDX-License-Identifier: MIT
//! Quads and directions.

use serde::Serialize;

use crate::value::GraphValue;

/// One of the four positions of a quad, used to select a directional
/// index scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The subject position.
    Subject,
    /// The predicate position.
    Predicate,
    /// The object position.
    Object,
    /// The label position.
    Label,
}

impl Direction {
    /// All four directions, in subject/predicate/object/label order.
    pub const ALL: [Direction; 4] = [
        Direction::Subject,
        Direction::Predicate,
        Direction::Object,
        Direction::Label,
    ];
}

/// An atomic fact: `(subject, predicate, object, label)`.
///
/// The label is a partition/graph tag rather than a user property and
/// is optional; `None` renders as the empty label. Quads are immutable
/// once created and compare structurally over all four fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quad {
    /// The entity the fact is about.
    pub subject: GraphValue,
    /// The property or relationship type.
    pub predicate: GraphValue,
    /// The property value or relationship target.
    pub object: GraphValue,
    /// Optional partition tag shared by all quads of one entity.
    pub label: Option<GraphValue>,
}

impl Quad {
    /// Build a quad from its four positions.
    pub fn new(
        subject: impl Into<GraphValue>,
        predicate: impl Into<GraphValue>,
        object: impl Into<GraphValue>,
        label: Option<GraphValue>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            label,
        }
    }

    /// The value at `direction`, or `None` for an absent label.
    pub fn value_at(&self, direction: Direction) -> Option<&GraphValue> {
        match direction {
            Direction::Subject => Some(&self.subject),
            Direction::Predicate => Some(&self.predicate),
            Direction::Object => Some(&self.object),
            Direction::Label => self.label.as_ref(),
        }
    }
}
