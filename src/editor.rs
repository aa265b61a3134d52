// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bounding box edit state machine.
//!
//! The editor only knows about image-space points and class-name text. Each
//! event produces a new state plus a list of effects; resolving class ids,
//! storing boxes and toggling the class-name field is left to whoever
//! applies those effects (see [`crate::session`]).

use crate::models::annotation::{PendingBox, Point};

/// Where the user is in the draw → label → commit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    /// Pointer is held down; the box follows the pointer.
    Drawing { pending: PendingBox },
    /// Pointer released; the box waits for a class name.
    AwaitingLabel { pending: PendingBox },
}

/// Input to the editor, already mapped to image space.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Commit(String),
}

/// Why a commit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitRejection {
    BlankClassName,
    ZeroArea,
    NothingPending,
}

impl CommitRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitRejection::BlankClassName => "class name is blank",
            CommitRejection::ZeroArea => "box has zero width or height",
            CommitRejection::NothingPending => "no box is waiting for a label",
        }
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    DisableClassInput,
    EnableClassInput,
    FocusClassInput,
    ClearClassInput,
    /// Store `pending` (already normalized) under `class_name`.
    CommitBox {
        class_name: String,
        pending: PendingBox,
    },
    CommitRejected(CommitRejection),
}

impl EditorState {
    /// The box being drawn or waiting for a label, for live preview.
    pub fn pending(&self) -> Option<&PendingBox> {
        match self {
            EditorState::Idle => None,
            EditorState::Drawing { pending } | EditorState::AwaitingLabel { pending } => {
                Some(pending)
            }
        }
    }

    pub fn is_awaiting_label(&self) -> bool {
        matches!(self, EditorState::AwaitingLabel { .. })
    }

    /// Apply one event. Events that do not apply to the current state leave
    /// it unchanged and produce no effects.
    pub fn step(self, event: EditorEvent) -> (EditorState, Vec<Effect>) {
        match (self, event) {
            // A fresh press also abandons an unlabelled box.
            (
                EditorState::Idle | EditorState::AwaitingLabel { .. },
                EditorEvent::PointerDown(at),
            ) => (
                EditorState::Drawing {
                    pending: PendingBox::at(at),
                },
                vec![Effect::DisableClassInput],
            ),
            (EditorState::Drawing { mut pending }, EditorEvent::PointerMove(at)) => {
                pending.stretch_to(at);
                (EditorState::Drawing { pending }, Vec::new())
            }
            (EditorState::Drawing { mut pending }, EditorEvent::PointerUp(at)) => {
                pending.stretch_to(at);
                (
                    EditorState::AwaitingLabel { pending },
                    vec![Effect::EnableClassInput, Effect::FocusClassInput],
                )
            }
            (EditorState::AwaitingLabel { pending }, EditorEvent::Commit(text)) => {
                let class_name = text.trim();
                let rejection = if class_name.is_empty() {
                    Some(CommitRejection::BlankClassName)
                } else if !pending.has_area() {
                    Some(CommitRejection::ZeroArea)
                } else {
                    None
                };

                match rejection {
                    Some(reason) => (self, vec![Effect::CommitRejected(reason)]),
                    None => (
                        EditorState::Idle,
                        vec![
                            Effect::CommitBox {
                                class_name: class_name.to_string(),
                                pending: pending.normalized(),
                            },
                            Effect::EnableClassInput,
                            Effect::ClearClassInput,
                            Effect::FocusClassInput,
                        ],
                    ),
                }
            }
            (state, EditorEvent::Commit(_)) => (
                state,
                vec![Effect::CommitRejected(CommitRejection::NothingPending)],
            ),
            (state, _) => (state, Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn(from: (f64, f64), to: (f64, f64)) -> EditorState {
        let state = EditorState::Idle;
        let (state, _) = state.step(EditorEvent::PointerDown(Point::new(from.0, from.1)));
        let (state, _) = state.step(EditorEvent::PointerMove(Point::new(to.0, to.1)));
        let (state, _) = state.step(EditorEvent::PointerUp(Point::new(to.0, to.1)));
        state
    }

    #[test]
    fn test_press_starts_zero_size_box() {
        let (state, effects) =
            EditorState::Idle.step(EditorEvent::PointerDown(Point::new(5.0, 6.0)));
        assert_eq!(
            state,
            EditorState::Drawing {
                pending: PendingBox { x: 5.0, y: 6.0, width: 0.0, height: 0.0 }
            }
        );
        assert_eq!(effects, vec![Effect::DisableClassInput]);
    }

    #[test]
    fn test_move_keeps_signed_size() {
        let (state, _) = EditorState::Idle.step(EditorEvent::PointerDown(Point::new(50.0, 50.0)));
        let (state, effects) = state.step(EditorEvent::PointerMove(Point::new(10.0, 80.0)));
        assert!(effects.is_empty());
        let pending = state.pending().copied().unwrap();
        assert_eq!((pending.width, pending.height), (-40.0, 30.0));
    }

    #[test]
    fn test_release_waits_for_label() {
        let (state, _) = EditorState::Idle.step(EditorEvent::PointerDown(Point::new(0.0, 0.0)));
        let (state, effects) = state.step(EditorEvent::PointerUp(Point::new(10.0, 10.0)));
        assert!(state.is_awaiting_label());
        assert_eq!(effects, vec![Effect::EnableClassInput, Effect::FocusClassInput]);
    }

    #[test]
    fn test_commit_normalizes_and_returns_to_idle() {
        let state = drawn((300.0, 400.0), (100.0, 100.0));
        let (state, effects) = state.step(EditorEvent::Commit("  cat ".to_string()));
        assert_eq!(state, EditorState::Idle);
        assert_eq!(
            effects.first(),
            Some(&Effect::CommitBox {
                class_name: "cat".to_string(),
                pending: PendingBox { x: 100.0, y: 100.0, width: 200.0, height: 300.0 },
            })
        );
        assert!(effects.contains(&Effect::ClearClassInput));
        assert!(effects.contains(&Effect::EnableClassInput));
    }

    #[test]
    fn test_blank_commit_stays_pending() {
        let state = drawn((0.0, 0.0), (10.0, 10.0));
        let (after, effects) = state.step(EditorEvent::Commit("   ".to_string()));
        assert_eq!(after, state);
        assert_eq!(
            effects,
            vec![Effect::CommitRejected(CommitRejection::BlankClassName)]
        );
    }

    #[test]
    fn test_zero_area_commit_stays_pending() {
        let state = drawn((10.0, 10.0), (10.0, 40.0));
        let (after, effects) = state.step(EditorEvent::Commit("cat".to_string()));
        assert_eq!(after, state);
        assert_eq!(effects, vec![Effect::CommitRejected(CommitRejection::ZeroArea)]);
    }

    #[test]
    fn test_inapplicable_events_are_ignored() {
        let (state, effects) =
            EditorState::Idle.step(EditorEvent::PointerMove(Point::new(1.0, 1.0)));
        assert_eq!(state, EditorState::Idle);
        assert!(effects.is_empty());

        let (state, effects) = EditorState::Idle.step(EditorEvent::PointerUp(Point::new(1.0, 1.0)));
        assert_eq!(state, EditorState::Idle);
        assert!(effects.is_empty());

        let (state, effects) = EditorState::Idle.step(EditorEvent::Commit("cat".to_string()));
        assert_eq!(state, EditorState::Idle);
        assert_eq!(
            effects,
            vec![Effect::CommitRejected(CommitRejection::NothingPending)]
        );

        let awaiting = drawn((0.0, 0.0), (5.0, 5.0));
        let (state, effects) = awaiting.step(EditorEvent::PointerMove(Point::new(50.0, 50.0)));
        assert_eq!(state, awaiting);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_press_while_awaiting_label_restarts() {
        let awaiting = drawn((0.0, 0.0), (5.0, 5.0));
        let (state, effects) = awaiting.step(EditorEvent::PointerDown(Point::new(20.0, 20.0)));
        assert_eq!(
            state.pending().copied(),
            Some(PendingBox::at(Point::new(20.0, 20.0)))
        );
        assert_eq!(effects, vec![Effect::DisableClassInput]);
    }
}
