//! Drag and drop state machine
//!
//! ```text
//! Idle ──start──▶ Dragging ──enter/leave (0..n)──▶ Dragging { over }
//!   ▲                                                   │
//!   └────────────── drop_on / cancel ◀──────────────────┘
//! ```
//!
//! Only editable (owner) boards can start a drag. Dropping onto the column
//! the card came from is a no-op; dropping elsewhere yields a [`DropIntent`].

use shared::models::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging {
        idea_id: i64,
        from: Column,
        /// Column currently under the pointer
        over: Option<Column>,
    },
}

/// A completed drop into a different column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIntent {
    pub idea_id: i64,
    pub from: Column,
    pub to: Column,
}

#[derive(Debug)]
pub struct DragMachine {
    editable: bool,
    state: DragState,
}

impl DragMachine {
    /// `editable` is false on read-only (public) boards
    pub fn new(editable: bool) -> Self {
        Self {
            editable,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin dragging; ignored on read-only boards or while another drag is active
    pub fn start(&mut self, idea_id: i64, from: Column) -> bool {
        if !self.editable || self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging {
            idea_id,
            from,
            over: None,
        };
        true
    }

    pub fn enter(&mut self, column: Column) {
        if let DragState::Dragging { ref mut over, .. } = self.state {
            *over = Some(column);
        }
    }

    pub fn leave(&mut self, column: Column) {
        if let DragState::Dragging { ref mut over, .. } = self.state
            && *over == Some(column)
        {
            *over = None;
        }
    }

    /// Finish the drag on `column`; always returns to `Idle`
    pub fn drop_on(&mut self, column: Column) -> Option<DropIntent> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { idea_id, from, .. } if from != column => Some(DropIntent {
                idea_id,
                from,
                to: column,
            }),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
