//! Update functions for the cell edit controller
//!
//! All edit-state transitions flow through these functions. `update` is the
//! dispatch table from message kind to transition; it does not know about
//! any event loop, so the whole state machine runs in plain tests.
//!
//! ```text
//! Display ──click──▶ Armed ──click (same cell)──▶ Editing
//!    ▲                 │                             │
//!    └────timeout──────┘      blur / Enter / Escape ─┘
//! ```

mod click;
mod edit;

use crate::grid::GridContext;
use crate::messages::CellMsg;
use crate::model::{EditCellController, UpdateResult};

#[cfg(debug_assertions)]
use crate::tracing::EditSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use edit::{end_edit, start_edit};

/// Main update function - dispatches to transition handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    msg: CellMsg,
) -> UpdateResult {
    #[cfg(debug_assertions)]
    {
        update_traced(controller, ctx, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(controller, ctx, msg)
    }
}

fn update_inner(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    msg: CellMsg,
) -> UpdateResult {
    match msg {
        CellMsg::Click { target } => click::on_click(controller, ctx, &target),
        CellMsg::ClickTimerExpired { generation } => {
            Ok(click::on_timer_expired(controller, generation))
        }
        CellMsg::FocusIn { target } => edit::on_focus_in(controller, ctx, &target),
        CellMsg::FocusOut => edit::on_focus_out(controller, ctx),
        CellMsg::Blur => edit::on_blur(controller, ctx),
        CellMsg::KeyDown(key) => edit::on_key_down(controller, ctx, key),
        CellMsg::Input(input) => Ok(edit::on_input(controller, input)),
        CellMsg::ModelChanged { address, changed } => {
            edit::on_model_changed(controller, ctx, &address, &changed)
        }
    }
}

#[cfg(debug_assertions)]
fn update_traced(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    msg: CellMsg,
) -> UpdateResult {
    let msg_name = format!("{:?}", msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();

    let before = EditSnapshot::from_controller(controller);
    let result = update_inner(controller, ctx, msg);
    let after = EditSnapshot::from_controller(controller);

    if let Some(diff) = before.diff(&after) {
        debug!(target: "edit_state", %diff, "state changed");
    }

    controller.assert_invariants();
    result
}

impl EditCellController {
    /// Panics if the session and selection bookkeeping disagree
    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        assert_eq!(
            self.session.is_some(),
            self.selection_suspended,
            "global selection must be suspended exactly while a cell is being edited"
        );
        if let (Some(session), Some(pending)) = (&self.session, &self.pending) {
            assert_ne!(
                session.address, pending.address,
                "the cell being edited cannot also be armed"
            );
        }
    }
}
