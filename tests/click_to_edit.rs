//! Click disambiguation tests
//!
//! Tests for how convertible cells get from display mode into edit mode:
//! double clicks, debounce timer expiry, focus-in and re-arming.

mod common;

use common::{addr, armed_generation, replace_cells, FakeGrid};
use gridedit::cell::{CellKind, ElementId};
use gridedit::commands::Cmd;
use gridedit::grid::RenderMode;
use gridedit::messages::CellMsg;
use gridedit::model::{CellState, ControllerConfig, EditCellController};

fn grid() -> FakeGrid {
    FakeGrid::with_cells(&[(0, "name", "alice"), (1, "name", "bob"), (3, "name", "carol")])
}

// ========================================================================
// Double Click
// ========================================================================

#[test]
fn test_first_click_only_arms() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let cmds = grid.click(&mut controller, 0, "name");

    assert_eq!(
        cmds,
        vec![Cmd::ArmClickTimer {
            generation: 1,
            delay_ms: 500
        }]
    );
    assert!(!controller.is_editing());
    assert_eq!(controller.cell_state(&addr(0, "name")), CellState::Armed);
    assert!(grid.renderer.renders.is_empty());
    assert_eq!(grid.focus.suspend_calls, 0);
}

#[test]
fn test_second_click_within_window_starts_edit() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.click(&mut controller, 0, "name");
    let cmds = grid.click(&mut controller, 0, "name");

    assert_eq!(cmds[0], Cmd::CancelClickTimer { generation: 1 });
    assert_eq!(replace_cells(&cmds), vec![(addr(0, "name"), RenderMode::Edit)]);
    assert!(cmds.contains(&Cmd::FocusInput {
        address: addr(0, "name"),
        caret: 5,
        selection: 0..5,
    }));

    assert_eq!(controller.editing_address(), Some(&addr(0, "name")));
    assert!(controller.pending_click().is_none());
    assert_eq!(grid.focus.suspend_calls, 1);
    assert!(grid.focus.suspended);
}

#[test]
fn test_edit_markup_is_an_input() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let cmds = grid.double_click(&mut controller, 0, "name");
    let markup = cmds
        .iter()
        .find_map(|cmd| match cmd {
            Cmd::ReplaceCell { markup, .. } => Some(markup.clone()),
            _ => None,
        })
        .unwrap();

    assert!(markup.starts_with("<input type=\"text\" value=\"alice\""));
    assert!(markup.contains("data-edit-type=\"text-convertible\""));
}

#[test]
fn test_configured_window_is_used_for_timer() {
    let mut grid = grid();
    let config = ControllerConfig {
        double_click_ms: 250,
        ..ControllerConfig::default()
    };
    let mut controller = EditCellController::new(CellKind::convertible(), config);

    let cmds = grid.click(&mut controller, 0, "name");
    assert_eq!(
        cmds,
        vec![Cmd::ArmClickTimer {
            generation: 1,
            delay_ms: 250
        }]
    );
}

// ========================================================================
// Timer Expiry
// ========================================================================

#[test]
fn test_timer_expiry_returns_to_display_without_render() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let generation = armed_generation(&grid.click(&mut controller, 1, "name")).unwrap();
    let cmds = grid.send_ok(&mut controller, CellMsg::ClickTimerExpired { generation });

    assert!(cmds.is_empty());
    assert!(controller.pending_click().is_none());
    assert!(!controller.is_editing());
    assert!(grid.renderer.renders.is_empty());
}

#[test]
fn test_click_after_expiry_arms_again() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.click(&mut controller, 0, "name");
    grid.send_ok(&mut controller, CellMsg::ClickTimerExpired { generation: 1 });
    let cmds = grid.click(&mut controller, 0, "name");

    assert_eq!(armed_generation(&cmds), Some(2));
    assert!(!controller.is_editing());
}

#[test]
fn test_stale_timer_does_not_clear_newer_click() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.click(&mut controller, 0, "name");
    grid.click(&mut controller, 1, "name");
    grid.send_ok(&mut controller, CellMsg::ClickTimerExpired { generation: 1 });

    assert_eq!(
        controller.pending_click().map(|p| p.address.clone()),
        Some(addr(1, "name"))
    );

    grid.click(&mut controller, 1, "name");
    assert_eq!(controller.editing_address(), Some(&addr(1, "name")));
}

#[test]
fn test_timer_for_unknown_generation_is_ignored() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let cmds = grid.send_ok(&mut controller, CellMsg::ClickTimerExpired { generation: 42 });
    assert!(cmds.is_empty());
    assert!(controller.pending_click().is_none());
}

// ========================================================================
// Re-arming
// ========================================================================

#[test]
fn test_clicks_on_different_cells_never_confirm() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.click(&mut controller, 0, "name");
    let cmds = grid.click(&mut controller, 1, "name");

    assert_eq!(
        cmds,
        vec![
            Cmd::CancelClickTimer { generation: 1 },
            Cmd::ArmClickTimer {
                generation: 2,
                delay_ms: 500
            },
        ]
    );

    // Back to the first cell: armed again, still not editing
    grid.click(&mut controller, 0, "name");
    assert!(!controller.is_editing());
    assert_eq!(controller.cell_state(&addr(0, "name")), CellState::Armed);
    assert_eq!(controller.cell_state(&addr(1, "name")), CellState::Display);
}

#[test]
fn test_click_on_cell_being_edited_is_a_noop() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.double_click(&mut controller, 0, "name");
    let cmds = grid.click(&mut controller, 0, "name");

    assert!(cmds.is_empty());
    assert!(controller.pending_click().is_none());
    assert_eq!(controller.editing_address(), Some(&addr(0, "name")));
    assert_eq!(grid.focus.suspend_calls, 1);
}

#[test]
fn test_double_click_on_other_cell_moves_edit() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.double_click(&mut controller, 0, "name");
    grid.type_value(&mut controller, "alicia");
    let cmds = grid.double_click(&mut controller, 1, "name");

    assert_eq!(
        replace_cells(&cmds),
        vec![
            (addr(0, "name"), RenderMode::Display),
            (addr(1, "name"), RenderMode::Edit),
        ]
    );
    assert_eq!(grid.value(0, "name"), "alicia");
    assert_eq!(controller.editing_address(), Some(&addr(1, "name")));
    assert_eq!(grid.focus.suspend_calls, 2);
    assert_eq!(grid.focus.resume_calls, 1);
    assert!(grid.focus.suspended);
}

#[test]
fn test_click_on_untracked_element_is_ignored() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let cmds = grid.send_ok(
        &mut controller,
        CellMsg::Click {
            target: ElementId::new("toolbar"),
        },
    );
    assert!(cmds.is_empty());
    assert!(controller.pending_click().is_none());
}

// ========================================================================
// Focus-in
// ========================================================================

#[test]
fn test_focus_in_starts_edit_immediately() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let cmds = grid.focus_in(&mut controller, 3, "name");

    assert_eq!(replace_cells(&cmds), vec![(addr(3, "name"), RenderMode::Edit)]);
    assert_eq!(controller.editing_address(), Some(&addr(3, "name")));
}

#[test]
fn test_focus_in_cancels_pending_click_on_same_cell() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.click(&mut controller, 3, "name");
    let cmds = grid.focus_in(&mut controller, 3, "name");

    assert_eq!(cmds[0], Cmd::CancelClickTimer { generation: 1 });
    assert!(controller.pending_click().is_none());
    assert!(controller.is_editing());
}

// ========================================================================
// Non-editable Cells
// ========================================================================

#[test]
fn test_disabled_cell_never_enters_edit() {
    let mut grid = grid();
    grid.state_mut(0, "name").is_disabled = true;
    let mut controller = EditCellController::convertible();

    let cmds = grid.double_click(&mut controller, 0, "name");

    assert!(!controller.is_editing());
    assert!(controller.pending_click().is_none());
    assert!(replace_cells(&cmds).is_empty());
    assert!(grid.renderer.renders.is_empty());
    assert_eq!(grid.focus.suspend_calls, 0);
}

#[test]
fn test_readonly_cell_ignores_focus_in() {
    let mut grid = grid();
    grid.state_mut(1, "name").is_editable = false;
    let mut controller = EditCellController::convertible();

    let cmds = grid.focus_in(&mut controller, 1, "name");
    assert!(cmds.is_empty());
    assert!(!controller.is_editing());
}

#[test]
fn test_cell_missing_from_data_source_is_ignored() {
    let mut grid = grid();
    grid.layout.rendered.insert(addr(9, "name"));
    let mut controller = EditCellController::convertible();

    let cmds = grid.focus_in(&mut controller, 9, "name");
    assert!(cmds.is_empty());
    assert!(!controller.is_editing());
}

// ========================================================================
// Direct Start / End
// ========================================================================

#[test]
fn test_start_edit_bypasses_clicks() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    let cmd = {
        let mut ctx = grid.ctx();
        controller.start_edit(&mut ctx, &addr(0, "name")).unwrap()
    };
    assert!(cmd.is_some());
    assert!(controller.is_editing());
}

#[test]
fn test_end_edit_discards_changes_and_pending_click() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();

    grid.double_click(&mut controller, 0, "name");
    grid.type_value(&mut controller, "zed");
    grid.click(&mut controller, 1, "name");

    let cmds = {
        let mut ctx = grid.ctx();
        controller.end_edit(&mut ctx).map(Cmd::flatten).unwrap_or_default()
    };

    assert!(cmds.contains(&Cmd::CancelClickTimer { generation: 2 }));
    assert_eq!(replace_cells(&cmds), vec![(addr(0, "name"), RenderMode::Display)]);
    assert_eq!(grid.value(0, "name"), "alice");
    assert!(grid.data.writes.is_empty());
    assert!(!controller.is_editing());
    assert!(controller.pending_click().is_none());
    assert!(!grid.focus.suspended);
}

#[test]
fn test_end_edit_when_idle_does_nothing() {
    let mut grid = grid();
    let mut controller = EditCellController::convertible();
    let cmd = {
        let mut ctx = grid.ctx();
        controller.end_edit(&mut ctx)
    };
    assert!(cmd.is_none());
    assert_eq!(grid.focus.resume_calls, 0);
}
