//! Entering and leaving edit mode
//!
//! Every way out of edit mode (blur, Enter, Escape, focus-out, a cell
//! becoming read-only) goes through `close_session`, which always tears the
//! session down before reporting a failed write.

use crate::cell::{Activation, CellAddress, CellAttribute, CellInput, CellRenderState, ElementId};
use crate::commands::{push_cmd, Cmd};
use crate::grid::{GridContext, RenderMode, RenderRequest};
use crate::messages::{EditKey, InputMsg};
use crate::model::{CommitError, EditCellController, EditSession, UpdateResult};

fn finish(cmds: Vec<Cmd>) -> Option<Cmd> {
    let cmd = Cmd::batch(cmds);
    if cmd.is_none() {
        None
    } else {
        Some(cmd)
    }
}

/// Cell state with the configured max length filled in where the data source has none
fn with_default_max_length(
    controller: &EditCellController,
    state: &CellRenderState,
) -> CellRenderState {
    CellRenderState {
        max_length: state.max_length.or(controller.config.default_max_length),
        ..state.clone()
    }
}

fn render_cell(
    controller: &EditCellController,
    ctx: &mut GridContext<'_>,
    address: &CellAddress,
    state: &CellRenderState,
    mode: RenderMode,
) -> Cmd {
    let kind = &controller.kind;
    let state = with_default_max_length(controller, state);
    let markup = ctx.renderer.render(RenderRequest {
        address,
        mode,
        state: &state,
        input_kind: kind.input_kind,
        edit_tag: kind.edit_tag,
        activation: kind.activation,
    });
    Cmd::ReplaceCell {
        address: address.clone(),
        mode,
        markup,
    }
}

/// Enter edit mode for `address`
///
/// No-op when the cell is already being edited, is unknown to the data
/// source, or is not editable/enabled. An active session on another cell
/// is closed (and committed) first.
pub fn start_edit(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    address: &CellAddress,
) -> UpdateResult {
    if controller.editing_address() == Some(address) {
        return Ok(None);
    }

    let Some(state) = ctx.data.get(address) else {
        tracing::debug!("start_edit: cell {} not found in data source", address);
        return Ok(None);
    };

    if !state.can_edit() {
        tracing::debug!(
            "start_edit: cell {} is not editable (editable={}, disabled={})",
            address,
            state.is_editable,
            state.is_disabled
        );
        return Ok(None);
    }

    let mut cmds = Vec::new();
    let mut failure = None;

    if controller.session.is_some() {
        match close_session(controller, ctx, true) {
            Ok(cmd) => push_cmd(&mut cmds, cmd),
            Err(mut err) => {
                push_cmd(&mut cmds, err.take_followup());
                failure = Some(err);
            }
        }
    }

    let armed_here = controller
        .pending
        .as_ref()
        .is_some_and(|p| &p.address == address);
    if armed_here {
        if let Some(pending) = controller.pending.take() {
            cmds.push(Cmd::CancelClickTimer {
                generation: pending.generation,
            });
        }
    }

    let state = with_default_max_length(controller, &state);
    if controller.kind.activation == Activation::DoubleClick {
        cmds.push(render_cell(controller, ctx, address, &state, RenderMode::Edit));
    }

    let input = CellInput::new(&state.value, state.max_length);
    cmds.push(Cmd::FocusInput {
        address: address.clone(),
        caret: input.caret(),
        selection: input.selection(),
    });

    controller.session = Some(EditSession {
        address: address.clone(),
        original_text: state.value,
        input,
    });

    if !controller.selection_suspended {
        ctx.focus.suspend_global_selection();
        controller.selection_suspended = true;
    }

    tracing::debug!("editing cell {} ({})", address, controller.kind.edit_tag);

    match failure {
        Some(mut err) => {
            err.followup = finish(cmds);
            Err(err)
        }
        None => Ok(finish(cmds)),
    }
}

/// Leave edit mode without committing and drop any pending click
pub fn end_edit(controller: &mut EditCellController, ctx: &mut GridContext<'_>) -> Option<Cmd> {
    match close_session(controller, ctx, false) {
        Ok(cmd) => cmd,
        // Nothing is written without commit, so this arm is never taken
        Err(mut err) => err.take_followup(),
    }
}

/// Tear down the active session, committing first if asked to
fn close_session(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    commit: bool,
) -> UpdateResult {
    let session = controller.session.take();

    let write = match &session {
        Some(session) if commit && session.is_modified() => {
            let value = session.input.text();
            tracing::info!("committing {:?} to cell {}", value, session.address);
            ctx.data
                .set(&session.address, value)
                .map_err(|source| (session.address.clone(), value.to_string(), source))
        }
        Some(session) => {
            tracing::debug!("leaving cell {} without changes", session.address);
            Ok(())
        }
        None => Ok(()),
    };

    if controller.selection_suspended {
        ctx.focus.resume_global_selection();
        controller.selection_suspended = false;
    }

    let mut cmds = Vec::new();

    if let Some(pending) = controller.pending.take() {
        cmds.push(Cmd::CancelClickTimer {
            generation: pending.generation,
        });
    }

    if let Some(session) = &session {
        if controller.kind.activation == Activation::DoubleClick
            && ctx.resolver.element_for(&session.address).is_some()
        {
            if let Some(state) = ctx.data.get(&session.address) {
                cmds.push(render_cell(
                    controller,
                    ctx,
                    &session.address,
                    &state,
                    RenderMode::Display,
                ));
            }
        }
    }

    match write {
        Ok(()) => Ok(finish(cmds)),
        Err((address, value, source)) => {
            tracing::warn!("commit to cell {} failed: {:#}", address, source);
            Err(CommitError {
                address,
                value,
                source,
                followup: finish(cmds),
            })
        }
    }
}

/// Hand focus back to the grid and run the blur path
fn focus_clipboard_and_close(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
) -> UpdateResult {
    match close_session(controller, ctx, true) {
        Ok(cmd) => Ok(finish(vec![Cmd::FocusClipboard, cmd.unwrap_or_default()])),
        Err(mut err) => {
            let followup = err.take_followup().unwrap_or_default();
            err.followup = finish(vec![Cmd::FocusClipboard, followup]);
            Err(err)
        }
    }
}

pub fn on_focus_in(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    target: &ElementId,
) -> UpdateResult {
    let Some(address) = ctx.resolver.resolve(target) else {
        tracing::debug!("focus-in on untracked element {}, ignoring", target);
        return Ok(None);
    };
    start_edit(controller, ctx, &address)
}

pub fn on_focus_out(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
) -> UpdateResult {
    if controller.session.is_none() {
        return Ok(None);
    }
    focus_clipboard_and_close(controller, ctx)
}

pub fn on_blur(controller: &mut EditCellController, ctx: &mut GridContext<'_>) -> UpdateResult {
    close_session(controller, ctx, true)
}

pub fn on_key_down(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    key: EditKey,
) -> UpdateResult {
    let Some(session) = controller.session.as_mut() else {
        return Ok(None);
    };

    if key.is_swallowed() {
        tracing::trace!("swallowed {:?} while editing {}", key, session.address);
        return Ok(None);
    }

    match key {
        EditKey::Enter => focus_clipboard_and_close(controller, ctx),
        EditKey::Escape => {
            let original = session.original_text.clone();
            session.input.set_text(&original);
            focus_clipboard_and_close(controller, ctx)
        }
        EditKey::Left => {
            session.input.move_left(false);
            Ok(None)
        }
        EditKey::Right => {
            session.input.move_right(false);
            Ok(None)
        }
        EditKey::Home => {
            session.input.move_home(false);
            Ok(None)
        }
        EditKey::End => {
            session.input.move_end(false);
            Ok(None)
        }
        EditKey::Backspace => {
            session.input.delete_backward();
            Ok(None)
        }
        EditKey::Delete => {
            session.input.delete_forward();
            Ok(None)
        }
        EditKey::Up | EditKey::Down | EditKey::PageUp | EditKey::PageDown => Ok(None),
    }
}

pub fn on_input(controller: &mut EditCellController, msg: InputMsg) -> Option<Cmd> {
    let session = controller.session.as_mut()?;
    let input = &mut session.input;

    match msg {
        InputMsg::InsertChar(ch) => {
            if !input.insert_char(ch) {
                tracing::trace!("rejected {:?} in cell {}", ch, session.address);
            }
        }
        InputMsg::InsertText(text) => input.insert_text(&text),
        InputMsg::DeleteBackward => input.delete_backward(),
        InputMsg::DeleteForward => input.delete_forward(),
        InputMsg::CursorLeft { extend } => input.move_left(extend),
        InputMsg::CursorRight { extend } => input.move_right(extend),
        InputMsg::CursorHome { extend } => input.move_home(extend),
        InputMsg::CursorEnd { extend } => input.move_end(extend),
        InputMsg::SelectAll => input.select_all(),
        InputMsg::SetValue(value) => input.set_text(&value),
    }
    None
}

/// React to attribute changes reported by the data source
pub fn on_model_changed(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    address: &CellAddress,
    changed: &[CellAttribute],
) -> UpdateResult {
    if ctx.resolver.element_for(address).is_none() {
        return Ok(None);
    }
    let Some(state) = ctx.data.get(address) else {
        return Ok(None);
    };

    let editing = controller.editing_address() == Some(address);

    if editing && !state.can_edit() {
        tracing::debug!("cell {} became read-only while editing, closing", address);
        return close_session(controller, ctx, false);
    }

    let needs_redraw = changed
        .iter()
        .any(|attr| controller.kind.redraw_attributes().contains(attr));

    if needs_redraw {
        let mode = if editing {
            RenderMode::Edit
        } else {
            RenderMode::Display
        };
        let mut cmds = vec![render_cell(controller, ctx, address, &state, mode)];

        // A redrawn input starts over from the new value
        if let Some(session) = controller.session.as_mut().filter(|s| &s.address == address) {
            session.original_text = state.value.clone();
            let max_length = state.max_length.or(controller.config.default_max_length);
            session.input = CellInput::new(&state.value, max_length);
            cmds.push(Cmd::FocusInput {
                address: address.clone(),
                caret: session.input.caret(),
                selection: session.input.selection(),
            });
        }
        return Ok(finish(cmds));
    }

    if controller.kind.activation == Activation::Focus && !editing {
        return Ok(Some(Cmd::SyncInput {
            address: address.clone(),
            value: state.value,
            disabled: state.is_disabled,
        }));
    }

    Ok(None)
}
