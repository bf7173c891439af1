//! Click disambiguation
//!
//! The first click on a cell arms a pending click and starts a debounce
//! timer. A second click on the same cell before the timer fires confirms
//! the edit. Each arming gets a fresh generation number; a timer whose
//! generation no longer matches the pending click is stale and ignored, so
//! exactly one of "second click" or "timer fired" takes effect per arming.

use crate::cell::{Activation, ElementId};
use crate::commands::Cmd;
use crate::grid::GridContext;
use crate::model::{EditCellController, PendingClick, UpdateResult};

use super::edit::start_edit;

/// Handle a click on a rendered element
pub fn on_click(
    controller: &mut EditCellController,
    ctx: &mut GridContext<'_>,
    target: &ElementId,
) -> UpdateResult {
    let Some(address) = ctx.resolver.resolve(target) else {
        tracing::debug!("click on untracked element {}, ignoring", target);
        return Ok(None);
    };

    // Input-backed cells take focus on the first click
    if controller.kind.activation == Activation::Focus {
        return start_edit(controller, ctx, &address);
    }

    if controller.editing_address() == Some(&address) {
        tracing::trace!("click on cell {} already in edit mode", address);
        return Ok(None);
    }

    let confirms = controller
        .pending
        .as_ref()
        .is_some_and(|pending| pending.address == address);

    if confirms {
        let Some(pending) = controller.pending.take() else {
            return Ok(None);
        };
        tracing::debug!(
            "second click on {} within window (generation {}), starting edit",
            address,
            pending.generation
        );
        let cancel = Cmd::CancelClickTimer {
            generation: pending.generation,
        };
        return match start_edit(controller, ctx, &address) {
            Ok(cmd) => Ok(Some(Cmd::batch(vec![cancel, cmd.unwrap_or_default()]))),
            Err(mut err) => {
                let followup = err.take_followup().unwrap_or_default();
                err.followup = Some(Cmd::batch(vec![cancel, followup]));
                Err(err)
            }
        };
    }

    Ok(Some(arm(controller, address)))
}

/// Arm a pending click for `address`, replacing any other armed click
fn arm(controller: &mut EditCellController, address: crate::cell::CellAddress) -> Cmd {
    let mut cmds = Vec::with_capacity(2);

    if let Some(previous) = controller.pending.take() {
        tracing::debug!(
            "re-arming: dropping pending click on {} (generation {})",
            previous.address,
            previous.generation
        );
        cmds.push(Cmd::CancelClickTimer {
            generation: previous.generation,
        });
    }

    let generation = controller.allocate_generation();
    let delay_ms = controller.config.double_click_ms;
    tracing::debug!(
        "armed click on {} (generation {}, {}ms)",
        address,
        generation,
        delay_ms
    );
    controller.pending = Some(PendingClick {
        address,
        generation,
    });
    cmds.push(Cmd::ArmClickTimer {
        generation,
        delay_ms,
    });

    Cmd::batch(cmds)
}

/// Handle expiry of a debounce timer
pub fn on_timer_expired(controller: &mut EditCellController, generation: u64) -> Option<Cmd> {
    match &controller.pending {
        Some(pending) if pending.generation == generation => {
            tracing::debug!(
                "click window on {} expired (generation {})",
                pending.address,
                generation
            );
            controller.pending = None;
        }
        _ => {
            tracing::trace!("stale click timer (generation {}), ignoring", generation);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellAddress;

    #[test]
    fn test_arm_replaces_previous_pending_click() {
        let mut controller = EditCellController::convertible();
        let first = arm(&mut controller, CellAddress::new(0usize, "a"));
        assert_eq!(
            first,
            Cmd::ArmClickTimer {
                generation: 1,
                delay_ms: 500
            }
        );

        let second = arm(&mut controller, CellAddress::new(1usize, "a"));
        assert_eq!(
            second.flatten(),
            vec![
                Cmd::CancelClickTimer { generation: 1 },
                Cmd::ArmClickTimer {
                    generation: 2,
                    delay_ms: 500
                },
            ]
        );
        assert_eq!(
            controller.pending_click().map(|p| p.address.clone()),
            Some(CellAddress::new(1usize, "a"))
        );
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut controller = EditCellController::convertible();
        arm(&mut controller, CellAddress::new(0usize, "a"));
        arm(&mut controller, CellAddress::new(0usize, "b"));

        assert!(on_timer_expired(&mut controller, 1).is_none());
        assert!(controller.pending_click().is_some());

        on_timer_expired(&mut controller, 2);
        assert!(controller.pending_click().is_none());
    }
}
