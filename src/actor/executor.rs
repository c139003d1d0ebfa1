use tracing::{debug, trace, warn};

use crate::layout_engine::{Action, PlacementError};
use crate::sys::window_system::{MaximizeFlags, WindowId, WindowSystem};

/// Issues the host requests for `action` on the new window, then focuses it.
///
/// Only `window` is ever touched. The frame is moved before it is maximized so
/// the host doesn't snap it back to another monitor's origin. Focus is
/// requested even when one of the placement requests fails; the first error
/// is returned.
pub fn apply<W: WindowSystem + ?Sized>(
    host: &mut W,
    window: WindowId,
    action: Action,
) -> Result<(), PlacementError> {
    let placed = perform(host, window, action);
    if let Err(e) = &placed {
        warn!(?window, "placement request failed, focusing anyway: {e}");
    }
    let now = host.current_time();
    let focused = host.focus(window, now);
    placed?;
    focused?;
    Ok(())
}

fn perform<W: WindowSystem + ?Sized>(
    host: &mut W,
    window: WindowId,
    action: Action,
) -> Result<(), PlacementError> {
    match action {
        Action::None => trace!(?window, "leaving window where the host put it"),
        Action::Maximize { area } => {
            debug!(?window, %area, "maximizing");
            host.move_frame(window, area.x, area.y)?;
            host.maximize(window, MaximizeFlags::BOTH)?;
        }
        Action::Tile {
            target,
            clear_horizontal,
        } => {
            debug!(?window, %target, clear_horizontal, "tiling");
            if clear_horizontal {
                host.unmaximize(window, MaximizeFlags::HORIZONTAL)?;
            }
            host.move_frame(window, target.x, target.y)?;
            host.move_resize_frame(window, target)?;
            host.maximize(window, MaximizeFlags::VERTICAL)?;
        }
        Action::Unmaximize => {
            debug!(?window, "restoring from full maximize");
            host.unmaximize(window, MaximizeFlags::BOTH)?;
        }
    }
    Ok(())
}
