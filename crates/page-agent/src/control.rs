//! Placement of the injected action control.

use crate::driver::{ControlPlacement, Viewport};

/// Below this width the webmail layout collapses and its own floating
/// compose button occupies the bottom-right corner.
const NARROW_VIEWPORT_WIDTH: u32 = 768;

/// Pick the control position for the given viewport.
///
/// Wide layouts get the bottom-right corner; narrow layouts shift the
/// control up and in so it clears the page's own floating button.
pub fn placement_for(viewport: Viewport) -> ControlPlacement {
    if viewport.width < NARROW_VIEWPORT_WIDTH {
        ControlPlacement {
            right: 16,
            bottom: 88,
        }
    } else {
        ControlPlacement {
            right: 24,
            bottom: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_viewport_uses_corner() {
        let placement = placement_for(Viewport {
            width: 1440,
            height: 900,
        });
        assert_eq!(placement, ControlPlacement { right: 24, bottom: 24 });
    }

    #[test]
    fn test_narrow_viewport_clears_floating_button() {
        let placement = placement_for(Viewport {
            width: 480,
            height: 800,
        });
        assert_eq!(placement, ControlPlacement { right: 16, bottom: 88 });
    }

    #[test]
    fn test_boundary_width_is_wide() {
        let placement = placement_for(Viewport {
            width: 768,
            height: 1024,
        });
        assert_eq!(placement.bottom, 24);
    }
}
