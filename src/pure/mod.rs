//! Side effect free management of internal window manager state
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod diff;
pub mod focus;
pub mod geometry;
pub mod move_resize;
pub mod rules;
pub mod screen;
pub mod screen_edge;
pub mod stacking;
pub mod subspace;
pub mod window;

#[doc(inline)]
pub use focus::FocusChain;
#[doc(inline)]
pub use screen::Screen;
#[doc(inline)]
pub use stacking::StackingOrder;
#[doc(inline)]
pub use subspace::{Subspace, SubspaceManager};
#[doc(inline)]
pub use window::Window;

pub(crate) use diff::{Diff, Snapshot, WindowState};

/// A relative position along the horizontal and vertical axes
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RelativePosition {
    /// Left of the current position
    Left,
    /// Right of the current position
    Right,
    /// Above the current position
    Above,
    /// Below the current position
    Below,
}
