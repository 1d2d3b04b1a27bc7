//! Click/drag navigation
//!
//! Pointer → raycast → NavigationTarget → вектор в input space.
//! Арбитр решает, выигрывает ли этот вектор у direct input.

pub mod events;
pub mod raycast;
pub mod resolver;
pub mod systems;


pub use events::{CancelNavigation, NavigationEvent};
pub use raycast::cast_screen_point;
pub use resolver::{ClickNavigator, NavigationConfig, NavigationEventKind, NavigationPhase, NavigationTarget};
pub use systems::{apply_navigation_cancels, update_click_navigation};
