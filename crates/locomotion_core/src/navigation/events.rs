//! Navigation events

use bevy::prelude::*;

use super::resolver::NavigationEventKind;

/// Event: изменение click-навигации (marker UI, audio click)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NavigationEvent {
    pub entity: Entity,
    pub kind: NavigationEventKind,
}

/// Event: внешний reset навигации (respawn, cutscene, teleport)
#[derive(Event, Debug, Clone, Copy)]
pub struct CancelNavigation {
    pub entity: Entity,
}
