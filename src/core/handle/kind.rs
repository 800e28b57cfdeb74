//=========================================================================
// Manager Kind
//=========================================================================
//
// Closed set of tags partitioning simulation objects by role.
//
// Declaration order is dispatch order: the registry stores one manager
// per kind at `kind.index()` and runs phases in that order.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== ManagerKind =========================================================

/// Role tag selecting which manager a handle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ManagerKind {
    /// Generic simulation objects.
    Object,
    /// Characters and other actors.
    Entity,
    /// Background layers.
    Background,
    /// Tile maps.
    TileMap,
    /// Inventory items.
    Item,
    /// UI widgets.
    Gui,
    /// Transient visual effects.
    Effect,
}

impl ManagerKind {
    /// Every kind, in dispatch order.
    pub const ALL: [ManagerKind; 7] = [
        ManagerKind::Object,
        ManagerKind::Entity,
        ManagerKind::Background,
        ManagerKind::TileMap,
        ManagerKind::Item,
        ManagerKind::Gui,
        ManagerKind::Effect,
    ];

    /// Number of kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Registry slot for this kind.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short lowercase name, used as log context.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Entity => "entity",
            Self::Background => "background",
            Self::TileMap => "tilemap",
            Self::Item => "item",
            Self::Gui => "gui",
            Self::Effect => "effect",
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_declaration_order() {
        for (i, kind) in ManagerKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn ordering_follows_dispatch_order() {
        assert!(ManagerKind::Object < ManagerKind::Entity);
        assert!(ManagerKind::Gui < ManagerKind::Effect);
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(ManagerKind::TileMap.to_string(), "tilemap");
    }
}
