//! Centralized keyboard shortcuts registry.
//!
//! Single source of truth for the dashboard's keyboard shortcuts, rendered
//! by `HelpDialog`.

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., lowercase variant or arrow key)
    pub alt_key: Option<KeyCode>,
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    /// Category for grouping in help/docs
    pub category: ShortcutCategory,
    /// Context where this shortcut is active
    pub context: ShortcutContext,
}

/// Categories for organizing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Actions,
    Dialogs,
}

/// Contexts where shortcuts are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Active in the main dashboard
    Global,
    /// Active while the simulator dialog is open
    Simulator,
    /// Active while typing in the transaction search box
    Search,
}

impl ShortcutCategory {
    /// Display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Actions => "Actions",
            ShortcutCategory::Dialogs => "Dialogs",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Actions,
            ShortcutCategory::Dialogs,
        ]
    }
}

impl ShortcutContext {
    /// Display name for this context
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Global => "Dashboard",
            ShortcutContext::Simulator => "Simulator",
            ShortcutContext::Search => "Search",
        }
    }

    /// All contexts in display order
    pub fn all() -> &'static [ShortcutContext] {
        &[
            ShortcutContext::Global,
            ShortcutContext::Search,
            ShortcutContext::Simulator,
        ]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "q", "Tab", "j/↓")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for help dialog (left-padded to 7 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<7}", self.key_display())
    }
}

/// Format a KeyCode for display
fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Global Context ===
    // General
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        description: "Quit dashboard",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        description: "Toggle help",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    // Navigation
    Shortcut {
        key: KeyCode::Tab,
        alt_key: Some(KeyCode::BackTab),
        description: "Switch between panels",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('l'),
        alt_key: Some(KeyCode::Right),
        description: "Next flow step / transaction",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('h'),
        alt_key: Some(KeyCode::Left),
        description: "Previous flow step / transaction",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    // Actions
    Shortcut {
        key: KeyCode::Char('f'),
        alt_key: Some(KeyCode::Char('F')),
        description: "Cycle corridor filter",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('/'),
        alt_key: None,
        description: "Search by ID or recipient",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('t'),
        alt_key: None,
        description: "Cycle status filter",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('o'),
        alt_key: None,
        description: "Toggle sort by date / amount",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('1'),
        alt_key: None,
        description: "Send $0.01 tip",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('2'),
        alt_key: None,
        description: "Send $0.10 tip",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('3'),
        alt_key: None,
        description: "Send $0.50 tip",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('4'),
        alt_key: None,
        description: "Send $1.00 tip",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Char('r'),
        alt_key: None,
        description: "Redeem 500 $HYPE for a fee rebate",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Clear selection",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Global,
    },
    // Dialogs
    Shortcut {
        key: KeyCode::Char('s'),
        alt_key: Some(KeyCode::Char('S')),
        description: "Simulate remit",
        category: ShortcutCategory::Dialogs,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Transaction details",
        category: ShortcutCategory::Dialogs,
        context: ShortcutContext::Global,
    },
    // === Search Context ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Keep search and return to table",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Search,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Clear search",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Search,
    },
    // === Simulator Context ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        description: "Run simulation (restarts a running one)",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Simulator,
    },
    Shortcut {
        key: KeyCode::Tab,
        alt_key: None,
        description: "Switch amount / currency field",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Simulator,
    },
    Shortcut {
        key: KeyCode::Up,
        alt_key: Some(KeyCode::Down),
        description: "Change destination currency",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Simulator,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Close and cancel simulation",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Simulator,
    },
];

/// Get shortcuts grouped by category for a given context
pub fn shortcuts_by_category_for_context(
    context: ShortcutContext,
) -> Vec<(ShortcutCategory, Vec<&'static Shortcut>)> {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = SHORTCUTS
            .iter()
            .filter(|s| s.context == context && s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}

/// Grouped shortcuts by category
pub type GroupedByCategory = Vec<(ShortcutCategory, Vec<&'static Shortcut>)>;

/// Get all shortcuts grouped by context, then by category
pub fn all_shortcuts_grouped() -> Vec<(ShortcutContext, GroupedByCategory)> {
    ShortcutContext::all()
        .iter()
        .map(|ctx| (*ctx, shortcuts_by_category_for_context(*ctx)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(
                !shortcut.description.is_empty(),
                "Shortcut {:?} has empty description",
                shortcut.key
            );
        }
    }

    #[test]
    fn test_key_display_single_key() {
        let shortcut = Shortcut {
            key: KeyCode::Char('q'),
            alt_key: None,
            description: "Test",
            category: ShortcutCategory::General,
            context: ShortcutContext::Global,
        };
        assert_eq!(shortcut.key_display(), "q");
    }

    #[test]
    fn test_key_display_with_alt() {
        let shortcut = Shortcut {
            key: KeyCode::Char('j'),
            alt_key: Some(KeyCode::Down),
            description: "Test",
            category: ShortcutCategory::Navigation,
            context: ShortcutContext::Global,
        };
        assert_eq!(shortcut.key_display(), "j/↓");
    }

    #[test]
    fn test_key_display_special_keys() {
        assert_eq!(format_keycode(&KeyCode::Enter), "Enter");
        assert_eq!(format_keycode(&KeyCode::Esc), "Esc");
        assert_eq!(format_keycode(&KeyCode::Tab), "Tab");
        assert_eq!(format_keycode(&KeyCode::PageUp), "PgUp");
        assert_eq!(format_keycode(&KeyCode::PageDown), "PgDn");
    }

    #[test]
    fn test_tip_keys_registered() {
        let tips: Vec<_> = SHORTCUTS
            .iter()
            .filter(|s| s.context == ShortcutContext::Global)
            .filter(|s| matches!(s.key, KeyCode::Char('1'..='4')))
            .collect();
        assert_eq!(tips.len(), 4);
    }

    #[test]
    fn test_shortcuts_by_category_for_context() {
        let grouped = shortcuts_by_category_for_context(ShortcutContext::Global);
        assert!(!grouped.is_empty());
        // Should have at least General, Navigation, Actions
        let categories: Vec<_> = grouped.iter().map(|(cat, _)| cat).collect();
        assert!(categories.contains(&&ShortcutCategory::General));
        assert!(categories.contains(&&ShortcutCategory::Navigation));
        assert!(categories.contains(&&ShortcutCategory::Actions));
    }

    #[test]
    fn test_category_display_names() {
        assert_eq!(ShortcutCategory::General.display_name(), "General");
        assert_eq!(ShortcutCategory::Navigation.display_name(), "Navigation");
        assert_eq!(ShortcutCategory::Actions.display_name(), "Actions");
        assert_eq!(ShortcutCategory::Dialogs.display_name(), "Dialogs");
    }

    #[test]
    fn test_context_display_names() {
        assert_eq!(ShortcutContext::Global.display_name(), "Dashboard");
        assert_eq!(ShortcutContext::Simulator.display_name(), "Simulator");
        assert_eq!(ShortcutContext::Search.display_name(), "Search");
    }

    #[test]
    fn test_all_shortcuts_grouped() {
        let grouped = all_shortcuts_grouped();
        assert_eq!(grouped.len(), 3); // Global, Search, Simulator
    }
}
