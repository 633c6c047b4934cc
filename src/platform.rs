//! Platform-specific key bindings

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Modifier for the alternate save shortcut
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const ALT_SAVE_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const ALT_SAVE_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Save shortcut display for help text
/// Ctrl+S works on all platforms (Cmd+W/Ctrl+W also work as fallback)
pub const SAVE_SHORTCUT: &str = "^S";

/// Whether `key` is one of the save/submit shortcuts
pub fn is_save_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('s') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('w') => key.modifiers.contains(ALT_SAVE_MODIFIER),
        _ => false,
    }
}
