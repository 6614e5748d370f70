//! Customizable keybindings for gallery navigation.
//!
//! Keys are named after DOM `KeyboardEvent.key` values so browser events map
//! onto them directly.

use serde::{Deserialize, Serialize};

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Enter,
    Space,
    Delete,
    Home,
    End,
    /// A printable single-character key, stored lowercase
    Character(char),
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Option<Key> {
        let named = match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Escape" | "Esc" => Key::Escape,
            "Enter" => Key::Enter,
            " " | "Spacebar" => Key::Space,
            "Delete" => Key::Delete,
            "Home" => Key::Home,
            "End" => Key::End,
            _ => {
                let mut chars = key.chars();
                return match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Character(c.to_ascii_lowercase())),
                    _ => None,
                };
            }
        };
        Some(named)
    }
}

/// Navigation actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationAction {
    PreviousImage,
    NextImage,
    ClearSelection,
}

impl NavigationAction {
    /// Get all actions in display order.
    pub fn all() -> &'static [NavigationAction] {
        &[
            NavigationAction::PreviousImage,
            NavigationAction::NextImage,
            NavigationAction::ClearSelection,
        ]
    }
}

/// Keybinding configuration for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    /// Hotkey for moving to the previous image
    pub previous_image: Key,
    /// Hotkey for moving to the next image
    pub next_image: Key,
    /// Hotkey for closing the viewer
    pub clear_selection: Key,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            previous_image: Key::ArrowLeft,
            next_image: Key::ArrowRight,
            clear_selection: Key::Escape,
        }
    }
}

impl KeyBindings {
    /// Create new keybindings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the action bound to a key press, if any.
    pub fn action_for_key(&self, key: Key) -> Option<NavigationAction> {
        NavigationAction::all()
            .iter()
            .copied()
            .find(|action| self.key_for_action(*action) == key)
    }

    /// Get the hotkey for an action.
    pub fn key_for_action(&self, action: NavigationAction) -> Key {
        match action {
            NavigationAction::PreviousImage => self.previous_image,
            NavigationAction::NextImage => self.next_image,
            NavigationAction::ClearSelection => self.clear_selection,
        }
    }

    /// Set the hotkey for an action.
    pub fn set_key(&mut self, action: NavigationAction, key: Key) {
        match action {
            NavigationAction::PreviousImage => self.previous_image = key,
            NavigationAction::NextImage => self.next_image = key,
            NavigationAction::ClearSelection => self.clear_selection = key,
        }
    }

    /// Check if a key is already used by another action.
    /// Returns the conflicting action, if any.
    pub fn key_conflict(
        &self,
        key: Key,
        exclude: Option<NavigationAction>,
    ) -> Option<NavigationAction> {
        NavigationAction::all()
            .iter()
            .copied()
            .filter(|action| Some(*action) != exclude)
            .find(|action| self.key_for_action(*action) == key)
    }

    /// Whether every action has a distinct key.
    pub fn is_unambiguous(&self) -> bool {
        NavigationAction::all()
            .iter()
            .all(|action| self.key_conflict(self.key_for_action(*action), Some(*action)).is_none())
    }
}
