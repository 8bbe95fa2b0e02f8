//! Input mapping from raw events to application actions
//!
//! Maps keyboard input to actions the viewer state does not own, like Exit.
//! Orbit, zoom, and shading keys are NOT mapped here - they go to the ViewerController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions handled by the application rather than the viewer reducer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Reset camera to the starting view (Home key)
    ResetView,
    /// Switch between slice and volume compositing (V key)
    ToggleCompositeMode,
}

/// Maps raw input events to application actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for application keys, `None` for everything else
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::Home => Some(InputAction::ResetView),
            KeyCode::KeyV => Some(InputAction::ToggleCompositeMode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_exits() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(action, Some(InputAction::Exit));
    }

    #[test]
    fn test_viewer_keys_not_mapped() {
        // Channel keys belong to the viewer controller
        for key in [KeyCode::KeyR, KeyCode::KeyB, KeyCode::KeyT, KeyCode::NumpadAdd] {
            let action = InputMapper::map_keyboard(key, ElementState::Pressed);
            assert_eq!(action, None, "Key {:?} should not be mapped", key);
        }
    }

    #[test]
    fn test_key_release_ignored() {
        let action = InputMapper::map_keyboard(KeyCode::Escape, ElementState::Released);
        assert_eq!(action, None);
    }

    #[test]
    fn test_special_keys() {
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyF, ElementState::Pressed),
            Some(InputAction::ToggleFullscreen)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::Home, ElementState::Pressed),
            Some(InputAction::ResetView)
        );
        assert_eq!(
            InputMapper::map_keyboard(KeyCode::KeyV, ElementState::Pressed),
            Some(InputAction::ToggleCompositeMode)
        );
    }
}
