//! winit event -> viewer event translation
//!
//! Controls:
//! - Left drag: orbit
//! - Right drag: slice spacing
//! - Scroll: zoom
//! - R / B / T: select red, blue or opacity for adjustment
//! - Numpad -/+ (or -/=): adjust the selected factor

use volview_core::{Channel, PointerButton, ViewerEvent};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixels of touchpad scroll that count as one line
const PIXELS_PER_LINE: f64 = 100.0;

/// Map a key to a viewer event
///
/// Only presses produce events. Returns `None` for keys the viewer ignores.
pub fn map_key(key: KeyCode, state: ElementState) -> Option<ViewerEvent> {
    if state != ElementState::Pressed {
        return None;
    }

    match key {
        KeyCode::KeyR => Some(ViewerEvent::SelectChannel(Channel::Red)),
        KeyCode::KeyB => Some(ViewerEvent::SelectChannel(Channel::Blue)),
        KeyCode::KeyT => Some(ViewerEvent::SelectChannel(Channel::Alpha)),
        KeyCode::NumpadSubtract | KeyCode::Minus => Some(ViewerEvent::AdjustChannel(-1)),
        KeyCode::NumpadAdd | KeyCode::Equal => Some(ViewerEvent::AdjustChannel(1)),
        _ => None,
    }
}

/// Map a mouse button transition to a viewer event
pub fn map_mouse_button(button: MouseButton, state: ElementState) -> Option<ViewerEvent> {
    let button = match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        _ => return None,
    };

    Some(match state {
        ElementState::Pressed => ViewerEvent::ButtonPressed(button),
        ElementState::Released => ViewerEvent::ButtonReleased(button),
    })
}

/// Scroll amount in lines, positive when scrolling up/away
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    }
}
