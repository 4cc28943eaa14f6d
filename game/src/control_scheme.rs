use crate::beam::state_machine::BeamMode;
use fyrox::{
    event::{ElementState, Event, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ControlButton {
    Mouse(u16),
    Key(KeyCode),
}

impl ControlButton {
    pub fn from_mouse(button: MouseButton) -> Self {
        ControlButton::Mouse(match button {
            MouseButton::Left => 1,
            MouseButton::Right => 2,
            MouseButton::Middle => 3,
            MouseButton::Back => 4,
            MouseButton::Forward => 5,
            MouseButton::Other(i) => i,
        })
    }

    /// Extracts a button edge from an OS event.
    pub fn from_event(event: &Event<()>) -> Option<(Self, ElementState)> {
        let Event::WindowEvent { event, .. } = event else {
            return None;
        };

        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                Some((Self::from_mouse(*button), *state))
            }
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => Some((ControlButton::Key(code), event.state)),
                _ => None,
            },
            _ => None,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ControlButtonDefinition {
    pub description: String,
    pub button: ControlButton,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ControlScheme {
    pub diminish: ControlButtonDefinition,
    pub augment: ControlButtonDefinition,
}

impl Default for ControlScheme {
    fn default() -> Self {
        Self {
            diminish: ControlButtonDefinition {
                description: "Diminish".to_string(),
                button: ControlButton::Mouse(1),
            },
            augment: ControlButtonDefinition {
                description: "Augment".to_string(),
                button: ControlButton::Mouse(2),
            },
        }
    }
}

impl ControlScheme {
    /// Beam channel bound to `button`. Diminish wins if both share a button.
    pub fn mode_of(&self, button: ControlButton) -> Option<BeamMode> {
        if button == self.diminish.button {
            Some(BeamMode::Diminish)
        } else if button == self.augment.button {
            Some(BeamMode::Augment)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_buttons_map_to_beam_channels() {
        let scheme = ControlScheme::default();

        assert_eq!(
            scheme.mode_of(ControlButton::from_mouse(MouseButton::Left)),
            Some(BeamMode::Diminish)
        );
        assert_eq!(
            scheme.mode_of(ControlButton::from_mouse(MouseButton::Right)),
            Some(BeamMode::Augment)
        );
        assert_eq!(scheme.mode_of(ControlButton::Key(KeyCode::KeyE)), None);
    }

    #[test]
    fn rebound_button_replaces_default() {
        let mut scheme = ControlScheme::default();
        scheme.augment.button = ControlButton::Key(KeyCode::KeyF);

        assert_eq!(
            scheme.mode_of(ControlButton::Key(KeyCode::KeyF)),
            Some(BeamMode::Augment)
        );
        assert_eq!(scheme.mode_of(ControlButton::Mouse(2)), None);
        assert_eq!(
            scheme.mode_of(ControlButton::Mouse(1)),
            Some(BeamMode::Diminish)
        );
    }
}
