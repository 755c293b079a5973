//! Zone state and the diff algorithm that turns a state transition into the
//! minimal ordered list of bridge commands.
//!
//! The bridge never acknowledges anything, so the model is the only record of
//! what the fixtures should look like. Two rules drive the diff:
//!
//! - turning a zone off makes every other attribute irrelevant, so only
//!   [`Command::PowerOff`] is sent;
//! - color and brightness commands switch the fixture on as a side effect, so
//!   [`Command::PowerOn`] is only sent when neither was needed.

use crate::color::Color;
use crate::command::{self, Command};
use crate::error::InvalidArgument;
use crate::settings::ZoneSettings;

/// Desired state of a single zone.
///
/// Every attribute starts unknown (`None`) and, once set, can only be
/// replaced by another valid value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneState {
    pub(crate) power: Option<bool>,
    pub(crate) color: Option<Color>,
    pub(crate) brightness: Option<u8>,
}

impl ZoneState {
    /// `Some(true)` on, `Some(false)` off, `None` never set.
    #[must_use]
    pub fn power(&self) -> Option<bool> {
        self.power
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    #[must_use]
    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }

    /// Hue byte of the current color; `None` when no color is set or the
    /// color is white.
    #[must_use]
    pub fn color_code(&self) -> Option<u8> {
        self.color.and_then(Color::code)
    }

    /// Return a copy with the given settings merged in, leaving `self`
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] for an out-of-range brightness or an
    /// unparseable or black color.
    pub fn merged(&self, settings: &ZoneSettings) -> Result<Self, InvalidArgument> {
        let mut next = *self;
        if let Some(level) = settings.brightness {
            next.brightness = Some(command::brightness(level)?);
        }
        if let Some(color) = &settings.color {
            next.color = Some(Color::parse(color)?);
        }
        if let Some(power) = settings.power {
            next.power = Some(power);
        }
        Ok(next)
    }

    /// Merge `settings` and return the commands needed to reach the new state.
    ///
    /// On error the state is unchanged.
    ///
    /// # Errors
    ///
    /// See [`merged`](Self::merged).
    pub fn apply(&mut self, settings: &ZoneSettings) -> Result<Vec<Command>, InvalidArgument> {
        let next = self.merged(settings)?;
        let commands = Self::transition(self, &next);
        *self = next;
        Ok(commands)
    }

    /// Commands that move a fixture from `old` to `new`.
    #[must_use]
    pub fn transition(old: &Self, new: &Self) -> Vec<Command> {
        let mut commands = Vec::new();
        match new.power {
            Some(false) => {
                if old.power != Some(false) {
                    commands.push(Command::PowerOff);
                }
            }
            Some(true) => {
                let mut lit = old.power == Some(true);
                let old_code = old.color_code();
                let new_code = new.color_code();
                let code_changed = old_code != new_code;

                if let Some(color) = new.color {
                    if code_changed || !lit {
                        commands.push(color_command(color));
                        lit = true;
                    }
                }

                if let Some(level) = new.brightness {
                    // white and hue modes keep separate brightness on the bulb
                    let mode_switch = code_changed && (old_code.is_none() || new_code.is_none());
                    if old.brightness != Some(level) || !lit || mode_switch {
                        commands.push(Command::Brightness(level));
                        lit = true;
                    }
                }

                if !lit {
                    commands.push(Command::PowerOn);
                }
            }
            None => {}
        }
        commands
    }

    /// Commands that re-assert the whole state, regardless of history.
    #[must_use]
    pub fn sync_commands(&self) -> Vec<Command> {
        match self.power {
            Some(true) => {
                let mut commands = Vec::new();
                if let Some(color) = self.color {
                    commands.push(color_command(color));
                }
                if let Some(level) = self.brightness {
                    commands.push(Command::Brightness(level));
                }
                if commands.is_empty() {
                    commands.push(Command::PowerOn);
                }
                commands
            }
            Some(false) => vec![Command::PowerOff],
            None => Vec::new(),
        }
    }
}

fn color_command(color: Color) -> Command {
    color.code().map_or(Command::White, Command::Color)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ZoneSettings {
        ZoneSettings::default()
    }

    fn zone(power: bool, color: &str, brightness: i64) -> ZoneState {
        let mut state = ZoneState::default();
        state
            .apply(
                &settings()
                    .with_power(power)
                    .with_color(color)
                    .with_brightness(brightness),
            )
            .unwrap();
        state
    }

    #[test]
    fn should_start_unknown() {
        let state = ZoneState::default();
        assert_eq!(state.power(), None);
        assert_eq!(state.color(), None);
        assert_eq!(state.brightness(), None);
    }

    #[test]
    fn should_only_power_off_when_turning_off() {
        let mut state = zone(true, "red", 10);
        let commands = state
            .apply(&settings().with_power(false).with_brightness(20))
            .unwrap();
        assert_eq!(commands, vec![Command::PowerOff]);
        assert_eq!(state.brightness(), Some(20));
    }

    #[test]
    fn should_power_off_unknown_zone() {
        let mut state = ZoneState::default();
        let commands = state.apply(&settings().with_power(false)).unwrap();
        assert_eq!(commands, vec![Command::PowerOff]);
    }

    #[test]
    fn should_set_color_without_power_on_for_unknown_zone() {
        let mut state = ZoneState::default();
        let commands = state
            .apply(&settings().with_power(true).with_color("red"))
            .unwrap();
        assert_eq!(commands, vec![Command::Color(170)]);
    }

    #[test]
    fn should_not_touch_hardware_while_power_unknown() {
        let mut state = ZoneState::default();
        let commands = state.apply(&settings().with_color("red")).unwrap();
        assert!(commands.is_empty());
        assert_eq!(state.color_code(), Some(170));
    }

    #[test]
    fn should_power_on_when_nothing_else_implies_it() {
        let mut state = ZoneState::default();
        let commands = state.apply(&settings().with_power(true)).unwrap();
        assert_eq!(commands, vec![Command::PowerOn]);
    }

    #[test]
    fn should_emit_nothing_when_reapplying_same_settings() {
        let desired = settings()
            .with_power(true)
            .with_color("blue")
            .with_brightness(15);
        let mut state = ZoneState::default();
        assert!(!state.apply(&desired).unwrap().is_empty());
        assert!(state.apply(&desired).unwrap().is_empty());
    }

    #[test]
    fn should_resend_color_when_powering_back_on() {
        let mut state = zone(false, "blue", 15);
        let commands = state.apply(&settings().with_power(true)).unwrap();
        assert_eq!(commands, vec![Command::Color(0)]);
    }

    #[test]
    fn should_resend_brightness_when_powering_on_without_color() {
        let mut state = ZoneState::default();
        state
            .apply(&settings().with_power(false).with_brightness(8))
            .unwrap();
        let commands = state.apply(&settings().with_power(true)).unwrap();
        assert_eq!(commands, vec![Command::Brightness(8)]);
    }

    #[test]
    fn should_only_send_changed_brightness() {
        let mut state = zone(true, "blue", 15);
        let commands = state.apply(&settings().with_brightness(20)).unwrap();
        assert_eq!(commands, vec![Command::Brightness(20)]);
    }

    #[test]
    fn should_skip_color_with_identical_code() {
        let mut state = zone(true, "blue", 15);
        let commands = state.apply(&settings().with_color("#0000ff")).unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn should_resend_brightness_when_switching_to_white() {
        let mut state = zone(true, "blue", 15);
        let commands = state.apply(&settings().with_color("white")).unwrap();
        assert_eq!(commands, vec![Command::White, Command::Brightness(15)]);
    }

    #[test]
    fn should_skip_white_when_previous_color_was_unknown() {
        let mut state = ZoneState::default();
        state
            .apply(&settings().with_power(true).with_brightness(10))
            .unwrap();
        let commands = state.apply(&settings().with_color("white")).unwrap();
        assert!(commands.is_empty());
        assert_eq!(state.color().map(|color| color.to_string()).as_deref(), Some("#ffffff"));
    }

    #[test]
    fn should_resend_brightness_when_leaving_white() {
        let mut state = zone(true, "white", 15);
        let commands = state.apply(&settings().with_color("red")).unwrap();
        assert_eq!(commands, vec![Command::Color(170), Command::Brightness(15)]);
    }

    #[test]
    fn should_keep_hue_brightness_between_hues() {
        let mut state = zone(true, "blue", 15);
        let commands = state.apply(&settings().with_color("red")).unwrap();
        assert_eq!(commands, vec![Command::Color(170)]);
    }

    #[test]
    fn should_rollback_every_attribute_on_invalid_brightness() {
        let mut state = zone(true, "red", 10);
        let before = state;
        let err = state
            .apply(&settings().with_color("blue").with_brightness(999))
            .unwrap_err();
        assert_eq!(err, InvalidArgument::Brightness(999));
        assert_eq!(state, before);
        assert_eq!(state.brightness(), Some(10));
        assert_eq!(state.color().unwrap().to_string(), "#ff0000");
        assert_eq!(state.power(), Some(true));
    }

    #[test]
    fn should_rollback_on_black_color() {
        let mut state = zone(true, "red", 10);
        let before = state;
        let err = state
            .apply(&settings().with_brightness(12).with_color("black"))
            .unwrap_err();
        assert_eq!(err, InvalidArgument::BlackColor);
        assert_eq!(state, before);
        assert_eq!(state.color_code(), Some(170));
    }

    #[test]
    fn should_accept_every_brightness_in_range() {
        for level in 2..=27 {
            let mut state = ZoneState::default();
            state.apply(&settings().with_brightness(level)).unwrap();
            assert_eq!(state.brightness().map(i64::from), Some(level));
        }
    }

    #[test]
    fn should_sync_color_and_brightness_unconditionally() {
        let state = zone(true, "blue", 15);
        assert_eq!(
            state.sync_commands(),
            vec![Command::Color(0), Command::Brightness(15)]
        );
    }

    #[test]
    fn should_sync_plain_power_on_without_color_or_brightness() {
        let mut state = ZoneState::default();
        state.apply(&settings().with_power(true)).unwrap();
        assert_eq!(state.sync_commands(), vec![Command::PowerOn]);
    }

    #[test]
    fn should_sync_power_off() {
        let state = zone(false, "red", 3);
        assert_eq!(state.sync_commands(), vec![Command::PowerOff]);
    }

    #[test]
    fn should_not_sync_unknown_zone() {
        assert!(ZoneState::default().sync_commands().is_empty());
    }
}
