//! Wire format of the RGBW bridge.
//!
//! Every command is one datagram of three bytes: opcode, operand, and the
//! fixed terminator `0x55`. Zone-addressed opcodes start at a base for zone 1
//! and step by two per zone; the "all zones" variant has its own opcode.
//! Color and brightness opcodes carry no zone: they act on the zone selected
//! by the last power-on datagram.

use lumen_domain::command::ZoneId;

/// Last byte of every datagram.
pub const TERMINATOR: u8 = 0x55;

pub type Datagram = [u8; 3];

const ALL_ON: u8 = 0x42;
const ZONE_ON: u8 = 0x45;
const ALL_OFF: u8 = 0x41;
const ZONE_OFF: u8 = 0x46;
const ALL_WHITE: u8 = 0xC2;
const ZONE_WHITE: u8 = 0xC5;
const COLOR: u8 = 0x40;
const BRIGHTNESS: u8 = 0x4E;

fn addressed(zone: ZoneId, all: u8, first: u8) -> u8 {
    if zone.is_all() {
        all
    } else {
        first + (zone.index() - 1) * 2
    }
}

/// Power the zone on. Also selects it for the following color or
/// brightness datagram.
#[must_use]
pub fn power_on(zone: ZoneId) -> Datagram {
    [addressed(zone, ALL_ON, ZONE_ON), 0x00, TERMINATOR]
}

#[must_use]
pub fn power_off(zone: ZoneId) -> Datagram {
    [addressed(zone, ALL_OFF, ZONE_OFF), 0x00, TERMINATOR]
}

/// Switch the zone to its white LEDs.
#[must_use]
pub fn white(zone: ZoneId) -> Datagram {
    [addressed(zone, ALL_WHITE, ZONE_WHITE), 0x00, TERMINATOR]
}

/// Set the hue of the selected zone.
#[must_use]
pub fn color(code: u8) -> Datagram {
    [COLOR, code, TERMINATOR]
}

/// Set the brightness of the selected zone. The bridge expects `2..=27`.
#[must_use]
pub fn brightness(level: u8) -> Datagram {
    [BRIGHTNESS, level, TERMINATOR]
}
