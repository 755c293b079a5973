//! The four zones of one bridge, plus the "all zones" pseudo-zone.
//!
//! Zone `0` has no state of its own: reading it collapses the four individual
//! zones (a value is reported only when all four agree) and writing it fans
//! the same settings out to every individual zone.

use crate::command::{Command, ZoneCommand, ZoneId};
use crate::error::InvalidArgument;
use crate::settings::ZoneSettings;
use crate::zone::ZoneState;

const SLOTS: usize = 4;

/// Desired state of every zone behind one bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeZones {
    zones: [ZoneState; SLOTS],
}

impl BridgeZones {
    /// State of a zone; for [`ZoneId::ALL`] the collapsed aggregate.
    #[must_use]
    pub fn state(&self, zone: ZoneId) -> ZoneState {
        if zone.is_all() {
            self.aggregate()
        } else {
            self.zones[slot(zone)]
        }
    }

    /// Collapse the individual zones: each attribute is known only when all
    /// four zones hold the same value.
    #[must_use]
    pub fn aggregate(&self) -> ZoneState {
        ZoneState {
            power: uniform(self.zones.iter().map(ZoneState::power)).flatten(),
            color: uniform(self.zones.iter().map(ZoneState::color)).flatten(),
            brightness: uniform(self.zones.iter().map(ZoneState::brightness)).flatten(),
        }
    }

    /// Apply settings to one zone and return the commands to send, in order.
    ///
    /// Writing [`ZoneId::ALL`] validates the settings against all four zones
    /// before committing any of them, then diffs each zone against its own
    /// previous state. Zones that already match emit nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when a value is rejected; no zone is
    /// modified in that case.
    pub fn apply(
        &mut self,
        zone: ZoneId,
        settings: &ZoneSettings,
    ) -> Result<Vec<ZoneCommand>, InvalidArgument> {
        if !zone.is_all() {
            let commands = self.zones[slot(zone)].apply(settings)?;
            return Ok(addressed(zone, commands).collect());
        }

        let mut next = self.zones;
        for state in &mut next {
            *state = state.merged(settings)?;
        }
        let commands = ZoneId::individual()
            .zip(self.zones.iter().zip(next.iter()))
            .flat_map(|(id, (old, new))| addressed(id, ZoneState::transition(old, new)))
            .collect();
        self.zones = next;
        Ok(commands)
    }

    /// Commands re-asserting every individual zone. The aggregate is left out:
    /// it would only repeat what the four zones already send.
    #[must_use]
    pub fn sync_commands(&self) -> Vec<ZoneCommand> {
        ZoneId::individual()
            .flat_map(|id| addressed(id, self.zones[slot(id)].sync_commands()))
            .collect()
    }
}

fn slot(zone: ZoneId) -> usize {
    usize::from(zone.index()) - 1
}

fn addressed(zone: ZoneId, commands: Vec<Command>) -> impl Iterator<Item = ZoneCommand> {
    commands
        .into_iter()
        .map(move |command| ZoneCommand::new(zone, command))
}

fn uniform<T: PartialEq>(mut values: impl Iterator<Item = T>) -> Option<T> {
    let first = values.next()?;
    values.all(|value| value == first).then_some(first)
}
