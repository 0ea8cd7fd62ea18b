//! Structural command validation
//!
//! Runs before any state is touched. A command that fails here mutates
//! nothing and emits nothing.

use zonecast_state::TopologyStore;

use crate::command::{ClientOperation, Command, CommandTarget, ZoneOperation};
use crate::error::{CommandError, Result};

/// Latency payloads beyond this window are rejected as nonsense
const LATENCY_LIMIT_MS: i32 = 10_000;

/// Validate a command against value ranges and the configured topology
pub fn command(cmd: &Command, store: &TopologyStore) -> Result<()> {
    match &cmd.target {
        CommandTarget::Zone { zone, op } => {
            if store.zone(zone).is_none() {
                return Err(CommandError::UnknownZone(*zone));
            }
            zone_operation(op)
        }
        CommandTarget::Client { client, op } => {
            if store.client(client).is_none() {
                return Err(CommandError::UnknownClient(*client));
            }
            client_operation(op, store)
        }
    }
}

fn zone_operation(op: &ZoneOperation) -> Result<()> {
    match op {
        ZoneOperation::SetVolume { volume } => volume_in_range(*volume),
        ZoneOperation::VolumeUp { step } | ZoneOperation::VolumeDown { step } => step_in_range(*step),
        _ => Ok(()),
    }
}

fn client_operation(op: &ClientOperation, store: &TopologyStore) -> Result<()> {
    match op {
        ClientOperation::SetVolume { volume } => volume_in_range(*volume),
        ClientOperation::VolumeUp { step } | ClientOperation::VolumeDown { step } => {
            step_in_range(*step)
        }
        ClientOperation::SetLatency { latency_ms } => {
            if latency_ms.abs() > LATENCY_LIMIT_MS {
                Err(CommandError::InvalidLatency(*latency_ms))
            } else {
                Ok(())
            }
        }
        ClientOperation::AssignZone { zone } => {
            if store.zone(zone).is_none() {
                Err(CommandError::UnknownZone(*zone))
            } else {
                Ok(())
            }
        }
        _ => Ok(()),
    }
}

fn volume_in_range(volume: u8) -> Result<()> {
    if volume > 100 {
        Err(CommandError::InvalidVolume(volume))
    } else {
        Ok(())
    }
}

fn step_in_range(step: u8) -> Result<()> {
    if step == 0 || step > 100 {
        Err(CommandError::InvalidStep(step))
    } else {
        Ok(())
    }
}
