use std::{collections::HashMap, path::PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::unit::DegreeCelsius;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub rooms: HashMap<String, PersistedRoomState>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PersistedRoomState {
    pub target_temperature: DegreeCelsius,
}

/// Stores the part of room state that must survive a restart. Written on
/// every target-temperature change, read once at startup.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> PersistedState {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return PersistedState::default(),
            Err(e) => {
                tracing::warn!("Error reading state file {:?}: {}", self.path, e);
                return PersistedState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("Error parsing state file {:?}, starting fresh: {}", self.path, e);
                PersistedState::default()
            }
        }
    }

    pub fn restored_target(&self, room: &str) -> Option<DegreeCelsius> {
        self.load().rooms.get(room).map(|r| r.target_temperature)
    }

    pub fn save_target(&self, room: &str, target: DegreeCelsius) -> anyhow::Result<()> {
        let mut state = self.load();
        state.rooms.insert(
            room.to_string(),
            PersistedRoomState {
                target_temperature: target,
            },
        );

        let content = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, content).with_context(|| format!("Error writing state file {:?}", self.path))
    }
}
