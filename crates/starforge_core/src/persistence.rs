//! Binary save format.
//!
//! Everything is encoded with bincode using varint integers, so small ids and
//! counters take a single byte. Structs are written in field declaration
//! order; reordering fields of a persisted type breaks old saves.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::context::GameContext;
use crate::error::{GameError, Result};
use crate::project::BuildProject;
use crate::slot::BuildSlot;

/// Save file format version for compatibility.
pub const SAVE_VERSION: u32 = 1;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
}

/// Encode any persisted value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    options()
        .serialize(value)
        .map_err(|e| GameError::Serialization(format!("encode failed: {e}")))
}

/// Decode a value written by [`encode`].
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    options()
        .deserialize(bytes)
        .map_err(|e| GameError::Serialization(format!("decode failed: {e}")))
}

impl BuildProject {
    /// Encode this project.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decode a project written by [`BuildProject::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

impl BuildSlot {
    /// Encode this slot, including its active project and queue.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self)
    }

    /// Decode a slot written by [`BuildSlot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes)
    }
}

#[derive(Serialize)]
struct SaveRef<'a> {
    version: u32,
    context: &'a GameContext,
}

#[derive(Deserialize)]
struct SaveOwned {
    version: u32,
    context: GameContext,
}

impl GameContext {
    /// Encode the whole context. Observers are not saved.
    pub fn save(&self) -> Result<Vec<u8>> {
        encode(&SaveRef {
            version: SAVE_VERSION,
            context: self,
        })
    }

    /// Restore a context written by [`GameContext::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or the save version differs.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let save: SaveOwned = decode(bytes)?;
        if save.version != SAVE_VERSION {
            return Err(GameError::InvalidState(format!(
                "Save version mismatch: expected {}, got {}",
                SAVE_VERSION, save.version
            )));
        }
        Ok(save.context)
    }
}
