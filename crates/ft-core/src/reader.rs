//! Reader for timewarrior extension input.
//!
//! The input is the configuration section, a blank line, and a JSON array of
//! entries. See <https://timewarrior.net/docs/api/#input-format>.

use std::io::{self, BufRead, Read};

use thiserror::Error;

use crate::config::{self, Config, ConfigError};
use crate::entry::Entries;

/// Errors from reading extension input.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// The configuration section was already read.
    #[error("config section already consumed")]
    ConfigConsumed,

    /// Entries were requested before the configuration section.
    #[error("config section not read yet")]
    ConfigNotConsumed,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("read entries: {0}")]
    Io(#[from] io::Error),

    #[error("decode json: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reads the two sections of extension input in order.
///
/// Call [`Reader::read_config`] first, then [`Reader::read_entries`].
#[derive(Debug)]
pub struct Reader<R> {
    reader: R,
    config_read: bool,
}

impl<R: BufRead> Reader<R> {
    /// Wraps the input without reading from it yet.
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            config_read: false,
        }
    }

    /// Reads the configuration section. Only allowed once.
    pub fn read_config(&mut self) -> Result<Config, ReaderError> {
        if self.config_read {
            return Err(ReaderError::ConfigConsumed);
        }
        self.config_read = true;

        Ok(config::read_config(&mut self.reader)?)
    }

    /// Reads the JSON entry list following the configuration section.
    pub fn read_entries(&mut self) -> Result<Entries, ReaderError> {
        if !self.config_read {
            return Err(ReaderError::ConfigNotConsumed);
        }

        read_entries(&mut self.reader)
    }
}

/// Decodes a JSON array of entries. Missing or blank input yields no entries.
pub fn read_entries<R: Read>(reader: &mut R) -> Result<Entries, ReaderError> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;
    if data.trim().is_empty() {
        return Ok(Entries::default());
    }

    Ok(serde_json::from_str(&data)?)
}
