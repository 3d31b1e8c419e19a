//! Level file format
//!
//! A level is a JSON array holding one object whose `block` key lists the
//! blocks in layout order:
//!
//! ```json
//! [{ "block": [{ "position": { "x": 0, "y": 0 }, "hp": 2 },
//!              { "position": { "x": 80, "y": 0 }, "hp": "Unbreakable" }] }]
//! ```
//!
//! Block size and stroke come from the game config, not the level.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{BlockConfig, Point};
use crate::error::LevelError;
use crate::sim::{Block, BlockHp};

fn default_power_up() -> bool {
    true
}

/// One block as stored in a level file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBlock {
    /// Top-left corner
    pub position: Point,
    pub hp: BlockHp,
    /// May drop a power-up when destroyed
    #[serde(default = "default_power_up")]
    pub power_up: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct LevelSection {
    block: Vec<LevelBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Level {
    pub blocks: Vec<LevelBlock>,
}

impl Level {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let sections: Vec<LevelSection> = serde_json::from_str(json)?;
        let section = sections.into_iter().next().ok_or(LevelError::MissingSection)?;
        if section.block.is_empty() {
            return Err(LevelError::NoBlocks);
        }
        Ok(Self {
            blocks: section.block,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        log::debug!("Read {} blocks from {}", level.blocks.len(), path.display());
        Ok(level)
    }

    /// Same layout as the files this reads
    pub fn to_json(&self) -> Result<String, LevelError> {
        let sections = [LevelSection {
            block: self.blocks.clone(),
        }];
        Ok(serde_json::to_string_pretty(&sections)?)
    }

    /// Runtime blocks sized from the block config
    pub fn build_blocks(&self, config: &BlockConfig) -> Vec<Block> {
        self.blocks
            .iter()
            .map(|b| {
                Block::new(
                    b.position.into(),
                    config.width,
                    config.height,
                    config.line_width,
                    b.hp,
                )
                .with_power_up(b.power_up)
            })
            .collect()
    }
}
