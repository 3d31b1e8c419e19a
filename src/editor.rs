//! Level editor model
//!
//! Blocks snap to a grid of block-sized cells covering the upper half of the
//! playfield. The host draws the grid and forwards pointer presses here.

use glam::Vec2;

use crate::Bounds;
use crate::config::{BlockConfig, Point};
use crate::consts::MAX_BLOCK_HP;
use crate::error::LevelError;
use crate::level::{Level, LevelBlock};
use crate::sim::BlockHp;

#[derive(Debug, Clone)]
pub struct LevelEditor {
    cell: Vec2,
    columns: u32,
    rows: u32,
    /// Upper edge of the area blocks may not enter
    limit_y: f32,
    /// Hit points given to the next placed block
    pub hp: BlockHp,
    /// Placed blocks, oldest first
    pub blocks: Vec<LevelBlock>,
}

impl LevelEditor {
    pub fn new(config: &BlockConfig, bounds: Bounds) -> Self {
        let limit_y = bounds.height / 2.0;
        Self {
            cell: Vec2::new(config.width, config.height),
            columns: (bounds.width / config.width).floor() as u32,
            rows: (limit_y / config.height).floor() as u32,
            limit_y,
            hp: BlockHp::Hits(1),
            blocks: Vec::new(),
        }
    }

    /// Grid size in cells (columns, rows)
    pub fn grid(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    /// Cell a press at the pointer would fill. `None` in the lower half.
    fn snap(&self, x: f32, y: f32) -> Option<Point> {
        let top_left = Vec2::new(x, y) - self.cell / 2.0;
        if top_left.y >= self.limit_y || self.columns == 0 || self.rows == 0 {
            return None;
        }
        let col = ((top_left.x / self.cell.x).floor().max(0.0) as u32).min(self.columns - 1);
        let row = ((top_left.y / self.cell.y).floor().max(0.0) as u32).min(self.rows - 1);
        Some(self.cell_origin(col, row))
    }

    fn cell_origin(&self, col: u32, row: u32) -> Point {
        Point {
            x: col as f32 * self.cell.x,
            y: row as f32 * self.cell.y,
        }
    }

    fn is_occupied(&self, position: Point) -> bool {
        self.blocks.iter().any(|b| b.position == position)
    }

    /// Hover feedback: the cell a press would fill and whether it is free.
    /// `None` where a press is ignored.
    pub fn preview(&self, x: f32, y: f32) -> Option<(Point, bool)> {
        self.snap(x, y).map(|cell| (cell, !self.is_occupied(cell)))
    }

    /// Place a block centered on the pointer, snapped to the grid. Presses in
    /// the lower half are ignored. A block already in that cell is replaced.
    pub fn place(&mut self, x: f32, y: f32) -> Option<LevelBlock> {
        let position = self.snap(x, y)?;
        self.blocks.retain(|b| b.position != position);
        let block = LevelBlock {
            position,
            hp: self.hp,
            power_up: true,
        };
        self.blocks.push(block);
        log::debug!("Placed {:?} block at ({}, {})", block.hp, position.x, position.y);
        Some(block)
    }

    /// Replace the placed blocks with `level`, each moved to its nearest cell.
    /// Blocks outside the grid are dropped; a later block wins a shared cell.
    /// Returns how many blocks were kept.
    pub fn load(&mut self, level: &Level) -> usize {
        self.blocks.clear();
        let mut dropped = 0;
        for block in &level.blocks {
            let col = (block.position.x / self.cell.x).round().max(0.0) as u32;
            let row = (block.position.y / self.cell.y).round().max(0.0) as u32;
            if col >= self.columns || row >= self.rows {
                dropped += 1;
                continue;
            }
            let position = self.cell_origin(col, row);
            self.blocks.retain(|b| b.position != position);
            self.blocks.push(LevelBlock { position, ..*block });
        }
        if dropped > 0 {
            log::warn!("{dropped} block(s) fall outside the editor grid and were dropped");
        }
        log::info!("Editing level with {} block(s)", self.blocks.len());
        self.blocks.len()
    }

    /// Number keys: 1-5 select hit points, 6 selects Unbreakable
    pub fn select_hp(&mut self, digit: u8) -> bool {
        self.hp = match digit {
            1..=MAX_BLOCK_HP => BlockHp::Hits(digit),
            6 => BlockHp::Unbreakable,
            _ => return false,
        };
        true
    }

    /// 1 -> 2 -> ... -> 5 -> Unbreakable -> 1
    pub fn cycle_hp(&mut self) -> BlockHp {
        self.hp = match self.hp {
            BlockHp::Hits(n) if n < MAX_BLOCK_HP => BlockHp::Hits(n + 1),
            BlockHp::Hits(_) => BlockHp::Unbreakable,
            BlockHp::Unbreakable => BlockHp::Hits(1),
        };
        self.hp
    }

    pub fn undo(&mut self) -> Option<LevelBlock> {
        self.blocks.pop()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn to_level(&self) -> Level {
        Level {
            blocks: self.blocks.clone(),
        }
    }

    /// Level file contents for the placed blocks
    pub fn to_json(&self) -> Result<String, LevelError> {
        if self.blocks.is_empty() {
            return Err(LevelError::NoBlocks);
        }
        self.to_level().to_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn editor() -> LevelEditor {
        LevelEditor::new(&test_config().block, Bounds::new(800.0, 600.0))
    }

    #[test]
    fn test_grid_covers_upper_half() {
        assert_eq!(editor().grid(), (10, 10));
    }

    #[test]
    fn test_place_snaps_centered_on_pointer() {
        let mut ed = editor();
        // 130 - 40 = 90 -> column 1, 100 - 15 = 85 -> row 2
        let block = ed.place(130.0, 100.0).unwrap();
        assert_eq!(block.position, Point { x: 80.0, y: 60.0 });
        assert_eq!(block.hp, BlockHp::Hits(1));
    }

    #[test]
    fn test_place_rejects_lower_half_and_clamps_edges() {
        let mut ed = editor();
        assert!(ed.place(400.0, 500.0).is_none());
        let corner = ed.place(5.0, 5.0).unwrap();
        assert_eq!(corner.position, Point { x: 0.0, y: 0.0 });
        let right = ed.place(799.0, 20.0).unwrap();
        assert_eq!(right.position.x, 720.0);
    }

    #[test]
    fn test_same_cell_is_replaced() {
        let mut ed = editor();
        ed.place(40.0, 15.0);
        ed.select_hp(4);
        ed.place(45.0, 20.0);
        assert_eq!(ed.blocks.len(), 1);
        assert_eq!(ed.blocks[0].hp, BlockHp::Hits(4));
    }

    #[test]
    fn test_hp_selection() {
        let mut ed = editor();
        assert!(ed.select_hp(6));
        assert_eq!(ed.hp, BlockHp::Unbreakable);
        assert!(!ed.select_hp(0));
        assert!(!ed.select_hp(7));
        assert_eq!(ed.hp, BlockHp::Unbreakable);

        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(ed.cycle_hp());
        }
        assert_eq!(seen[0], BlockHp::Hits(1));
        assert_eq!(seen[4], BlockHp::Hits(5));
        assert_eq!(seen[5], BlockHp::Unbreakable);
    }

    #[test]
    fn test_undo_clear_and_export() {
        let mut ed = editor();
        assert!(matches!(ed.to_json(), Err(LevelError::NoBlocks)));
        ed.place(40.0, 15.0);
        ed.place(120.0, 15.0);
        assert_eq!(ed.undo().map(|b| b.position.x), Some(80.0));

        let json = ed.to_json().unwrap();
        let level = Level::from_json(&json).unwrap();
        assert_eq!(level.blocks, ed.blocks);

        ed.clear();
        assert!(ed.blocks.is_empty());
        assert!(ed.undo().is_none());
    }

    #[test]
    fn test_preview_marks_free_and_taken_cells() {
        let mut ed = editor();
        assert_eq!(ed.preview(130.0, 100.0), Some((Point { x: 80.0, y: 60.0 }, true)));
        ed.place(130.0, 100.0);
        assert_eq!(ed.preview(125.0, 95.0), Some((Point { x: 80.0, y: 60.0 }, false)));
        assert_eq!(ed.preview(400.0, 500.0), None);
    }

    #[test]
    fn test_load_snaps_to_cells() {
        let level = Level::from_json(
            r#"[{ "block": [
                { "position": { "x": 2, "y": 2 }, "hp": 2 },
                { "position": { "x": 158, "y": 61 }, "hp": "Unbreakable", "powerUp": false },
                { "position": { "x": 160, "y": 60 }, "hp": 4 },
                { "position": { "x": 0, "y": 450 }, "hp": 1 }
            ] }]"#,
        )
        .unwrap();

        let mut ed = editor();
        ed.place(400.0, 100.0);
        assert_eq!(ed.load(&level), 2);
        assert_eq!(ed.blocks[0].position, Point { x: 0.0, y: 0.0 });
        assert_eq!(ed.blocks[0].hp, BlockHp::Hits(2));
        assert_eq!(ed.blocks[1].position, Point { x: 160.0, y: 60.0 });
        assert_eq!(ed.blocks[1].hp, BlockHp::Hits(4));
        assert!(ed.blocks[1].power_up);
    }
}
