use std::fmt;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    disk::DISK_SIZE,
    fs::config::{PlacementMode, FIRST_DATA_BLOCK_ID},
};

/// 空闲块的候选顺序
///
/// 链式和索引分配都从这里取得候选块号，然后线性扫描第一个空闲块。
pub enum Placement {
    Random(StdRng),
    Sequential,
}

impl Placement {
    pub fn from_mode(mode: PlacementMode) -> Self {
        match mode {
            PlacementMode::Random => Placement::Random(StdRng::from_entropy()),
            PlacementMode::Seeded(seed) => Placement::Random(StdRng::seed_from_u64(seed)),
            PlacementMode::Sequential => Placement::Sequential,
        }
    }

    /// 块 2..DISK_SIZE 的一次排列
    pub fn candidates(&mut self) -> Vec<usize> {
        let mut blocks: Vec<usize> = (FIRST_DATA_BLOCK_ID..DISK_SIZE).collect();
        if let Placement::Random(rng) = self {
            blocks.shuffle(rng);
        }
        blocks
    }
}

impl fmt::Debug for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Random(_) => f.write_str("Random"),
            Placement::Sequential => f.write_str("Sequential"),
        }
    }
}
