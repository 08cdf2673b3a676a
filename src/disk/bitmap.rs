use crate::disk::types::DISK_SIZE;

/// 块位图：每个 bit 表示一个块是否被占用（1 = 占用）
///
/// 字节内按高位在前排列，块 0 对应第 0 字节的最高位，
/// 与显示时“从左到右依次为块 0、1、2……”一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBitmap {
    bits: Vec<u8>,       // 位图数据
    total_blocks: usize, // 块总数
    free_blocks: usize,  // 当前空闲块数
}

impl BlockBitmap {
    // 创建一个全空闲的位图
    pub fn new(total_blocks: usize) -> Self {
        let byte_len = (total_blocks + 7) / 8;

        Self {
            bits: vec![0; byte_len],
            total_blocks,
            free_blocks: total_blocks,
        }
    }

    fn locate(block_index: usize) -> (usize, u8) {
        (block_index / 8, 0x80 >> (block_index % 8))
    }

    /// 设置某个块的状态，返回状态是否真的发生了变化
    ///
    /// 调用方负责保证 `block_index < total_blocks`。
    pub fn set(&mut self, block_index: usize, used: bool) -> bool {
        let (byte_index, mask) = Self::locate(block_index);
        let was_used = self.bits[byte_index] & mask != 0;

        match (was_used, used) {
            (false, true) => {
                self.bits[byte_index] |= mask;
                self.free_blocks -= 1;
                true
            }
            (true, false) => {
                self.bits[byte_index] &= !mask;
                self.free_blocks += 1;
                true
            }
            _ => false,
        }
    }

    pub fn is_used(&self, block_index: usize) -> bool {
        let (byte_index, mask) = Self::locate(block_index);
        self.bits[byte_index] & mask != 0
    }

    pub fn total_blocks(&self) -> usize {
        self.total_blocks
    }

    pub fn free_blocks(&self) -> usize {
        self.free_blocks
    }

    pub fn used_blocks(&self) -> usize {
        self.total_blocks - self.free_blocks
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    // 展开成逐块的布尔数组，便于显示
    pub fn snapshot(&self) -> Vec<bool> {
        (0..self.total_blocks).map(|i| self.is_used(i)).collect()
    }
}

impl Default for BlockBitmap {
    fn default() -> Self {
        Self::new(DISK_SIZE)
    }
}
