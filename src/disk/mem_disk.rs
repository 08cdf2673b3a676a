use log::trace;

use crate::{
    disk::{
        bitmap::BlockBitmap,
        block_device::BlockDevice,
        types::{Block, BLOCK_SIZE, DISK_SIZE, ZERO_BLOCK},
    },
    fs::{
        config::RESERVED_BLOCKS,
        error::{FileSystemError, Result},
    },
};

/// 内存中的模拟磁盘：固定数量的块 + 一张权威位图
///
/// 状态只存在于进程内，每次运行重新初始化。
#[derive(Debug, Clone)]
pub struct MemDisk {
    blocks: Vec<Block>,
    bitmap: BlockBitmap,
}

impl MemDisk {
    pub fn new() -> Self {
        let mut bitmap = BlockBitmap::new(DISK_SIZE);
        // 块 0（FAT）和块 1（位图）永久保留
        for block_id in 0..RESERVED_BLOCKS {
            bitmap.set(block_id, true);
        }

        Self {
            blocks: vec![ZERO_BLOCK; DISK_SIZE],
            bitmap,
        }
    }

    fn check(block_id: usize) -> Result<()> {
        if block_id >= DISK_SIZE {
            return Err(FileSystemError::OutOfRange(block_id));
        }
        Ok(())
    }
}

impl Default for MemDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDevice for MemDisk {
    fn read_block(&self, block_id: usize, buf: &mut Block) -> Result<()> {
        Self::check(block_id)?;
        buf.copy_from_slice(&self.blocks[block_id]);
        Ok(())
    }

    fn write_block(&mut self, block_id: usize, buf: &Block) -> Result<()> {
        Self::check(block_id)?;
        trace!("write block {} ({} bytes)", block_id, BLOCK_SIZE);
        self.blocks[block_id].copy_from_slice(buf);
        Ok(())
    }

    fn set_used(&mut self, block_id: usize, used: bool) -> Result<()> {
        Self::check(block_id)?;
        if self.bitmap.set(block_id, used) {
            trace!("block {} marked {}", block_id, if used { "used" } else { "free" });
        }
        Ok(())
    }

    fn is_used(&self, block_id: usize) -> Result<bool> {
        Self::check(block_id)?;
        Ok(self.bitmap.is_used(block_id))
    }

    fn bitmap(&self) -> &BlockBitmap {
        &self.bitmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_disk_reserves_first_two_blocks() {
        let disk = MemDisk::new();
        assert!(disk.is_used(0).unwrap());
        assert!(disk.is_used(1).unwrap());
        assert!(!disk.is_used(2).unwrap());
        assert_eq!(disk.free_count(), DISK_SIZE - 2);
    }

    #[test]
    fn unwritten_blocks_read_as_zero() {
        let disk = MemDisk::new();
        let mut buf = [0xAA; BLOCK_SIZE];
        disk.read_block(200, &mut buf).unwrap();
        assert_eq!(buf, ZERO_BLOCK);
    }

    #[test]
    fn write_only_touches_the_addressed_block() {
        let mut disk = MemDisk::new();
        let data = [7u8; BLOCK_SIZE];
        disk.write_block(5, &data).unwrap();

        let mut buf = ZERO_BLOCK;
        disk.read_block(5, &mut buf).unwrap();
        assert_eq!(buf, data);
        disk.read_block(6, &mut buf).unwrap();
        assert_eq!(buf, ZERO_BLOCK);
        assert!(!disk.is_used(5).unwrap());
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut disk = MemDisk::new();
        let mut buf = ZERO_BLOCK;
        assert!(matches!(
            disk.read_block(DISK_SIZE, &mut buf),
            Err(FileSystemError::OutOfRange(DISK_SIZE))
        ));
        assert!(matches!(
            disk.write_block(999, &buf),
            Err(FileSystemError::OutOfRange(999))
        ));
        assert!(matches!(
            disk.set_used(DISK_SIZE, true),
            Err(FileSystemError::OutOfRange(_))
        ));
        assert_eq!(disk.free_count(), DISK_SIZE - 2);
    }
}
