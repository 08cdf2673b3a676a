//! 三种磁盘空间分配方式：连续、链式、索引
//!
//! 所有方式共用一组辅助函数（查找空闲块、占用、释放、回滚），
//! 并且直接读写设备上唯一的位图，不再各自维护影子位图。

pub mod chained;
pub mod contiguous;
pub mod indexed;
pub mod placement;

use std::fmt;

use log::{debug, warn};

pub use placement::Placement;

use crate::{
    disk::{Block, BlockDevice, BLOCK_SIZE, ZERO_BLOCK},
    fs::{
        config::{Strategy, CHAIN_PAYLOAD_SIZE, MAX_FILE_SIZE},
        error::{FileSystemError, Result},
    },
};

/// 文件在磁盘上的位置，每种分配方式一种形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// 块 `[start, start + count)`
    Contiguous { start: usize, count: usize },
    /// 从 `head` 开始的单向链表
    Chained { head: usize },
    /// 索引块中按顺序记录了所有数据块
    Indexed { index_block: usize },
}

impl Locator {
    pub fn strategy(&self) -> Strategy {
        match self {
            Locator::Contiguous { .. } => Strategy::Contiguous,
            Locator::Chained { .. } => Strategy::Chained,
            Locator::Indexed { .. } => Strategy::Indexed,
        }
    }

    /// 按文件顺序列出数据块
    pub fn data_blocks<D: BlockDevice + ?Sized>(&self, disk: &D) -> Result<Vec<usize>> {
        match *self {
            Locator::Contiguous { start, count } => Ok((start..start + count).collect()),
            Locator::Chained { head } => chained::chain(disk, head),
            Locator::Indexed { index_block } => indexed::data_blocks(disk, index_block),
        }
    }

    /// 文件占用的全部块，包括索引块
    pub fn blocks<D: BlockDevice + ?Sized>(&self, disk: &D) -> Result<Vec<usize>> {
        let mut blocks = self.data_blocks(disk)?;
        if let Locator::Indexed { index_block } = *self {
            blocks.insert(0, index_block);
        }
        Ok(blocks)
    }

    /// 数据块个数
    pub fn length<D: BlockDevice + ?Sized>(&self, disk: &D) -> Result<usize> {
        match *self {
            Locator::Contiguous { count, .. } => Ok(count),
            _ => Ok(self.data_blocks(disk)?.len()),
        }
    }

    /// 按文件顺序读出每个数据块的有效载荷
    ///
    /// 链式块末尾 4 字节是指针，不属于载荷。
    pub fn payloads<D: BlockDevice + ?Sized>(&self, disk: &D) -> Result<Vec<Vec<u8>>> {
        let payload_size = match self {
            Locator::Chained { .. } => CHAIN_PAYLOAD_SIZE,
            _ => BLOCK_SIZE,
        };

        self.data_blocks(disk)?
            .into_iter()
            .map(|block_id| {
                let block = read(disk, block_id)?;
                Ok(block[..payload_size].to_vec())
            })
            .collect()
    }

    /// 释放文件占用的所有块：内容清零并在位图中标记为空闲
    ///
    /// 同一个 Locator 不能释放两次。
    pub fn free<D: BlockDevice + ?Sized>(&self, disk: &mut D) -> Result<()> {
        match *self {
            Locator::Contiguous { start, count } => contiguous::free(disk, start, count)?,
            Locator::Chained { head } => chained::free(disk, head)?,
            Locator::Indexed { index_block } => indexed::free(disk, index_block)?,
        }
        debug!("freed {}", self);
        Ok(())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Contiguous { start, count } => {
                write!(f, "contiguous(start={}, count={})", start, count)
            }
            Locator::Chained { head } => write!(f, "chained(head={})", head),
            Locator::Indexed { index_block } => write!(f, "indexed(index={})", index_block),
        }
    }
}

impl Strategy {
    /// 为一段数据分配块并写入磁盘
    ///
    /// 大小在分配前检查；任何失败都不会留下已占用的块。
    pub fn allocate<D: BlockDevice + ?Sized>(
        self,
        disk: &mut D,
        placement: &mut Placement,
        data: &[u8],
    ) -> Result<Locator> {
        if data.len() > MAX_FILE_SIZE {
            return Err(FileSystemError::FileTooLarge {
                size: data.len(),
                max: MAX_FILE_SIZE,
            });
        }

        let locator = match self {
            Strategy::Contiguous => contiguous::allocate(disk, data)?,
            Strategy::Chained => chained::allocate(disk, placement, data)?,
            Strategy::Indexed => indexed::allocate(disk, placement, data)?,
        };
        debug!("allocated {} bytes as {}", data.len(), locator);
        Ok(locator)
    }
}

/// 存放 `len` 字节需要的块数；空文件也占一块
pub(crate) fn blocks_needed(len: usize, payload_size: usize) -> usize {
    ((len + payload_size - 1) / payload_size).max(1)
}

/// 把数据切成若干块，最后一块补零
pub(crate) fn split_into_blocks(data: &[u8], payload_size: usize) -> Vec<Block> {
    (0..blocks_needed(data.len(), payload_size))
        .map(|i| {
            let mut block = ZERO_BLOCK;
            let start = i * payload_size;
            let end = (start + payload_size).min(data.len());
            block[..end - start].copy_from_slice(&data[start..end]);
            block
        })
        .collect()
}

pub(crate) fn read<D: BlockDevice + ?Sized>(disk: &D, block_id: usize) -> Result<Block> {
    let mut block = ZERO_BLOCK;
    disk.read_block(block_id, &mut block)?;
    Ok(block)
}

/// 按候选顺序找到第一个空闲块
pub(crate) fn find_free_block<D: BlockDevice + ?Sized>(
    disk: &D,
    placement: &mut Placement,
) -> Option<usize> {
    let bitmap = disk.bitmap();
    placement
        .candidates()
        .into_iter()
        .find(|&block_id| !bitmap.is_used(block_id))
}

// 写入内容并标记占用
pub(crate) fn claim<D: BlockDevice + ?Sized>(
    disk: &mut D,
    block_id: usize,
    data: &Block,
) -> Result<()> {
    disk.write_block(block_id, data)?;
    disk.set_used(block_id, true)
}

// 清零并标记空闲
pub(crate) fn release<D: BlockDevice + ?Sized>(disk: &mut D, block_id: usize) -> Result<()> {
    disk.write_block(block_id, &ZERO_BLOCK)?;
    disk.set_used(block_id, false)
}

/// 撤销本次分配中已经占用的块
pub(crate) fn rollback<D: BlockDevice + ?Sized>(disk: &mut D, claimed: &[usize]) {
    if claimed.is_empty() {
        return;
    }
    warn!("allocation failed, rolling back {} block(s)", claimed.len());
    for &block_id in claimed {
        if let Err(e) = release(disk, block_id) {
            warn!("rollback of block {} failed: {}", block_id, e);
        }
    }
}

/// 逐个取得 `count` 个空闲块并立即占用；空间不足时全部回滚
pub(crate) fn claim_free_blocks<D: BlockDevice + ?Sized>(
    disk: &mut D,
    placement: &mut Placement,
    count: usize,
) -> Result<Vec<usize>> {
    let mut claimed = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(block_id) = find_free_block(disk, placement) else {
            rollback(disk, &claimed);
            return Err(FileSystemError::InsufficientSpace { needed: count });
        };
        if let Err(e) = claim(disk, block_id, &ZERO_BLOCK) {
            rollback(disk, &claimed);
            return Err(e);
        }
        claimed.push(block_id);
    }

    Ok(claimed)
}
