use crate::{
    disk::{Block, BlockDevice, BLOCK_SIZE, DISK_SIZE},
    fs::{
        alloc::{claim_free_blocks, read, release, split_into_blocks, Locator, Placement},
        config::{CHAIN_END, CHAIN_PAYLOAD_SIZE, CHAIN_TRAILER_SIZE, FIRST_DATA_BLOCK_ID},
        error::{FileSystemError, Result},
    },
};

/// 读取块末尾 4 字节（大端）中的下一块指针
pub fn next_pointer(block: &Block) -> i32 {
    let mut raw = [0u8; CHAIN_TRAILER_SIZE];
    raw.copy_from_slice(&block[BLOCK_SIZE - CHAIN_TRAILER_SIZE..]);
    i32::from_be_bytes(raw)
}

pub fn set_next_pointer(block: &mut Block, next: i32) {
    block[BLOCK_SIZE - CHAIN_TRAILER_SIZE..].copy_from_slice(&next.to_be_bytes());
}

// -1 表示链尾，其余值必须指向数据区
fn decode_next(raw: i32, from: usize) -> Result<Option<usize>> {
    if raw == CHAIN_END {
        return Ok(None);
    }
    match usize::try_from(raw) {
        Ok(next) if (FIRST_DATA_BLOCK_ID..DISK_SIZE).contains(&next) => Ok(Some(next)),
        _ => Err(FileSystemError::Corrupted(format!(
            "block {} points to invalid block {}",
            from, raw
        ))),
    }
}

fn runaway(head: usize) -> FileSystemError {
    FileSystemError::Corrupted(format!("chain starting at block {} does not terminate", head))
}

/// 数据按 512 字节切块，每块末尾 4 字节被下一块指针覆盖
///
/// 被覆盖的数据字节不会再被读出，因此链式文件的导出是有损的。
pub fn allocate<D: BlockDevice + ?Sized>(
    disk: &mut D,
    placement: &mut Placement,
    data: &[u8],
) -> Result<Locator> {
    let mut chunks = split_into_blocks(data, BLOCK_SIZE);
    let blocks = claim_free_blocks(disk, placement, chunks.len())?;

    for (i, (&block_id, chunk)) in blocks.iter().zip(chunks.iter_mut()).enumerate() {
        let next = blocks.get(i + 1).map_or(CHAIN_END, |&next| next as i32);
        set_next_pointer(chunk, next);
        disk.write_block(block_id, chunk)?;
    }

    Ok(Locator::Chained { head: blocks[0] })
}

/// 从链头开始遍历，按顺序返回链上的所有块
pub fn chain<D: BlockDevice + ?Sized>(disk: &D, head: usize) -> Result<Vec<usize>> {
    let mut blocks = Vec::new();
    let mut current = Some(head);

    while let Some(block_id) = current {
        if blocks.len() >= DISK_SIZE {
            return Err(runaway(head));
        }
        let block = read(disk, block_id)?;
        blocks.push(block_id);
        current = decode_next(next_pointer(&block), block_id)?;
    }

    Ok(blocks)
}

/// 释放整条链
///
/// 先完整遍历一遍读出所有指针，链损坏时不释放任何块。
pub fn free<D: BlockDevice + ?Sized>(disk: &mut D, head: usize) -> Result<()> {
    for block_id in chain(disk, head)? {
        release(disk, block_id)?;
    }
    Ok(())
}
