use crate::{
    disk::{Block, BlockDevice, BLOCK_SIZE, DISK_SIZE, ZERO_BLOCK},
    fs::{
        alloc::{claim_free_blocks, read, release, split_into_blocks, Locator, Placement},
        config::{FIRST_DATA_BLOCK_ID, INDEX_CAPACITY, INDEX_END, INDEX_ENTRY_SIZE},
        error::{FileSystemError, Result},
    },
};

/// 把数据块号按顺序编码为大端 4 字节整数，剩余部分补零
pub fn encode_index(data_blocks: &[usize]) -> Block {
    debug_assert!(data_blocks.len() <= INDEX_CAPACITY);

    let mut block = ZERO_BLOCK;
    for (entry, &block_id) in block
        .chunks_exact_mut(INDEX_ENTRY_SIZE)
        .zip(data_blocks)
    {
        entry.copy_from_slice(&(block_id as i32).to_be_bytes());
    }
    block
}

/// 解码索引块，遇到 0 结束
pub fn decode_index(block: &Block, index_block: usize) -> Result<Vec<usize>> {
    let mut data_blocks = Vec::new();

    for entry in block.chunks_exact(INDEX_ENTRY_SIZE) {
        let raw = i32::from_be_bytes([entry[0], entry[1], entry[2], entry[3]]);
        if raw == INDEX_END {
            break;
        }
        match usize::try_from(raw) {
            Ok(block_id) if (FIRST_DATA_BLOCK_ID..DISK_SIZE).contains(&block_id) => {
                data_blocks.push(block_id)
            }
            _ => {
                return Err(FileSystemError::Corrupted(format!(
                    "index block {} holds invalid pointer {}",
                    index_block, raw
                )))
            }
        }
    }

    Ok(data_blocks)
}

/// 先取一个索引块，再为每段数据各取一块
pub fn allocate<D: BlockDevice + ?Sized>(
    disk: &mut D,
    placement: &mut Placement,
    data: &[u8],
) -> Result<Locator> {
    let chunks = split_into_blocks(data, BLOCK_SIZE);
    let blocks = claim_free_blocks(disk, placement, chunks.len() + 1)?;
    let (index_block, data_blocks) = (blocks[0], &blocks[1..]);

    for (&block_id, chunk) in data_blocks.iter().zip(&chunks) {
        disk.write_block(block_id, chunk)?;
    }
    disk.write_block(index_block, &encode_index(data_blocks))?;

    Ok(Locator::Indexed { index_block })
}

pub fn data_blocks<D: BlockDevice + ?Sized>(disk: &D, index_block: usize) -> Result<Vec<usize>> {
    decode_index(&read(disk, index_block)?, index_block)
}

/// 先释放索引块记录的所有数据块，最后释放索引块本身
pub fn free<D: BlockDevice + ?Sized>(disk: &mut D, index_block: usize) -> Result<()> {
    for block_id in data_blocks(disk, index_block)? {
        release(disk, block_id)?;
    }
    release(disk, index_block)
}
