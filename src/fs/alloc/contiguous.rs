use crate::{
    disk::{BlockBitmap, BlockDevice, BLOCK_SIZE, DISK_SIZE},
    fs::{
        alloc::{claim, release, rollback, split_into_blocks, Locator},
        config::FIRST_DATA_BLOCK_ID,
        error::{FileSystemError, Result},
    },
};

/// 首次适配：从块 0 开始升序查找第一段足够长的连续空闲块
///
/// 保留块在位图中始终为占用，因此不会被选中。
pub fn find_run(bitmap: &BlockBitmap, required: usize) -> Option<usize> {
    let total = bitmap.total_blocks();
    if required == 0 || required > total {
        return None;
    }

    let mut start = 0;
    while start + required <= total {
        match (start..start + required).find(|&b| bitmap.is_used(b)) {
            // 跳过占用块之前的所有起点
            Some(used) => start = used + 1,
            None => return Some(start),
        }
    }
    None
}

pub fn allocate<D: BlockDevice + ?Sized>(disk: &mut D, data: &[u8]) -> Result<Locator> {
    let blocks = split_into_blocks(data, BLOCK_SIZE);
    let count = blocks.len();
    let start = find_run(disk.bitmap(), count)
        .ok_or(FileSystemError::InsufficientSpace { needed: count })?;

    for (i, block) in blocks.iter().enumerate() {
        if let Err(e) = claim(disk, start + i, block) {
            rollback(disk, &(start..start + i).collect::<Vec<_>>());
            return Err(e);
        }
    }

    Ok(Locator::Contiguous { start, count })
}

pub fn free<D: BlockDevice + ?Sized>(disk: &mut D, start: usize, count: usize) -> Result<()> {
    if start < FIRST_DATA_BLOCK_ID || start + count > DISK_SIZE {
        return Err(FileSystemError::Corrupted(format!(
            "contiguous range {}..{} is outside the data area",
            start,
            start + count
        )));
    }

    for block_id in start..start + count {
        release(disk, block_id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{MemDisk, ZERO_BLOCK};

    #[test]
    fn first_fit_starts_after_reserved_blocks() {
        let mut disk = MemDisk::new();
        let locator = allocate(&mut disk, &vec![b'a'; 3 * BLOCK_SIZE]).unwrap();
        assert_eq!(locator, Locator::Contiguous { start: 2, count: 3 });
        for block_id in 2..5 {
            assert!(disk.is_used(block_id).unwrap());
        }
        assert!(!disk.is_used(5).unwrap());
    }

    #[test]
    fn find_run_skips_holes_that_are_too_small() {
        let mut bitmap = BlockBitmap::new(16);
        for b in [0, 1, 4, 8] {
            bitmap.set(b, true);
        }
        // 2..4 只有两个空闲块，5..8 有三个
        assert_eq!(find_run(&bitmap, 2), Some(2));
        assert_eq!(find_run(&bitmap, 3), Some(5));
        assert_eq!(find_run(&bitmap, 7), Some(9));
        assert_eq!(find_run(&bitmap, 8), None);
        assert_eq!(find_run(&bitmap, 0), None);
    }

    #[test]
    fn freed_range_is_reused() {
        let mut disk = MemDisk::new();
        let data = vec![b'q'; 3 * BLOCK_SIZE];
        let first = allocate(&mut disk, &data).unwrap();
        let second = allocate(&mut disk, b"tail").unwrap();
        assert_eq!(second, Locator::Contiguous { start: 5, count: 1 });

        free(&mut disk, 2, 3).unwrap();
        let mut buf = [0xFF; BLOCK_SIZE];
        disk.read_block(3, &mut buf).unwrap();
        assert_eq!(buf, ZERO_BLOCK);

        let again = allocate(&mut disk, &data).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn no_run_long_enough_leaves_disk_untouched() {
        let mut disk = MemDisk::new();
        // 每隔一块占用一块，最长空闲段为 1
        for block_id in (2..DISK_SIZE).step_by(2) {
            disk.set_used(block_id, true).unwrap();
        }
        let before = disk.bitmap().clone();

        let err = allocate(&mut disk, &vec![b'z'; 2 * BLOCK_SIZE]).unwrap_err();
        assert!(matches!(err, FileSystemError::InsufficientSpace { needed: 2 }));
        assert_eq!(disk.bitmap(), &before);
    }

    #[test]
    fn free_rejects_reserved_range() {
        let mut disk = MemDisk::new();
        assert!(matches!(
            free(&mut disk, 0, 2),
            Err(FileSystemError::Corrupted(_))
        ));
        assert!(disk.is_used(0).unwrap());
    }
}
