use std::{fmt, path::Path};

use log::{debug, info};

use crate::{
    disk::{BlockDevice, MemDisk, BLOCK_SIZE, DISK_SIZE},
    fs::{
        alloc::{indexed::decode_index, read, Locator, Placement},
        config::{FsConfig, Strategy, BITMAP_BLOCK_ID, FAT_BLOCK_ID, RESERVED_BLOCKS},
        error::{FileSystemError, Result},
        fat::{FatEntry, FileTable},
        view::{BitmapView, BlockView},
    },
    utils::{printable_text, trim_trailing_non_text},
};

pub mod alloc;
pub mod config;
pub mod error;
pub mod fat;
pub mod view;

/// 磁盘使用情况
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub total_blocks: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
}

impl fmt::Display for DiskUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} blocks total, {} used, {} free ({} bytes free)",
            self.total_blocks,
            self.used_blocks,
            self.free_blocks,
            self.free_blocks * BLOCK_SIZE
        )
    }
}

/// 文件系统门面：组合磁盘、分配方式和 FAT
///
/// 分配方式在构造时确定，运行期间不可更改。所有修改都经过 `&mut self`。
#[derive(Debug)]
pub struct FileSystem {
    pub disk: MemDisk,  // 模拟磁盘（含唯一的位图）
    pub fat: FileTable, // 文件分配表
    strategy: Strategy,
    placement: Placement, // 空闲块搜索顺序
}

impl FileSystem {
    pub fn new(config: FsConfig) -> Self {
        info!(
            "mounting simulated disk: {} blocks x {} bytes, {} allocation, {:?} placement",
            DISK_SIZE, BLOCK_SIZE, config.strategy, config.placement
        );
        Self {
            disk: MemDisk::new(),
            fat: FileTable::new(),
            strategy: config.strategy,
            placement: Placement::from_mode(config.placement),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn lookup(&self, name: &str) -> Result<&FatEntry> {
        self.fat
            .find(name)
            .ok_or_else(|| FileSystemError::NotFound(name.to_string()))
    }

    /// 写入一个文件：分配成功后才会生成 FAT 表项
    pub fn import_file(&mut self, name: &str, data: &[u8]) -> Result<Locator> {
        if self.fat.contains(name) {
            return Err(FileSystemError::AlreadyExists(name.to_string()));
        }

        let locator = self
            .strategy
            .allocate(&mut self.disk, &mut self.placement, data)?;
        self.fat.add(name, locator)?;

        info!("imported {} ({} bytes) at {}", name, data.len(), locator);
        Ok(locator)
    }

    /// 读出文件内容：逐块去掉尾部的非文本字节后拼接
    ///
    /// 对二进制文件是有损的。
    pub fn export_file(&self, name: &str) -> Result<Vec<u8>> {
        let entry = self.lookup(name)?;
        let mut data = Vec::new();
        for payload in entry.locator.payloads(&self.disk)? {
            data.extend_from_slice(trim_trailing_non_text(&payload));
        }
        debug!("exported {} ({} bytes)", name, data.len());
        Ok(data)
    }

    /// 以文本形式显示文件：每块只保留可显示字符，块之间换行
    pub fn display_file(&self, name: &str) -> Result<String> {
        let entry = self.lookup(name)?;
        let mut text = String::new();
        for payload in entry.locator.payloads(&self.disk)? {
            text.push_str(&printable_text(&payload));
            text.push('\n');
        }
        Ok(text)
    }

    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        let locator = self.lookup(name)?.locator;
        locator.free(&mut self.disk)?;
        self.fat.remove(name);

        info!("deleted {} ({})", name, locator);
        Ok(())
    }

    /// 显示某个块：块 0 为 FAT，块 1 为位图，索引块显示指针列表
    pub fn describe_block(&self, block_id: usize) -> Result<BlockView> {
        if block_id >= DISK_SIZE {
            return Err(FileSystemError::OutOfRange(block_id));
        }

        match block_id {
            FAT_BLOCK_ID => Ok(BlockView::Fat(self.render_fat())),
            BITMAP_BLOCK_ID => Ok(BlockView::Bitmap(BitmapView::new(self.disk.bitmap()))),
            _ => {
                let data = read(&self.disk, block_id)?;
                if self.fat.is_index_block(block_id) {
                    Ok(BlockView::Index {
                        block: block_id,
                        pointers: decode_index(&data, block_id)?,
                    })
                } else if self.strategy == Strategy::Chained && self.disk.is_used(block_id)? {
                    Ok(BlockView::chain_link(block_id, &data))
                } else {
                    Ok(BlockView::raw(block_id, &data))
                }
            }
        }
    }

    /// 按当前分配方式渲染 FAT
    pub fn render_fat(&self) -> String {
        if self.fat.is_empty() {
            return "No files found in File Allocation Table.\n".to_string();
        }
        match self.strategy {
            Strategy::Contiguous => self.fat.render_contiguous(),
            Strategy::Chained => self.fat.render_chained(&self.disk),
            Strategy::Indexed => self.fat.render_indexed(),
        }
    }

    pub fn render_bitmap(&self) -> String {
        BitmapView::new(self.disk.bitmap()).to_string()
    }

    pub fn listing(&self) -> String {
        self.fat.render_listing(&self.disk)
    }

    pub fn usage(&self) -> DiskUsage {
        let bitmap = self.disk.bitmap();
        DiskUsage {
            total_blocks: bitmap.total_blocks(),
            used_blocks: bitmap.used_blocks(),
            free_blocks: bitmap.free_blocks(),
        }
    }

    /// 一致性检查：位图中的占用位必须恰好对应保留块和各文件占用的块，
    /// 且任意两个文件不共享块
    pub fn check(&self) -> Result<()> {
        let mut owners: Vec<Option<&str>> = vec![None; DISK_SIZE];
        for owner in owners.iter_mut().take(RESERVED_BLOCKS) {
            *owner = Some("<reserved>");
        }

        for entry in self.fat.iter() {
            for block_id in entry.locator.blocks(&self.disk)? {
                if let Some(other) = owners[block_id] {
                    return Err(FileSystemError::Corrupted(format!(
                        "block {} is shared by {} and {}",
                        block_id, other, entry.name
                    )));
                }
                owners[block_id] = Some(entry.name.as_str());
            }
        }

        let bitmap = self.disk.bitmap();
        for (block_id, owner) in owners.iter().enumerate() {
            if owner.is_some() != bitmap.is_used(block_id) {
                return Err(FileSystemError::Corrupted(format!(
                    "bitmap disagrees with the FAT at block {}",
                    block_id
                )));
            }
        }
        Ok(())
    }

    /// 从宿主机读取文件并写入模拟磁盘
    pub fn import_from_host<P: AsRef<Path>>(&mut self, host_path: P, name: &str) -> Result<Locator> {
        let data = std::fs::read(host_path.as_ref())?;
        debug!("read {} bytes from {:?}", data.len(), host_path.as_ref());
        self.import_file(name, &data)
    }

    /// 把模拟磁盘中的文件写到宿主机，返回写入的字节数
    pub fn export_to_host<P: AsRef<Path>>(&self, name: &str, host_path: P) -> Result<usize> {
        let data = self.export_file(name)?;
        std::fs::write(host_path.as_ref(), &data)?;
        debug!("wrote {} bytes to {:?}", data.len(), host_path.as_ref());
        Ok(data.len())
    }
}
