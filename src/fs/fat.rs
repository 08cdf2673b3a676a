use std::collections::HashMap;
use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::{
    disk::BlockDevice,
    fs::{
        alloc::Locator,
        error::{FileSystemError, Result},
    },
    utils::{current_timestamp, format_timestamp},
};

// 一个 FAT 表项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatEntry {
    pub name: String,
    pub locator: Locator,
    pub created: DateTime<Local>,
}

/// 文件分配表：文件名 -> Locator，保持插入顺序
#[derive(Debug, Clone, Default)]
pub struct FileTable {
    entries: Vec<FatEntry>,
    index_map: HashMap<String, usize>, // name -> entries 索引
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn rebuild_index_map(&mut self) {
        self.index_map.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.index_map.insert(entry.name.clone(), i);
        }
    }

    /// 追加表项，文件名重复时拒绝
    pub fn add(&mut self, name: &str, locator: Locator) -> Result<&FatEntry> {
        if self.index_map.contains_key(name) {
            return Err(FileSystemError::AlreadyExists(name.to_string()));
        }
        self.entries.push(FatEntry {
            name: name.to_string(),
            locator,
            created: current_timestamp(),
        });
        let idx = self.entries.len() - 1;
        self.index_map.insert(name.to_string(), idx);
        Ok(&self.entries[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_map.contains_key(name)
    }

    pub fn find(&self, name: &str) -> Option<&FatEntry> {
        self.index_map.get(name).map(|&idx| &self.entries[idx])
    }

    // 删除表项并返回
    pub fn remove(&mut self, name: &str) -> Option<FatEntry> {
        let idx = self.index_map.get(name).copied()?;
        let entry = self.entries.remove(idx);
        self.rebuild_index_map();
        Some(entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FatEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 该块是否为某个索引分配文件的索引块
    pub fn is_index_block(&self, block_id: usize) -> bool {
        self.entries
            .iter()
            .any(|e| matches!(e.locator, Locator::Indexed { index_block } if index_block == block_id))
    }

    pub fn render_contiguous(&self) -> String {
        let mut out = format!("{:<20} {:<15} {:<10}\n", "File Name", "Starting Block", "Length");
        for entry in &self.entries {
            if let Locator::Contiguous { start, count } = entry.locator {
                let _ = writeln!(out, "{:<20} {:<15} {:<10}", entry.name, start, count);
            }
        }
        out
    }

    /// 链式表项的长度需要沿链遍历才能得到
    pub fn render_chained<D: BlockDevice + ?Sized>(&self, disk: &D) -> String {
        let mut out = format!("{:<20} {:<15} {:<10}\n", "File Name", "Start Block", "Length");
        for entry in &self.entries {
            if let Locator::Chained { head } = entry.locator {
                let length = entry
                    .locator
                    .length(disk)
                    .map_or_else(|_| "?".to_string(), |n| n.to_string());
                let _ = writeln!(out, "{:<20} {:<15} {:<10}", entry.name, head, length);
            }
        }
        out
    }

    pub fn render_indexed(&self) -> String {
        let mut out = format!("{:<20} {:<15}\n", "File Name", "Index Block");
        for entry in &self.entries {
            if let Locator::Indexed { index_block } = entry.locator {
                let _ = writeln!(out, "{:<20} {:<15}", entry.name, index_block);
            }
        }
        out
    }

    /// 类似 `ls -l` 的列表：名称、块数、位置、创建时间
    pub fn render_listing<D: BlockDevice + ?Sized>(&self, disk: &D) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            let blocks = entry
                .locator
                .blocks(disk)
                .map_or_else(|_| "?".to_string(), |b| b.len().to_string());
            let _ = writeln!(
                out,
                "{:<20} {:>3} blk  {:<32} {}",
                entry.name,
                blocks,
                entry.locator.to_string(),
                format_timestamp(&entry.created)
            );
        }
        out
    }
}
