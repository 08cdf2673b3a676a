use std::fmt;

use crate::disk::{BlockBitmap, Block, BLOCK_SIZE};
use crate::fs::config::{CHAIN_END, CHAIN_TRAILER_SIZE};

// 位图每行显示的位数
const BITS_PER_ROW: usize = 32;

/// `describe_block` 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockView {
    /// 块 0：当前的文件分配表
    Fat(String),
    /// 块 1：空闲空间位图
    Bitmap(BitmapView),
    /// 索引块：指向的数据块列表
    Index { block: usize, pointers: Vec<usize> },
    /// 链式分配的数据块：内容 + 尾部指针
    ChainLink { block: usize, text: String, next: i32 },
    /// 其他块：原始内容
    Raw { block: usize, text: String },
}

/// 逐块的占用状态，按行显示为 0/1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapView {
    pub bits: Vec<bool>,
}

impl BitmapView {
    pub fn new(bitmap: &BlockBitmap) -> Self {
        Self {
            bits: bitmap.snapshot(),
        }
    }
}

impl fmt::Display for BitmapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.bits.chunks(BITS_PER_ROW) {
            let line: String = row.iter().map(|&used| if used { '1' } else { '0' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

// 非零字节按字符显示，零显示为空格
pub(crate) fn raw_text(bytes: &[u8]) -> String {
    let text: String = bytes
        .iter()
        .map(|&b| if b != 0 { b as char } else { ' ' })
        .collect();
    text.trim_end().to_string()
}

impl BlockView {
    pub(crate) fn raw(block: usize, data: &Block) -> Self {
        BlockView::Raw {
            block,
            text: raw_text(data),
        }
    }

    pub(crate) fn chain_link(block: usize, data: &Block) -> Self {
        let (content, trailer) = data.split_at(BLOCK_SIZE - CHAIN_TRAILER_SIZE);
        BlockView::ChainLink {
            block,
            text: raw_text(content),
            next: i32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]),
        }
    }
}

impl fmt::Display for BlockView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockView::Fat(table) => write!(f, "{}", table),
            BlockView::Bitmap(bitmap) => write!(f, "{}", bitmap),
            BlockView::Index { block, pointers } => {
                writeln!(f, "Contents of block {}:", block)?;
                writeln!(f, "Index Block:")?;
                for pointer in pointers {
                    writeln!(f, "Block #{}", pointer)?;
                }
                Ok(())
            }
            BlockView::ChainLink { block, text, next } => {
                writeln!(f, "Contents of block {}:", block)?;
                writeln!(f, "{}", text)?;
                if *next == CHAIN_END {
                    writeln!(f, "Next Block Pointer: EOF")
                } else {
                    writeln!(f, "Next Block Pointer: {}", next)
                }
            }
            BlockView::Raw { block, text } => {
                writeln!(f, "Contents of block {}:", block)?;
                writeln!(f, "{}", text)
            }
        }
    }
}
