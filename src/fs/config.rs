use std::{fmt, str::FromStr};

use crate::{
    disk::{BLOCK_SIZE, DISK_SIZE},
    fs::error::{FileSystemError, Result},
};

pub const FAT_BLOCK_ID: usize = 0;
pub const BITMAP_BLOCK_ID: usize = 1;

// 块 0、1 保留，文件数据从块 2 开始
pub const RESERVED_BLOCKS: usize = 2;
pub const FIRST_DATA_BLOCK_ID: usize = RESERVED_BLOCKS;

/// 单个文件最多占用的块数，三种分配方式统一
pub const MAX_FILE_SIZE_BLOCKS: usize = 10;
pub const MAX_FILE_SIZE: usize = MAX_FILE_SIZE_BLOCKS * BLOCK_SIZE;

// 链式分配：每块末尾 4 字节存放下一块的块号（覆盖该处数据），-1 表示链尾
pub const CHAIN_TRAILER_SIZE: usize = 4;
pub const CHAIN_END: i32 = -1;
pub const CHAIN_PAYLOAD_SIZE: usize = BLOCK_SIZE - CHAIN_TRAILER_SIZE;

// 索引分配：索引块由 4 字节整数组成，0 表示结束
pub const INDEX_ENTRY_SIZE: usize = 4;
pub const INDEX_CAPACITY: usize = BLOCK_SIZE / INDEX_ENTRY_SIZE;
pub const INDEX_END: i32 = 0;

/// 磁盘空间分配方式，每次运行启动时确定，运行期间不变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Contiguous,
    Chained,
    Indexed,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Contiguous, Strategy::Chained, Strategy::Indexed];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Contiguous => "contiguous",
            Strategy::Chained => "chained",
            Strategy::Indexed => "indexed",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = FileSystemError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contiguous" => Ok(Strategy::Contiguous),
            "chained" => Ok(Strategy::Chained),
            "indexed" => Ok(Strategy::Indexed),
            _ => Err(FileSystemError::InvalidAllocationMethod(s.to_string())),
        }
    }
}

/// 空闲块的搜索顺序（连续分配除外）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// 每次搜索前随机打乱候选块
    #[default]
    Random,
    /// 固定种子的随机顺序，便于复现
    Seeded(u64),
    /// 按块号升序
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsConfig {
    pub strategy: Strategy,
    pub placement: PlacementMode,
}

impl FsConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            placement: PlacementMode::Random,
        }
    }

    pub fn with_placement(mut self, placement: PlacementMode) -> Self {
        self.placement = placement;
        self
    }
}

/// 命令行参数：`<method> [--seed N | --sequential]`
///
/// 分配方式可以省略，此时由 shell 交互式选择。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub strategy: Option<Strategy>,
    pub placement: PlacementMode,
}

impl CliArgs {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or_else(|| {
                        FileSystemError::InvalidArgument("--seed requires a value".to_string())
                    })?;
                    let seed = value.parse::<u64>().map_err(|_| {
                        FileSystemError::InvalidArgument(format!("bad seed: {}", value))
                    })?;
                    parsed.placement = PlacementMode::Seeded(seed);
                }
                "--sequential" => parsed.placement = PlacementMode::Sequential,
                flag if flag.starts_with("--") => {
                    return Err(FileSystemError::InvalidArgument(flag.to_string()));
                }
                method => {
                    if parsed.strategy.is_some() {
                        return Err(FileSystemError::InvalidArgument(format!(
                            "unexpected argument: {}",
                            method
                        )));
                    }
                    parsed.strategy = Some(method.parse()?);
                }
            }
        }

        Ok(parsed)
    }
}

// 保证常量之间的关系成立
const _: () = assert!(MAX_FILE_SIZE_BLOCKS <= INDEX_CAPACITY);
const _: () = assert!(RESERVED_BLOCKS < DISK_SIZE);

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strategy_names_are_case_insensitive() {
        assert_eq!("Contiguous".parse::<Strategy>().unwrap(), Strategy::Contiguous);
        assert_eq!("CHAINED".parse::<Strategy>().unwrap(), Strategy::Chained);
        assert_eq!("indexed".parse::<Strategy>().unwrap(), Strategy::Indexed);
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let err = "fat32".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, FileSystemError::InvalidAllocationMethod(ref m) if m == "fat32"));
    }

    #[test]
    fn parse_method_and_seed() {
        let parsed = CliArgs::parse(args(&["indexed", "--seed", "42"])).unwrap();
        assert_eq!(parsed.strategy, Some(Strategy::Indexed));
        assert_eq!(parsed.placement, PlacementMode::Seeded(42));
    }

    #[test]
    fn parse_without_method() {
        let parsed = CliArgs::parse(args(&["--sequential"])).unwrap();
        assert_eq!(parsed.strategy, None);
        assert_eq!(parsed.placement, PlacementMode::Sequential);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            CliArgs::parse(args(&["linked"])),
            Err(FileSystemError::InvalidAllocationMethod(_))
        ));
        assert!(CliArgs::parse(args(&["chained", "--seed"])).is_err());
        assert!(CliArgs::parse(args(&["chained", "--seed", "x"])).is_err());
        assert!(CliArgs::parse(args(&["chained", "indexed"])).is_err());
        assert!(CliArgs::parse(args(&["--verbose"])).is_err());
    }
}
