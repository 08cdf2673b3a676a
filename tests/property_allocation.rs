//! Property-based tests for the bitmap/FAT invariants
//!
//! Random sequences of imports and deletes must keep the bitmap congruent with
//! the live FAT entries, never share a block between files, and keep every
//! surviving file readable.

use std::collections::{HashMap, HashSet};

use minifs_alloc::{
    disk::BLOCK_SIZE, fs::config::CHAIN_PAYLOAD_SIZE, FileSystem, FileSystemError, FsConfig,
    PlacementMode, Strategy as AllocationMethod,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Import(u8, usize),
    Delete(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..24, 0usize..=5200).prop_map(|(name, len)| Op::Import(name, len)),
        1 => (0u8..24).prop_map(Op::Delete),
    ]
}

fn method() -> impl Strategy<Value = AllocationMethod> {
    prop_oneof![
        Just(AllocationMethod::Contiguous),
        Just(AllocationMethod::Chained),
        Just(AllocationMethod::Indexed),
    ]
}

fn content(name: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| b'A' + ((i + name as usize) % 26) as u8).collect()
}

// 链式块的最后 4 字节被指针覆盖，导出时读不回来
fn exported(method: AllocationMethod, data: &[u8]) -> Vec<u8> {
    match method {
        AllocationMethod::Chained => data
            .chunks(BLOCK_SIZE)
            .flat_map(|chunk| &chunk[..chunk.len().min(CHAIN_PAYLOAD_SIZE)])
            .copied()
            .collect(),
        _ => data.to_vec(),
    }
}

proptest! {
    #[test]
    fn prop_bitmap_matches_fat(
        method in method(),
        seed in any::<u64>(),
        ops in prop::collection::vec(op(), 1..80)
    ) {
        let mut fs = FileSystem::new(FsConfig::new(method).with_placement(PlacementMode::Seeded(seed)));
        let mut live: HashMap<String, Vec<u8>> = HashMap::new();

        for op in ops {
            match op {
                Op::Import(id, len) => {
                    let data = content(id, len);
                    let name = format!("file{}", id);
                    let used_before = fs.usage().used_blocks;
                    let result = fs.import_file(&name, &data);
                    if result.is_err() {
                        prop_assert_eq!(fs.usage().used_blocks, used_before);
                    }
                    match result {
                        Ok(_) => {
                            prop_assert!(!live.contains_key(&name));
                            prop_assert!(len <= 5120);
                            live.insert(name, data);
                        }
                        Err(FileSystemError::AlreadyExists(_)) => prop_assert!(live.contains_key(&name)),
                        Err(FileSystemError::FileTooLarge { .. }) => prop_assert!(len > 5120),
                        Err(FileSystemError::InsufficientSpace { .. }) => {}
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
                Op::Delete(name) => {
                    let name = format!("file{}", name);
                    match fs.delete_file(&name) {
                        Ok(()) => prop_assert!(live.remove(&name).is_some()),
                        Err(FileSystemError::NotFound(_)) => prop_assert!(!live.contains_key(&name)),
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
            }

            prop_assert!(fs.check().is_ok(), "{:?}", fs.check());
        }

        // 任意两个文件不共享块，且内容可以完整读回
        let mut seen = HashSet::new();
        for entry in fs.fat.iter() {
            for block in entry.locator.blocks(&fs.disk).unwrap() {
                prop_assert!(seen.insert(block), "block {} shared", block);
            }
        }
        prop_assert_eq!(seen.len() + 2, fs.usage().used_blocks);
        for (name, data) in &live {
            prop_assert_eq!(fs.export_file(name).unwrap(), exported(method, data));
        }
    }
}
