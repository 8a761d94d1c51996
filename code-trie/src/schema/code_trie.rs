//! CodeTrie：元数据 + 有界 chunk 列表
//! 
//! 两种容量（Small = 4，Big = 1024）共用同一个泛型实现，容量在类型层面确定

use std::marker::PhantomData;
use serde::{Deserialize, Serialize};
use tracing::debug;
use super::{Chunk, Metadata};
use crate::ssz::{Merkleizable, MerkleError, Node, NodeHasher, TreeBuilder};

/// chunk 列表容量
pub trait ChunkCapacity: Send + Sync + 'static {
    /// 最大 chunk 数，必须是 2 的幂
    const CAPACITY: usize;
}

/// 小容量（4 个 chunk）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Small;

impl ChunkCapacity for Small {
    const CAPACITY: usize = 4;
}

/// 大容量（1024 个 chunk）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Big;

impl ChunkCapacity for Big {
    const CAPACITY: usize = 1024;
}

/// 合约代码的 Merkle 化表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct CodeTrie<C: ChunkCapacity> {
    /// 元数据
    pub metadata: Metadata,
    
    /// 有序的 chunk 列表，长度不得超过 `C::CAPACITY`
    pub chunks: Vec<Chunk>,
    
    #[serde(skip)]
    capacity: PhantomData<C>,
}

/// 容量为 4 的 CodeTrie
pub type CodeTrieSmall = CodeTrie<Small>;

/// 容量为 1024 的 CodeTrie
pub type CodeTrieBig = CodeTrie<Big>;

impl<C: ChunkCapacity> CodeTrie<C> {
    /// 创建 CodeTrie
    /// 
    /// 不在这里检查容量，超出容量会在 Merkle 化时报错
    pub fn new(metadata: Metadata, chunks: Vec<Chunk>) -> Self {
        Self {
            metadata,
            chunks,
            capacity: PhantomData,
        }
    }
    
    /// 声明容量
    pub fn capacity(&self) -> usize {
        C::CAPACITY
    }
    
    /// 检查 chunk 数是否超出容量
    pub fn check_capacity(&self) -> Result<(), MerkleError> {
        if self.chunks.len() > C::CAPACITY {
            return Err(MerkleError::CapacityExceeded {
                len: self.chunks.len(),
                capacity: C::CAPACITY,
            });
        }
        Ok(())
    }
    
    /// 由已计算好的子树组装最终的树
    /// 
    /// `chunk_roots` 必须保持 chunk 的原始顺序
    pub(crate) fn assemble<H: NodeHasher>(
        builder: &TreeBuilder<H>,
        metadata_root: Node,
        chunk_roots: Vec<Node>,
    ) -> Result<Node, MerkleError> {
        let chunk_list = builder.tree_from_nodes_with_mixin(chunk_roots, C::CAPACITY)?;
        Ok(builder.tree_from_nodes(vec![metadata_root, chunk_list]))
    }
}

impl<C: ChunkCapacity> Merkleizable for CodeTrie<C> {
    fn get_tree_with<H: NodeHasher>(&self, builder: &TreeBuilder<H>) -> Result<Node, MerkleError> {
        // 1. 元数据子树
        let metadata_root = self.metadata.get_tree_with(builder)?;
        
        // 元数据之后、哈希任何 chunk 之前检查容量
        self.check_capacity()?;
        
        // 2. 每个 chunk 的子树（保持顺序）
        let chunk_roots = self
            .chunks
            .iter()
            .map(|chunk| chunk.get_tree_with(builder))
            .collect::<Result<Vec<_>, _>>()?;
        
        // 3. 带长度混入的 chunk 列表 + 4. 与元数据组合
        let tree = Self::assemble(builder, metadata_root, chunk_roots)?;
        
        debug!(
            chunks = self.chunks.len(),
            capacity = C::CAPACITY,
            root = %tree.hash(),
            "code trie merkleized"
        );
        
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::{leaf_from_u64, Keccak256Hasher};
    use alloy_primitives::B256;
    
    fn zero_metadata() -> Metadata {
        Metadata::new(1, B256::ZERO, 0)
    }
    
    fn chunk(seed: u8) -> Chunk {
        Chunk::new(0, vec![seed; 32])
    }
    
    #[test]
    fn test_empty_vs_one_chunk() {
        let empty = CodeTrieSmall::new(zero_metadata(), vec![]);
        let one = CodeTrieSmall::new(zero_metadata(), vec![Chunk::new(0, vec![0u8; 32])]);
        
        let r0 = empty.hash_tree_root().unwrap();
        let r1 = one.hash_tree_root().unwrap();
        
        assert_ne!(r0, r1);
    }
    
    #[test]
    fn test_deterministic() {
        let trie = CodeTrieSmall::new(zero_metadata(), vec![chunk(1), chunk(2)]);
        assert_eq!(trie.hash_tree_root().unwrap(), trie.hash_tree_root().unwrap());
    }
    
    #[test]
    fn test_small_capacity_enforced() {
        let four = CodeTrieSmall::new(zero_metadata(), (0..4).map(chunk).collect());
        assert!(four.get_tree().is_ok());
        
        let five = CodeTrieSmall::new(zero_metadata(), (0..5).map(chunk).collect());
        assert_eq!(
            five.get_tree(),
            Err(MerkleError::CapacityExceeded { len: 5, capacity: 4 })
        );
        
        // 同样的 5 个 chunk 放进大容量没有问题
        let big = CodeTrieBig::new(zero_metadata(), (0..5).map(chunk).collect());
        assert!(big.get_tree().is_ok());
    }
    
    #[test]
    fn test_metadata_error_before_capacity() {
        let metadata = Metadata {
            version: 1,
            code_hash: alloy_primitives::Bytes::from(vec![0u8; 31]),
            code_length: 0,
        };
        let trie = CodeTrieSmall::new(metadata, (0..5).map(chunk).collect());
        
        assert_eq!(trie.get_tree(), Err(MerkleError::InvalidLeafSize { size: 31 }));
    }
    
    #[test]
    fn test_tree_layout() {
        let trie = CodeTrieSmall::new(zero_metadata(), vec![chunk(7), chunk(8)]);
        let tree = trie.get_tree().unwrap();
        
        assert_eq!(tree.get(2).unwrap().hash(), zero_metadata().hash_tree_root().unwrap());
        assert_eq!(tree.get(7).unwrap().hash(), leaf_from_u64(2));
        // chunk i 的子树根位于 6 * 4 + i
        assert_eq!(tree.get(24).unwrap().hash(), chunk(7).hash_tree_root().unwrap());
        assert_eq!(tree.get(25).unwrap().hash(), chunk(8).hash_tree_root().unwrap());
    }
    
    #[test]
    fn test_prefix_lists_differ() {
        let short = CodeTrieSmall::new(zero_metadata(), vec![chunk(1)]);
        let long = CodeTrieSmall::new(zero_metadata(), vec![chunk(1), Chunk::new(0, vec![0u8; 32])]);
        
        assert_ne!(short.hash_tree_root().unwrap(), long.hash_tree_root().unwrap());
    }
    
    #[test]
    fn test_capacity_changes_root() {
        let small = CodeTrieSmall::new(zero_metadata(), vec![chunk(1)]);
        let big = CodeTrieBig::new(zero_metadata(), vec![chunk(1)]);
        
        assert_ne!(small.hash_tree_root().unwrap(), big.hash_tree_root().unwrap());
    }
    
    #[test]
    fn test_invalid_chunk_propagates() {
        let trie = CodeTrieSmall::new(zero_metadata(), vec![chunk(1), Chunk::new(0, vec![0u8; 40])]);
        assert_eq!(trie.get_tree(), Err(MerkleError::InvalidLeafSize { size: 40 }));
    }
    
    #[test]
    fn test_custom_hasher() {
        let trie = CodeTrieSmall::new(zero_metadata(), vec![chunk(1)]);
        let keccak = trie.get_tree_with(&TreeBuilder::with_hasher(Keccak256Hasher)).unwrap();
        
        assert_ne!(keccak.hash(), trie.hash_tree_root().unwrap());
    }
    
    #[test]
    fn test_json_roundtrip_keeps_root() {
        let trie = CodeTrieSmall::new(zero_metadata(), vec![chunk(3)]);
        let json = serde_json::to_string(&trie).unwrap();
        let decoded: CodeTrieSmall = serde_json::from_str(&json).unwrap();
        
        assert_eq!(decoded, trie);
        assert_eq!(decoded.hash_tree_root(), trie.hash_tree_root());
    }
}
