//! Merkleizable Trait 定义
//! 
//! 所有可 Merkle 化的记录类型（Metadata、Chunk、CodeTrie）共用的接口

use alloy_primitives::B256;
use super::{MerkleError, Node, NodeHasher, TreeBuilder};

/// 可 Merkle 化的记录
/// 
/// 调用点已知具体类型时静态分发，不需要 trait 对象
pub trait Merkleizable {
    /// 使用指定构建器生成完整的树
    fn get_tree_with<H: NodeHasher>(&self, builder: &TreeBuilder<H>) -> Result<Node, MerkleError>;
    
    /// 使用默认（SHA256）构建器生成树
    fn get_tree(&self) -> Result<Node, MerkleError> {
        self.get_tree_with(&TreeBuilder::new())
    }
    
    /// 根哈希
    fn hash_tree_root(&self) -> Result<B256, MerkleError> {
        Ok(self.get_tree()?.hash())
    }
}
