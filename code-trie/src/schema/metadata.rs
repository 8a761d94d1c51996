//! 代码元数据
//! 
//! 版本号、代码哈希、代码长度三个字段，补一个空叶子凑满 4 个叶子槽位

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use crate::ssz::{
    empty_leaf, leaf_from_bytes, leaf_from_u16, leaf_from_u8, Merkleizable, MerkleError, Node,
    NodeHasher, TreeBuilder, BYTES_PER_LEAF,
};

/// 代码元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// 格式版本
    pub version: u8,
    
    /// 代码哈希，必须恰好 32 字节
    pub code_hash: Bytes,
    
    /// 代码字节数（未补零前）
    pub code_length: u16,
}

impl Metadata {
    /// 创建新的元数据
    pub fn new(version: u8, code_hash: B256, code_length: u16) -> Self {
        Self {
            version,
            code_hash: Bytes::copy_from_slice(code_hash.as_slice()),
            code_length,
        }
    }
    
    /// 按固定顺序生成 4 个叶子
    fn leaves(&self) -> Result<Vec<Node>, MerkleError> {
        if self.code_hash.len() != BYTES_PER_LEAF {
            return Err(MerkleError::InvalidLeafSize { size: self.code_hash.len() });
        }
        
        Ok(vec![
            Node::leaf(leaf_from_u8(self.version)),
            Node::leaf(leaf_from_bytes(&self.code_hash)?),
            Node::leaf(leaf_from_u16(self.code_length)),
            Node::leaf(empty_leaf()),
        ])
    }
}

impl Merkleizable for Metadata {
    fn get_tree_with<H: NodeHasher>(&self, builder: &TreeBuilder<H>) -> Result<Node, MerkleError> {
        Ok(builder.tree_from_nodes(self.leaves()?))
    }
}
