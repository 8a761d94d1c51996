//! 代码片段（chunk）

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};
use crate::ssz::{leaf_from_bytes, leaf_from_u8, Merkleizable, MerkleError, Node, NodeHasher, TreeBuilder};

/// 每个 chunk 的字节数
pub const CHUNK_SIZE: usize = 32;

/// 代码片段
/// 
/// `fio` 为片段内第一条有效指令的偏移，用于跳转目标校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 第一条指令偏移（first instruction offset）
    pub fio: u8,
    
    /// 片段字节码，最多 32 字节（末尾片段由调用方右侧补零）
    pub code: Bytes,
}

impl Chunk {
    /// 创建新的代码片段
    pub fn new(fio: u8, code: impl Into<Bytes>) -> Self {
        Self {
            fio,
            code: code.into(),
        }
    }
    
    /// 从原始片段创建，右侧补零到 32 字节
    /// 
    /// 超过 32 字节的输入原样保留，在 Merkle 化时报错
    pub fn padded(fio: u8, code: &[u8]) -> Self {
        let mut buf = code.to_vec();
        if buf.len() < CHUNK_SIZE {
            buf.resize(CHUNK_SIZE, 0);
        }
        Self::new(fio, buf)
    }
}

impl Merkleizable for Chunk {
    fn get_tree_with<H: NodeHasher>(&self, builder: &TreeBuilder<H>) -> Result<Node, MerkleError> {
        let leaves = vec![
            Node::leaf(leaf_from_u8(self.fio)),
            Node::leaf(leaf_from_bytes(&self.code)?),
        ];
        Ok(builder.tree_from_nodes(leaves))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_chunk_depth() {
        let chunk = Chunk::new(0, vec![0u8; 32]);
        assert_eq!(chunk.get_tree().unwrap().depth(), 1);
    }
    
    #[test]
    fn test_padded() {
        let chunk = Chunk::padded(3, &[0x60, 0x80]);
        assert_eq!(chunk.code.len(), CHUNK_SIZE);
        assert_eq!(&chunk.code[..2], &[0x60, 0x80]);
        
        // 补零不改变根：叶子编码本身就会右侧补零
        let short = Chunk::new(3, vec![0x60, 0x80]);
        assert_eq!(short.hash_tree_root(), chunk.hash_tree_root());
    }
    
    #[test]
    fn test_oversized_code_rejected() {
        let chunk = Chunk::new(0, vec![0u8; 33]);
        assert_eq!(chunk.get_tree(), Err(MerkleError::InvalidLeafSize { size: 33 }));
    }
    
    #[test]
    fn test_fio_and_code_change_root() {
        let base = Chunk::new(0, vec![1u8; 32]).hash_tree_root().unwrap();
        
        let mut code = vec![1u8; 32];
        code[31] = 2;
        
        assert_ne!(base, Chunk::new(1, vec![1u8; 32]).hash_tree_root().unwrap());
        assert_ne!(base, Chunk::new(0, code).hash_tree_root().unwrap());
    }
}
