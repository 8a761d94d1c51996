//! 叶子编码
//! 
//! 整数按小端序编码，原始字节右侧补零，所有叶子固定为 32 字节

use alloy_primitives::B256;
use super::MerkleError;

/// 每个叶子的字节数
pub const BYTES_PER_LEAF: usize = 32;

/// 全零叶子（用于补齐）
pub fn empty_leaf() -> B256 {
    B256::ZERO
}

/// uint8 叶子
pub fn leaf_from_u8(value: u8) -> B256 {
    leaf_from_le_bytes(&[value])
}

/// uint16 叶子（小端序）
pub fn leaf_from_u16(value: u16) -> B256 {
    leaf_from_le_bytes(&value.to_le_bytes())
}

/// uint64 叶子（小端序），用于列表长度混入
pub fn leaf_from_u64(value: u64) -> B256 {
    leaf_from_le_bytes(&value.to_le_bytes())
}

/// 原始字节叶子
/// 
/// 长度超过 32 字节时返回 `InvalidLeafSize`，不会截断
pub fn leaf_from_bytes(bytes: &[u8]) -> Result<B256, MerkleError> {
    if bytes.len() > BYTES_PER_LEAF {
        return Err(MerkleError::InvalidLeafSize { size: bytes.len() });
    }
    
    Ok(leaf_from_le_bytes(bytes))
}

fn leaf_from_le_bytes(bytes: &[u8]) -> B256 {
    let mut leaf = [0u8; BYTES_PER_LEAF];
    leaf[..bytes.len()].copy_from_slice(bytes);
    B256::new(leaf)
}
