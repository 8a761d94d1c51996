//! 哈希工具
//! 
//! 树节点的哈希函数被视为外部协作者，这里只定义接口和两种常用实现

use alloy_primitives::{B256, keccak256};
use sha2::{Sha256, Digest};

/// 内部节点哈希接口
/// 
/// 计算 `hash(left ‖ right)`，替换实现会改变所有根哈希，但不改变树的结构
pub trait NodeHasher: Send + Sync {
    /// 合并两个子节点的摘要
    fn hash_pair(&self, left: &B256, right: &B256) -> B256;
}

/// SHA256（SSZ 标准，默认实现）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl NodeHasher for Sha256Hasher {
    fn hash_pair(&self, left: &B256, right: &B256) -> B256 {
        let mut hasher = Sha256::new();
        hasher.update(left.as_slice());
        hasher.update(right.as_slice());
        B256::from_slice(&hasher.finalize())
    }
}

/// Keccak256（以太坊标准）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keccak256Hasher;

impl NodeHasher for Keccak256Hasher {
    fn hash_pair(&self, left: &B256, right: &B256) -> B256 {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(left.as_slice());
        buf[32..].copy_from_slice(right.as_slice());
        keccak256(buf)
    }
}
