//! SSZ 风格的 Merkle 化引擎
//! 
//! 叶子编码、补零到 2 的幂的平衡二叉树、以及带长度混入（length mixin）的有界列表

pub mod hasher;
pub mod leaf;
pub mod node;
pub mod builder;
pub mod proof;
pub mod traits;

pub use hasher::{NodeHasher, Sha256Hasher, Keccak256Hasher};
pub use leaf::{empty_leaf, leaf_from_bytes, leaf_from_u8, leaf_from_u16, leaf_from_u64, BYTES_PER_LEAF};
pub use node::Node;
pub use builder::TreeBuilder;
pub use proof::{GeneralizedIndex, MerkleProof, ProofVerifier};
pub use traits::Merkleizable;

use thiserror::Error;

/// Merkle 化错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("Invalid leaf size: {size} bytes (max 32)")]
    InvalidLeafSize { size: usize },
    
    #[error("Capacity exceeded: {len} elements, capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },
    
    #[error("Invalid capacity: {0} is not a power of two")]
    InvalidCapacity(usize),
    
    #[error("Code too large: {len} bytes (max {max})")]
    CodeTooLarge { len: usize, max: usize },
    
    #[error("Invalid generalized index: {0}")]
    InvalidGeneralizedIndex(u64),
    
    #[error("Chunk index out of range: {index} (chunks {len})")]
    ChunkIndexOutOfRange { index: usize, len: usize },
    
    #[error("Invalid hex string: {0}")]
    InvalidHex(String),
    
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
