//! Code Trie Library
//! 
//! 合约字节码的 SSZ 风格 Merkle 化：切分为 32 字节 chunk，计算带长度混入的根哈希

pub mod ssz;
pub mod schema;
pub mod trie;

pub use ssz::{MerkleError, Merkleizable, Node, TreeBuilder};
pub use schema::{Chunk, CodeTrie, CodeTrieBig, CodeTrieSmall, ContractCode, Metadata};
pub use trie::{CodeRootCalculator, MerkleizeOptions};
