//! CodeTrie 根计算与证明
//! 
//! 支持串行/并行计算根哈希，以及为单个 chunk 生成 witness

pub mod code_root;
pub mod proof;

pub use code_root::{CodeRootCalculator, MerkleizeOptions, DEFAULT_PARALLEL_THRESHOLD};
pub use proof::{
    chunk_gindex, ChunkProof, CHUNK_DATA_GINDEX, CHUNK_LENGTH_GINDEX, CHUNK_LIST_GINDEX,
    METADATA_GINDEX,
};
