//! CodeTrie 根计算
//! 
//! 元数据子树与各 chunk 子树相互独立，可并行计算，最终按原始顺序组合

use alloy_primitives::B256;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;
use crate::schema::{ChunkCapacity, CodeTrie, ContractCode};
use crate::ssz::{Merkleizable, MerkleError, Node, NodeHasher, Sha256Hasher, TreeBuilder};

/// 并行计算的默认 chunk 数阈值
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Merkle 化配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MerkleizeOptions {
    /// 是否使用并行计算
    pub parallel: bool,
    
    /// chunk 数达到该值才并行，chunk 较少时线程调度开销大于收益
    pub parallel_threshold: usize,
}

impl Default for MerkleizeOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl MerkleizeOptions {
    /// 串行配置（用于调试）
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Default::default()
        }
    }
    
    /// 从 JSON 加载配置，缺省字段使用默认值
    pub fn from_json(json: &str) -> Result<Self, MerkleError> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| MerkleError::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
    
    /// 校验配置
    pub fn validate(&self) -> Result<(), MerkleError> {
        if self.parallel_threshold == 0 {
            return Err(MerkleError::InvalidConfig(
                "parallel_threshold must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// CodeTrie 根计算器
pub struct CodeRootCalculator<H = Sha256Hasher> {
    builder: TreeBuilder<H>,
    options: MerkleizeOptions,
}

impl CodeRootCalculator<Sha256Hasher> {
    /// 创建根计算器（默认并行）
    pub fn new() -> Self {
        Self {
            builder: TreeBuilder::new(),
            options: MerkleizeOptions::default(),
        }
    }
    
    /// 创建串行计算器（用于调试）
    pub fn new_serial() -> Self {
        Self {
            builder: TreeBuilder::new(),
            options: MerkleizeOptions::serial(),
        }
    }
}

impl Default for CodeRootCalculator<Sha256Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: NodeHasher> CodeRootCalculator<H> {
    /// 使用指定构建器和配置创建，配置无效时返回 `InvalidConfig`
    pub fn with_options(builder: TreeBuilder<H>, options: MerkleizeOptions) -> Result<Self, MerkleError> {
        options.validate()?;
        Ok(Self { builder, options })
    }
    
    /// 当前配置
    pub fn options(&self) -> &MerkleizeOptions {
        &self.options
    }
    
    /// 计算完整的树
    pub fn calculate_tree<C: ChunkCapacity>(&self, trie: &CodeTrie<C>) -> Result<Node, MerkleError> {
        let parallel = self.options.parallel && trie.chunks.len() >= self.options.parallel_threshold;
        debug!(
            chunks = trie.chunks.len(),
            capacity = C::CAPACITY,
            parallel,
            "calculating code trie root"
        );
        
        if !parallel {
            return trie.get_tree_with(&self.builder);
        }
        
        // 错误顺序与串行路径一致：元数据、容量、chunk
        let metadata_root = trie.metadata.get_tree_with(&self.builder)?;
        trie.check_capacity()?;
        
        let chunk_roots = trie
            .chunks
            .par_iter()
            .map(|chunk| chunk.get_tree_with(&self.builder))
            .collect::<Vec<_>>();
        
        // 按顺序取第一个错误
        let chunk_roots = chunk_roots.into_iter().collect::<Result<Vec<_>, _>>()?;
        
        CodeTrie::<C>::assemble(&self.builder, metadata_root, chunk_roots)
    }
    
    /// 计算根哈希
    pub fn calculate<C: ChunkCapacity>(&self, trie: &CodeTrie<C>) -> Result<B256, MerkleError> {
        let root = self.calculate_tree(trie)?.hash();
        debug!(root = %root, "code trie root calculated");
        Ok(root)
    }
    
    /// 直接从字节码计算根哈希
    pub fn calculate_code<C: ChunkCapacity>(&self, code: &ContractCode) -> Result<B256, MerkleError> {
        let trie = code.to_code_trie::<C>()?;
        self.calculate(&trie)
    }
}
