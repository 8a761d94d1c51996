//! Chunk 证明（witness）
//! 
//! 无状态验证时只需提供被访问的 chunk 及其到 CodeTrie 根的证明路径

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use crate::schema::{Chunk, ChunkCapacity, CodeTrie};
use crate::ssz::proof::subtree_gindex;
use crate::ssz::{
    GeneralizedIndex, Merkleizable, MerkleError, MerkleProof, NodeHasher, ProofVerifier, TreeBuilder,
};

/// 元数据子树
pub const METADATA_GINDEX: GeneralizedIndex = 2;

/// chunk 列表（含长度混入）
pub const CHUNK_LIST_GINDEX: GeneralizedIndex = 3;

/// chunk 列表按容量补齐后的数据树
pub const CHUNK_DATA_GINDEX: GeneralizedIndex = 6;

/// chunk 列表长度叶子
pub const CHUNK_LENGTH_GINDEX: GeneralizedIndex = 7;

/// 第 `index` 个 chunk 子树根的广义索引
pub fn chunk_gindex<C: ChunkCapacity>(index: usize) -> GeneralizedIndex {
    subtree_gindex(CHUNK_DATA_GINDEX, C::CAPACITY.trailing_zeros(), index as u64)
}

/// 单个 chunk 的证明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkProof {
    /// chunk 在列表中的位置
    pub index: usize,
    
    /// chunk 内容
    pub chunk: Chunk,
    
    /// chunk 子树根到 CodeTrie 根的证明
    pub proof: MerkleProof,
}

impl ChunkProof {
    /// 验证证明
    /// 
    /// 依次检查：广义索引与位置一致、chunk 内容与证明叶子一致、证明路径通向 `root`
    pub fn verify<C: ChunkCapacity, H: NodeHasher>(
        &self,
        builder: &TreeBuilder<H>,
        root: B256,
    ) -> Result<bool, MerkleError> {
        if self.index >= C::CAPACITY || self.proof.gindex != chunk_gindex::<C>(self.index) {
            return Ok(false);
        }
        
        let chunk_root = self.chunk.get_tree_with(builder)?.hash();
        if chunk_root != self.proof.leaf {
            return Ok(false);
        }
        
        Ok(self.proof.verify(builder.hasher(), root))
    }
}

impl<C: ChunkCapacity> CodeTrie<C> {
    /// 生成单个 chunk 的证明（SHA256）
    pub fn prove_chunk(&self, index: usize) -> Result<ChunkProof, MerkleError> {
        self.prove_chunk_with(&TreeBuilder::new(), index)
    }
    
    /// 使用指定构建器生成单个 chunk 的证明
    pub fn prove_chunk_with<H: NodeHasher>(
        &self,
        builder: &TreeBuilder<H>,
        index: usize,
    ) -> Result<ChunkProof, MerkleError> {
        let mut proofs = self.prove_chunks_with(builder, &[index])?;
        proofs.pop().ok_or(MerkleError::ChunkIndexOutOfRange {
            index,
            len: self.chunks.len(),
        })
    }
    
    /// 为多个 chunk 生成证明，只构建一次树
    pub fn prove_chunks_with<H: NodeHasher>(
        &self,
        builder: &TreeBuilder<H>,
        indices: &[usize],
    ) -> Result<Vec<ChunkProof>, MerkleError> {
        // 越界检查在构建树之前完成
        if let Some(&index) = indices.iter().find(|&&index| index >= self.chunks.len()) {
            return Err(MerkleError::ChunkIndexOutOfRange {
                index,
                len: self.chunks.len(),
            });
        }
        
        let tree = self.get_tree_with(builder)?;
        
        indices
            .iter()
            .map(|&index| {
                Ok(ChunkProof {
                    index,
                    chunk: self.chunks[index].clone(),
                    proof: tree.prove(chunk_gindex::<C>(index))?,
                })
            })
            .collect()
    }
}

impl ProofVerifier {
    /// 验证一组 chunk 证明，任一失败即返回 false
    pub fn verify_chunk_proofs<C: ChunkCapacity, H: NodeHasher>(
        builder: &TreeBuilder<H>,
        proofs: &[ChunkProof],
        root: B256,
    ) -> Result<bool, MerkleError> {
        for proof in proofs {
            if !proof.verify::<C, H>(builder, root)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
