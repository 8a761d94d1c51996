//! Merkle Proof 生成与验证
//! 
//! 基于广义索引（generalized index）的单叶子证明，用于无状态验证代码片段

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use super::{MerkleError, Node, NodeHasher};

/// 广义索引：根为 1，节点 `g` 的子节点为 `2g`、`2g + 1`
pub type GeneralizedIndex = u64;

/// 广义索引的深度（根为 0），索引 0 无效时返回 `None`
pub fn gindex_depth(gindex: GeneralizedIndex) -> Option<u32> {
    63u32.checked_sub(gindex.leading_zeros())
}

/// 子树内第 `index` 个位置的广义索引
/// 
/// `root` 为子树根的广义索引，`depth` 为子树深度
pub fn subtree_gindex(root: GeneralizedIndex, depth: u32, index: u64) -> GeneralizedIndex {
    (root << depth) | index
}

/// Merkle 证明
/// 
/// 包含目标节点的摘要，以及自底向上的兄弟节点哈希
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// 目标节点的广义索引
    pub gindex: GeneralizedIndex,
    
    /// 目标节点的摘要
    pub leaf: B256,
    
    /// 证明路径（兄弟节点哈希，从叶子一侧到根一侧）
    pub branch: Vec<B256>,
}

impl MerkleProof {
    /// 创建新的 Merkle 证明
    pub fn new(gindex: GeneralizedIndex, leaf: B256, branch: Vec<B256>) -> Self {
        Self {
            gindex,
            leaf,
            branch,
        }
    }
    
    /// 沿证明路径向上计算根哈希
    pub fn compute_root<H: NodeHasher>(&self, hasher: &H) -> Result<B256, MerkleError> {
        match gindex_depth(self.gindex) {
            Some(depth) if self.branch.len() == depth as usize => {}
            _ => return Err(MerkleError::InvalidGeneralizedIndex(self.gindex)),
        }
        
        let mut index = self.gindex;
        let mut current = self.leaf;
        for sibling in &self.branch {
            current = if index & 1 == 1 {
                hasher.hash_pair(sibling, &current)
            } else {
                hasher.hash_pair(&current, sibling)
            };
            index >>= 1;
        }
        
        Ok(current)
    }
    
    /// 验证证明
    pub fn verify<H: NodeHasher>(&self, hasher: &H, root: B256) -> bool {
        matches!(self.compute_root(hasher), Ok(computed) if computed == root)
    }
}

impl Node {
    /// 生成指定广义索引处节点的证明
    pub fn prove(&self, gindex: GeneralizedIndex) -> Result<MerkleProof, MerkleError> {
        let depth = gindex_depth(gindex).ok_or(MerkleError::InvalidGeneralizedIndex(gindex))?;
        let mut branch = Vec::with_capacity(depth as usize);
        let mut node = self;
        
        // 自顶向下收集兄弟节点
        for bit in (0..depth).rev() {
            node = match node {
                Node::Inner { left, right, .. } => {
                    if (gindex >> bit) & 1 == 0 {
                        branch.push(right.hash());
                        left
                    } else {
                        branch.push(left.hash());
                        right
                    }
                }
                Node::Leaf(_) => return Err(MerkleError::InvalidGeneralizedIndex(gindex)),
            };
        }
        branch.reverse();
        
        Ok(MerkleProof::new(gindex, node.hash(), branch))
    }
}

/// 证明验证器
pub struct ProofVerifier;

impl ProofVerifier {
    /// 验证单个证明
    pub fn verify_proof<H: NodeHasher>(hasher: &H, proof: &MerkleProof, root: B256) -> bool {
        proof.verify(hasher, root)
    }
    
    /// 验证一组针对同一根的证明，任一失败即返回 false
    pub fn verify_all<H: NodeHasher>(hasher: &H, proofs: &[MerkleProof], root: B256) -> bool {
        proofs.iter().all(|proof| proof.verify(hasher, root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssz::{leaf_from_u8, Sha256Hasher, TreeBuilder};
    
    fn tree(n: usize) -> Node {
        let leaves = (0..n).map(|i| Node::leaf(leaf_from_u8(i as u8 + 1))).collect();
        TreeBuilder::new().tree_from_nodes(leaves)
    }
    
    #[test]
    fn test_gindex_helpers() {
        assert_eq!(gindex_depth(0), None);
        assert_eq!(gindex_depth(1), Some(0));
        assert_eq!(gindex_depth(7), Some(2));
        assert_eq!(gindex_depth(u64::MAX), Some(63));
        assert_eq!(subtree_gindex(6, 2, 3), 27);
        assert_eq!(subtree_gindex(1, 3, 0), 8);
    }
    
    #[test]
    fn test_prove_and_verify_every_leaf() {
        let root = tree(8);
        
        for i in 0..8u64 {
            let proof = root.prove(8 + i).unwrap();
            assert_eq!(proof.leaf, leaf_from_u8(i as u8 + 1));
            assert_eq!(proof.branch.len(), 3);
            assert!(proof.verify(&Sha256Hasher, root.hash()));
        }
    }
    
    #[test]
    fn test_prove_inner_node() {
        let root = tree(4);
        let proof = root.prove(3).unwrap();
        
        assert_eq!(proof.leaf, root.get(3).unwrap().hash());
        assert!(ProofVerifier::verify_proof(&Sha256Hasher, &proof, root.hash()));
    }
    
    #[test]
    fn test_tampered_proof_rejected() {
        let root = tree(4);
        let mut proof = root.prove(5).unwrap();
        
        proof.leaf = leaf_from_u8(99);
        assert!(!proof.verify(&Sha256Hasher, root.hash()));
        
        let mut proof = root.prove(5).unwrap();
        proof.gindex = 6;
        assert!(!proof.verify(&Sha256Hasher, root.hash()));
        
        let mut proof = root.prove(5).unwrap();
        proof.branch.pop();
        assert_eq!(
            proof.compute_root(&Sha256Hasher),
            Err(MerkleError::InvalidGeneralizedIndex(5))
        );
    }
    
    #[test]
    fn test_prove_out_of_tree() {
        let root = tree(2);
        assert_eq!(root.prove(4), Err(MerkleError::InvalidGeneralizedIndex(4)));
        assert_eq!(root.prove(0), Err(MerkleError::InvalidGeneralizedIndex(0)));
        
        let zero = MerkleProof::new(0, B256::ZERO, vec![]);
        assert_eq!(
            zero.compute_root(&Sha256Hasher),
            Err(MerkleError::InvalidGeneralizedIndex(0))
        );
        assert!(!zero.verify(&Sha256Hasher, B256::ZERO));
    }
    
    #[test]
    fn test_verify_all() {
        let root = tree(4);
        let proofs: Vec<_> = (4..8).map(|g| root.prove(g).unwrap()).collect();
        
        assert!(ProofVerifier::verify_all(&Sha256Hasher, &proofs, root.hash()));
        assert!(!ProofVerifier::verify_all(&Sha256Hasher, &proofs, B256::ZERO));
    }
}
