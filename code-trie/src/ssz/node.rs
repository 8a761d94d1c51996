//! 树节点类型

use alloy_primitives::B256;
use super::{MerkleError, NodeHasher};

/// Merkle 树节点
/// 
/// 每个内部节点独占其左右子节点，摘要在构造时计算一次
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// 32 字节叶子
    Leaf(B256),
    /// 内部节点
    Inner {
        left: Box<Node>,
        right: Box<Node>,
        /// hash(left ‖ right)
        hash: B256,
    },
}

impl Node {
    /// 创建叶子节点
    pub fn leaf(value: B256) -> Self {
        Node::Leaf(value)
    }
    
    /// 创建内部节点并计算摘要
    pub fn inner<H: NodeHasher>(hasher: &H, left: Node, right: Node) -> Self {
        let hash = hasher.hash_pair(&left.hash(), &right.hash());
        Node::Inner {
            left: Box::new(left),
            right: Box::new(right),
            hash,
        }
    }
    
    /// 节点摘要
    pub fn hash(&self) -> B256 {
        match self {
            Node::Leaf(value) => *value,
            Node::Inner { hash, .. } => *hash,
        }
    }
    
    /// 是否为叶子
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }
    
    /// 树深度（叶子为 0）
    /// 
    /// 构建器产生的树都是满二叉树，沿左侧下降即可
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Node::Inner { left, .. } = node {
            depth += 1;
            node = left;
        }
        depth
    }
    
    /// 叶子数量
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Inner { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
    
    /// 按广义索引（generalized index）取子节点
    /// 
    /// 根节点索引为 1，节点 `g` 的子节点为 `2g` 和 `2g + 1`
    pub fn get(&self, gindex: u64) -> Result<&Node, MerkleError> {
        if gindex == 0 {
            return Err(MerkleError::InvalidGeneralizedIndex(gindex));
        }
        
        let depth = 63 - gindex.leading_zeros();
        let mut node = self;
        for bit in (0..depth).rev() {
            node = match node {
                Node::Inner { left, right, .. } => {
                    if (gindex >> bit) & 1 == 0 { left } else { right }
                }
                Node::Leaf(_) => return Err(MerkleError::InvalidGeneralizedIndex(gindex)),
            };
        }
        
        Ok(node)
    }
}

impl From<B256> for Node {
    fn from(value: B256) -> Self {
        Node::Leaf(value)
    }
}
