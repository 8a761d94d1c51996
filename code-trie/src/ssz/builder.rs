//! 树构建器
//! 
//! 在有序节点序列上构建平衡二叉 Merkle 树，不足 2 的幂时用全零叶子补齐

use tracing::trace;
use super::{empty_leaf, leaf_from_u64, MerkleError, Node, NodeHasher, Sha256Hasher};

/// 树构建器
/// 
/// 持有节点哈希函数，默认使用 SHA256
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder<H = Sha256Hasher> {
    hasher: H,
}

impl TreeBuilder<Sha256Hasher> {
    /// 创建使用 SHA256 的构建器
    pub fn new() -> Self {
        Self { hasher: Sha256Hasher }
    }
}

impl<H: NodeHasher> TreeBuilder<H> {
    /// 使用指定哈希函数创建构建器
    pub fn with_hasher(hasher: H) -> Self {
        Self { hasher }
    }
    
    /// 获取哈希函数
    pub fn hasher(&self) -> &H {
        &self.hasher
    }
    
    /// 从节点序列构建树
    /// 
    /// - 空序列返回全零叶子
    /// - 否则补齐到 `n.next_power_of_two()` 后两两配对，节点 `i` 始终位于叶子位置 `i`
    pub fn tree_from_nodes(&self, nodes: Vec<Node>) -> Node {
        if nodes.is_empty() {
            return Node::leaf(empty_leaf());
        }
        
        let width = nodes.len().next_power_of_two();
        self.build(nodes, width)
    }
    
    /// 从节点序列构建树，补齐到指定容量
    /// 
    /// 容量必须是 2 的幂且不小于节点数
    pub fn tree_from_nodes_with_capacity(
        &self,
        nodes: Vec<Node>,
        capacity: usize,
    ) -> Result<Node, MerkleError> {
        if !capacity.is_power_of_two() {
            return Err(MerkleError::InvalidCapacity(capacity));
        }
        if nodes.len() > capacity {
            return Err(MerkleError::CapacityExceeded {
                len: nodes.len(),
                capacity,
            });
        }
        
        Ok(self.build(nodes, capacity))
    }
    
    /// 有界列表：按容量补齐后混入真实长度
    /// 
    /// 结果为 `tree_from_nodes([padded_root, leaf_from_u64(len)])`，
    /// 内容或长度任一变化都会改变根哈希
    pub fn tree_from_nodes_with_mixin(
        &self,
        sub_roots: Vec<Node>,
        capacity: usize,
    ) -> Result<Node, MerkleError> {
        let len = sub_roots.len();
        if len > capacity {
            return Err(MerkleError::CapacityExceeded { len, capacity });
        }
        
        // 1. 按声明容量（而非实际长度）补齐
        let padded = self.tree_from_nodes_with_capacity(sub_roots, capacity)?;
        
        // 2. 长度叶子
        let length_leaf = Node::leaf(leaf_from_u64(len as u64));
        
        trace!(len, capacity, data_root = %padded.hash(), "mixing in list length");
        
        // 3. 组合为新的两叶子树
        Ok(self.tree_from_nodes(vec![padded, length_leaf]))
    }
    
    /// 自底向上两两配对，`width` 必须是 2 的幂且不小于节点数
    fn build(&self, mut layer: Vec<Node>, width: usize) -> Node {
        debug_assert!(width.is_power_of_two() && width >= layer.len());
        
        layer.resize(width, Node::leaf(empty_leaf()));
        
        while layer.len() > 1 {
            let mut parents = Vec::with_capacity(layer.len() / 2);
            let mut iter = layer.into_iter();
            while let (Some(left), Some(right)) = (iter.next(), iter.next()) {
                parents.push(Node::inner(&self.hasher, left, right));
            }
            layer = parents;
        }
        
        layer
            .into_iter()
            .next()
            .unwrap_or_else(|| Node::leaf(empty_leaf()))
    }
}
