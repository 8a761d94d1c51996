//! 合约字节码
//! 
//! 将字节码切分为 32 字节的 chunk，并计算每个 chunk 的第一条指令偏移（FIO）

use alloy_primitives::{keccak256, Bytes, B256};
use revm::interpreter::opcode::{PUSH1, PUSH32};
use serde::{Deserialize, Serialize};
use super::{ChunkCapacity, Chunk, CodeTrie, Metadata, CHUNK_SIZE};
use crate::ssz::MerkleError;

/// 当前的元数据版本
pub const CODE_TRIE_VERSION: u8 = 0;

/// 空代码的 keccak256 哈希
pub const EMPTY_CODE_HASH: B256 = B256::new([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c,
    0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b,
    0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// 合约字节码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCode {
    /// 字节码哈希
    pub code_hash: B256,
    
    /// 字节码内容
    pub code: Bytes,
}

impl ContractCode {
    /// 创建新的字节码条目
    pub fn new(code: impl Into<Bytes>) -> Self {
        let code = code.into();
        let code_hash = keccak256(&code);
        
        Self { code_hash, code }
    }
    
    /// 从已知哈希创建
    pub fn with_hash(code_hash: B256, code: Bytes) -> Self {
        Self { code_hash, code }
    }
    
    /// 从十六进制字符串创建，允许 `0x` 前缀
    pub fn from_hex(hex_str: &str) -> Result<Self, MerkleError> {
        let hex_clean = hex_str.trim_start_matches("0x").trim_start_matches("0X");
        let code = hex::decode(hex_clean)
            .map_err(|e| MerkleError::InvalidHex(e.to_string()))?;
        
        Ok(Self::new(code))
    }
    
    /// 获取字节码大小
    pub fn size(&self) -> usize {
        self.code.len()
    }
    
    /// 检查是否为空代码
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
    
    /// 验证代码哈希
    pub fn verify_hash(&self) -> bool {
        keccak256(&self.code) == self.code_hash
    }
    
    /// chunk 数量
    pub fn chunk_count(&self) -> usize {
        self.code.len().div_ceil(CHUNK_SIZE)
    }
    
    /// 生成元数据
    /// 
    /// 代码长度必须能用 uint16 表示
    pub fn metadata(&self) -> Result<Metadata, MerkleError> {
        let code_length = u16::try_from(self.code.len()).map_err(|_| MerkleError::CodeTooLarge {
            len: self.code.len(),
            max: u16::MAX as usize,
        })?;
        
        Ok(Metadata::new(CODE_TRIE_VERSION, self.code_hash, code_length))
    }
    
    /// 切分为 chunk
    /// 
    /// 末尾不足 32 字节的 chunk 右侧补零
    pub fn chunkify(&self) -> Vec<Chunk> {
        let fios = first_instruction_offsets(&self.code);
        
        self.code
            .chunks(CHUNK_SIZE)
            .zip(fios)
            .map(|(code, fio)| Chunk::padded(fio, code))
            .collect()
    }
    
    /// 构建 CodeTrie
    pub fn to_code_trie<C: ChunkCapacity>(&self) -> Result<CodeTrie<C>, MerkleError> {
        let metadata = self.metadata()?;
        
        let chunk_count = self.chunk_count();
        if chunk_count > C::CAPACITY {
            return Err(MerkleError::CapacityExceeded {
                len: chunk_count,
                capacity: C::CAPACITY,
            });
        }
        
        Ok(CodeTrie::new(metadata, self.chunkify()))
    }
}

/// PUSH1..PUSH32 携带的立即数字节数，其他操作码为 0
fn immediate_size(opcode: u8) -> usize {
    if (PUSH1..=PUSH32).contains(&opcode) {
        (opcode - PUSH1) as usize + 1
    } else {
        0
    }
}

/// 计算每个 chunk 的 FIO
/// 
/// 顺序扫描整段代码，跳过 PUSH 的立即数；chunk 内没有任何指令起点
/// （整个 chunk 都是 PUSH 数据）时 FIO 为 32
fn first_instruction_offsets(code: &[u8]) -> Vec<u8> {
    let mut fios = vec![CHUNK_SIZE as u8; code.len().div_ceil(CHUNK_SIZE)];
    
    let mut pc = 0;
    while pc < code.len() {
        let chunk = pc / CHUNK_SIZE;
        if fios[chunk] as usize == CHUNK_SIZE {
            fios[chunk] = (pc % CHUNK_SIZE) as u8;
        }
        pc += 1 + immediate_size(code[pc]);
    }
    
    fios
}
