//! 数据结构定义
//! 
//! 定义元数据、代码片段、CodeTrie 以及字节码切分

pub mod metadata;
pub mod chunk;
pub mod code_trie;
pub mod code;

pub use metadata::Metadata;
pub use chunk::{Chunk, CHUNK_SIZE};
pub use code_trie::{Big, ChunkCapacity, CodeTrie, CodeTrieBig, CodeTrieSmall, Small};
pub use code::{ContractCode, CODE_TRIE_VERSION, EMPTY_CODE_HASH};
