//! 计算合约字节码的 CodeTrie 根并生成 chunk witness
//! 
//! 运行：`RUST_LOG=debug cargo run --example code_root`

use anyhow::Result;
use code_trie::schema::{Big, ContractCode, Small};
use code_trie::ssz::{ProofVerifier, TreeBuilder};
use code_trie::trie::{CodeRootCalculator, MerkleizeOptions};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// 一段简单的合约初始化代码
const SAMPLE_CODE: &str = "6080604052348015600f57600080fd5b50603f80601d6000396000f3fe6080604052600080fdfea2646970667358221220";

fn main() -> Result<()> {
    // 初始化日志
    fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
    
    let options = MerkleizeOptions::from_json(r#"{ "parallel": true, "parallel_threshold": 2 }"#)?;
    let calculator = CodeRootCalculator::with_options(TreeBuilder::new(), options)?;
    
    let contract = ContractCode::from_hex(SAMPLE_CODE)?;
    info!("📦 合约代码: {} 字节, {} 个 chunk", contract.size(), contract.chunk_count());
    info!("   代码哈希: {}", contract.code_hash);
    
    // 小容量
    match calculator.calculate_code::<Small>(&contract) {
        Ok(root) => info!("✅ CodeTrieSmall 根: {}", root),
        Err(e) => warn!("⚠️  CodeTrieSmall 计算失败: {}", e),
    }
    
    // 大容量
    let trie = contract.to_code_trie::<Big>()?;
    let root = calculator.calculate(&trie)?;
    info!("✅ CodeTrieBig 根: {}", root);
    
    for chunk in &trie.chunks {
        info!("   fio = {:>2}, code = 0x{}", chunk.fio, hex::encode(&chunk.code));
    }
    
    // 为第一个 chunk 生成 witness
    let builder = TreeBuilder::new();
    let proofs = trie.prove_chunks_with(&builder, &[0])?;
    let valid = ProofVerifier::verify_chunk_proofs::<Big, _>(&builder, &proofs, root)?;
    info!("🔍 chunk 0 witness 验证: {}", valid);
    info!("{}", serde_json::to_string_pretty(&proofs[0])?);
    
    Ok(())
}
