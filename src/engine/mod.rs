//! 语言反馈引擎
//!
//! 所有对外部语言模型的调用都从这里走，其余模块只依赖 `TextGeneration` 接口。
//! `analyzer` 负责按反馈类别编排生成，`scoring` 提供确定性的启发式评分，
//! 两者互不依赖：引擎不可用时评分依然成立。

pub mod analyzer;
pub mod openai;
pub mod scoring;

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

/// 文本生成接口
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// 按系统提示与用户提示生成一段文本
    async fn generate(&self, system: &str, prompt: &str) -> Result<String>;
}

/// 按配置创建引擎实例
pub fn create_engine() -> Result<Arc<dyn TextGeneration>> {
    let engine = openai::OpenAiEngine::new()?;
    Ok(Arc::new(engine))
}
