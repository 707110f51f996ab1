// ==========================================
// 仓储运营分析系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("物料组集合为空，无法进行聚类")]
    EmptyGroupSet,

    #[error("矩阵维度不一致: 期望 {expected}, 实际 {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("聚类数不合法: {0}（必须 ≥ 1 且 ≤ 组数）")]
    InvalidClusterCount(usize),

    #[error("网格行数不合法: {0}（必须 ≥ 1）")]
    InvalidGridRows(u32),

    #[error("内部错误: {0}")]
    InternalError(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
