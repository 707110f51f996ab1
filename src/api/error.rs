// ==========================================
// 仓储运营分析系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换导入层/引擎层错误为用户可读的错误消息
// ==========================================

use crate::engine::EngineError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因，便于界面与 CLI 直接展示
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 参数校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据导入错误
    // ==========================================
    #[error("文件未找到: {0}")]
    FileNotFound(String),

    #[error("文件导入失败: {0}")]
    ImportFailure(String),

    // ==========================================
    // 业务结果错误
    // ==========================================
    #[error("结果为空: {0}")]
    EmptyResult(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// 目的: 将导入层的技术错误转换为用户可读的业务错误
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::FileNotFound(path),
            ImportError::EmptyFile(path) => {
                ApiError::EmptyResult(format!("文件无有效数据行: {}", path))
            }
            ImportError::MissingColumn { column } => {
                ApiError::InvalidInput(format!("缺少必需列: {}", column))
            }
            ImportError::UnsupportedFormat(path) => {
                ApiError::InvalidInput(format!("文件格式不支持: {}（仅支持 .xlsx/.xls/.csv）", path))
            }
            other => ApiError::ImportFailure(other.to_string()),
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptyGroupSet => {
                ApiError::EmptyResult("所选库区内没有可分析的物料组".to_string())
            }
            EngineError::InvalidGridRows(rows) => {
                ApiError::InvalidInput(format!("网格行数不合法: {}", rows))
            }
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::FileNotFound("/tmp/missing.csv".to_string()).into();
        match api_err {
            ApiError::FileNotFound(path) => assert_eq!(path, "/tmp/missing.csv"),
            _ => panic!("Expected FileNotFound"),
        }

        let api_err: ApiError = ImportError::MissingColumn {
            column: "Material ID".to_string(),
        }
        .into();
        match api_err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("Material ID")),
            _ => panic!("Expected InvalidInput"),
        }
    }

    #[test]
    fn test_engine_error_conversion() {
        let api_err: ApiError = EngineError::EmptyGroupSet.into();
        match api_err {
            ApiError::EmptyResult(msg) => assert!(msg.contains("物料组")),
            _ => panic!("Expected EmptyResult"),
        }

        let api_err: ApiError = EngineError::InvalidGridRows(0).into();
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
    }
}
