// ==========================================
// 课程排课系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户可读的错误消息
// ==========================================

use crate::engine::SchedulerError;
use crate::importer::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 排课错误
    // ==========================================
    #[error("排课正在进行中, 请稍后再试")]
    GenerationInProgress,

    #[error("排课已取消: 已写入 {placed_so_far} 条落位")]
    GenerationCancelled { placed_so_far: usize },

    #[error("排课失败: {0}")]
    SchedulingFailed(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入/配置错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 SchedulerError 转换
// ==========================================
impl From<SchedulerError> for ApiError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::EmptyRoomInventory { .. } => {
                ApiError::BusinessRuleViolation(err.to_string())
            }
            SchedulerError::Cancelled { placed_so_far } => {
                ApiError::GenerationCancelled { placed_so_far }
            }
            SchedulerError::Persistence(inner) => {
                ApiError::SchedulingFailed(format!("落位持久化失败: {}", inner))
            }
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_business_errors() {
        let err: ApiError = RepositoryError::UniqueConstraintViolation("batch.name".into()).into();
        assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

        let err: ApiError = RepositoryError::NotFound {
            entity: "Batch".into(),
            id: "7".into(),
        }
        .into();
        assert_eq!(err.to_string(), "资源未找到: Batch(id=7)不存在");

        let err: ApiError = RepositoryError::LockError("poisoned".into()).into();
        assert!(matches!(err, ApiError::DatabaseConnectionError(_)));

        let err: ApiError = RepositoryError::DatabaseQueryError("disk I/O error".into()).into();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_scheduler_errors_map() {
        let err: ApiError = SchedulerError::EmptyRoomInventory { request_count: 3 }.into();
        assert!(matches!(err, ApiError::BusinessRuleViolation(_)));

        let err: ApiError = SchedulerError::Cancelled { placed_so_far: 2 }.into();
        assert!(matches!(err, ApiError::GenerationCancelled { placed_so_far: 2 }));
    }
}
