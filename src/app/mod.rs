// ==========================================
// 仓储运营分析系统 - 应用层
// ==========================================
// 职责: 会话状态管理,连接 CLI 与 API 层
// ==========================================

pub mod state;

// 重导出
pub use state::{LoadedTransactions, SessionContext};
