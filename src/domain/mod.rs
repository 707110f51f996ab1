// ==========================================
// 仓储运营分析系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件解析逻辑, 不含引擎逻辑
// ==========================================

pub mod layout;
pub mod master;
pub mod replenishment;
pub mod transaction;
pub mod types;

// 重导出核心类型
pub use layout::{ClusterSummary, GridSlot, GroupPriority, LayoutAssignment, ZoneLayout};
pub use master::{MaterialGroupMaster, UomConversion};
pub use replenishment::{ReplenishmentRow, StockAnalysisRecord, StockPlanRow};
pub use transaction::{AnalysisRow, ImportSummary, RawTransactionRecord, TransactionRow};
pub use types::{AvgColumn, MovementFilter, TimeInterval, UomCode, ZoneCode};
