// ==========================================
// 仓储运营分析系统 - API 层
// ==========================================
// 职责: 提供报表业务 API 接口,供 CLI 调用
// ==========================================

pub mod error;
pub mod layout_api;
pub mod replenishment_api;
pub mod stock_planning_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use layout_api::{LayoutApi, LayoutReport, LayoutRequest};
pub use replenishment_api::{ReplenishmentApi, ReplenishmentReport, ReplenishmentRequest};
pub use stock_planning_api::{StockPlanReport, StockPlanRequest, StockPlanningApi};
