// ==========================================
// 仓储运营分析系统 - 引擎层
// ==========================================
// 职责: 实现布局/补货/库存计划的纯内存计算规则
// 红线: Engine 不做文件读写, 输入输出均为领域结构
// ==========================================

pub mod clustering;
pub mod co_occurrence;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod priority;
pub mod replenishment;
pub mod search;
pub mod stock_planning;

// 重导出核心引擎
pub use clustering::{AgglomerativeClusterer, DEFAULT_MAX_CLUSTERS};
pub use co_occurrence::{CoOccurrenceBuilder, CoOccurrenceMatrix};
pub use dataset::DatasetPreparer;
pub use error::{EngineError, EngineResult};
pub use layout::LayoutAssigner;
pub use priority::PickPriorityScorer;
pub use replenishment::ReplenishmentAggregator;
pub use search::SearchFilter;
pub use stock_planning::StockPlanner;
