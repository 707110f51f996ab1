// ==========================================
// 仓储运营分析系统 - 核心库
// ==========================================
// 数据来源: WMS 导出报表 (ZRW70 作业流水 / ZRW12 单位换算)
// 系统定位: 决策支持系统 (分析建议, 人工最终决定)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 分析算法
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能统计
pub mod perf;

// API 层 - 报表接口
pub mod api;

// 应用层 - 会话状态
pub mod app;

// 报表导出
pub mod export;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AvgColumn, MovementFilter, TimeInterval, UomCode, ZoneCode};

// 领域实体
pub use domain::{
    GridSlot, GroupPriority, LayoutAssignment, MaterialGroupMaster, ReplenishmentRow,
    StockPlanRow, TransactionRow, UomConversion, ZoneLayout,
};

// 引擎
pub use engine::{
    AgglomerativeClusterer, CoOccurrenceBuilder, DatasetPreparer, LayoutAssigner,
    PickPriorityScorer, ReplenishmentAggregator, StockPlanner,
};

// API
pub use api::{LayoutApi, ReplenishmentApi, StockPlanningApi};

// 会话状态
pub use app::SessionContext;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓储运营分析系统";

// ==========================================
// 预编译检查
// ==========================================
