// ==========================================
// 库存计划 API
// ==========================================
// 职责: 封装最小/最大库存水平计算
// 流程: 库存分析导入 → 单位换算表加载 → Min/Max 计算 → 可选筛选
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::replenishment::StockPlanRow;
use crate::domain::types::AvgColumn;
use crate::engine::StockPlanner;
use crate::importer::{StockAnalysisImporter, UomImporter};
use crate::perf::PerfGuard;

/// Max 倍率的合法区间
const MULTIPLIER_RANGE: (f64, f64) = (1.0, 3.0);

/// 库存计划请求参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPlanRequest {
    /// 库存分析文件路径 (Retail Warehouse Stock Analysis 导出)
    pub stock_analysis_file: String,
    /// 单位换算文件路径 (ZRW12-UoM 导出)
    pub uom_file: String,
    /// 日均箱数取值列（None 使用配置默认: month-1）
    pub avg_column: Option<String>,
    /// Max 库存倍率（None 使用配置默认: 1.5）
    pub max_multiplier: Option<f64>,
    /// 关键词搜索（空格分词，OR 语义；None 表示不筛选）
    pub search: Option<String>,
}

/// 库存计划响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPlanReport {
    /// 运行 ID
    pub run_id: String,
    /// 实际使用的日均箱数列
    pub avg_column: AvgColumn,
    /// 实际使用的 Max 倍率
    pub max_multiplier: f64,
    /// 筛选后的展示行（无筛选时与 table 相同）
    pub view: Vec<StockPlanRow>,
    /// 完整计划表（导出口径，不受筛选影响）
    pub table: Vec<StockPlanRow>,
    /// 分析耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 库存计划 API
pub struct StockPlanningApi {
    config: Arc<ConfigManager>,
}

impl StockPlanningApi {
    /// 创建新的 StockPlanningApi 实例
    pub fn new(config: Arc<ConfigManager>) -> Self {
        Self { config }
    }

    /// 生成最小/最大库存计划
    ///
    /// # 参数
    /// - request: 库存计划请求（库存分析文件 + 换算文件 + 参数）
    ///
    /// # 返回
    /// - Ok(StockPlanReport): 完整计划表与筛选后的视图
    /// - Err(ApiError): 参数校验失败 / 导入失败
    pub fn generate_stock_plan(&self, request: &StockPlanRequest) -> ApiResult<StockPlanReport> {
        let perf = PerfGuard::new("stock_plan_report");

        // 1. 参数校验
        let avg_column = self.resolve_avg_column(request.avg_column.as_deref())?;
        let max_multiplier = self.resolve_multiplier(request.max_multiplier)?;

        // 2. 库存分析与单位换算表加载
        let records = StockAnalysisImporter::new().load(&request.stock_analysis_file)?;
        let conversions = UomImporter::new().load(&request.uom_file)?;

        // 3. Min/Max 计算（完整表）
        let planner = StockPlanner::new();
        let table = planner.plan(&records, &conversions, avg_column, max_multiplier);

        // 4. 视图筛选（导出仍使用完整表）
        let view = planner.filter_rows(&table, request.search.as_deref());

        tracing::info!(
            avg_column = %avg_column,
            max_multiplier = max_multiplier,
            table_rows = table.len(),
            view_rows = view.len(),
            "库存计划计算完成"
        );

        Ok(StockPlanReport {
            run_id: Uuid::new_v4().to_string(),
            avg_column,
            max_multiplier,
            view,
            table,
            elapsed_ms: perf.elapsed_ms() as i64,
        })
    }

    /// 解析日均箱数列（None → 配置默认）
    fn resolve_avg_column(&self, raw: Option<&str>) -> ApiResult<AvgColumn> {
        match raw {
            Some(value) => AvgColumn::parse(value).ok_or_else(|| {
                ApiError::InvalidInput(format!(
                    "无法识别的日均列: {}（允许 month-1 / last-14-days / last-3-days）",
                    value
                ))
            }),
            // 配置仅提供倍率默认值；取值列固定默认上月口径
            None => Ok(AvgColumn::PickingMonth1),
        }
    }

    /// 解析 Max 倍率（None → 配置默认；区间 1.0..=3.0）
    fn resolve_multiplier(&self, raw: Option<f64>) -> ApiResult<f64> {
        let multiplier = match raw {
            Some(value) => value,
            None => self
                .config
                .get_default_max_multiplier()
                .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?,
        };

        let (low, high) = MULTIPLIER_RANGE;
        if !multiplier.is_finite() || multiplier < low || multiplier > high {
            return Err(ApiError::InvalidInput(format!(
                "Max 倍率超出范围: {}（允许 {:.1}..={:.1}）",
                multiplier, low, high
            )));
        }
        Ok(multiplier)
    }
}
