// ==========================================
// 仓储运营分析系统 - 补货与库存计划领域模型
// ==========================================
// 依据: ZRW70 作业流水 / 库存分析导出文件
// ==========================================

use crate::domain::types::{AvgColumn, TimeInterval};
use serde::{Deserialize, Serialize};

// ==========================================
// 补货时段汇总行
// ==========================================
// 先按 (物料, 日期, 时段[, 操作类型]) 求日合计，
// 再对日合计跨天求 min/max/mean；箱数换算失败时对应列为 None
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentRow {
    pub material_id: String,            // 物料号
    pub material_desc: Option<String>,  // 物料描述
    pub movement_type: Option<String>,  // 操作类型（源数据无该列或缺失时为 None，展示为 N/A）
    pub interval: TimeInterval,         // 补货时段
    pub uom_actual: Option<String>,     // 原生计量单位
    pub days_observed: u32,             // 参与统计的天数
    pub min_qty: f64,                   // 日合计最小值（原生单位）
    pub max_qty: f64,                   // 日合计最大值（原生单位）
    pub avg_qty: f64,                   // 日合计均值（原生单位）
    pub min_box: Option<f64>,           // 日合计最小值（箱）
    pub max_box: Option<f64>,           // 日合计最大值（箱）
    pub avg_box: Option<f64>,           // 日合计均值（箱）
}

// ==========================================
// 库存分析导出记录（最小/最大库存计算的输入）
// ==========================================
// 源文件前 3 行为横幅说明行，读取时跳过
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAnalysisRecord {
    pub product_name: Option<String>,      // 品名
    pub material_id: String,               // 物料号
    pub movement_category: Option<String>, // 零售移动类别
    pub assessment: Option<String>,        // 最小/最大建议评估
    pub avg_month1_box: Option<f64>,       // 上月日均拣货箱数
    pub avg_last14_box: Option<f64>,       // 近 14 天日均箱数
    pub avg_last3_box: Option<f64>,        // 近 3 天日均箱数
    pub stock_box: Option<f64>,            // 当前库存箱数
    pub xdays: Option<String>,             // 可售天数（源列原样保留）
}

// ==========================================
// 最小/最大库存计划行
// ==========================================
// Min = 所选均值取整; Max = 均值 × 倍数取整; 件数 = 箱数 × 每箱件数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockPlanRow {
    pub product_name: Option<String>,      // 品名
    pub material_id: String,               // 物料号
    pub movement_category: Option<String>, // 零售移动类别
    pub assessment: Option<String>,        // 最小/最大建议评估
    pub avg_month1_box: Option<f64>,       // 上月日均拣货箱数
    pub avg_last14_box: Option<f64>,       // 近 14 天日均箱数
    pub avg_last3_box: Option<f64>,        // 近 3 天日均箱数
    pub stock_box: Option<f64>,            // 当前库存箱数
    pub pieces_per_box: Option<f64>,       // 每箱件数换算系数
    pub min_box: i64,                      // 最小库存（箱）
    pub max_box: i64,                      // 最大库存（箱）
    pub min_pcs: i64,                      // 最小库存（件）
    pub max_pcs: i64,                      // 最大库存（件）
}

impl ReplenishmentRow {
    /// 操作类型展示值（缺失展示为 N/A，与筛选项一致）
    pub fn movement_display(&self) -> &str {
        self.movement_type.as_deref().unwrap_or("N/A")
    }
}

impl StockPlanRow {
    /// 按所选口径取日均箱数（报表展示与导出共用）
    pub fn avg_for(&self, column: AvgColumn) -> Option<f64> {
        match column {
            AvgColumn::PickingMonth1 => self.avg_month1_box,
            AvgColumn::Last14Days => self.avg_last14_box,
            AvgColumn::Last3Days => self.avg_last3_box,
        }
    }
}
