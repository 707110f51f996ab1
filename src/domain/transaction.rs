// ==========================================
// 仓储运营分析系统 - 作业流水领域模型
// ==========================================
// 依据: ZRW70 作业流水导出字段
// 一行对应一次库内移动记录，加载后不可变
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

// ==========================================
// 原始流水记录（字段映射后、校验前的中间结构）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransactionRecord {
    pub material_id: Option<String>,        // 物料号（已去除 ".0" 浮点尾巴）
    pub material_desc: Option<String>,      // 物料描述
    pub reference_document: Option<String>, // 参考凭证号（拣货单）
    pub storage_zone: Option<String>,       // 建议库区 (Storage Type Suggestion)
    pub quantity_marker: Option<String>,    // 数量标记列 (TO Dummy)，缺失行在数据准备时丢弃
    pub quantity: Option<f64>,              // 拣货数量 (TO Dummy Quantity)
    pub uom_actual: Option<String>,         // 实际计量单位 (UOM Actual)
    pub movement_type: Option<String>,      // 操作类型（可选列）
    pub confirm_time: Option<NaiveDateTime>, // 确认时间 (Confirm 1 Time)
    pub created_time: Option<NaiveTime>,    // 创建时刻 (Created Time, HH:MM:SS)
    pub created_date: Option<NaiveDate>,    // 创建日期 (Created Date, Excel 序列日期)
    pub row_number: usize,                  // 源文件行号（从 1 计数，用于报错定位）
}

// ==========================================
// 作业流水行（校验通过的流水记录）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
    pub material_id: String,                 // 物料号（必填）
    pub material_desc: Option<String>,       // 物料描述
    pub reference_document: Option<String>,  // 参考凭证号
    pub storage_zone: Option<String>,        // 建议库区
    pub quantity_marker: Option<String>,     // 数量标记列
    pub quantity: Option<f64>,               // 拣货数量
    pub uom_actual: Option<String>,          // 实际计量单位
    pub movement_type: Option<String>,       // 操作类型
    pub confirm_time: Option<NaiveDateTime>, // 确认时间
    pub created_time: Option<NaiveTime>,     // 创建时刻
    pub created_date: Option<NaiveDate>,     // 创建日期
}

// ==========================================
// 分析行（流水与物料组主数据左连接后的行）
// ==========================================
// 由 DatasetPreparer 产出；缺少数量标记的行已丢弃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRow {
    pub material_id: String,                 // 物料号
    pub material_desc: Option<String>,       // 物料描述
    pub reference_document: String,          // 参考凭证号（布局分析按凭证聚合）
    pub storage_zone: Option<String>,        // 建议库区
    pub quantity: Option<f64>,               // 拣货数量
    pub confirm_time: Option<NaiveDateTime>, // 确认时间（拣货顺序依据）
    pub category_lvl1: Option<String>,       // 产品层级 1 - 类别
    pub type_lvl2: Option<String>,           // 产品层级 2 - 类型
    pub group_lvl3: Option<String>,          // 产品层级 3 - 组
    pub material_group: Option<String>,      // 物料组 (Material Group 2)，布局分析的分组标签
}

// ==========================================
// 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,        // 源文件数据行数（不含表头）
    pub imported: usize,          // 成功导入行数
    pub dropped_missing_id: usize, // 因物料号缺失被丢弃的行数
}

impl TransactionRow {
    /// 判断该行是否属于指定库区
    pub fn in_zone(&self, zone: &str) -> bool {
        self.storage_zone.as_deref() == Some(zone)
    }
}
