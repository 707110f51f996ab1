// ==========================================
// 仓储运营分析系统 - 最小/最大库存计划引擎
// ==========================================
// 职责: 基于历史日均箱数计算各物料的最小/最大库存
// 输入: 库存分析记录 + 计量单位换算表 + 均值口径与倍数
// 输出: 保持输入顺序的 StockPlanRow 计划表
// ==========================================

use crate::domain::master::UomConversion;
use crate::domain::replenishment::{StockAnalysisRecord, StockPlanRow};
use crate::domain::types::AvgColumn;
use crate::engine::search::SearchFilter;
use std::collections::HashMap;
use tracing::info;

// ==========================================
// StockPlanner - 最小/最大库存计划引擎
// ==========================================
pub struct StockPlanner {
    // 无状态引擎,不需要注入依赖
}

impl StockPlanner {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 StockPlanner 实例
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算最小/最大库存计划
    ///
    /// 计算规则:
    /// - Min(箱) = round(所选均值)，均值缺失按 0
    /// - Max(箱) = round(所选均值 × 倍数)，均值缺失按 0
    /// - Min/Max(件) = round(取整后的箱数 × 每箱件数)，换算系数缺失按 0
    /// 取整为四舍五入（0.5 进位），结果保持输入记录的顺序。
    ///
    /// # 参数
    /// - `records`: 库存分析记录
    /// - `conversions`: 物料号 → 计量单位换算
    /// - `avg_column`: 均值口径（上月 / 近 14 天 / 近 3 天）
    /// - `max_multiplier`: 最大库存倍数（调用方保证在 1.0..=3.0 内）
    ///
    /// # 返回
    /// 库存计划表
    pub fn plan(
        &self,
        records: &[StockAnalysisRecord],
        conversions: &HashMap<String, UomConversion>,
        avg_column: AvgColumn,
        max_multiplier: f64,
    ) -> Vec<StockPlanRow> {
        let plan: Vec<StockPlanRow> = records
            .iter()
            .map(|record| {
                let avg = self.chosen_avg(record, avg_column).unwrap_or(0.0);
                let pieces_per_box = conversions
                    .get(&record.material_id)
                    .and_then(|c| c.usable_factor());

                let min_box = avg.round() as i64;
                let max_box = (avg * max_multiplier).round() as i64;
                let pieces = pieces_per_box.unwrap_or(0.0);

                StockPlanRow {
                    product_name: record.product_name.clone(),
                    material_id: record.material_id.clone(),
                    movement_category: record.movement_category.clone(),
                    assessment: record.assessment.clone(),
                    avg_month1_box: record.avg_month1_box,
                    avg_last14_box: record.avg_last14_box,
                    avg_last3_box: record.avg_last3_box,
                    stock_box: record.stock_box,
                    pieces_per_box,
                    min_box,
                    max_box,
                    min_pcs: (min_box as f64 * pieces).round() as i64,
                    max_pcs: (max_box as f64 * pieces).round() as i64,
                }
            })
            .collect();

        info!(
            records = records.len(),
            avg_column = %avg_column,
            max_multiplier,
            "库存计划计算完成"
        );
        plan
    }

    /// 应用报表视图过滤（不影响导出用的完整计划表）
    ///
    /// 搜索词条匹配物料号与品名，词条间为 OR 关系。
    ///
    /// # 参数
    /// - `rows`: 计划表行
    /// - `search`: 搜索串；None 或全空白表示不过滤
    ///
    /// # 返回
    /// 过滤后的计划表行
    pub fn filter_rows(&self, rows: &[StockPlanRow], search: Option<&str>) -> Vec<StockPlanRow> {
        let filter = SearchFilter::new(search);
        rows.iter()
            .filter(|r| filter.matches(&r.material_id, r.product_name.as_deref()))
            .cloned()
            .collect()
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 取所选口径的日均箱数
    fn chosen_avg(&self, record: &StockAnalysisRecord, avg_column: AvgColumn) -> Option<f64> {
        match avg_column {
            AvgColumn::PickingMonth1 => record.avg_month1_box,
            AvgColumn::Last14Days => record.avg_last14_box,
            AvgColumn::Last3Days => record.avg_last3_box,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for StockPlanner {
    fn default() -> Self {
        Self::new()
    }
}
