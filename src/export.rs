// ==========================================
// 仓储运营分析系统 - 报表导出
// ==========================================
// 职责: 三类分析结果的 CSV 落盘
// 口径: 始终导出完整表，不受视图筛选影响
// ==========================================

use std::error::Error;
use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::api::LayoutReport;
use crate::domain::replenishment::{ReplenishmentRow, StockPlanRow};
use crate::domain::types::AvgColumn;

// 补货分析表头（列序与零售侧报表习惯一致）
const REPLENISHMENT_HEADER: &[&str] = &[
    "Material ID",
    "Material Desc",
    "Movement Type",
    "Time Interval",
    "UOM",
    "Days Observed",
    "Min Total Quantity",
    "Max Total Quantity",
    "Average Total Quantity",
    "Min Total Quantity (BOX)",
    "Max Total Quantity (BOX)",
    "Average Total Quantity (BOX)",
];

// 布局分析表头
const LAYOUT_HEADER: &[&str] = &[
    "Zone",
    "Material Group",
    "Cluster Label",
    "Row",
    "Column",
    "Distance",
    "First Pick Frequency",
    "Picking Sequence Score",
    "Representative Material ID",
    "Representative Desc",
];

/// 导出补货分析完整表
///
/// # 参数
/// - `path`: 目标 CSV 路径
/// - `rows`: 完整聚合表（调用方传 `ReplenishmentReport::table`）
pub fn write_replenishment_csv<P: AsRef<Path>>(
    path: P,
    rows: &[ReplenishmentRow],
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(REPLENISHMENT_HEADER)?;
    for row in rows {
        wtr.write_record(&[
            row.material_id.clone(),
            row.material_desc.clone().unwrap_or_default(),
            row.movement_display().to_string(),
            row.interval.label().to_string(),
            row.uom_actual.clone().unwrap_or_default(),
            row.days_observed.to_string(),
            format_f64(row.min_qty),
            format_f64(row.max_qty),
            format_f64(row.avg_qty),
            format_opt_f64(row.min_box),
            format_opt_f64(row.max_box),
            format_opt_f64(row.avg_box),
        ])?;
    }
    wtr.flush()?;

    info!(file = %path.display(), rows = rows.len(), "补货分析表导出完成");
    Ok(())
}

/// 导出库存计划完整表
///
/// 日均箱数列的表头随所选口径变化，与库存分析导出的列名保持一致。
///
/// # 参数
/// - `path`: 目标 CSV 路径
/// - `rows`: 完整计划表（调用方传 `StockPlanReport::table`）
/// - `avg_column`: 计算使用的日均箱数列
pub fn write_stock_plan_csv<P: AsRef<Path>>(
    path: P,
    rows: &[StockPlanRow],
    avg_column: AvgColumn,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(&[
        "Product Name",
        "Material ID",
        avg_column.label(),
        "Pcs per Box",
        "Min Replenishment",
        "Max Replenishment",
        "Min Replenishment (Pcs)",
        "Max Replenishment (Pcs)",
    ])?;

    for row in rows {
        wtr.write_record(&[
            row.product_name.clone().unwrap_or_default(),
            row.material_id.clone(),
            format_opt_f64(row.avg_for(avg_column)),
            format_opt_f64(row.pieces_per_box),
            row.min_box.to_string(),
            row.max_box.to_string(),
            row.min_pcs.to_string(),
            row.max_pcs.to_string(),
        ])?;
    }
    wtr.flush()?;

    info!(file = %path.display(), rows = rows.len(), "库存计划表导出完成");
    Ok(())
}

/// 导出布局分析结果（全部库区合并为一张表）
///
/// 每行一个已分配的物料组，并带上该组的优先级指标。
///
/// # 参数
/// - `path`: 目标 CSV 路径
/// - `report`: 布局分析响应
pub fn write_layout_csv<P: AsRef<Path>>(
    path: P,
    report: &LayoutReport,
) -> Result<(), Box<dyn Error>> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(LAYOUT_HEADER)?;

    let mut exported = 0usize;
    for layout in &report.layouts {
        for assignment in &layout.assignments {
            let priority = report
                .priorities
                .iter()
                .find(|p| p.material_group == assignment.material_group);

            wtr.write_record(&[
                layout.zone.as_str().to_string(),
                assignment.material_group.clone(),
                assignment.cluster_label.to_string(),
                assignment.row.to_string(),
                assignment.column.to_string(),
                assignment.distance.to_string(),
                priority
                    .map(|p| p.first_pick_frequency.to_string())
                    .unwrap_or_default(),
                priority
                    .map(|p| format!("{:.4}", p.picking_sequence_score))
                    .unwrap_or_default(),
                assignment
                    .representative_material_id
                    .clone()
                    .unwrap_or_default(),
                assignment
                    .representative_desc_word
                    .clone()
                    .unwrap_or_default(),
            ])?;
            exported += 1;
        }
    }
    wtr.flush()?;

    info!(file = %path.display(), rows = exported, "布局分析表导出完成");
    Ok(())
}

/// f64 → CSV 单元格（整数值不带小数尾巴）
fn format_f64(value: f64) -> String {
    format!("{}", value)
}

/// Option<f64> → CSV 单元格（None → 空串）
fn format_opt_f64(value: Option<f64>) -> String {
    value.map(format_f64).unwrap_or_default()
}
