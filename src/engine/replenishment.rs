// ==========================================
// 仓储运营分析系统 - 补货时段聚合引擎
// ==========================================
// 职责: 零售库区作业流水的时段聚合与箱数换算
// 输入: 作业流水行 + 零售库区编码 + 计量单位换算表
// 输出: 按平均箱数降序排列的 ReplenishmentRow 报表
// ==========================================

use crate::domain::master::UomConversion;
use crate::domain::replenishment::ReplenishmentRow;
use crate::domain::transaction::TransactionRow;
use crate::domain::types::{MovementFilter, TimeInterval, UomCode};
use crate::engine::search::SearchFilter;
use chrono::{NaiveDate, Timelike};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};

// 日合计键: (物料号, 创建日期, 时段, 操作类型)
type DailyKey = (String, NaiveDate, TimeInterval, Option<String>);

// 聚合键: (物料号, 时段, 操作类型)
type AggregateKey = (String, TimeInterval, Option<String>);

// ==========================================
// 聚合累加器
// ==========================================
struct DailyAccumulator {
    min: f64,
    max: f64,
    sum: f64,
    days: u32,
}

// ==========================================
// ReplenishmentAggregator - 补货时段聚合引擎
// ==========================================
pub struct ReplenishmentAggregator {
    // 无状态引擎,不需要注入依赖
}

impl ReplenishmentAggregator {
    /// 构造函数
    ///
    /// # 返回
    /// 新的 ReplenishmentAggregator 实例
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 聚合补货时段报表
    ///
    /// 计算步骤:
    /// 1) 过滤零售库区的流水行
    /// 2) 按创建时刻的小时归入时段（缺失时刻归入 Other）
    /// 3) 日合计 = 每 (物料, 日期, 时段, 操作类型) 的数量之和；缺失日期的行不参与
    /// 4) 跨天求 min/max/mean 与观测天数
    /// 5) 按换算表折算箱数（原生单位 BOX 原值，PCS 除以箱含件数，其余为 None）
    /// 6) 数值保留 2 位小数，按平均箱数降序排列（None 排最后）
    ///
    /// # 参数
    /// - `rows`: 作业流水行
    /// - `retail_zone`: 零售库区编码
    /// - `conversions`: 物料号 → 计量单位换算
    ///
    /// # 返回
    /// 补货报表行
    pub fn aggregate(
        &self,
        rows: &[TransactionRow],
        retail_zone: &str,
        conversions: &HashMap<String, UomConversion>,
    ) -> Vec<ReplenishmentRow> {
        let filtered: Vec<&TransactionRow> =
            rows.iter().filter(|r| r.in_zone(retail_zone)).collect();

        // 物料描述与实际单位: 按输入顺序取首个非空值
        let mut descs: HashMap<&str, &str> = HashMap::new();
        let mut uoms: HashMap<&str, &str> = HashMap::new();
        for row in &filtered {
            if let Some(desc) = row.material_desc.as_deref() {
                descs.entry(row.material_id.as_str()).or_insert(desc);
            }
            if let Some(uom) = row.uom_actual.as_deref() {
                uoms.entry(row.material_id.as_str()).or_insert(uom);
            }
        }

        // 日合计；缺失数量按 0 计
        let mut daily: HashMap<DailyKey, f64> = HashMap::new();
        let mut skipped_no_date = 0usize;
        for row in &filtered {
            let Some(date) = row.created_date else {
                skipped_no_date += 1;
                continue;
            };
            let interval = row
                .created_time
                .map(|t| TimeInterval::from_hour(t.hour()))
                .unwrap_or(TimeInterval::Other);

            let key = (row.material_id.clone(), date, interval, row.movement_type.clone());
            *daily.entry(key).or_insert(0.0) += row.quantity.unwrap_or(0.0);
        }
        if skipped_no_date > 0 {
            debug!(skipped_no_date, "缺失创建日期的流水行不参与时段聚合");
        }

        // 跨天聚合
        let mut aggregates: HashMap<AggregateKey, DailyAccumulator> = HashMap::new();
        for ((material, _date, interval, movement), total) in daily {
            let acc = aggregates
                .entry((material, interval, movement))
                .or_insert(DailyAccumulator {
                    min: f64::INFINITY,
                    max: f64::NEG_INFINITY,
                    sum: 0.0,
                    days: 0,
                });
            acc.min = acc.min.min(total);
            acc.max = acc.max.max(total);
            acc.sum += total;
            acc.days += 1;
        }

        let mut report: Vec<ReplenishmentRow> = aggregates
            .into_iter()
            .map(|((material, interval, movement), acc)| {
                let avg = acc.sum / acc.days as f64;
                let material_desc = descs.get(material.as_str()).map(|d| d.to_string());
                let uom_actual = uoms.get(material.as_str()).map(|u| u.to_string());
                let factor = conversions.get(&material).and_then(|c| c.usable_factor());

                ReplenishmentRow {
                    min_box: self
                        .convert_to_box(acc.min, uom_actual.as_deref(), factor)
                        .map(Self::round2),
                    max_box: self
                        .convert_to_box(acc.max, uom_actual.as_deref(), factor)
                        .map(Self::round2),
                    avg_box: self
                        .convert_to_box(avg, uom_actual.as_deref(), factor)
                        .map(Self::round2),
                    material_id: material,
                    material_desc,
                    movement_type: movement,
                    interval,
                    uom_actual,
                    days_observed: acc.days,
                    min_qty: Self::round2(acc.min),
                    max_qty: Self::round2(acc.max),
                    avg_qty: Self::round2(avg),
                }
            })
            .collect();

        report.sort_by(|a, b| self.compare(a, b));

        info!(
            zone = retail_zone,
            rows = filtered.len(),
            report_rows = report.len(),
            "补货时段聚合完成"
        );
        report
    }

    /// 应用报表视图过滤（不影响导出用的完整报表）
    ///
    /// # 参数
    /// - `rows`: 聚合后的报表行
    /// - `intervals`: 时段筛选集合；None 表示不过滤
    /// - `movements`: 操作类型筛选集合；Missing 项匹配无类型的行
    /// - `search`: 空白分隔的搜索词条，词条间为 OR 关系
    ///
    /// # 返回
    /// 过滤后的报表行
    pub fn filter_rows(
        &self,
        rows: &[ReplenishmentRow],
        intervals: Option<&[TimeInterval]>,
        movements: Option<&[MovementFilter]>,
        search: Option<&str>,
    ) -> Vec<ReplenishmentRow> {
        let filter = SearchFilter::new(search);

        rows.iter()
            .filter(|r| intervals.map_or(true, |set| set.contains(&r.interval)))
            .filter(|r| {
                movements.map_or(true, |set| {
                    set.iter().any(|m| m.matches(r.movement_type.as_deref()))
                })
            })
            .filter(|r| filter.matches(&r.material_id, r.material_desc.as_deref()))
            .cloned()
            .collect()
    }

    // ==========================================
    // 内部方法
    // ==========================================

    /// 原生数量折算为箱数
    ///
    /// 单位缺失、换算系数缺失或非正时无法折算（原生单位为 BOX 也要求系数可用，
    /// 以保证整行换算口径一致）。
    fn convert_to_box(&self, value: f64, uom: Option<&str>, factor: Option<f64>) -> Option<f64> {
        let factor = factor?;
        match UomCode::parse(uom?) {
            Some(UomCode::Box) => Some(value),
            Some(UomCode::Pcs) => Some(value / factor),
            None => None,
        }
    }

    /// 比较两个报表行的展示顺序
    ///
    /// 排序键: 平均箱数降序（None 排最后）→ 物料号 → 时段 → 操作类型
    fn compare(&self, a: &ReplenishmentRow, b: &ReplenishmentRow) -> Ordering {
        match (a.avg_box, b.avg_box) {
            (Some(x), Some(y)) => match y.total_cmp(&x) {
                Ordering::Equal => {}
                other => return other,
            },
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => {}
        }

        match a.material_id.cmp(&b.material_id) {
            Ordering::Equal => {}
            other => return other,
        }

        match a.interval.cmp(&b.interval) {
            Ordering::Equal => {}
            other => return other,
        }

        a.movement_type.cmp(&b.movement_type)
    }

    /// 保留 2 位小数
    fn round2(value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for ReplenishmentAggregator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    const ZONE: &str = "ZYY";

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn trow(material: &str, day: u32, hour: u32, qty: f64) -> TransactionRow {
        TransactionRow {
            material_id: material.to_string(),
            material_desc: None,
            reference_document: Some("D001".to_string()),
            storage_zone: Some(ZONE.to_string()),
            quantity_marker: Some("X".to_string()),
            quantity: Some(qty),
            uom_actual: Some("PCS".to_string()),
            movement_type: None,
            confirm_time: None,
            created_time: NaiveTime::from_hms_opt(hour, 0, 0),
            created_date: NaiveDate::from_ymd_opt(2026, 3, day),
        }
    }

    fn conversions(pairs: &[(&str, Option<f64>)]) -> HashMap<String, UomConversion> {
        pairs
            .iter()
            .map(|(id, factor)| {
                (
                    id.to_string(),
                    UomConversion {
                        material_id: id.to_string(),
                        pieces_per_box: *factor,
                    },
                )
            })
            .collect()
    }

    fn rrow(
        material: &str,
        interval: TimeInterval,
        movement: Option<&str>,
        avg_box: Option<f64>,
    ) -> ReplenishmentRow {
        ReplenishmentRow {
            material_id: material.to_string(),
            material_desc: Some(format!("{} desc", material)),
            movement_type: movement.map(|m| m.to_string()),
            interval,
            uom_actual: Some("PCS".to_string()),
            days_observed: 1,
            min_qty: 1.0,
            max_qty: 1.0,
            avg_qty: 1.0,
            min_box: avg_box,
            max_box: avg_box,
            avg_box,
        }
    }

    // ==========================================
    // 聚合测试
    // ==========================================

    #[test]
    fn test_zone_filter_excludes_other_zones() {
        let aggregator = ReplenishmentAggregator::new();

        let mut other_zone = trow("100001", 1, 8, 5.0);
        other_zone.storage_zone = Some("ZAK".to_string());
        let rows = vec![trow("100001", 1, 8, 3.0), other_zone];

        let report = aggregator.aggregate(&rows, ZONE, &conversions(&[]));

        assert_eq!(report.len(), 1);
        assert!((report[0].min_qty - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_totals_then_min_max_avg() {
        let aggregator = ReplenishmentAggregator::new();

        // 第 1 天 07-09 时段两笔合计 6，第 2 天一笔合计 10
        let rows = vec![
            trow("100001", 1, 8, 4.0),
            trow("100001", 1, 7, 2.0),
            trow("100001", 2, 8, 10.0),
        ];
        let report = aggregator.aggregate(&rows, ZONE, &conversions(&[("100001", Some(2.0))]));

        assert_eq!(report.len(), 1);
        let r = &report[0];
        assert_eq!(r.interval, TimeInterval::H07to09);
        assert_eq!(r.days_observed, 2);
        assert!((r.min_qty - 6.0).abs() < 1e-9);
        assert!((r.max_qty - 10.0).abs() < 1e-9);
        assert!((r.avg_qty - 8.0).abs() < 1e-9);

        // PCS 按箱含件数 2 折算
        assert!((r.min_box.unwrap() - 3.0).abs() < 1e-9);
        assert!((r.max_box.unwrap() - 5.0).abs() < 1e-9);
        assert!((r.avg_box.unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_created_time_goes_to_other_interval() {
        let aggregator = ReplenishmentAggregator::new();

        let mut no_time = trow("100001", 1, 8, 5.0);
        no_time.created_time = None;
        let report = aggregator.aggregate(&[no_time], ZONE, &conversions(&[]));

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].interval, TimeInterval::Other);
    }

    #[test]
    fn test_missing_created_date_rows_skipped() {
        let aggregator = ReplenishmentAggregator::new();

        let mut no_date = trow("100001", 1, 8, 5.0);
        no_date.created_date = None;
        let report = aggregator.aggregate(&[no_date], ZONE, &conversions(&[]));

        assert!(report.is_empty());
    }

    #[test]
    fn test_movement_types_form_separate_buckets() {
        let aggregator = ReplenishmentAggregator::new();

        let mut m101 = trow("100001", 1, 8, 5.0);
        m101.movement_type = Some("101".to_string());
        let mut m102 = trow("100001", 1, 8, 3.0);
        m102.movement_type = Some("102".to_string());
        let untyped = trow("100001", 1, 8, 2.0);

        let report = aggregator.aggregate(&[m101, m102, untyped], ZONE, &conversions(&[]));

        assert_eq!(report.len(), 3);
        let untyped_row = report.iter().find(|r| r.movement_type.is_none()).unwrap();
        assert!((untyped_row.min_qty - 2.0).abs() < 1e-9);
        let typed: Vec<&str> = report
            .iter()
            .filter_map(|r| r.movement_type.as_deref())
            .collect();
        assert!(typed.contains(&"101") && typed.contains(&"102"));
    }

    #[test]
    fn test_conversion_box_keeps_value_pcs_divides() {
        let aggregator = ReplenishmentAggregator::new();

        let mut box_row = trow("200001", 1, 8, 6.0);
        box_row.uom_actual = Some("BOX".to_string());
        let pcs_row = trow("200002", 1, 8, 6.0);

        let table = conversions(&[("200001", Some(6.0)), ("200002", Some(6.0))]);
        let report = aggregator.aggregate(&[box_row, pcs_row], ZONE, &table);

        let by_box = report.iter().find(|r| r.material_id == "200001").unwrap();
        assert!((by_box.avg_box.unwrap() - 6.0).abs() < 1e-9);

        let by_pcs = report.iter().find(|r| r.material_id == "200002").unwrap();
        assert!((by_pcs.avg_box.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_conversion_unusable_cases_yield_none() {
        let aggregator = ReplenishmentAggregator::new();

        // 换算系数缺失
        let no_factor = trow("300001", 1, 8, 6.0);
        // 未知单位
        let mut unknown_uom = trow("300002", 1, 8, 6.0);
        unknown_uom.uom_actual = Some("KG".to_string());
        // 原生单位 BOX 但换算表无记录
        let mut box_without_factor = trow("300003", 1, 8, 6.0);
        box_without_factor.uom_actual = Some("BOX".to_string());

        let table = conversions(&[("300001", None), ("300002", Some(6.0))]);
        let report = aggregator.aggregate(&[no_factor, unknown_uom, box_without_factor], ZONE, &table);

        assert_eq!(report.len(), 3);
        for r in &report {
            assert!(r.avg_box.is_none(), "material {} 应无法折算", r.material_id);
            assert!(r.min_box.is_none() && r.max_box.is_none());
        }
    }

    #[test]
    fn test_sort_avg_box_descending_none_last() {
        let aggregator = ReplenishmentAggregator::new();

        let low = trow("400001", 1, 8, 2.0);
        let high = trow("400002", 1, 8, 10.0);
        let unconvertible = trow("400003", 1, 8, 99.0);

        let table = conversions(&[("400001", Some(1.0)), ("400002", Some(1.0))]);
        let report = aggregator.aggregate(&[low, high, unconvertible], ZONE, &table);

        let order: Vec<&str> = report.iter().map(|r| r.material_id.as_str()).collect();
        assert_eq!(order, vec!["400002", "400001", "400003"]);
    }

    #[test]
    fn test_values_rounded_to_two_decimals() {
        let aggregator = ReplenishmentAggregator::new();

        // 3 天合计 1, 1, 2 → 均值 4/3；箱含件数 3
        let rows = vec![
            trow("500001", 1, 8, 1.0),
            trow("500001", 2, 8, 1.0),
            trow("500001", 3, 8, 2.0),
        ];
        let report = aggregator.aggregate(&rows, ZONE, &conversions(&[("500001", Some(3.0))]));

        let r = &report[0];
        assert!((r.avg_qty - 1.33).abs() < 1e-9);
        assert!((r.avg_box.unwrap() - 0.44).abs() < 1e-9);
    }

    #[test]
    fn test_desc_and_uom_take_first_observed() {
        let aggregator = ReplenishmentAggregator::new();

        let mut bare = trow("600001", 1, 8, 1.0);
        bare.material_desc = None;
        bare.uom_actual = None;
        let mut described = trow("600001", 1, 9, 1.0);
        described.material_desc = Some("Cola Zero".to_string());

        let report = aggregator.aggregate(&[bare, described], ZONE, &conversions(&[]));

        for r in &report {
            assert_eq!(r.material_desc.as_deref(), Some("Cola Zero"));
            assert_eq!(r.uom_actual.as_deref(), Some("PCS"));
        }
    }

    // ==========================================
    // 视图过滤测试
    // ==========================================

    #[test]
    fn test_filter_rows_by_interval_and_movement() {
        let aggregator = ReplenishmentAggregator::new();

        let rows = vec![
            rrow("100001", TimeInterval::H07to09, Some("101"), Some(5.0)),
            rrow("100002", TimeInterval::H09to11, Some("101"), Some(4.0)),
            rrow("100003", TimeInterval::H07to09, None, Some(3.0)),
        ];

        let by_interval = aggregator.filter_rows(&rows, Some(&[TimeInterval::H07to09]), None, None);
        assert_eq!(by_interval.len(), 2);

        // Missing 选项（界面上的 "N/A"）匹配无操作类型的行
        let by_missing = aggregator.filter_rows(&rows, None, Some(&[MovementFilter::Missing]), None);
        assert_eq!(by_missing.len(), 1);
        assert_eq!(by_missing[0].material_id, "100003");

        let by_value = aggregator.filter_rows(
            &rows,
            None,
            Some(&[MovementFilter::parse("101")]),
            None,
        );
        assert_eq!(by_value.len(), 2);
    }

    #[test]
    fn test_filter_rows_by_search_terms() {
        let aggregator = ReplenishmentAggregator::new();

        let mut cola = rrow("100001", TimeInterval::H07to09, None, Some(5.0));
        cola.material_desc = Some("Cola Zero 330ml".to_string());
        let mut water = rrow("100002", TimeInterval::H07to09, None, Some(4.0));
        water.material_desc = Some("Sparkling Water".to_string());
        let rows = vec![cola, water];

        let hits = aggregator.filter_rows(&rows, None, None, Some("cola 100002"));
        assert_eq!(hits.len(), 2);

        let miss = aggregator.filter_rows(&rows, None, None, Some("paint"));
        assert!(miss.is_empty());
    }
}
