// ==========================================
// 补货分析 API
// ==========================================
// 职责: 封装零售库区补货分析全流程
// 流程: 流水导入 → 单位换算表加载 → 时段聚合 → 可选筛选
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::app::SessionContext;
use crate::config::ConfigManager;
use crate::domain::replenishment::ReplenishmentRow;
use crate::domain::transaction::ImportSummary;
use crate::domain::types::{MovementFilter, TimeInterval};
use crate::engine::ReplenishmentAggregator;
use crate::importer::UomImporter;
use crate::perf::PerfGuard;

/// 补货分析请求参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentRequest {
    /// 流水文件路径 (ZRW70 导出)
    pub transaction_file: String,
    /// 单位换算文件路径 (ZRW12-UoM 导出)
    pub uom_file: String,
    /// 时段筛选（时段标签，如 "07:00-09:00"；None 表示不筛选）
    pub intervals: Option<Vec<String>>,
    /// 操作类型筛选（"N/A" 表示缺失值；None 表示不筛选）
    pub movements: Option<Vec<String>>,
    /// 关键词搜索（空格分词，OR 语义；None 表示不筛选）
    pub search: Option<String>,
}

/// 补货分析响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentReport {
    /// 运行 ID
    pub run_id: String,
    /// 使用的零售库区代码
    pub retail_zone: String,
    /// 流水导入汇总
    pub import_summary: ImportSummary,
    /// 本次流水是否命中会话缓存
    pub cache_hit: bool,
    /// 筛选后的展示行（无筛选时与 table 相同）
    pub view: Vec<ReplenishmentRow>,
    /// 完整聚合表（导出口径，不受筛选影响）
    pub table: Vec<ReplenishmentRow>,
    /// 分析耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 补货分析 API
pub struct ReplenishmentApi {
    session: Arc<SessionContext>,
    config: Arc<ConfigManager>,
}

impl ReplenishmentApi {
    /// 创建新的 ReplenishmentApi 实例
    pub fn new(session: Arc<SessionContext>, config: Arc<ConfigManager>) -> Self {
        Self { session, config }
    }

    /// 生成补货分析报告
    ///
    /// # 参数
    /// - request: 补货分析请求（流水文件 + 换算文件 + 可选筛选）
    ///
    /// # 返回
    /// - Ok(ReplenishmentReport): 完整聚合表与筛选后的视图
    /// - Err(ApiError): 参数校验失败 / 导入失败 / 零售库区内无数据
    pub fn generate_replenishment(
        &self,
        request: &ReplenishmentRequest,
    ) -> ApiResult<ReplenishmentReport> {
        let perf = PerfGuard::new("replenishment_report");

        // 1. 参数校验（筛选标签先于文件 IO 校验）
        let intervals = Self::parse_intervals(request.intervals.as_deref())?;
        let movements = Self::parse_movements(request.movements.as_deref());

        // 2. 流水导入（会话缓存）与单位换算表加载
        let loaded = self.session.load_transactions(&request.transaction_file)?;
        let conversions = UomImporter::new().load(&request.uom_file)?;

        let retail_zone = self
            .config
            .get_retail_zone()
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?;

        // 3. 时段聚合（完整表）
        let aggregator = ReplenishmentAggregator::new();
        let table = aggregator.aggregate(&loaded.rows, &retail_zone, &conversions);
        if table.is_empty() {
            return Err(ApiError::EmptyResult(format!(
                "零售库区 {} 内没有可聚合的流水数据",
                retail_zone
            )));
        }

        // 4. 视图筛选（导出仍使用完整表）
        let view = aggregator.filter_rows(
            &table,
            intervals.as_deref(),
            movements.as_deref(),
            request.search.as_deref(),
        );

        tracing::info!(
            retail_zone = %retail_zone,
            table_rows = table.len(),
            view_rows = view.len(),
            "补货分析完成"
        );

        Ok(ReplenishmentReport {
            run_id: Uuid::new_v4().to_string(),
            retail_zone,
            import_summary: loaded.summary,
            cache_hit: loaded.cache_hit,
            view,
            table,
            elapsed_ms: perf.elapsed_ms() as i64,
        })
    }

    /// 解析时段筛选标签
    ///
    /// 无法识别的标签按无效输入处理，避免筛掉所有行却无提示。
    fn parse_intervals(raw: Option<&[String]>) -> ApiResult<Option<Vec<TimeInterval>>> {
        let Some(labels) = raw else {
            return Ok(None);
        };

        let mut intervals = Vec::with_capacity(labels.len());
        for label in labels {
            let interval = TimeInterval::parse(label).ok_or_else(|| {
                ApiError::InvalidInput(format!("无法识别的时段标签: {}", label))
            })?;
            intervals.push(interval);
        }
        Ok(Some(intervals))
    }

    /// 解析操作类型筛选（"N/A" 对应缺失值）
    fn parse_movements(raw: Option<&[String]>) -> Option<Vec<MovementFilter>> {
        raw.map(|values| values.iter().map(|v| MovementFilter::parse(v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==========================================
    // 测试辅助
    // ==========================================

    const TRANSACTION_HEADER: &str = "Material ID,Reference Document,Storage Type Suggestion,TO Dummy,TO Dummy Quantity,UOM Actual,Material Desc,Movement Type,Created Date,Created Time";
    const UOM_HEADER: &str = "Material,UOM(in BUn)";

    fn csv_file(header: &str, rows: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", header).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn uom_file() -> NamedTempFile {
        csv_file(UOM_HEADER, &["400001,4", "400002,2"])
    }

    fn transaction_file() -> NamedTempFile {
        csv_file(
            TRANSACTION_HEADER,
            &[
                // 400001: 两天同时段，日合计 8 与 4 → avg 6（箱 1.5）
                "400001,DOC1,ZYY,X,8,PCS,APPLE JUICE,101,2026-03-01,07:30:00",
                "400001,DOC2,ZYY,X,4,PCS,APPLE JUICE,101,2026-03-02,08:10:00",
                // 400002: 单天，无时刻 → Other
                "400002,DOC3,ZYY,X,6,PCS,BANANA CHIPS,102,2026-03-01,",
                // 其他库区的行不参与
                "400001,DOC4,ZAK,X,99,PCS,APPLE JUICE,101,2026-03-01,07:40:00",
            ],
        )
    }

    fn api() -> ReplenishmentApi {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::new(dir.path().join("config.json")).unwrap();
        ReplenishmentApi::new(Arc::new(SessionContext::new()), Arc::new(config))
    }

    fn request(
        transaction: &NamedTempFile,
        uom: &NamedTempFile,
    ) -> ReplenishmentRequest {
        ReplenishmentRequest {
            transaction_file: transaction.path().display().to_string(),
            uom_file: uom.path().display().to_string(),
            intervals: None,
            movements: None,
            search: None,
        }
    }

    // ==========================================
    // 全流程
    // ==========================================

    #[test]
    fn test_generate_replenishment_full_table() {
        let transaction = transaction_file();
        let uom = uom_file();

        let report = api().generate_replenishment(&request(&transaction, &uom)).unwrap();

        assert_eq!(report.retail_zone, "ZYY");
        assert_eq!(report.table.len(), 2);
        // 无筛选时视图与完整表一致
        assert_eq!(report.view.len(), report.table.len());

        // avg_box 降序: 400002 (6/2=3.0) 在 400001 (6/4=1.5) 之前
        assert_eq!(report.table[0].material_id, "400002");
        assert_eq!(report.table[0].interval, TimeInterval::Other);
        assert_eq!(report.table[0].avg_box, Some(3.0));
        assert_eq!(report.table[1].material_id, "400001");
        assert_eq!(report.table[1].days_observed, 2);
        assert_eq!(report.table[1].avg_qty, 6.0);
        assert_eq!(report.table[1].avg_box, Some(1.5));
    }

    #[test]
    fn test_interval_filter_shapes_view_only() {
        let transaction = transaction_file();
        let uom = uom_file();

        let mut req = request(&transaction, &uom);
        req.intervals = Some(vec!["07:00-09:00".to_string()]);

        let report = api().generate_replenishment(&req).unwrap();

        assert_eq!(report.view.len(), 1);
        assert_eq!(report.view[0].material_id, "400001");
        // 完整表保持不变
        assert_eq!(report.table.len(), 2);
    }

    #[test]
    fn test_movement_and_search_filters() {
        let transaction = transaction_file();
        let uom = uom_file();

        let mut req = request(&transaction, &uom);
        req.movements = Some(vec!["102".to_string()]);
        let report = api().generate_replenishment(&req).unwrap();
        assert_eq!(report.view.len(), 1);
        assert_eq!(report.view[0].material_id, "400002");

        let mut req = request(&transaction, &uom);
        req.search = Some("banana".to_string());
        let report = api().generate_replenishment(&req).unwrap();
        assert_eq!(report.view.len(), 1);
        assert_eq!(report.view[0].material_id, "400002");
    }

    #[test]
    fn test_unknown_interval_label_rejected() {
        let transaction = transaction_file();
        let uom = uom_file();

        let mut req = request(&transaction, &uom);
        req.intervals = Some(vec!["06:00-08:00".to_string()]);

        let err = api().generate_replenishment(&req).unwrap_err();
        match err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("06:00-08:00")),
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[test]
    fn test_no_retail_rows_reports_empty() {
        // 全部行都在其他库区
        let transaction = csv_file(
            TRANSACTION_HEADER,
            &["400001,DOC1,ZAK,X,8,PCS,APPLE JUICE,101,2026-03-01,07:30:00"],
        );
        let uom = uom_file();

        let err = api()
            .generate_replenishment(&request(&transaction, &uom))
            .unwrap_err();
        match err {
            ApiError::EmptyResult(msg) => assert!(msg.contains("ZYY")),
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[test]
    fn test_missing_uom_file() {
        let transaction = transaction_file();

        let mut req = request(&transaction, &transaction);
        req.uom_file = "/nonexistent/zrw12.csv".to_string();

        let err = api().generate_replenishment(&req).unwrap_err();
        assert!(matches!(err, ApiError::FileNotFound(_)));
    }
}
