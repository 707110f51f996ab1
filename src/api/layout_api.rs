// ==========================================
// 库位布局分析 API
// ==========================================
// 职责: 封装布局分析全流程
// 流程: 流水导入 → 主数据连接 → 共现聚类 → 优先级 → 网格分配
// ==========================================

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::app::SessionContext;
use crate::config::ConfigManager;
use crate::domain::layout::{ClusterSummary, GroupPriority, ZoneLayout};
use crate::domain::transaction::ImportSummary;
use crate::domain::types::ZoneCode;
use crate::engine::{
    AgglomerativeClusterer, CoOccurrenceBuilder, DatasetPreparer, LayoutAssigner,
    PickPriorityScorer,
};
use crate::importer::MasterImporter;
use crate::perf::PerfGuard;

/// 布局分析请求参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRequest {
    /// 流水文件路径 (ZRW70 导出)
    pub transaction_file: String,
    /// 参与布局的库区代码（1..=2 个，不允许重复）
    pub zones: Vec<String>,
    /// 网格行数（1..=10）
    pub grid_rows: u32,
}

/// 布局分析响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutReport {
    /// 运行 ID（用于日志与导出文件关联）
    pub run_id: String,
    /// 参与分析的库区（保持请求顺序）
    pub zones: Vec<ZoneCode>,
    /// 流水导入汇总
    pub import_summary: ImportSummary,
    /// 本次流水是否命中会话缓存
    pub cache_hit: bool,
    /// 库区并集内参与分析的流水行数
    pub analyzed_rows: usize,
    /// 簇汇总（标签 → 成员物料组）
    pub clusters: Vec<ClusterSummary>,
    /// 并集口径的物料组优先级表（已按分配顺序排序）
    pub priorities: Vec<GroupPriority>,
    /// 逐库区的网格布局
    pub layouts: Vec<ZoneLayout>,
    /// 分析耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 布局分析 API
pub struct LayoutApi {
    session: Arc<SessionContext>,
    config: Arc<ConfigManager>,
}

impl LayoutApi {
    /// 创建新的 LayoutApi 实例
    pub fn new(session: Arc<SessionContext>, config: Arc<ConfigManager>) -> Self {
        Self { session, config }
    }

    /// 生成库位布局报告
    ///
    /// # 参数
    /// - request: 布局分析请求（流水文件 + 库区 + 网格行数）
    ///
    /// # 返回
    /// - Ok(LayoutReport): 聚类、优先级与逐库区布局
    /// - Err(ApiError): 参数校验失败 / 导入失败 / 库区内无数据
    pub fn generate_layout(&self, request: &LayoutRequest) -> ApiResult<LayoutReport> {
        let perf = PerfGuard::new("layout_report");

        // 1. 参数校验
        let zones = Self::validate_zones(&request.zones)?;
        if !(1..=10).contains(&request.grid_rows) {
            return Err(ApiError::InvalidInput(format!(
                "网格行数超出范围: {}（允许 1..=10）",
                request.grid_rows
            )));
        }

        // 2. 流水导入（会话缓存）与主数据加载
        let loaded = self.session.load_transactions(&request.transaction_file)?;
        let master_path = self
            .config
            .get_master_file_path()
            .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?;
        let masters = MasterImporter::new().load(&master_path)?;

        // 3. 数据准备与库区并集筛选
        let preparer = DatasetPreparer::new();
        let analysis_rows = preparer.prepare(&loaded.rows, &masters);

        let zone_names: Vec<String> = zones.iter().map(|z| z.as_str().to_string()).collect();
        let filtered = preparer.filter_zones(&analysis_rows, &zone_names);
        if filtered.is_empty() {
            return Err(ApiError::EmptyResult(format!(
                "所选库区 {} 内没有流水数据",
                zone_names.join("/")
            )));
        }

        // 4. 共现矩阵与层次聚类
        let universe = preparer.distinct_groups(&filtered);
        let matrix = CoOccurrenceBuilder::new().build(&filtered);
        let clusterer = AgglomerativeClusterer::new();
        let labels = clusterer.cluster_auto(&matrix.distance_matrix())?;
        let clusters = clusterer.summarize(matrix.groups(), &labels);

        let cluster_labels: HashMap<String, usize> = matrix
            .groups()
            .iter()
            .cloned()
            .zip(labels.iter().copied())
            .collect();

        // 5. 优先级表：并集口径只算一次，逐库区取有序子序列
        let scorer = PickPriorityScorer::new();
        let priorities = scorer.sort(scorer.score(&filtered, &universe));

        // 6. 逐库区网格分配
        let assigner = LayoutAssigner::new();
        let split = preparer.split_by_zone(&filtered, &zone_names);
        let mut layouts = Vec::with_capacity(zones.len());
        for (zone, (_, zone_rows)) in zones.iter().zip(split.iter()) {
            let layout = assigner.assign(
                *zone,
                request.grid_rows,
                &priorities,
                &cluster_labels,
                zone_rows,
            )?;
            layouts.push(layout);
        }

        tracing::info!(
            zones = %zone_names.join("/"),
            groups = universe.len(),
            clusters = clusters.len(),
            "布局分析完成"
        );

        Ok(LayoutReport {
            run_id: Uuid::new_v4().to_string(),
            zones,
            import_summary: loaded.summary,
            cache_hit: loaded.cache_hit,
            analyzed_rows: filtered.len(),
            clusters,
            priorities,
            layouts,
            elapsed_ms: perf.elapsed_ms() as i64,
        })
    }

    /// 校验库区参数
    ///
    /// 规则: 非空、至多两个、代码可识别、不重复
    fn validate_zones(raw: &[String]) -> ApiResult<Vec<ZoneCode>> {
        if raw.is_empty() {
            return Err(ApiError::InvalidInput("至少选择一个库区".to_string()));
        }
        if raw.len() > 2 {
            return Err(ApiError::InvalidInput(format!(
                "最多选择两个库区，收到 {} 个",
                raw.len()
            )));
        }

        let mut zones = Vec::with_capacity(raw.len());
        for code in raw {
            let zone = ZoneCode::parse(code).ok_or_else(|| {
                ApiError::InvalidInput(format!("无法识别的库区代码: {}", code))
            })?;
            if zones.contains(&zone) {
                return Err(ApiError::InvalidInput(format!("库区重复: {}", code)));
            }
            zones.push(zone);
        }
        Ok(zones)
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

    const TRANSACTION_HEADER: &str = "Material ID,Reference Document,Storage Type Suggestion,TO Dummy,TO Dummy Quantity,UOM Actual,Material Desc,Confirm 1 Time,Created Date,Created Time";
    const MASTER_HEADER: &str =
        "Material ID,Product lvl 1-Category,Product lvl 2-Type,Product lvl 3-Group,Material Group 2";

    fn csv_file(header: &str, rows: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", header).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn master_file() -> NamedTempFile {
        csv_file(
            MASTER_HEADER,
            &[
                "100001,FOOD,SNACK,CHIPS,G_SNACK",
                "100002,FOOD,DRINK,SODA,G_DRINK",
                "100003,HOME,CLEAN,SOAP,G_CLEAN",
            ],
        )
    }

    fn transaction_file() -> NamedTempFile {
        // 三张凭证: {G_SNACK,G_DRINK} / {G_SNACK,G_CLEAN} / {G_SNACK,G_DRINK,G_CLEAN}
        csv_file(
            TRANSACTION_HEADER,
            &[
                "100001,DOC1,ZAK,X,12,PCS,CHIPS BBQ,01.03.2026 07:10:00,2026-03-01,07:10:00",
                "100002,DOC1,ZAK,X,6,PCS,SODA COLA,01.03.2026 07:20:00,2026-03-01,07:20:00",
                "100001,DOC2,ZAL,X,4,PCS,CHIPS BBQ,01.03.2026 08:05:00,2026-03-01,08:05:00",
                "100003,DOC2,ZAL,X,2,PCS,SOAP BAR,01.03.2026 08:15:00,2026-03-01,08:15:00",
                "100001,DOC3,ZAK,X,3,PCS,CHIPS BBQ,02.03.2026 09:00:00,2026-03-02,09:00:00",
                "100002,DOC3,ZAK,X,9,PCS,SODA COLA,02.03.2026 09:10:00,2026-03-02,09:10:00",
                "100003,DOC3,ZAK,X,1,PCS,SOAP BAR,02.03.2026 09:20:00,2026-03-02,09:20:00",
            ],
        )
    }

    fn api_with_master(master: &NamedTempFile) -> LayoutApi {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigManager::new(dir.path().join("config.json")).unwrap();
        config
            .set_value(
                crate::config::config_keys::MASTER_FILE_PATH,
                &master.path().display().to_string(),
            )
            .unwrap();
        LayoutApi::new(Arc::new(SessionContext::new()), Arc::new(config))
    }

    fn request(transaction: &NamedTempFile, zones: &[&str], grid_rows: u32) -> LayoutRequest {
        LayoutRequest {
            transaction_file: transaction.path().display().to_string(),
            zones: zones.iter().map(|z| z.to_string()).collect(),
            grid_rows,
        }
    }

    // ==========================================
    // 参数校验
    // ==========================================

    #[test]
    fn test_rejects_empty_zones() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let err = api
            .generate_layout(&request(&transaction, &[], 2))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_three_zones() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let err = api
            .generate_layout(&request(&transaction, &["ZAA", "ZAB", "ZAC"], 2))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_unknown_zone_code() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let err = api
            .generate_layout(&request(&transaction, &["ZXX"], 2))
            .unwrap_err();
        match err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("ZXX")),
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_duplicate_zone() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let err = api
            .generate_layout(&request(&transaction, &["ZAK", "ZAK"], 2))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_grid_rows_out_of_range() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        for rows in [0, 11] {
            let err = api
                .generate_layout(&request(&transaction, &["ZAK"], rows))
                .unwrap_err();
            assert!(matches!(err, ApiError::InvalidInput(_)));
        }
    }

    // ==========================================
    // 全流程
    // ==========================================

    #[test]
    fn test_generate_layout_two_zones() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let report = api
            .generate_layout(&request(&transaction, &["ZAK", "ZAL"], 2))
            .unwrap();

        assert_eq!(report.zones, vec![ZoneCode::Zak, ZoneCode::Zal]);
        assert_eq!(report.import_summary.imported, 7);
        assert_eq!(report.analyzed_rows, 7);
        assert!(!report.run_id.is_empty());

        // 3 个物料组 → min(3, N) = 3 个簇
        assert_eq!(report.clusters.len(), 3);
        assert_eq!(report.priorities.len(), 3);

        // 每个库区有独立布局，只覆盖本库区出现过的组
        assert_eq!(report.layouts.len(), 2);
        let zak = &report.layouts[0];
        assert_eq!(zak.zone, ZoneCode::Zak);
        assert_eq!(zak.assignments.len(), 3);
        let zal = &report.layouts[1];
        assert_eq!(zal.zone, ZoneCode::Zal);
        assert_eq!(zal.assignments.len(), 2);
        assert!(zal.unassigned_groups.is_empty());

        // G_SNACK 每张凭证都是首拣
        assert_eq!(report.priorities[0].material_group, "G_SNACK");
        assert_eq!(report.priorities[0].first_pick_frequency, 3);
    }

    #[test]
    fn test_zone_without_rows_reports_empty() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let err = api
            .generate_layout(&request(&transaction, &["ZAM"], 2))
            .unwrap_err();
        match err {
            ApiError::EmptyResult(msg) => assert!(msg.contains("ZAM")),
            other => panic!("意外的错误类型: {:?}", other),
        }
    }

    #[test]
    fn test_second_run_hits_session_cache() {
        let master = master_file();
        let transaction = transaction_file();
        let api = api_with_master(&master);

        let first = api
            .generate_layout(&request(&transaction, &["ZAK"], 2))
            .unwrap();
        let second = api
            .generate_layout(&request(&transaction, &["ZAL"], 2))
            .unwrap();

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
    }

    #[test]
    fn test_missing_transaction_file() {
        let master = master_file();
        let api = api_with_master(&master);

        let req = LayoutRequest {
            transaction_file: "/nonexistent/zrw70.csv".to_string(),
            zones: vec!["ZAK".to_string()],
            grid_rows: 2,
        };
        let err = api.generate_layout(&req).unwrap_err();
        assert!(matches!(err, ApiError::FileNotFound(_)));
    }
}
