// ==========================================
// 仓储运营分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: JSON 文件 (key-value)
// 路径: WAREHOUSE_OPS_CONFIG_PATH 或用户数据目录
// ==========================================

use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::types::ZoneCode;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    /// 配置文件路径（set_value 时回写）
    path: PathBuf,
    /// key → value，全部按字符串保存，读取时再做类型转换
    values: Mutex<HashMap<String, String>>,
}

impl ConfigManager {
    /// 从指定路径创建 ConfigManager 实例
    ///
    /// 文件不存在时按空配置处理（所有查询走默认值），
    /// 首次 set_value 时才会落盘。
    ///
    /// # 参数
    /// - config_path: 配置文件路径
    pub fn new<P: AsRef<Path>>(config_path: P) -> Result<Self, Box<dyn Error>> {
        let path = config_path.as_ref().to_path_buf();
        let values = Self::read_values(&path)?;

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// 使用默认路径创建 ConfigManager 实例
    ///
    /// 路径解析顺序见 [`get_default_config_path`]。
    pub fn load_default() -> Result<Self, Box<dyn Error>> {
        Self::new(get_default_config_path())
    }

    /// 读取并解析配置文件
    ///
    /// 非字符串的 JSON 值按其字面量转为字符串保存，
    /// 保证手工编辑 `"default_grid_rows": 3` 这类写法也能被接受。
    fn read_values(path: &Path) -> Result<HashMap<String, String>, Box<dyn Error>> {
        if !path.exists() {
            tracing::info!(file = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(HashMap::new());
        }

        let raw = std::fs::read_to_string(path)?;
        let parsed: HashMap<String, serde_json::Value> = serde_json::from_str(&raw)?;

        let values = parsed
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(values)
    }

    /// 读取配置值
    ///
    /// # 参数
    /// - key: 配置键
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值，带默认值
    ///
    /// # 参数
    /// - key: 配置键
    /// - default: 默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值并落盘
    ///
    /// # 参数
    /// - key: 配置键
    /// - value: 配置值
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let snapshot = {
            let mut values = self.values.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            values.insert(key.to_string(), value.to_string());
            values.clone()
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json_value = json!(snapshot);
        std::fs::write(&self.path, serde_json::to_string_pretty(&json_value)?)?;
        Ok(())
    }

    // ===== 布局分析配置 =====

    /// 获取物料组主数据文件路径
    ///
    /// # 返回
    /// - 默认: ./Material Group.xlsx（与流水文件同目录投放的习惯用法）
    pub fn get_master_file_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::MASTER_FILE_PATH, "Material Group.xlsx")?;
        Ok(PathBuf::from(value))
    }

    /// 获取布局分析默认库区
    ///
    /// 配置格式为逗号分隔的库区代码: "ZAK,ZAL"。
    /// 无法识别的代码被忽略；全部无法识别时回落到默认值。
    pub fn get_default_zones(&self) -> Result<Vec<ZoneCode>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_ZONES, "ZAK,ZAL")?;

        let zones: Vec<ZoneCode> = value
            .split(',')
            .filter_map(|s| ZoneCode::parse(s.trim()))
            .collect();

        if zones.is_empty() {
            Ok(vec![ZoneCode::Zak, ZoneCode::Zal]) // 默认值
        } else {
            Ok(zones)
        }
    }

    /// 获取布局网格默认行数
    ///
    /// # 返回
    /// - u32: 行数（默认 2；合法区间校验由 API 层负责）
    pub fn get_default_grid_rows(&self) -> Result<u32, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_GRID_ROWS, "2")?;
        Ok(value.parse::<u32>().unwrap_or(2))
    }

    // ===== 补货分析配置 =====

    /// 获取零售拣选库区代码
    ///
    /// # 返回
    /// - String: 库区代码（默认 ZYY）
    pub fn get_retail_zone(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::RETAIL_ZONE, "ZYY")?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok("ZYY".to_string())
        } else {
            Ok(trimmed.to_uppercase())
        }
    }

    // ===== 库存计划配置 =====

    /// 获取 Max 库存默认倍率
    ///
    /// # 返回
    /// - f64: 倍率（默认 1.5）
    pub fn get_default_max_multiplier(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_MAX_MULTIPLIER, "1.5")?;
        Ok(value.parse::<f64>().unwrap_or(1.5))
    }

    // ===== 性能配置 =====

    /// 获取慢操作告警阈值（毫秒）
    ///
    /// # 返回
    /// - u64: 阈值（默认 500ms；0 表示关闭告警）
    pub fn get_slow_op_threshold_ms(&self) -> Result<u64, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::SLOW_OP_THRESHOLD_MS, "500")?;
        Ok(value.parse::<u64>().unwrap_or(500))
    }

    /// 获取所有配置的快照（JSON 格式）
    ///
    /// # 返回
    /// - Ok(Value): 生效配置快照（含默认值兜底后的结果）
    ///
    /// # 用途
    /// - CLI `--show-config` 展示
    /// - 报表导出时附带运行配置，便于复核口径
    pub fn get_config_snapshot(&self) -> Result<serde_json::Value, Box<dyn Error>> {
        let zones: Vec<String> = self
            .get_default_zones()?
            .iter()
            .map(|z| z.as_str().to_string())
            .collect();

        Ok(json!({
            config_keys::MASTER_FILE_PATH: self.get_master_file_path()?.display().to_string(),
            config_keys::DEFAULT_ZONES: zones.join(","),
            config_keys::DEFAULT_GRID_ROWS: self.get_default_grid_rows()?,
            config_keys::RETAIL_ZONE: self.get_retail_zone()?,
            config_keys::DEFAULT_MAX_MULTIPLIER: self.get_default_max_multiplier()?,
            config_keys::SLOW_OP_THRESHOLD_MS: self.get_slow_op_threshold_ms()?,
        }))
    }
}

// ==========================================
// 默认配置路径辅助函数
// ==========================================

/// 获取默认配置文件路径
///
/// # 返回
/// - 环境变量 WAREHOUSE_OPS_CONFIG_PATH 优先
/// - 开发环境: 用户数据目录/warehouse-ops-analytics-dev/config.json
/// - 生产环境: 用户数据目录/warehouse-ops-analytics/config.json
pub fn get_default_config_path() -> PathBuf {
    // 允许通过环境变量显式指定配置路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("WAREHOUSE_OPS_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let mut path = PathBuf::from("./config.json");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("warehouse-ops-analytics-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("warehouse-ops-analytics");
        }

        path = path.join("config.json");
    }

    path
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 布局分析
    pub const MASTER_FILE_PATH: &str = "master_file_path";
    pub const DEFAULT_ZONES: &str = "default_zones";
    pub const DEFAULT_GRID_ROWS: &str = "default_grid_rows";

    // 补货分析
    pub const RETAIL_ZONE: &str = "retail_zone";

    // 库存计划
    pub const DEFAULT_MAX_MULTIPLIER: &str = "default_max_multiplier";

    // 性能
    pub const SLOW_OP_THRESHOLD_MS: &str = "slow_op_threshold_ms";
}
