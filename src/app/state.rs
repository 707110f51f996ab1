// ==========================================
// 仓储运营分析系统 - 会话状态
// ==========================================
// 职责: 管理会话级共享状态（流水表缓存）
// 缓存键: 文件字节的 SHA-256 摘要
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::domain::transaction::{ImportSummary, TransactionRow};
use crate::importer::{ImportError, ImportResult, TransactionImporter};

// ==========================================
// 加载结果
// ==========================================

/// 一次流水加载的结果
#[derive(Debug, Clone)]
pub struct LoadedTransactions {
    /// 流水行（共享所有权，命中缓存时无需整表克隆）
    pub rows: Arc<Vec<TransactionRow>>,
    /// 导入汇总
    pub summary: ImportSummary,
    /// 是否命中会话缓存
    pub cache_hit: bool,
}

/// 缓存条目：摘要 + 上次解析结果
struct CachedTransactions {
    digest: String,
    rows: Arc<Vec<TransactionRow>>,
    summary: ImportSummary,
}

// ==========================================
// SessionContext - 会话上下文
// ==========================================

/// 会话上下文
///
/// 持有最近一次加载的流水表。以文件内容的 SHA-256 作为缓存键:
/// - 摘要一致: 复用解析结果（布局与补货分析常用同一份流水）
/// - 摘要变化: 重新导入并替换缓存
///
/// 缓存只是加速手段，分析结果不依赖缓存状态。
pub struct SessionContext {
    importer: TransactionImporter,
    cache: Mutex<Option<CachedTransactions>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            importer: TransactionImporter::new(),
            cache: Mutex::new(None),
        }
    }

    /// 加载作业流水（带内容哈希缓存）
    ///
    /// # 参数
    /// - `file_path`: 流水文件路径
    ///
    /// # 返回
    /// - Ok: 流水行 + 导入汇总 + 是否命中缓存
    /// - Err: 文件级导入错误
    pub fn load_transactions<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> ImportResult<LoadedTransactions> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let bytes = std::fs::read(path)?;
        let digest = Self::digest_hex(&bytes);

        {
            let cache = self.lock_cache()?;
            if let Some(cached) = cache.as_ref() {
                if cached.digest == digest {
                    debug!(file = %path.display(), "命中会话缓存，复用已解析流水");
                    return Ok(LoadedTransactions {
                        rows: Arc::clone(&cached.rows),
                        summary: cached.summary.clone(),
                        cache_hit: true,
                    });
                }
            }
        }

        let (rows, summary) = self.importer.import(path)?;
        let rows = Arc::new(rows);

        {
            let mut cache = self.lock_cache()?;
            *cache = Some(CachedTransactions {
                digest,
                rows: Arc::clone(&rows),
                summary: summary.clone(),
            });
        }

        info!(
            file = %path.display(),
            imported = summary.imported,
            "流水导入完成并写入会话缓存"
        );
        Ok(LoadedTransactions {
            rows,
            summary,
            cache_hit: false,
        })
    }

    /// 清空会话缓存
    pub fn clear(&self) -> ImportResult<()> {
        let mut cache = self.lock_cache()?;
        *cache = None;
        Ok(())
    }

    fn lock_cache(
        &self,
    ) -> ImportResult<std::sync::MutexGuard<'_, Option<CachedTransactions>>> {
        self.cache
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))
    }

    /// 计算字节序列的 SHA-256 摘要（hex 小写）
    fn digest_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
