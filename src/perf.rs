use std::time::Instant;

fn slow_op_threshold_ms() -> u64 {
    std::env::var("WAREHOUSE_OPS_SLOW_OP_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 200 } else { 500 })
}

/// 性能统计 Guard：记录 elapsed_ms，超阈值时输出告警
///
/// 阈值配置：
/// - `WAREHOUSE_OPS_SLOW_OP_MS=500` 配置慢操作阈值（毫秒）
/// - 未配置时 Debug 默认 200ms，Release 默认 500ms
///
/// 使用方式：
/// ```ignore
/// let _perf = warehouse_ops_analytics::perf::PerfGuard::new("layout_report");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    slow_threshold_ms: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            slow_threshold_ms: slow_op_threshold_ms(),
        }
    }

    /// 当前已消耗的毫秒数（API 层把耗时写进响应）
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;

        if self.slow_threshold_ms > 0 && elapsed_ms >= self.slow_threshold_ms {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                "slow op"
            );
        } else {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                "done"
            );
        }
    }
}
