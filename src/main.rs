// ==========================================
// 仓储运营分析系统 - CLI 主入口
// ==========================================
// 子命令: layout / replenishment / stock-plan
// 每个子命令对应一个 API 处理器，参数手工解析
// ==========================================

use std::error::Error;
use std::process;
use std::sync::Arc;

use warehouse_ops_analytics::api::{
    LayoutApi, LayoutReport, LayoutRequest, ReplenishmentApi, ReplenishmentReport,
    ReplenishmentRequest, StockPlanReport, StockPlanRequest, StockPlanningApi,
};
use warehouse_ops_analytics::app::SessionContext;
use warehouse_ops_analytics::config::ConfigManager;
use warehouse_ops_analytics::{export, i18n, logging};

fn main() {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", warehouse_ops_analytics::APP_NAME);
    tracing::info!("系统版本: {}", warehouse_ops_analytics::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match args.first() {
        Some(c) => c.as_str(),
        None => {
            print_usage();
            process::exit(2);
        }
    };

    let result = match command {
        "layout" => run_layout(&args[1..]),
        "replenishment" => run_replenishment(&args[1..]),
        "stock-plan" => run_stock_plan(&args[1..]),
        "help" | "-h" | "--help" => {
            print_usage();
            return;
        }
        other => {
            eprintln!("未知子命令: {}", other);
            print_usage();
            process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", i18n::t("common.failure"), e);
        process::exit(1);
    }
}

// ==========================================
// 子命令: layout
// ==========================================

fn run_layout(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut file: Option<String> = None;
    let mut zones: Option<Vec<String>> = None;
    let mut rows: Option<u32> = None;
    let mut export_path: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(next_value(&mut iter, "--file")?),
            "--zones" => {
                let raw = next_value(&mut iter, "--zones")?;
                zones = Some(
                    raw.split(',')
                        .map(|z| z.trim().to_string())
                        .filter(|z| !z.is_empty())
                        .collect(),
                );
            }
            "--rows" => {
                let raw = next_value(&mut iter, "--rows")?;
                rows = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| format!("无法解析网格行数: {}", raw))?,
                );
            }
            "--export" => export_path = Some(next_value(&mut iter, "--export")?),
            other => return Err(format!("未知参数: {}", other).into()),
        }
    }
    let file = file.ok_or("缺少必填参数 --file")?;

    let config = Arc::new(ConfigManager::load_default()?);
    apply_perf_threshold(&config);
    let session = Arc::new(SessionContext::default());

    // CLI 未指定时回退到配置默认值
    let zones = match zones {
        Some(z) => z,
        None => config
            .get_default_zones()?
            .iter()
            .map(|z| z.as_str().to_string())
            .collect(),
    };
    let grid_rows = match rows {
        Some(r) => r,
        None => config.get_default_grid_rows()?,
    };

    let api = LayoutApi::new(session, config);
    let report = api.generate_layout(&LayoutRequest {
        transaction_file: file,
        zones,
        grid_rows,
    })?;

    render_layout_report(&report);

    if let Some(path) = export_path {
        export::write_layout_csv(&path, &report)?;
        println!("{}", i18n::t_with_args("export.written", &[("path", &path)]));
    }
    Ok(())
}

fn render_layout_report(report: &LayoutReport) {
    println!();
    println!("{}", i18n::t("report.layout_done"));
    println!(
        "运行 ID: {}  库区: {}  耗时: {} ms",
        report.run_id,
        report
            .zones
            .iter()
            .map(|z| z.as_str())
            .collect::<Vec<_>>()
            .join("/"),
        report.elapsed_ms
    );
    println!(
        "流水导入: {} 行 (丢弃 {} 行; 缓存命中: {})  库区内: {} 行",
        report.import_summary.imported,
        report.import_summary.dropped_missing_id,
        yes_no(report.cache_hit),
        report.analyzed_rows
    );

    println!();
    println!("聚类结果 ({} 簇):", report.clusters.len());
    for cluster in &report.clusters {
        println!("  簇 {}: {}", cluster.label, cluster.groups.join(", "));
    }

    println!();
    println!("拣货优先级 ({} 组):", report.priorities.len());
    println!(
        "  {:<28} {:>10} {:>10}",
        "Material Group", "First Pick", "Seq Score"
    );
    for p in &report.priorities {
        println!(
            "  {:<28} {:>10} {:>10.4}",
            p.material_group, p.first_pick_frequency, p.picking_sequence_score
        );
    }

    for layout in &report.layouts {
        println!();
        println!(
            "库区 {} 网格布局 ({} 行 x {} 列):",
            layout.zone, layout.grid_rows, layout.grid_columns
        );
        for a in &layout.assignments {
            let annotation = a
                .representative_desc_word
                .as_deref()
                .map(|w| format!(" ({})", w))
                .unwrap_or_default();
            println!(
                "  [{},{}] 距离 {}  簇 {}  {}{}",
                a.row, a.column, a.distance, a.cluster_label, a.material_group, annotation
            );
        }
        if !layout.unassigned_groups.is_empty() {
            println!("  未分配: {}", layout.unassigned_groups.join(", "));
        }
    }
}

// ==========================================
// 子命令: replenishment
// ==========================================

fn run_replenishment(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut file: Option<String> = None;
    let mut uom_file: Option<String> = None;
    let mut intervals: Vec<String> = Vec::new();
    let mut movements: Vec<String> = Vec::new();
    let mut search: Option<String> = None;
    let mut export_path: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(next_value(&mut iter, "--file")?),
            "--uom" => uom_file = Some(next_value(&mut iter, "--uom")?),
            "--interval" => intervals.push(next_value(&mut iter, "--interval")?),
            "--movement" => movements.push(next_value(&mut iter, "--movement")?),
            "--search" => search = Some(next_value(&mut iter, "--search")?),
            "--export" => export_path = Some(next_value(&mut iter, "--export")?),
            other => return Err(format!("未知参数: {}", other).into()),
        }
    }
    let file = file.ok_or("缺少必填参数 --file")?;
    let uom_file = uom_file.ok_or("缺少必填参数 --uom")?;

    let config = Arc::new(ConfigManager::load_default()?);
    apply_perf_threshold(&config);
    let session = Arc::new(SessionContext::default());

    let api = ReplenishmentApi::new(session, config);
    let report = api.generate_replenishment(&ReplenishmentRequest {
        transaction_file: file,
        uom_file,
        intervals: if intervals.is_empty() {
            None
        } else {
            Some(intervals)
        },
        movements: if movements.is_empty() {
            None
        } else {
            Some(movements)
        },
        search,
    })?;

    render_replenishment_report(&report);

    if let Some(path) = export_path {
        export::write_replenishment_csv(&path, &report.table)?;
        println!("{}", i18n::t_with_args("export.written", &[("path", &path)]));
    }
    Ok(())
}

fn render_replenishment_report(report: &ReplenishmentReport) {
    println!();
    println!("{}", i18n::t("report.replenishment_done"));
    println!(
        "运行 ID: {}  零售库区: {}  耗时: {} ms",
        report.run_id, report.retail_zone, report.elapsed_ms
    );
    println!(
        "流水导入: {} 行 (丢弃 {} 行; 缓存命中: {})  展示 {}/{} 行",
        report.import_summary.imported,
        report.import_summary.dropped_missing_id,
        yes_no(report.cache_hit),
        report.view.len(),
        report.table.len()
    );

    println!();
    println!(
        "  {:<10} {:<24} {:<6} {:<12} {:<5} {:>4} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Material",
        "Desc",
        "Move",
        "Interval",
        "UOM",
        "Days",
        "Min",
        "Max",
        "Avg",
        "MinBox",
        "MaxBox",
        "AvgBox"
    );
    for row in &report.view {
        println!(
            "  {:<10} {:<24} {:<6} {:<12} {:<5} {:>4} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            row.material_id,
            truncate(row.material_desc.as_deref().unwrap_or("-"), 24),
            row.movement_display(),
            row.interval.label(),
            row.uom_actual.as_deref().unwrap_or("-"),
            row.days_observed,
            fmt_qty(row.min_qty),
            fmt_qty(row.max_qty),
            fmt_qty(row.avg_qty),
            fmt_opt_qty(row.min_box),
            fmt_opt_qty(row.max_box),
            fmt_opt_qty(row.avg_box),
        );
    }
    if report.view.is_empty() {
        println!("  {}", i18n::t("report.empty_result"));
    }
}

// ==========================================
// 子命令: stock-plan
// ==========================================

fn run_stock_plan(args: &[String]) -> Result<(), Box<dyn Error>> {
    let mut file: Option<String> = None;
    let mut uom_file: Option<String> = None;
    let mut avg_column: Option<String> = None;
    let mut max_multiplier: Option<f64> = None;
    let mut search: Option<String> = None;
    let mut export_path: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--file" => file = Some(next_value(&mut iter, "--file")?),
            "--uom" => uom_file = Some(next_value(&mut iter, "--uom")?),
            "--avg-column" => avg_column = Some(next_value(&mut iter, "--avg-column")?),
            "--max-multiplier" => {
                let raw = next_value(&mut iter, "--max-multiplier")?;
                max_multiplier = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| format!("无法解析 Max 倍率: {}", raw))?,
                );
            }
            "--search" => search = Some(next_value(&mut iter, "--search")?),
            "--export" => export_path = Some(next_value(&mut iter, "--export")?),
            other => return Err(format!("未知参数: {}", other).into()),
        }
    }
    let file = file.ok_or("缺少必填参数 --file")?;
    let uom_file = uom_file.ok_or("缺少必填参数 --uom")?;

    let config = Arc::new(ConfigManager::load_default()?);
    apply_perf_threshold(&config);

    let api = StockPlanningApi::new(config);
    let report = api.generate_stock_plan(&StockPlanRequest {
        stock_analysis_file: file,
        uom_file,
        avg_column,
        max_multiplier,
        search,
    })?;

    render_stock_plan_report(&report);

    if let Some(path) = export_path {
        export::write_stock_plan_csv(&path, &report.table, report.avg_column)?;
        println!("{}", i18n::t_with_args("export.written", &[("path", &path)]));
    }
    Ok(())
}

fn render_stock_plan_report(report: &StockPlanReport) {
    println!();
    println!("{}", i18n::t("report.stock_plan_done"));
    println!(
        "运行 ID: {}  口径: {}  Max 倍率: {}  耗时: {} ms",
        report.run_id, report.avg_column, report.max_multiplier, report.elapsed_ms
    );
    println!("展示 {}/{} 行", report.view.len(), report.table.len());

    println!();
    println!(
        "  {:<28} {:<10} {:>8} {:>8} {:>8} {:>8} {:>9} {:>9}",
        "Product Name", "Material", "AvgBox", "Pcs/Box", "MinBox", "MaxBox", "MinPcs", "MaxPcs"
    );
    for row in &report.view {
        println!(
            "  {:<28} {:<10} {:>8} {:>8} {:>8} {:>8} {:>9} {:>9}",
            truncate(row.product_name.as_deref().unwrap_or("-"), 28),
            row.material_id,
            fmt_opt_qty(row.avg_for(report.avg_column)),
            fmt_opt_qty(row.pieces_per_box),
            row.min_box,
            row.max_box,
            row.min_pcs,
            row.max_pcs,
        );
    }
    if report.view.is_empty() {
        println!("  {}", i18n::t("report.empty_result"));
    }
}

// ==========================================
// 公共工具
// ==========================================

/// 取下一个参数值；缺失时报出所属参数名
fn next_value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, Box<dyn Error>> {
    iter.next()
        .map(|s| s.to_string())
        .ok_or_else(|| format!("参数 {} 缺少取值", flag).into())
}

/// 配置的慢操作阈值写入环境变量，供 PerfGuard 读取（显式设置的环境变量优先）
fn apply_perf_threshold(config: &ConfigManager) {
    if std::env::var_os("WAREHOUSE_OPS_SLOW_OP_MS").is_none() {
        if let Ok(threshold) = config.get_slow_op_threshold_ms() {
            std::env::set_var("WAREHOUSE_OPS_SLOW_OP_MS", threshold.to_string());
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "是"
    } else {
        "否"
    }
}

/// f64 展示值（整数不带小数尾巴）
fn fmt_qty(value: f64) -> String {
    format!("{}", value)
}

/// Option<f64> 展示值（缺失展示为 "-"）
fn fmt_opt_qty(value: Option<f64>) -> String {
    value.map(fmt_qty).unwrap_or_else(|| "-".to_string())
}

/// 截断过长的描述列，保持表格对齐
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn print_usage() {
    println!("用法: warehouse-ops-analytics <子命令> [参数]");
    println!();
    println!("子命令:");
    println!("  layout         库位布局分析 (共现聚类 + 网格分配)");
    println!("    --file <路径>          ZRW70 流水文件 (必填)");
    println!("    --zones <ZAK,ZAL>      参与布局的库区, 最多 2 个 (默认取配置)");
    println!("    --rows <n>             网格行数 1..=10 (默认取配置)");
    println!("    --export <路径>        导出布局结果 CSV");
    println!();
    println!("  replenishment  零售库区补货时段分析");
    println!("    --file <路径>          ZRW70 流水文件 (必填)");
    println!("    --uom <路径>           ZRW12 单位换算文件 (必填)");
    println!("    --interval <时段>      时段筛选, 可多次 (如 07:00-09:00)");
    println!("    --movement <类型>      操作类型筛选, 可多次 (N/A 表示缺失)");
    println!("    --search <关键词>      物料号/描述搜索");
    println!("    --export <路径>        导出完整聚合表 CSV");
    println!();
    println!("  stock-plan     最小/最大库存计算");
    println!("    --file <路径>          库存分析导出文件 (必填)");
    println!("    --uom <路径>           ZRW12 单位换算文件 (必填)");
    println!("    --avg-column <口径>    month-1 / last-14-days / last-3-days");
    println!("    --max-multiplier <x>   Max 库存倍率 1.0..=3.0");
    println!("    --search <关键词>      品名/物料号搜索");
    println!("    --export <路径>        导出完整计划表 CSV");
    println!();
    println!("环境变量:");
    println!("  RUST_LOG                    日志级别 (默认 info)");
    println!("  WAREHOUSE_OPS_CONFIG_PATH   配置文件路径");
    println!("  WAREHOUSE_OPS_SLOW_OP_MS    慢操作告警阈值 (毫秒)");
}
