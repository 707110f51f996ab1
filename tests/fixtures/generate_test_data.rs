// ==========================================
// 测试数据生成器
// ==========================================
// 用途: 生成仓储运营分析所需的测试数据集CSV文件
// 输出: tests/fixtures/datasets/*.csv
// 覆盖: ZRW70 流水 / 物料组主数据 / ZRW12 换算表 / 库存分析导出
// ==========================================

use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::Writer;
use std::error::Error;
use std::fs::File;

// ZRW70 流水导出表头
const TRANSACTION_HEADER: &[&str] = &[
    "Material ID",
    "Reference Document",
    "Storage Type Suggestion",
    "TO Dummy",
    "TO Dummy Quantity",
    "UOM Actual",
    "Material Desc",
    "Movement Type",
    "Confirm 1 Time",
    "Created Date",
    "Created Time",
];

// 物料组主数据表头
const MASTER_HEADER: &[&str] = &[
    "Material ID",
    "Product lvl 1-Category",
    "Product lvl 2-Type",
    "Product lvl 3-Group",
    "Material Group 2",
];

// ZRW12 换算表表头
const UOM_HEADER: &[&str] = &["Material", "UOM(in BUn)"];

// 演示物料池: (物料号, 描述, 物料组, 层级1, 层级2, 层级3, 每箱件数)
const MATERIALS: &[(&str, &str, &str, &str, &str, &str, &str)] = &[
    ("1010513", "INDOMIE GORENG 85G", "MG-NOODLE", "FOOD", "DRY", "NOODLE", "40"),
    ("1010514", "INDOMIE SOTO 80G", "MG-NOODLE", "FOOD", "DRY", "NOODLE", "40"),
    ("1020881", "AQUA 600ML", "MG-WATER", "BEVERAGE", "WATER", "MINERAL", "24"),
    ("1020882", "AQUA 1500ML", "MG-WATER", "BEVERAGE", "WATER", "MINERAL", "12"),
    ("1030101", "CHITATO 68G", "MG-SNACK", "FOOD", "DRY", "SNACK", "20"),
    ("1030102", "QTELA 60G", "MG-SNACK", "FOOD", "DRY", "SNACK", "20"),
    ("1040201", "SUNLIGHT 755ML", "MG-CLEAN", "HOMECARE", "LIQUID", "DISH", "12"),
    ("1040202", "RINSO 770G", "MG-CLEAN", "HOMECARE", "POWDER", "LAUNDRY", "6"),
    ("1050301", "ULTRA MILK 1L", "MG-DAIRY", "BEVERAGE", "CHILLED", "MILK", "12"),
    ("1050302", "YAKULT 5X65ML", "MG-DAIRY", "BEVERAGE", "CHILLED", "CULTURE", "10"),
];

// 布局分析库区与零售拣选库区
const LAYOUT_ZONES: &[&str] = &["ZAK", "ZAL"];
const RETAIL_ZONE: &str = "ZYY";

// 流水记录结构
#[derive(Clone)]
struct TransactionRecord {
    material_id: String,
    reference_document: String,
    storage_zone: String,
    quantity_marker: String,
    quantity: String,
    uom_actual: String,
    material_desc: String,
    movement_type: String,
    confirm_time: String,
    created_date: String,
    created_time: String,
}

impl TransactionRecord {
    fn to_row(&self) -> Vec<String> {
        vec![
            self.material_id.clone(),
            self.reference_document.clone(),
            self.storage_zone.clone(),
            self.quantity_marker.clone(),
            self.quantity.clone(),
            self.uom_actual.clone(),
            self.material_desc.clone(),
            self.movement_type.clone(),
            self.confirm_time.clone(),
            self.created_date.clone(),
            self.created_time.clone(),
        ]
    }
}

// 生成正常流水记录
//
// 凭证号按 index/3 分组，同一凭证内的物料在布局分析中构成共现对。
fn generate_normal_record(index: usize) -> TransactionRecord {
    let base_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let date = base_date + Duration::days((index % 14) as i64);
    let hour = 7 + (index % 13) as u32; // 07:00 - 19:00
    let time = NaiveDateTime::new(
        date,
        chrono::NaiveTime::from_hms_opt(hour, (index * 7 % 60) as u32, 0).unwrap(),
    );

    let material = MATERIALS[index % MATERIALS.len()];
    let zone = if index % 5 == 0 {
        RETAIL_ZONE
    } else {
        LAYOUT_ZONES[index % LAYOUT_ZONES.len()]
    };

    TransactionRecord {
        material_id: material.0.to_string(),
        reference_document: format!("20455{:05}", (index / 3) + 1),
        storage_zone: zone.to_string(),
        quantity_marker: "X".to_string(),
        quantity: format!("{}", 2 + (index % 24)),
        uom_actual: ["PCS", "BOX"][(index % 4 == 0) as usize].to_string(),
        material_desc: material.1.to_string(),
        movement_type: ["101", "601", ""][index % 3].to_string(),
        confirm_time: time.format("%d.%m.%Y %H:%M:%S").to_string(),
        created_date: date.format("%Y-%m-%d").to_string(),
        created_time: time.format("%H:%M:%S").to_string(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("开始生成测试数据集...");

    std::fs::create_dir_all("tests/fixtures/datasets")?;

    // 1. 生成正常流水 (100条)
    generate_normal_transactions()?;

    // 2. 生成大流水数据集 (5000条)
    generate_large_transactions()?;

    // 3. 生成脏数据流水
    generate_dirty_transactions()?;

    // 4. 生成物料组主数据
    generate_master_data()?;

    // 5. 生成单位换算表
    generate_uom_table()?;

    // 6. 生成库存分析导出
    generate_stock_analysis()?;

    println!("✓ 所有测试数据集生成完成！");
    Ok(())
}

fn generate_normal_transactions() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/01_zrw70_normal.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(TRANSACTION_HEADER)?;

    for i in 0..100 {
        let record = generate_normal_record(i);
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 01_zrw70_normal.csv (100条)");
    Ok(())
}

fn generate_large_transactions() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/02_zrw70_large.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(TRANSACTION_HEADER)?;

    for i in 0..5000 {
        let record = generate_normal_record(i + 10000); // 避免与其他数据集的凭证号冲突
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 02_zrw70_large.csv (5000条)");
    Ok(())
}

fn generate_dirty_transactions() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/03_zrw70_dirty.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(TRANSACTION_HEADER)?;

    // 物料号缺失 (3条, 导入时丢弃)
    for i in 0..3 {
        let mut record = generate_normal_record(i + 20000);
        record.material_id = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 物料号带 ".0" 浮点尾巴 (3条, 导入时清洗)
    for i in 0..3 {
        let mut record = generate_normal_record(i + 20003);
        record.material_id = format!("{}.0", record.material_id);
        wtr.write_record(&record.to_row())?;
    }

    // 数量标记缺失 (3条, 数据准备阶段过滤)
    for i in 0..3 {
        let mut record = generate_normal_record(i + 20006);
        record.quantity_marker = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 数量非数值 (3条, 字段置 None)
    for i in 0..3 {
        let mut record = generate_normal_record(i + 20009);
        record.quantity = "NOT_A_NUMBER".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 时间字段不可解析 (3条, 归入 Other 时段)
    for i in 0..3 {
        let mut record = generate_normal_record(i + 20012);
        record.confirm_time = "INVALID".to_string();
        record.created_time = "".to_string();
        wtr.write_record(&record.to_row())?;
    }

    // 正常数据 (对照组)
    for i in 0..5 {
        let record = generate_normal_record(i + 20015);
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    println!("✓ 生成 03_zrw70_dirty.csv (20条，混合脏数据)");
    Ok(())
}

fn generate_master_data() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/04_material_group_master.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(MASTER_HEADER)?;

    for material in MATERIALS {
        wtr.write_record([material.0, material.3, material.4, material.5, material.2])?;
    }

    // 物料组缺失的物料 (布局分析按 UNKNOWN 组处理)
    wtr.write_record(["1090901", "FOOD", "DRY", "MISC", ""])?;

    wtr.flush()?;
    println!("✓ 生成 04_material_group_master.csv ({}条)", MATERIALS.len() + 1);
    Ok(())
}

fn generate_uom_table() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/05_zrw12_uom.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(UOM_HEADER)?;

    for material in MATERIALS {
        wtr.write_record([material.0, material.6])?;
    }

    // 系数不可用的记录 (箱数换算结果应为空)
    wtr.write_record(["1090901", "0"])?;
    wtr.write_record(["1090902", "n/a"])?;

    wtr.flush()?;
    println!("✓ 生成 05_zrw12_uom.csv ({}条，含2条系数不可用)", MATERIALS.len() + 2);
    Ok(())
}

fn generate_stock_analysis() -> Result<(), Box<dyn Error>> {
    let path = "tests/fixtures/datasets/06_stock_analysis.csv";
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    // 前 3 行为横幅说明行，导入时跳过
    wtr.write_record(["Retail Warehouse Stock Analysis", "", "", "", "", "", "", "", ""])?;
    wtr.write_record(["Generated 2026-03-15", "", "", "", "", "", "", "", ""])?;
    wtr.write_record([
        "Product Name",
        "Material ID",
        "Movement",
        "Assessment",
        "Avg Picking (Month-1) in Box",
        "Avg Last 14 Days in Box",
        "Avg Last 3 Days in Box",
        "Stock in Box",
        "XDays",
    ])?;

    for (i, material) in MATERIALS.iter().enumerate() {
        let month1 = format!("{:.1}", 1.0 + i as f64 * 0.7);
        let last14 = format!("{:.1}", 0.8 + i as f64 * 0.6);
        // 近3天均值偶数行缺失
        let last3 = if i % 2 == 0 {
            String::new()
        } else {
            format!("{:.1}", 0.5 + i as f64 * 0.5)
        };
        let stock = format!("{}", 3 + i * 2);
        let xdays = format!("{}", 2 + i % 10);

        wtr.write_record([
            material.1,
            material.0,
            ["Fast", "Medium", "Slow"][i % 3],
            ["OK", "REVIEW"][i % 2],
            &month1,
            &last14,
            &last3,
            &stock,
            &xdays,
        ])?;
    }

    // 物料号缺失的小计行 (导入时丢弃)
    wtr.write_record(["SUBTOTAL", "", "", "", "18.5", "", "", "", ""])?;

    wtr.flush()?;
    println!("✓ 生成 06_stock_analysis.csv ({}条)", MATERIALS.len() + 1);
    Ok(())
}
