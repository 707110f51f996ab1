// ==========================================
// 仓储运营分析系统 - 报表搜索过滤器
// ==========================================
// 职责: 空白分隔的多词条搜索，词条间为 OR 关系
// 匹配目标: 物料号 + 物料描述（大小写不敏感）
// ==========================================

// ==========================================
// SearchFilter - 报表搜索过滤器
// ==========================================
#[derive(Debug, Clone)]
pub struct SearchFilter {
    terms: Vec<String>, // 小写化后的搜索词条
}

impl SearchFilter {
    /// 从查询字符串构造过滤器
    ///
    /// 查询按空白切分为词条并小写化；None 或全空白视为不过滤。
    ///
    /// # 参数
    /// - `query`: 用户输入的搜索串
    ///
    /// # 返回
    /// 新的 SearchFilter 实例
    pub fn new(query: Option<&str>) -> Self {
        let terms = query
            .map(|q| q.split_whitespace().map(|t| t.to_lowercase()).collect())
            .unwrap_or_default();
        Self { terms }
    }

    /// 是否为空过滤器（不做任何筛选）
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 判断记录是否命中
    ///
    /// 任一词条包含于物料号或描述即命中；空过滤器恒命中。
    ///
    /// # 参数
    /// - `material_id`: 物料号
    /// - `material_desc`: 物料描述
    ///
    /// # 返回
    /// 是否命中
    pub fn matches(&self, material_id: &str, material_desc: Option<&str>) -> bool {
        if self.terms.is_empty() {
            return true;
        }

        let id = material_id.to_lowercase();
        let desc = material_desc.map(|d| d.to_lowercase()).unwrap_or_default();
        self.terms
            .iter()
            .any(|t| id.contains(t) || desc.contains(t))
    }
}
