use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Criterion {
    // 接受创建请求时若缺失则由服务端分配稳定 id
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub max_score: f64,
    // 百分比权重，所有评分项之和必须恰好等于 100
    pub weight: i32,
}

// 评分标准实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rubric {
    pub id: i64,
    pub owner_id: i64,
    pub owner_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub criteria: Vec<Criterion>,
    // 始终等于所有评分项 max_score 之和，不单独设置
    pub max_total_score: f64,
    pub is_public: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Rubric {
    /// 将评分项拍平为提供给语言引擎的上下文描述
    pub fn criteria_context(&self) -> String {
        self.criteria
            .iter()
            .map(|c| {
                let desc = c.description.as_deref().unwrap_or("");
                format!(
                    "- {} (max {} pts, weight {}%): {}",
                    c.name, c.max_score, c.weight, desc
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_context_flattening() {
        let rubric = Rubric {
            id: 1,
            owner_id: 1,
            owner_name: None,
            title: "Essay".to_string(),
            description: None,
            criteria: vec![
                Criterion {
                    id: Some("c1".to_string()),
                    name: "Argument".to_string(),
                    description: Some("Clear thesis".to_string()),
                    max_score: 60.0,
                    weight: 60,
                },
                Criterion {
                    id: Some("c2".to_string()),
                    name: "Style".to_string(),
                    description: None,
                    max_score: 40.0,
                    weight: 40,
                },
            ],
            max_total_score: 100.0,
            is_public: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let ctx = rubric.criteria_context();
        assert!(ctx.contains("Argument (max 60 pts, weight 60%): Clear thesis"));
        assert!(ctx.contains("Style (max 40 pts, weight 40%)"));
    }
}
