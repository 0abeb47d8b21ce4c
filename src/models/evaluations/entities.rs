use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评估执行方类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluatorType {
    Teacher, // 教师人工评估
    Ai,      // 语言引擎自动评估
}

impl<'de> Deserialize<'de> for EvaluatorType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for EvaluatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluatorType::Teacher => write!(f, "teacher"),
            EvaluatorType::Ai => write!(f, "ai"),
        }
    }
}

impl std::str::FromStr for EvaluatorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "teacher" => Ok(EvaluatorType::Teacher),
            "ai" => Ok(EvaluatorType::Ai),
            _ => Err(format!(
                "Invalid evaluator type: '{s}'. Supported: teacher, ai"
            )),
        }
    }
}

// 评估状态
//
// pending --开始--> in_progress --完成--> completed（终态）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum EvaluationStatus {
    Pending,
    InProgress,
    Completed,
}

impl EvaluationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EvaluationStatus::Completed)
    }

    /// 是否允许迁移到目标状态（只能前进，不能回退）
    pub fn can_transition_to(&self, next: EvaluationStatus) -> bool {
        matches!(
            (self, next),
            (EvaluationStatus::Pending, EvaluationStatus::InProgress)
                | (EvaluationStatus::Pending, EvaluationStatus::Completed)
                | (EvaluationStatus::InProgress, EvaluationStatus::Completed)
        )
    }
}

impl<'de> Deserialize<'de> for EvaluationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationStatus::Pending => write!(f, "pending"),
            EvaluationStatus::InProgress => write!(f, "in_progress"),
            EvaluationStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EvaluationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(EvaluationStatus::Pending),
            "in_progress" => Ok(EvaluationStatus::InProgress),
            "completed" => Ok(EvaluationStatus::Completed),
            _ => Err(format!(
                "Invalid evaluation status: '{s}'. Supported: pending, in_progress, completed"
            )),
        }
    }
}

/// 单个评分项的得分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CriterionScore {
    pub criterion_id: String,
    pub criterion_name: String,
    pub score: f64,
    pub max_score: f64,
    pub comment: Option<String>,
}

// 评估实体
//
// 评估是独立的审计记录：提交被删除后评估依然保留。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Evaluation {
    pub id: i64,
    pub submission_id: i64,
    // 发起评估时提交的版本号，锁定被评估的文本
    pub submission_version: i32,
    pub rubric_id: Option<i64>,
    pub evaluator_id: i64,
    pub evaluator_type: EvaluatorType,
    pub status: EvaluationStatus,
    pub criteria_scores: Vec<CriterionScore>,
    pub total_score: Option<f64>,
    pub max_score: Option<f64>,
    pub percentage: Option<f64>,
    pub grammar_feedback: Option<String>,
    pub clarity_feedback: Option<String>,
    pub structure_feedback: Option<String>,
    pub content_feedback: Option<String>,
    pub overall_feedback: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_evaluation_status_transitions() {
        use EvaluationStatus::*;
        assert!(Pending.can_transition_to(InProgress));
        assert!(Pending.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!InProgress.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_state() {
        assert!(EvaluationStatus::Completed.is_terminal());
        assert!(!EvaluationStatus::Pending.is_terminal());
        assert!(!EvaluationStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_evaluator_type_roundtrip() {
        for s in ["teacher", "ai"] {
            assert_eq!(EvaluatorType::from_str(s).unwrap().to_string(), s);
        }
        assert!(EvaluatorType::from_str("peer").is_err());
    }
}
