use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交状态
//
// 状态机：
//   draft --submit--> submitted --评估开始--> under_review --评估完成--> evaluated
//   evaluated --退回--> returned --submit--> submitted
//   draft / returned 下允许编辑（版本号递增）
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubmissionStatus {
    Draft,       // 草稿
    Submitted,   // 已提交
    UnderReview, // 评审中
    Evaluated,   // 已评估
    Returned,    // 已退回（可再次编辑/提交）
}

impl SubmissionStatus {
    /// 学生是否可以编辑或删除处于该状态的提交
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionStatus::Draft | SubmissionStatus::Returned)
    }

    /// 是否可以从该状态执行 submit
    pub fn can_submit(&self) -> bool {
        matches!(self, SubmissionStatus::Draft | SubmissionStatus::Returned)
    }

    /// 是否可以对该状态的提交发起评估（草稿不可评估）
    pub fn can_be_evaluated(&self) -> bool {
        !matches!(self, SubmissionStatus::Draft)
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Draft => write!(f, "draft"),
            SubmissionStatus::Submitted => write!(f, "submitted"),
            SubmissionStatus::UnderReview => write!(f, "under_review"),
            SubmissionStatus::Evaluated => write!(f, "evaluated"),
            SubmissionStatus::Returned => write!(f, "returned"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SubmissionStatus::Draft),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "under_review" => Ok(SubmissionStatus::UnderReview),
            "evaluated" => Ok(SubmissionStatus::Evaluated),
            "returned" => Ok(SubmissionStatus::Returned),
            _ => Err(format!(
                "Invalid submission status: '{s}'. Supported: draft, submitted, under_review, evaluated, returned"
            )),
        }
    }
}

/// 附件引用
///
/// 文件本体存放在外部文件存储，这里只保留其返回的引用信息。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FileAttachment {
    pub original_name: String,
    pub url: String,
    pub mime_type: String,
    pub size: Option<i64>,
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Submission {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub description: Option<String>,
    // 当前文本内容，始终与 current_version 指向的版本快照一致
    pub content: String,
    pub attachment: Option<FileAttachment>,
    pub status: SubmissionStatus,
    pub current_version: i32,
    // 对评分标准的弱引用，不拥有也不级联删除
    pub rubric_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 提交版本快照（仅追加，创建后不可变）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionVersion {
    pub id: i64,
    pub submission_id: i64,
    pub version: i32,
    pub content: String,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_editability_predicate() {
        assert!(SubmissionStatus::Draft.is_editable());
        assert!(SubmissionStatus::Returned.is_editable());
        assert!(!SubmissionStatus::Submitted.is_editable());
        assert!(!SubmissionStatus::UnderReview.is_editable());
        assert!(!SubmissionStatus::Evaluated.is_editable());
    }

    #[test]
    fn test_submit_allowed_states() {
        assert!(SubmissionStatus::Draft.can_submit());
        assert!(SubmissionStatus::Returned.can_submit());
        assert!(!SubmissionStatus::Submitted.can_submit());
        assert!(!SubmissionStatus::Evaluated.can_submit());
    }

    #[test]
    fn test_draft_cannot_be_evaluated() {
        assert!(!SubmissionStatus::Draft.can_be_evaluated());
        assert!(SubmissionStatus::Submitted.can_be_evaluated());
        assert!(SubmissionStatus::Returned.can_be_evaluated());
    }

    #[test]
    fn test_status_roundtrip() {
        for s in [
            "draft",
            "submitted",
            "under_review",
            "evaluated",
            "returned",
        ] {
            let parsed = SubmissionStatus::from_str(s).unwrap();
            assert_eq!(parsed.to_string(), s);
        }
        assert!(SubmissionStatus::from_str("archived").is_err());
    }
}
