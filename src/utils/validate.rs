use crate::models::rubrics::entities::Criterion;

/// 快速反馈接受的最短文本长度（字符数）
pub const QUICK_FEEDBACK_MIN_CHARS: usize = 50;

/// 快速反馈送入引擎的文本上限，超出部分截断（字符数）
pub const QUICK_FEEDBACK_MAX_CHARS: usize = 1000;

/// 校验评分项集合
///
/// 规则：
/// - 至少一个评分项
/// - 名称非空
/// - max_score 必须为正数
/// - 权重必须为正数，且总和恰好等于 100
pub fn validate_criteria(criteria: &[Criterion]) -> Result<(), String> {
    if criteria.is_empty() {
        return Err("Rubric must contain at least one criterion".to_string());
    }

    for criterion in criteria {
        if criterion.name.trim().is_empty() {
            return Err("Criterion name must not be empty".to_string());
        }
        if criterion.max_score <= 0.0 {
            return Err(format!(
                "Criterion '{}' must have a positive max_score",
                criterion.name
            ));
        }
        if criterion.weight <= 0 {
            return Err(format!(
                "Criterion '{}' must have a positive weight",
                criterion.name
            ));
        }
    }

    let weight_sum: i32 = criteria.iter().map(|c| c.weight).sum();
    if weight_sum != 100 {
        return Err(format!(
            "Criteria weights must sum to exactly 100, got {weight_sum}"
        ));
    }

    Ok(())
}

/// 为缺失 id 的评分项分配稳定 id
pub fn assign_criterion_ids(criteria: &mut [Criterion]) {
    for criterion in criteria.iter_mut() {
        if criterion.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            criterion.id = Some(uuid::Uuid::new_v4().to_string());
        }
    }
}

/// 校验提交的基本字段
pub fn validate_submission_payload(title: &str, content: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title must not be empty".to_string());
    }
    if content.trim().is_empty() {
        return Err("Content must not be empty".to_string());
    }
    Ok(())
}

/// 校验快速反馈文本长度
pub fn validate_quick_feedback_text(text: &str) -> Result<(), String> {
    if text.chars().count() < QUICK_FEEDBACK_MIN_CHARS {
        return Err(format!(
            "Text must be at least {QUICK_FEEDBACK_MIN_CHARS} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(name: &str, max_score: f64, weight: i32) -> Criterion {
        Criterion {
            id: None,
            name: name.to_string(),
            description: None,
            max_score,
            weight,
        }
    }

    #[test]
    fn test_weights_must_sum_to_hundred() {
        let criteria = vec![criterion("A", 50.0, 60), criterion("B", 50.0, 40)];
        assert!(validate_criteria(&criteria).is_ok());

        let criteria = vec![criterion("A", 50.0, 60), criterion("B", 50.0, 30)];
        let err = validate_criteria(&criteria).unwrap_err();
        assert!(err.contains("sum to exactly 100"));

        let criteria = vec![criterion("A", 50.0, 70), criterion("B", 50.0, 40)];
        assert!(validate_criteria(&criteria).is_err());
    }

    #[test]
    fn test_empty_criteria_rejected() {
        assert!(validate_criteria(&[]).is_err());
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let criteria = vec![criterion("A", 0.0, 100)];
        assert!(validate_criteria(&criteria).is_err());

        let criteria = vec![criterion("A", 10.0, 0)];
        assert!(validate_criteria(&criteria).is_err());

        let criteria = vec![criterion("", 10.0, 100)];
        assert!(validate_criteria(&criteria).is_err());
    }

    #[test]
    fn test_assign_ids_preserves_existing() {
        let mut criteria = vec![criterion("A", 50.0, 60), criterion("B", 50.0, 40)];
        criteria[0].id = Some("keep-me".to_string());

        assign_criterion_ids(&mut criteria);

        assert_eq!(criteria[0].id.as_deref(), Some("keep-me"));
        assert!(criteria[1].id.is_some());
    }

    #[test]
    fn test_quick_feedback_minimum_length() {
        assert!(validate_quick_feedback_text("too short").is_err());
        let long_enough = "a".repeat(QUICK_FEEDBACK_MIN_CHARS);
        assert!(validate_quick_feedback_text(&long_enough).is_ok());
    }
}
