//! 反馈生成编排
//!
//! 把一次评估拆成多个类别的生成调用并发执行。单个类别失败时就地替换为该类别
//! 的占位文本，只有全部调用都失败时才视为引擎故障，由调用方走兜底路径。

use tracing::warn;

use super::TextGeneration;
use crate::errors::{EvalHubError, Result};

const SYSTEM_OVERALL: &str = "You are an experienced writing instructor. Give a concise overall \
assessment of the student text. Address the student directly.";
const SYSTEM_GRAMMAR: &str = "You are a careful proofreader. Point out grammar, spelling and \
punctuation issues in the student text. Be specific and brief.";
const SYSTEM_CLARITY: &str = "You are an editor focused on clarity. Comment on the readability \
and word choice of the student text. Be specific and brief.";
const SYSTEM_STRUCTURE: &str = "You are an editor focused on structure. Comment on the \
organization, paragraphing and flow of the student text. Be specific and brief.";
const SYSTEM_CONTENT: &str = "You are an experienced writing instructor. Comment on the \
substance of the student text: argument, evidence and depth. Be specific and brief.";
const SYSTEM_SUGGESTIONS: &str = "You are an experienced writing instructor. Give the student \
2-4 concrete, actionable suggestions to improve the text, one per line.";
const SYSTEM_QUICK_SUGGESTIONS: &str = "You are an experienced writing instructor. Give the \
student at most 3 concrete, actionable suggestions to improve the text, one per line.";

// 单个类别失败时的占位文本
const FALLBACK_GRAMMAR: &str = "Grammar feedback could not be generated for this submission.";
const FALLBACK_CLARITY: &str = "Clarity feedback could not be generated for this submission.";
const FALLBACK_STRUCTURE: &str = "Structure feedback could not be generated for this submission.";
const FALLBACK_CONTENT: &str = "Content feedback could not be generated for this submission.";
const FALLBACK_SUGGESTIONS: &str = "Suggestions could not be generated for this submission.";

/// 引擎整体不可用时写入评估的兜底反馈
pub const FALLBACK_OVERALL: &str = "AI evaluation encountered an error and could not analyze \
this submission. Please try again later.";
/// 引擎整体不可用时写入评估的兜底建议
pub const FALLBACK_SUGGESTION: &str = "Request a manual review from your teacher.";

/// 快速反馈中单个类别失败时的占位文本
const QUICK_FALLBACK: &str = "Feedback for this category is temporarily unavailable.";

/// 快速反馈返回的建议条数上限
pub const QUICK_SUGGESTION_LIMIT: usize = 3;

/// 一次完整评估的生成结果，失败的类别已替换为占位文本
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub grammar_feedback: String,
    pub clarity_feedback: String,
    pub structure_feedback: String,
    pub content_feedback: String,
    pub overall_feedback: String,
    pub suggestions: Vec<String>,
}

/// 快速反馈的生成结果
#[derive(Debug, Clone)]
pub struct QuickAnalysisOutput {
    pub grammar_feedback: String,
    pub clarity_feedback: String,
    pub suggestions: Vec<String>,
}

async fn generate_category(
    engine: &dyn TextGeneration,
    category: &str,
    system: &str,
    prompt: &str,
) -> Option<String> {
    match engine.generate(system, prompt).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Engine generation failed for category '{}': {}", category, e);
            None
        }
    }
}

/// 把引擎返回的建议文本拆成条目，去掉常见的列表前缀
fn split_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')'])
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 对提交文本做完整分析
///
/// 四个类别并发生成，之后基于同一文本生成整体反馈与建议。
/// rubric_context 存在时会附加到整体反馈的提示中，让反馈贴合评分标准。
pub async fn analyze(
    engine: &dyn TextGeneration,
    text: &str,
    rubric_context: Option<&str>,
) -> Result<AnalysisOutput> {
    let overall_prompt = match rubric_context {
        Some(ctx) => format!(
            "The submission is graded against the following rubric:\n{ctx}\n\nStudent text:\n{text}"
        ),
        None => format!("Student text:\n{text}"),
    };
    let plain_prompt = format!("Student text:\n{text}");

    let (grammar, clarity, structure, content) = tokio::join!(
        generate_category(engine, "grammar", SYSTEM_GRAMMAR, &plain_prompt),
        generate_category(engine, "clarity", SYSTEM_CLARITY, &plain_prompt),
        generate_category(engine, "structure", SYSTEM_STRUCTURE, &plain_prompt),
        generate_category(engine, "content", SYSTEM_CONTENT, &plain_prompt),
    );

    let (overall, suggestions) = tokio::join!(
        generate_category(engine, "overall", SYSTEM_OVERALL, &overall_prompt),
        generate_category(engine, "suggestions", SYSTEM_SUGGESTIONS, &plain_prompt),
    );

    let all_failed = grammar.is_none()
        && clarity.is_none()
        && structure.is_none()
        && content.is_none()
        && overall.is_none()
        && suggestions.is_none();

    if all_failed {
        return Err(EvalHubError::engine_failure(
            "All feedback categories failed to generate",
        ));
    }

    Ok(AnalysisOutput {
        grammar_feedback: grammar.unwrap_or_else(|| FALLBACK_GRAMMAR.to_string()),
        clarity_feedback: clarity.unwrap_or_else(|| FALLBACK_CLARITY.to_string()),
        structure_feedback: structure.unwrap_or_else(|| FALLBACK_STRUCTURE.to_string()),
        content_feedback: content.unwrap_or_else(|| FALLBACK_CONTENT.to_string()),
        overall_feedback: overall.unwrap_or_else(|| FALLBACK_OVERALL.to_string()),
        suggestions: suggestions
            .map(|s| split_suggestions(&s))
            .unwrap_or_else(|| vec![FALLBACK_SUGGESTIONS.to_string()]),
    })
}

/// 对任意文本做轻量分析（不落库），建议最多保留三条
pub async fn analyze_quick(engine: &dyn TextGeneration, text: &str) -> Result<QuickAnalysisOutput> {
    let prompt = format!("Student text:\n{text}");

    let (grammar, clarity, suggestions) = tokio::join!(
        generate_category(engine, "grammar", SYSTEM_GRAMMAR, &prompt),
        generate_category(engine, "clarity", SYSTEM_CLARITY, &prompt),
        generate_category(engine, "suggestions", SYSTEM_QUICK_SUGGESTIONS, &prompt),
    );

    if grammar.is_none() && clarity.is_none() && suggestions.is_none() {
        return Err(EvalHubError::engine_failure(
            "All feedback categories failed to generate",
        ));
    }

    Ok(QuickAnalysisOutput {
        grammar_feedback: grammar.unwrap_or_else(|| QUICK_FALLBACK.to_string()),
        clarity_feedback: clarity.unwrap_or_else(|| QUICK_FALLBACK.to_string()),
        suggestions: suggestions
            .map(|s| split_suggestions(&s))
            .unwrap_or_else(|| vec![QUICK_FALLBACK.to_string()])
            .into_iter()
            .take(QUICK_SUGGESTION_LIMIT)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// 系统提示包含任一关键字时返回失败的测试引擎
    struct MockEngine {
        fail_on: Vec<&'static str>,
    }

    impl MockEngine {
        fn healthy() -> Self {
            Self { fail_on: vec![] }
        }

        fn broken() -> Self {
            Self {
                fail_on: vec![""],
            }
        }
    }

    #[async_trait]
    impl TextGeneration for MockEngine {
        async fn generate(&self, system: &str, _prompt: &str) -> Result<String> {
            if self.fail_on.iter().any(|k| system.contains(k)) {
                return Err(EvalHubError::engine_failure("mock failure"));
            }
            Ok(format!("generated for: {}", &system[..20]))
        }
    }

    #[tokio::test]
    async fn test_analyze_returns_all_categories() {
        let engine = MockEngine::healthy();
        let output = analyze(&engine, "Some essay text.", None).await.unwrap();

        assert!(output.grammar_feedback.starts_with("generated for"));
        assert!(output.clarity_feedback.starts_with("generated for"));
        assert!(output.structure_feedback.starts_with("generated for"));
        assert!(output.content_feedback.starts_with("generated for"));
        assert!(output.overall_feedback.starts_with("generated for"));
        assert!(output.suggestions[0].starts_with("generated for"));
    }

    #[tokio::test]
    async fn test_analyze_substitutes_fallback_for_failed_category() {
        // 只有校对类别失败：其余照常返回，失败类别替换为占位文本
        let engine = MockEngine {
            fail_on: vec!["proofreader"],
        };
        let output = analyze(&engine, "Some essay text.", None).await.unwrap();
        assert_eq!(output.grammar_feedback, FALLBACK_GRAMMAR);
        assert!(output.structure_feedback.starts_with("generated for"));
        assert!(output.overall_feedback.starts_with("generated for"));
    }

    #[tokio::test]
    async fn test_analyze_fails_only_when_all_categories_fail() {
        let engine = MockEngine::broken();
        assert!(analyze(&engine, "Some essay text.", None).await.is_err());
    }

    #[tokio::test]
    async fn test_quick_feedback_uses_fallback_for_failed_category() {
        let engine = MockEngine {
            fail_on: vec!["proofreader"],
        };
        let output = analyze_quick(&engine, "Some essay text.").await.unwrap();
        assert_eq!(output.grammar_feedback, QUICK_FALLBACK);
        assert_ne!(output.clarity_feedback, QUICK_FALLBACK);
    }

    #[tokio::test]
    async fn test_quick_feedback_errors_when_engine_down() {
        let engine = MockEngine::broken();
        assert!(analyze_quick(&engine, "Some essay text.").await.is_err());
    }

    #[tokio::test]
    async fn test_quick_feedback_caps_suggestions_at_three() {
        struct VerboseEngine;

        #[async_trait]
        impl TextGeneration for VerboseEngine {
            async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
                Ok("1. First\n2. Second\n3. Third\n4. Fourth\n5. Fifth".to_string())
            }
        }

        let output = analyze_quick(&VerboseEngine, "Some essay text.").await.unwrap();
        assert_eq!(output.suggestions.len(), QUICK_SUGGESTION_LIMIT);
        assert_eq!(output.suggestions[0], "First");
        assert_eq!(output.suggestions[2], "Third");
    }

    #[test]
    fn test_split_suggestions_strips_list_prefixes() {
        let parsed = split_suggestions("- Use shorter sentences.\n* Vary word choice.\n\n2) Cite sources.");
        assert_eq!(
            parsed,
            vec![
                "Use shorter sentences.".to_string(),
                "Vary word choice.".to_string(),
                "Cite sources.".to_string(),
            ]
        );

        // 无列表格式时整段作为一条建议
        let single = split_suggestions("Just one paragraph of advice.");
        assert_eq!(single.len(), 1);
    }

    #[tokio::test]
    async fn test_rubric_context_flows_into_overall_prompt() {
        struct CapturingEngine;

        #[async_trait]
        impl TextGeneration for CapturingEngine {
            async fn generate(&self, _system: &str, prompt: &str) -> Result<String> {
                Ok(prompt.to_string())
            }
        }

        let output = analyze(&CapturingEngine, "Essay.", Some("- Argument (60%)"))
            .await
            .unwrap();
        assert!(output.overall_feedback.contains("- Argument (60%)"));
        // 其余类别不带评分标准
        assert!(!output.grammar_feedback.contains("Argument"));
    }
}
