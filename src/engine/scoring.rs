//! 确定性启发式评分
//!
//! 引擎生成的文字反馈仅供参考，分数始终由这里的规则给出，
//! 同一文本永远得到同一分数。
//!
//! 规则（满分 100，基础分 70）：
//! - 词数 ≥ 100 加 3 分，≥ 250 再加 3 分，≥ 500 再加 4 分
//! - 段落数（空行分隔）≥ 3 加 5 分，≥ 5 再加 5 分
//! - 平均每句词数严格介于 10 和 25 之间加 5 分

const BASE_SCORE: f64 = 70.0;
const MAX_SCORE: f64 = 100.0;

/// 对文本打分，返回 0-100 的启发式分数
pub fn heuristic_score(text: &str) -> f64 {
    let words = count_words(text);
    let paragraphs = count_paragraphs(text);
    let sentences = count_sentences(text);

    let mut score = BASE_SCORE;

    if words >= 100 {
        score += 3.0;
    }
    if words >= 250 {
        score += 3.0;
    }
    if words >= 500 {
        score += 4.0;
    }

    if paragraphs >= 3 {
        score += 5.0;
    }
    if paragraphs >= 5 {
        score += 5.0;
    }

    if sentences > 0 {
        let avg_words_per_sentence = words as f64 / sentences as f64;
        if avg_words_per_sentence > 10.0 && avg_words_per_sentence < 25.0 {
            score += 5.0;
        }
    }

    score.min(MAX_SCORE)
}

/// 词数（空白分隔）
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 段落数（空行分隔，忽略只含空白的段落）
pub fn count_paragraphs(text: &str) -> usize {
    text.split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count()
}

/// 句子数（以 . ! ? 结尾的非空片段）
pub fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|s| s.split_whitespace().next().is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 生成 words 个词、平均每句 words_per_sentence 词、paragraphs 个段落的文本
    fn synthetic_text(words: usize, words_per_sentence: usize, paragraphs: usize) -> String {
        let sentence = format!("{}.", vec!["word"; words_per_sentence].join(" "));
        let sentences = vec![sentence; words / words_per_sentence];

        sentences
            .chunks(sentences.len().div_ceil(paragraphs))
            .map(|chunk| chunk.join(" "))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_well_structured_long_text_scores_95() {
        // 600 词、6 段、平均每句 15 词：70 + 3 + 3 + 4 + 5 + 5 + 5 = 95
        let text = synthetic_text(600, 15, 6);
        assert_eq!(count_words(&text), 600);
        assert_eq!(count_paragraphs(&text), 6);
        assert_eq!(heuristic_score(&text), 95.0);
    }

    #[test]
    fn test_trivial_text_gets_base_score() {
        assert_eq!(heuristic_score("Hello world."), 70.0);
    }

    #[test]
    fn test_same_text_same_score() {
        let text = synthetic_text(300, 12, 4);
        assert_eq!(heuristic_score(&text), heuristic_score(&text));
    }

    #[test]
    fn test_sentence_length_bounds_are_strict() {
        // 平均每句正好 10 词不加分
        let text = synthetic_text(100, 10, 1);
        // 70 + 3 (>=100 词)，无段落加分，无句长加分
        assert_eq!(heuristic_score(&text), 73.0);
    }

    #[test]
    fn test_score_never_exceeds_cap() {
        let text = synthetic_text(2000, 15, 10);
        assert!(heuristic_score(&text) <= 100.0);
    }

    #[test]
    fn test_paragraph_counting_ignores_blank_runs() {
        assert_eq!(count_paragraphs("one\n\n\n\ntwo"), 2);
        assert_eq!(count_paragraphs("   \n\n  "), 0);
    }
}
