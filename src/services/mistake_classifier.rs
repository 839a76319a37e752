//! 错误类型识别 - 业务能力层
//!
//! 从评语中识别常见错误类型。默认实现是关键词匹配，可以替换为读取模型返回的结构化字段

/// 错误类型识别器
pub trait MistakeClassifier: Send + Sync {
    /// 返回评语命中的错误类型名称，顺序固定
    fn classify(&self, feedback: &str) -> Vec<&'static str>;
}

/// 关键词到错误类型的映射
const KEYWORD_TAXONOMY: &[(&str, &str)] = &[
    ("miss", "Missing Concepts"),
    ("wrong", "Incorrect Logic"),
];

/// 基于关键词子串匹配的识别器（大小写不敏感）
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl MistakeClassifier for KeywordClassifier {
    fn classify(&self, feedback: &str) -> Vec<&'static str> {
        let lower = feedback.to_lowercase();
        KEYWORD_TAXONOMY
            .iter()
            .filter(|(keyword, _)| lower.contains(keyword))
            .map(|(_, category)| *category)
            .collect()
    }
}

/// 按首次出现顺序统计错误类型
#[derive(Debug, Default)]
pub struct MistakeTally {
    counts: Vec<(&'static str, usize)>,
}

impl MistakeTally {
    pub fn record(&mut self, category: &'static str) {
        match self.counts.iter_mut().find(|(name, _)| *name == category) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((category, 1)),
        }
    }

    pub fn count(&self, category: &str) -> usize {
        self.counts
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// 前 `limit` 个错误类型（按首次出现顺序，不按频次排序）
    pub fn top(&self, limit: usize) -> Vec<String> {
        self.counts
            .iter()
            .take(limit)
            .map(|(name, _)| name.to_string())
            .collect()
    }
}
