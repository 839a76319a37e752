//! 宽松 JSON 解码
//!
//! 模型返回的文本里经常夹带说明文字或代码块标记。这里取第一个 `{` 到最后一个 `}`
//! 之间的子串做一次严格解析，失败时返回空对象，从不向上抛错。

use serde_json::{Map, Value};

/// 从文本中提取 JSON 对象
///
/// 以下情况返回空对象：
/// - 找不到 `{` 或 `}`
/// - 最后一个 `}` 在第一个 `{` 之前
/// - 子串不是合法 JSON，或者解析结果不是对象
pub fn extract(text: &str) -> Map<String, Value> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Map::new();
    };
    if end < start {
        return Map::new();
    }

    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// 取字符串字段，空字符串和非字符串都视为缺失
pub fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
