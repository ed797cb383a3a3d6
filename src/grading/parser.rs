//! AI 返回内容解析

use serde::Deserialize;
use serde_json::Value;

use super::GradingError;

/// 解析后的评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGrade {
    pub grade: f64,
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GradePayload {
    grade: GradeValue,
    feedback: FeedbackValue,
}

// 分数可能是数字，也可能是数字字符串
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GradeValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedbackValue {
    Text(String),
    Structured(StructuredFeedback),
}

#[derive(Debug, Default, Deserialize)]
struct StructuredFeedback {
    code_quality: Option<String>,
    #[serde(default)]
    bugs: Option<OneOrMany>,
    #[serde(default)]
    improvements: Option<OneOrMany>,
    #[serde(default)]
    best_practices: Option<OneOrMany>,
}

// 列表字段偶尔会返回单个字符串
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn items(&self) -> Vec<&str> {
        match self {
            OneOrMany::One(item) => vec![item.as_str()],
            OneOrMany::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

/// 从 chat completions 响应体中取出 `choices[0].message.content`
pub fn extract_content(body: &str) -> Result<String, GradingError> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| GradingError::MalformedResponse(format!("invalid completion body: {e}")))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| GradingError::MalformedResponse("completion has no message content".into()))
}

/// 解析模型返回的文本
pub fn parse_grade(content: &str) -> Result<ParsedGrade, GradingError> {
    let cleaned = strip_code_fences(content);

    let value = match serde_json::from_str::<Value>(cleaned) {
        Ok(value) if value.is_object() => value,
        _ => largest_json_object(cleaned).ok_or_else(|| {
            GradingError::MalformedResponse("no JSON object found in model output".into())
        })?,
    };

    let payload: GradePayload = serde_json::from_value(value).map_err(|e| {
        GradingError::MalformedResponse(format!("missing or invalid grade/feedback: {e}"))
    })?;

    let grade = match payload.grade {
        GradeValue::Number(n) => n,
        GradeValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
            GradingError::MalformedResponse(format!("grade is not a number: {s}"))
        })?,
    };
    if !grade.is_finite() || !(0.0..=100.0).contains(&grade) {
        return Err(GradingError::MalformedResponse(format!(
            "grade out of range: {grade}"
        )));
    }

    let feedback = match payload.feedback {
        FeedbackValue::Text(text) => text.trim().to_string(),
        FeedbackValue::Structured(structured) => format_feedback(&structured),
    };

    Ok(ParsedGrade { grade, feedback })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记，例如 ```json
    let rest = match rest.find('\n') {
        Some(pos) if rest[..pos].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[pos + 1..],
        _ => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// 找出文本中能解析的最大 `{...}` 对象，跳过字符串中的花括号
fn largest_json_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();

    for (start, &b) in bytes.iter().enumerate() {
        if b != b'{' {
            continue;
        }
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        for (offset, &c) in bytes[start..].iter().enumerate() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        candidates.push(&text[start..=start + offset]);
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    candidates.sort_by_key(|candidate| std::cmp::Reverse(candidate.len()));
    candidates
        .into_iter()
        .filter_map(|candidate| serde_json::from_str::<Value>(candidate).ok())
        .find(Value::is_object)
}

fn format_feedback(feedback: &StructuredFeedback) -> String {
    let code_quality = feedback
        .code_quality
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("No assessment provided");

    let section = |title: &str, items: &Option<OneOrMany>| -> String {
        let items: Vec<&str> = items
            .as_ref()
            .map(OneOrMany::items)
            .unwrap_or_default()
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .collect();
        if items.is_empty() {
            format!("{title}\n- None")
        } else {
            let lines: Vec<String> = items.iter().map(|item| format!("- {item}")).collect();
            format!("{title}\n{}", lines.join("\n"))
        }
    };

    [
        format!("Code Quality Assessment:\n{code_quality}"),
        section("Potential Bugs:", &feedback.bugs),
        section("Suggested Improvements:", &feedback.improvements),
        section("Best Practices:", &feedback.best_practices),
    ]
    .join("\n\n")
}
