//! 提示词构建 - 业务能力层
//!
//! 全部是纯函数，只负责把调用方给的字段填进固定模板

use crate::clients::PromptPart;
use crate::models::{Strictness, UploadedFile};

/// 构建 OCR 请求
///
/// 顺序：任务说明 → 题目图片 → 每张答题卡（先文本标记，再图片）
pub fn build_ocr_parts(qp_list: &[UploadedFile], ans_list: &[UploadedFile]) -> Vec<PromptPart> {
    let mut parts = Vec::with_capacity(1 + qp_list.len() + ans_list.len() * 2);
    parts.push(PromptPart::Text(build_ocr_prompt(ans_list)));

    parts.extend(
        qp_list
            .iter()
            .map(|f| PromptPart::inline(&f.data, &f.mime_type)),
    );

    for f in ans_list {
        parts.push(PromptPart::Text(format!(
            "\n\n--- IMAGE START: {} ---\n",
            f.filename
        )));
        parts.push(PromptPart::inline(&f.data, &f.mime_type));
    }

    parts
}

fn build_ocr_prompt(ans_list: &[UploadedFile]) -> String {
    let filenames = ans_list
        .iter()
        .map(|f| f.filename.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"
I have uploaded {count} ANSWER SHEET IMAGES.
The filenames are: [ {filenames} ].

TASK:
1. Analyze the filenames strictly.
2. Group images by student (e.g., "12_Page1.jpg" and "12_Page2.jpg" = same student "12").
3. If I uploaded 3 different files, I expect 3 entries in the output.

OUTPUT JSON:
{{
  "questionText": "Question extracted...",
  "students": [
    {{ "studentId": "Filename 1", "answerText": "Transcribed text..." }},
    {{ "studentId": "Filename 2", "answerText": "Transcribed text..." }}
  ]
}}
"#,
        count = ans_list.len(),
        filenames = filenames
    )
}

/// 构建生成标准答案的提示词
pub fn build_model_answer_prompt(question: &str) -> String {
    format!(
        r#"Question: {}. Write a concise model answer. Return JSON: {{"answer": "..."}}"#,
        question
    )
}

/// 构建单个学生的评分提示词
pub fn build_evaluation_prompt(
    question: &str,
    model_answer: &str,
    answer_text: &str,
    strictness: Strictness,
) -> String {
    let instructions = match strictness.instruction() {
        Some(instruction) => format!("\nInstructions:\n- {}\n", instruction),
        None => String::new(),
    };

    format!(
        r#"
Question: {question}
Model Answer: {model_answer}
Student Answer: {answer_text}
EVALUATION MODE: {mode}
{instructions}
Task: Evaluate out of 10.
Return JSON: {{ "score": "X/10", "feedback": "Short feedback (max 20 words)." }}
"#,
        question = question,
        model_answer = model_answer,
        answer_text = answer_text,
        mode = strictness.label(),
        instructions = instructions
    )
}
