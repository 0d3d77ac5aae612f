//! Note transformer - rewrites raw release notes through a chat-completion
//! service into the documentation site's Markdown structure.
//!
//! The service is a black box: one request, no retry, and the returned
//! text is passed on untouched.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Capability interface for the rewriting step, so orchestration can be
/// exercised with a fake.
pub trait TextTransformer {
    /// Rewrite `raw_text` into the normalized fragment, dating undated
    /// content with `target_date` (YYYY-MM-DD).
    fn transform(&self, raw_text: &str, target_date: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Transformer backed by an OpenAI-compatible chat-completions endpoint.
pub struct ChatTransformer {
    http: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl ChatTransformer {
    pub fn new(api_base: &str, api_key: &str, model: &str) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(ChatTransformer {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

impl TextTransformer for ChatTransformer {
    fn transform(&self, raw_text: &str, target_date: &str) -> Result<String> {
        let prompt = rewrite_prompt(raw_text, target_date);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SyncError::transform(format!("HTTP {}: {}", status, body)));
        }

        let payload: ChatResponse = response.json()?;
        payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| SyncError::transform("completion response contained no choices"))
    }
}

/// Instruction sent to the rewriting service.
///
/// The wording is load-bearing: the documentation pipeline downstream
/// relies on the exact section structure and the three fixed categories.
pub fn rewrite_prompt(raw_text: &str, target_date: &str) -> String {
    format!(
        r#"请将以下release notes内容整理为文档站使用的Markdown格式，具体要求：
1. 日期处理：
   - 如果原文中已有日期（如 ## 2025-11-30），请保留原文日期
   - 如果原文中没有日期，使用：{release_date}
2. 版本结构为：
   ## YYYY-MM-DD
   ### vX.X.X
   - **新增** [功能描述]
   - **优化** [优化描述]
   - **修复** [修复描述]
3. 所有功能点按"新增"、"优化"、"修复"三类归并
4. 保持原始内容中的(CSP)等前缀标识

示例输出格式：
## 2025-11-30
### v0.45.0

- **新增** (CSP) 支持用户邀请注册身份绑定功能 API
- **新增** 支持 GProduct 对接 Webhook 功能 API
- **新增** 支持增删改查事件通知API
- **优化** 优化短信通道的配置方式
- **修复** 修复忘记密码短时间发送失败问题

以下是原始release notes内容：

{original_text}
"#,
        release_date = target_date,
        original_text = raw_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_date_and_original_text() {
        let prompt = rewrite_prompt("- fix bug X\n- add feature Y", "2025-11-30");
        assert!(prompt.contains("如果原文中没有日期，使用：2025-11-30"));
        assert!(prompt.ends_with("- fix bug X\n- add feature Y\n"));
    }

    #[test]
    fn test_prompt_fixes_the_three_categories() {
        let prompt = rewrite_prompt("x", "2025-01-01");
        assert!(prompt.contains("- **新增** [功能描述]"));
        assert!(prompt.contains("- **优化** [优化描述]"));
        assert!(prompt.contains("- **修复** [修复描述]"));
        assert!(prompt.contains(r#"按"新增"、"优化"、"修复"三类归并"#));
    }

    #[test]
    fn test_prompt_requests_prefix_tag_preservation() {
        let prompt = rewrite_prompt("(CSP) something", "2025-01-01");
        assert!(prompt.contains("保持原始内容中的(CSP)等前缀标识"));
    }

    #[test]
    fn test_chat_response_shape_parses() {
        let json = r###"{"choices":[{"message":{"role":"assistant","content":"## 2025-11-30\n### v0.45.0"}}]}"###;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "## 2025-11-30\n### v0.45.0"
        );
    }
}
