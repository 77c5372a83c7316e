//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS"与表单操作的能力

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识公报条目，不处理下载流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航、查找元素等操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 在下拉框中按 value 选中选项并触发 change 事件
    ///
    /// # 返回
    /// 找到下拉框且存在该选项时返回 true
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<bool> {
        self.eval_as(select_option_js(selector, value)?).await
    }
}

fn select_option_js(selector: &str, value: &str) -> Result<String> {
    Ok(format!(
        r#"
        (() => {{
            const select = document.querySelector({selector});
            if (!select) return false;
            const value = {value};
            const option = Array.from(select.options).find(o => o.value === value);
            if (!option) return false;
            select.value = value;
            select.dispatchEvent(new Event('input', {{ bubbles: true }}));
            select.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#,
        selector = serde_json::to_string(selector)?,
        value = serde_json::to_string(value)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_option_js_quotes_arguments() {
        let js = select_option_js("#annoPubblicazione", "1948").unwrap();
        assert!(js.contains(r##"document.querySelector("#annoPubblicazione")"##));
        assert!(js.contains(r#"const value = "1948";"#));
    }
}
