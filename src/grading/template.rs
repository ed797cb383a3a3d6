//! 评分提示词模板渲染

pub const DESCRIPTION_PLACEHOLDER: &str = "{description}";
pub const CODE_PLACEHOLDER: &str = "{code}";

const EMPTY_DESCRIPTION: &str = "No description provided";

/// 渲染提示词
///
/// 从左到右单次扫描模板，插入的描述和代码不会被再次扫描，
/// 所以描述里出现的 `{code}` 会原样保留。缺少占位符的模板按原文使用。
pub fn render_prompt(template: &str, description: &str, code: &str) -> String {
    let description = if description.trim().is_empty() {
        EMPTY_DESCRIPTION
    } else {
        description
    };

    let mut rendered = String::with_capacity(template.len() + description.len() + code.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        rendered.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if let Some(after) = tail.strip_prefix(DESCRIPTION_PLACEHOLDER) {
            rendered.push_str(description);
            rest = after;
        } else if let Some(after) = tail.strip_prefix(CODE_PLACEHOLDER) {
            rendered.push_str(code);
            rest = after;
        } else {
            rendered.push('{');
            rest = &tail[1..];
        }
    }
    rendered.push_str(rest);

    rendered
}

/// 模板中缺失的占位符
pub fn missing_placeholders(template: &str) -> Vec<&'static str> {
    [DESCRIPTION_PLACEHOLDER, CODE_PLACEHOLDER]
        .into_iter()
        .filter(|placeholder| !template.contains(placeholder))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::DEFAULT_PROMPT_TEMPLATE;

    #[test]
    fn test_default_template_substitutes_each_placeholder_once() {
        let description = "Write a function that reverses a list.";
        let code = "def rev(xs):\n    return xs[::-1]\n";
        let rendered = render_prompt(DEFAULT_PROMPT_TEMPLATE, description, code);

        assert!(!rendered.contains(DESCRIPTION_PLACEHOLDER));
        assert!(!rendered.contains(CODE_PLACEHOLDER));
        assert_eq!(rendered.matches(description).count(), 1);
        assert_eq!(rendered.matches(code).count(), 1);
        // 模板里的 JSON 花括号保持不变
        assert!(rendered.contains("\"grade\": <number>"));
    }

    #[test]
    fn test_inserted_text_is_not_rescanned() {
        let rendered = render_prompt("D: {description}\nC: {code}", "uses {code} literally", "x = 1");
        assert_eq!(rendered, "D: uses {code} literally\nC: x = 1");

        let rendered = render_prompt("{code}|{description}", "desc", "print('{description}')");
        assert_eq!(rendered, "print('{description}')|desc");
    }

    #[test]
    fn test_empty_description_uses_fallback() {
        assert_eq!(
            render_prompt("[{description}]", "  \n", "pass"),
            "[No description provided]"
        );
    }

    #[test]
    fn test_template_without_placeholders_is_used_literally() {
        assert_eq!(render_prompt("Grade this.", "d", "c"), "Grade this.");
        assert_eq!(render_prompt("only {code}", "d", "c"), "only c");
        assert_eq!(render_prompt("{ {desc} }{", "d", "c"), "{ {desc} }{");
    }

    #[test]
    fn test_missing_placeholders() {
        assert!(missing_placeholders(DEFAULT_PROMPT_TEMPLATE).is_empty());
        assert_eq!(missing_placeholders("just {code}"), vec![DESCRIPTION_PLACEHOLDER]);
        assert_eq!(
            missing_placeholders("nothing"),
            vec![DESCRIPTION_PLACEHOLDER, CODE_PLACEHOLDER]
        );
    }

    #[test]
    fn test_non_ascii_is_preserved() {
        let rendered = render_prompt("{description}: {code}", "反转列表", "print('héllo')");
        assert_eq!(rendered, "反转列表: print('héllo')");
    }
}
