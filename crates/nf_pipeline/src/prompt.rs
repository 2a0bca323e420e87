use nf_core::{clamp_chars, Article, PROMPT_EXCERPT_LIMIT};

/// Build the single batched instruction for one run. Each article gets a
/// 1-based ordinal id; bodies are clamped to `PROMPT_EXCERPT_LIMIT` chars
/// so total prompt size stays bounded by the per-source cap.
pub fn build_batch_prompt(
    articles: &[Article],
    native_tags: &[String],
    summary_min: usize,
    summary_max: usize,
) -> String {
    let native = if native_tags.is_empty() {
        "（无）".to_string()
    } else {
        native_tags.join("、")
    };

    let mut prompt = format!("请处理以下{}条科技新闻，要求：\n", articles.len());
    prompt.push_str(&format!(
        "1. 来源标签为 {} 的新闻，标题保持原文，不要翻译；\n",
        native
    ));
    prompt.push_str("2. 其他新闻的标题翻译成中文；\n");
    prompt.push_str(&format!(
        "3. 每条新闻用中文总结，长度控制在{}到{}个汉字之间；\n",
        summary_min, summary_max
    ));
    prompt.push_str(concat!(
        "4. 只返回一个JSON数组，不要任何额外说明。数组元素格式：",
        r#"{"id": 编号, "tag": "来源标签", "title": "标题", "summary": "总结"}"#,
        "\n\n新闻列表：\n\n",
    ));

    for (i, article) in articles.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. [{}] {}\n{}\n\n",
            i + 1,
            article.tag,
            article.title,
            clamp_chars(&article.content, PROMPT_EXCERPT_LIMIT)
        ));
    }
    prompt
}

/// Per-article title prompt for the paced sequential path.
pub fn translate_prompt(title: &str) -> String {
    format!(
        "请将以下英文新闻标题翻译成中文，只返回翻译结果，不要其他内容：\n\n{}",
        title
    )
}

/// Per-article summary prompt for the paced sequential path.
pub fn summary_prompt(content: &str, summary_max: usize) -> String {
    format!(
        "请对以下新闻内容用中文进行总结，总结内容不超过{}个汉字，只返回总结结果：\n\n{}",
        summary_max,
        clamp_chars(content, PROMPT_EXCERPT_LIMIT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use nf_core::target_date;

    fn article(tag: &str, title: &str, content: &str) -> Article {
        Article {
            tag: tag.to_string(),
            title: title.to_string(),
            link: format!("https://example.com/{}", title),
            content: content.to_string(),
            date: target_date(),
        }
    }

    #[test]
    fn test_ordinal_ids_are_one_based() {
        let articles = vec![article("A", "first", "x"), article("B", "second", "y")];
        let prompt = build_batch_prompt(&articles, &[], 60, 100);
        assert!(prompt.contains("1. [A] first"));
        assert!(prompt.contains("2. [B] second"));
    }

    #[test]
    fn test_excerpt_clamped_to_bound() {
        let long = "字".repeat(PROMPT_EXCERPT_LIMIT + 500);
        let articles = vec![article("A", "t", &long)];
        let prompt = build_batch_prompt(&articles, &[], 60, 100);

        let embedded: usize = prompt.chars().filter(|&c| c == '字').count();
        assert_eq!(embedded, PROMPT_EXCERPT_LIMIT);
    }

    #[test]
    fn test_mentions_native_tags_and_band() {
        let articles = vec![article("36kr", "t", "c")];
        let prompt = build_batch_prompt(&articles, &["36kr".to_string()], 60, 100);
        assert!(prompt.contains("36kr"));
        assert!(prompt.contains("60到100"));
        assert!(prompt.contains("JSON数组"));
    }
}
