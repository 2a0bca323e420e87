use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use nf_core::config::PipelineConfig;
use nf_core::{Article, ProcessedArticle, SUMMARY_FAILED};
use tracing::{debug, info, warn};

use crate::agent::AgentClient;
use crate::parse::{parse_batch_response, BatchEntry, BatchOutcome};
use crate::prompt::{build_batch_prompt, summary_prompt, translate_prompt};

/// Translates and summarizes a collected batch through the remote agent.
///
/// The batched path costs exactly one agent exchange per run. On
/// invocation or parse failure every input degrades to its original title
/// plus the failure sentinel, so output cardinality always equals input
/// cardinality (after link dedup) even under total agent unavailability.
pub struct Pipeline {
    agent: Arc<dyn AgentClient>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(agent: Arc<dyn AgentClient>, config: &PipelineConfig) -> Self {
        Self {
            agent,
            config: config.clone(),
        }
    }

    pub async fn process(&self, articles: &[Article]) -> Vec<ProcessedArticle> {
        if articles.is_empty() {
            info!("📭 nothing to process, skipping agent invocation");
            return Vec::new();
        }

        let unique = dedup_by_link(articles);
        if unique.len() < articles.len() {
            debug!(
                dropped = articles.len() - unique.len(),
                "duplicate links removed before enrichment"
            );
        }

        if !self.config.batch {
            return self.process_sequential(&unique).await;
        }

        let prompt = build_batch_prompt(
            &unique,
            &self.config.native_tags,
            self.config.summary_min,
            self.config.summary_max,
        );
        let outcome = match self.agent.invoke(&prompt).await {
            Ok(raw) => {
                let outcome = parse_batch_response(&raw);
                if let BatchOutcome::Failed(reason) = &outcome {
                    debug!(%reason, raw, "agent response retained for diagnosis");
                }
                outcome
            }
            Err(e) => BatchOutcome::Failed(format!("invocation failed: {}", e)),
        };

        match outcome {
            BatchOutcome::Parsed(entries) => {
                info!(entries = entries.len(), inputs = unique.len(), "🧠 batch enrichment parsed");
                self.merge(&unique, entries)
            }
            BatchOutcome::Failed(reason) => {
                warn!(%reason, "falling back to degraded per-article output");
                unique.iter().map(ProcessedArticle::degraded).collect()
            }
        }
    }

    /// Overlay decoded entries onto the inputs by ordinal id. Unmatched
    /// inputs stay degraded; out-of-range ids are dropped; link, content,
    /// date and tag are never taken from the agent.
    fn merge(&self, articles: &[Article], entries: Vec<BatchEntry>) -> Vec<ProcessedArticle> {
        let mut output: Vec<ProcessedArticle> =
            articles.iter().map(ProcessedArticle::degraded).collect();

        for entry in entries {
            if entry.id == 0 || entry.id > articles.len() {
                debug!(id = entry.id, "entry id outside input range, dropped");
                continue;
            }
            let original = &articles[entry.id - 1];

            let localized_title =
                if self.config.is_native(&original.tag) || entry.title.trim().is_empty() {
                    original.title.clone()
                } else {
                    entry.title.trim().to_string()
                };
            let summary = if entry.summary.trim().is_empty() {
                SUMMARY_FAILED.to_string()
            } else {
                entry.summary.trim().to_string()
            };

            output[entry.id - 1] = ProcessedArticle::enriched(original, localized_title, summary);
        }
        output
    }

    /// Paced per-article path: one translate call and one summarize call
    /// per article, with a fixed delay between the two sub-calls and
    /// between successive articles. Costs 2N agent exchanges; kept for
    /// agents that cannot follow the batched array instruction.
    async fn process_sequential(&self, articles: &[Article]) -> Vec<ProcessedArticle> {
        let pacing = Duration::from_secs(self.config.pacing_secs);
        let mut output = Vec::with_capacity(articles.len());

        for (i, article) in articles.iter().enumerate() {
            let localized_title = if self.config.is_native(&article.tag) {
                article.title.clone()
            } else {
                let title = match self.agent.invoke(&translate_prompt(&article.title)).await {
                    Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
                    Ok(_) => article.title.clone(),
                    Err(e) => {
                        warn!(link = %article.link, error = %e, "title translation failed");
                        article.title.clone()
                    }
                };
                tokio::time::sleep(pacing).await;
                title
            };

            let summary = match self
                .agent
                .invoke(&summary_prompt(&article.content, self.config.summary_max))
                .await
            {
                Ok(reply) if !reply.trim().is_empty() => reply.trim().to_string(),
                Ok(_) => SUMMARY_FAILED.to_string(),
                Err(e) => {
                    warn!(link = %article.link, error = %e, "content summarization failed");
                    SUMMARY_FAILED.to_string()
                }
            };

            output.push(ProcessedArticle::enriched(article, localized_title, summary));

            if i + 1 < articles.len() {
                tokio::time::sleep(pacing).await;
            }
        }
        output
    }
}

/// Keep the first occurrence of every link, preserving input order.
/// Identical links arriving from two sources within one run are the same
/// story; enriching both would pay the agent twice for nothing.
fn dedup_by_link(articles: &[Article]) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .filter(|a| seen.insert(a.link.clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ScriptedAgent;
    use nf_core::target_date;

    fn article(tag: &str, title: &str, link: &str) -> Article {
        Article {
            tag: tag.to_string(),
            title: title.to_string(),
            link: link.to_string(),
            content: format!("content of {}", title),
            date: target_date(),
        }
    }

    fn quick_config() -> PipelineConfig {
        PipelineConfig {
            pacing_secs: 0,
            ..PipelineConfig::default()
        }
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let agent = Arc::new(ScriptedAgent::replying("[]"));
        let pipeline = Pipeline::new(agent.clone(), &quick_config());
        let output = pipeline.process(&[]).await;
        assert!(output.is_empty());
        assert_eq!(agent.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fallback_preserves_cardinality() {
        let agent = Arc::new(ScriptedAgent::replying("no array in sight"));
        let pipeline = Pipeline::new(agent, &quick_config());
        let inputs = vec![
            article("A", "one", "https://x/1"),
            article("B", "two", "https://x/2"),
        ];
        let output = pipeline.process(&inputs).await;
        assert_eq!(output.len(), 2);
        assert!(output.iter().all(|p| p.summary == SUMMARY_FAILED));
        assert_eq!(output[0].localized_title, "one");
    }

    #[tokio::test]
    async fn test_invocation_failure_degrades() {
        let agent = Arc::new(ScriptedAgent::failing());
        let pipeline = Pipeline::new(agent, &quick_config());
        let output = pipeline.process(&[article("A", "one", "https://x/1")]).await;
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].summary, SUMMARY_FAILED);
    }

    #[tokio::test]
    async fn test_native_tag_skips_translation() {
        let agent = Arc::new(ScriptedAgent::replying(
            r#"[{"id": 1, "title": "翻译过头了", "summary": "摘要内容"}]"#,
        ));
        let pipeline = Pipeline::new(agent, &quick_config());
        let output = pipeline
            .process(&[article("36kr", "原始标题", "https://x/1")])
            .await;
        assert_eq!(output[0].localized_title, "原始标题");
        assert_eq!(output[0].summary, "摘要内容");
    }

    #[tokio::test]
    async fn test_out_of_range_ids_dropped() {
        let agent = Arc::new(ScriptedAgent::replying(
            r#"[{"id": 0, "title": "a", "summary": "s"},
                {"id": 1, "title": "标题", "summary": "总结"},
                {"id": 9, "title": "b", "summary": "s"}]"#,
        ));
        let pipeline = Pipeline::new(agent, &quick_config());
        let output = pipeline.process(&[article("A", "one", "https://x/1")]).await;
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].localized_title, "标题");
    }

    #[tokio::test]
    async fn test_empty_decoded_title_falls_back_to_original() {
        let agent = Arc::new(ScriptedAgent::replying(
            r#"[{"id": 1, "title": "  ", "summary": "总结"}]"#,
        ));
        let pipeline = Pipeline::new(agent, &quick_config());
        let output = pipeline.process(&[article("A", "one", "https://x/1")]).await;
        assert_eq!(output[0].localized_title, "one");
        assert_eq!(output[0].summary, "总结");
    }

    #[tokio::test]
    async fn test_identity_fields_never_taken_from_agent() {
        let agent = Arc::new(ScriptedAgent::replying(
            r#"[{"id": 1, "tag": "Spoofed", "title": "标题", "summary": "总结"}]"#,
        ));
        let pipeline = Pipeline::new(agent, &quick_config());
        let input = article("A", "one", "https://x/1");
        let output = pipeline.process(std::slice::from_ref(&input)).await;
        assert_eq!(output[0].tag, "A");
        assert_eq!(output[0].link, input.link);
        assert_eq!(output[0].content, input.content);
        assert_eq!(output[0].date, input.date);
    }

    #[tokio::test]
    async fn test_duplicate_links_enriched_once() {
        let agent = Arc::new(ScriptedAgent::replying(
            r#"[{"id": 1, "title": "标题", "summary": "总结"}]"#,
        ));
        let pipeline = Pipeline::new(agent.clone(), &quick_config());
        let inputs = vec![
            article("A", "one", "https://x/1"),
            article("B", "one again", "https://x/1"),
        ];
        let output = pipeline.process(&inputs).await;
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].tag, "A");
        assert_eq!(agent.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sequential_path_two_calls_per_article() {
        let agent = Arc::new(ScriptedAgent::replying_in_turn(vec![
            "翻译标题".to_string(),
            "内容总结".to_string(),
        ]));
        let config = PipelineConfig {
            batch: false,
            pacing_secs: 0,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(agent.clone(), &config);
        let output = pipeline.process(&[article("A", "one", "https://x/1")]).await;
        assert_eq!(output[0].localized_title, "翻译标题");
        assert_eq!(output[0].summary, "内容总结");
        assert_eq!(agent.call_count(), 2);
    }

    #[tokio::test]
    async fn test_sequential_native_skips_translate_call() {
        let agent = Arc::new(ScriptedAgent::replying("内容总结"));
        let config = PipelineConfig {
            batch: false,
            pacing_secs: 0,
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(agent.clone(), &config);
        let output = pipeline
            .process(&[article("36kr", "原始标题", "https://x/1")])
            .await;
        assert_eq!(output[0].localized_title, "原始标题");
        assert_eq!(agent.call_count(), 1);
    }
}
