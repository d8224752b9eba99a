use crate::db;
use crate::domain::scoring::{self, PsychotypeTally};
use crate::services::completion::CompletionClient;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("completion service call failed")]
    Completion(#[source] anyhow::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Tallies one test attempt: per-psychotype yes/no counts over every
/// answer recorded for (test_id, user_id). Unknown test or user simply
/// produces an empty tally.
pub async fn aggregate(
    pool: &PgPool,
    test_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<PsychotypeTally> {
    let question_psychotype = db::question_psychotypes_for_test(pool, test_id).await?;

    let mut psychotype_ids: Vec<Uuid> = question_psychotype.values().copied().collect();
    psychotype_ids.sort();
    psychotype_ids.dedup();
    let names = db::psychotype_names(pool, &psychotype_ids).await?;

    let answers = db::answers_for_attempt(pool, test_id, user_id).await?;
    Ok(scoring::tally(&answers, &question_psychotype, &names))
}

/// The fixed instruction sent with every tally, as the product ships it.
const INSTRUCTION: &str = "Посмотри ответы на тест и сделай развёрнутый отчёт с рекомендациями \
                           по психотипу, а так же скажи какой больше психотип у человека.";

pub fn build_prompt(tally: &PsychotypeTally) -> String {
    let payload = serde_json::json!({
        "message": "Результаты сохранены и агрегированы",
        "psychotypeAnswerSummary": tally,
    });
    format!("{INSTRUCTION} {payload}")
}

/// One completion call for the tally. No retry, no fallback.
pub async fn request_report(
    completion: &dyn CompletionClient,
    tally: &PsychotypeTally,
) -> Result<String, ReportError> {
    let prompt = build_prompt(tally);
    completion
        .complete(&prompt)
        .await
        .map_err(ReportError::Completion)
}

/// Aggregates the attempt, asks the completion service for a narrative
/// report and persists it. The report row is only written after a
/// successful call: a completion failure leaves no report behind.
pub async fn generate_report(
    pool: &PgPool,
    completion: &dyn CompletionClient,
    test_id: Uuid,
    user_id: Uuid,
) -> Result<String, ReportError> {
    let tally = aggregate(pool, test_id, user_id).await?;
    tracing::info!(%test_id, %user_id, "aggregated attempt: {}", serde_json::to_string(&tally).unwrap_or_default());

    let content = request_report(completion, &tally).await?;

    db::insert_report(pool, &content, user_id, test_id).await?;
    tracing::info!(%test_id, %user_id, "report stored ({} chars)", content.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scoring::TallyBucket;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeCompletion {
        reply: Result<String, String>,
        calls: AtomicUsize,
    }

    impl FakeCompletion {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FakeCompletion {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(message) => Err(anyhow!("{message}")),
            }
        }
    }

    fn sample_tally() -> PsychotypeTally {
        let mut tally = PsychotypeTally::new();
        tally.insert("ШИЗОИД".to_string(), TallyBucket { yes: 1, no: 0 });
        tally.insert("ГИПЕРТИМ".to_string(), TallyBucket { yes: 0, no: 1 });
        tally
    }

    #[test]
    fn test_prompt_embeds_tally_and_instruction() {
        let prompt = build_prompt(&sample_tally());

        assert!(prompt.starts_with("Посмотри ответы на тест"));
        assert!(prompt.contains("psychotypeAnswerSummary"));
        assert!(prompt.contains(r#""ШИЗОИД":{"yes":1,"no":0}"#));
        assert!(prompt.contains(r#""ГИПЕРТИМ":{"yes":0,"no":1}"#));
    }

    #[test]
    fn test_prompt_for_empty_tally() {
        let prompt = build_prompt(&PsychotypeTally::new());
        assert!(prompt.contains(r#""psychotypeAnswerSummary":{}"#));
    }

    #[tokio::test]
    async fn test_request_report_returns_completion_text() {
        let fake = FakeCompletion::ok("Доминирующий психотип: ШИЗОИД");

        let report = request_report(&fake, &sample_tally()).await.unwrap();

        assert_eq!(report, "Доминирующий психотип: ШИЗОИД");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_request_report_fails_without_retry() {
        let fake = FakeCompletion::failing("upstream 503");

        let err = request_report(&fake, &sample_tally()).await.unwrap_err();

        assert!(matches!(err, ReportError::Completion(_)));
        // exactly one attempt, no retry loop
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
    }
}
