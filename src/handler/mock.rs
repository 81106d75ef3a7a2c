use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::{Args, Handler};

/// Mock handler that simulates a model runtime: a slow one-time load and a
/// fixed per-request generation delay, answering every prompt with the same
/// piece of advice.
pub struct MockTextHandler {
    load_delay: Duration,
    generate_delay: Duration,
    advice: &'static str,
}

impl MockTextHandler {
    pub fn new(load_delay: Duration, generate_delay: Duration, advice: &'static str) -> Self {
        Self {
            load_delay,
            generate_delay,
            advice,
        }
    }
}

#[async_trait]
impl Handler for MockTextHandler {
    async fn load(&self) -> Result<()> {
        // Stands in for model loading / warmup on every container start.
        tokio::time::sleep(self.load_delay).await;
        Ok(())
    }

    async fn generate(&self, args: &Args) -> Result<Value> {
        tokio::time::sleep(self.generate_delay).await;

        let prompt = match args.get("prompt").and_then(Value::as_str) {
            Some(p) => p,
            None => bail!("missing or non-string 'prompt' argument"),
        };

        Ok(Value::String(format!(
            "Given your question: {}. I think the best answer is to {}.",
            prompt, self.advice
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args_with_prompt(prompt: &str) -> Args {
        let mut args = Args::new();
        args.insert("prompt".to_string(), json!(prompt));
        args
    }

    #[tokio::test]
    async fn test_generate_formats_answer() {
        let handler = MockTextHandler::new(
            Duration::from_millis(0),
            Duration::from_millis(0),
            "buy ice cream",
        );

        let answer = handler
            .generate(&args_with_prompt("What should I eat today?"))
            .await
            .unwrap();

        assert_eq!(
            answer,
            json!(
                "Given your question: What should I eat today?. \
                 I think the best answer is to buy ice cream."
            )
        );
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_prompt() {
        let handler = MockTextHandler::new(
            Duration::from_millis(0),
            Duration::from_millis(0),
            "buy ice cream",
        );

        let err = handler.generate(&Args::new()).await.unwrap_err();
        assert!(err.to_string().contains("prompt"));
    }

    #[tokio::test]
    async fn test_generate_rejects_non_string_prompt() {
        let handler = MockTextHandler::new(
            Duration::from_millis(0),
            Duration::from_millis(0),
            "buy ice cream",
        );

        let mut args = Args::new();
        args.insert("prompt".to_string(), json!(42));
        assert!(handler.generate(&args).await.is_err());
    }
}
