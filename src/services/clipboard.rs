use async_trait::async_trait;

use crate::errors::AppResult;

/// Destination for a rendered prompt, typically the operator's clipboard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write_text(&self, text: &str) -> AppResult<()>;
}

/// Best-effort copy. A failing sink never blocks prompt generation, so the
/// error is logged and reported as `false`.
pub async fn copy_prompt(sink: &dyn ClipboardSink, prompt: &str) -> bool {
    match sink.write_text(prompt).await {
        Ok(()) => true,
        Err(err) => {
            log::debug!("Clipboard write failed: {}", err);
            false
        }
    }
}
