//! Text-fragment streaming on top of provider chunk streams

use futures::{Stream, StreamExt};
use std::pin::Pin;

use super::provider::ChatStream;
use super::types::LLMResult;

/// Lazy, finite, non-restartable sequence of text fragments
pub type TextStream = Pin<Box<dyn Stream<Item = LLMResult<String>> + Send>>;

/// Project a chunk stream onto its text deltas.
///
/// Chunks that carry no text (role announcements, usage trailers) are
/// skipped. Errors pass through untouched and in order.
pub fn text_fragments(raw: ChatStream) -> TextStream {
    let stream = raw.filter_map(|item| async move {
        match item {
            Ok(chunk) => chunk
                .text_delta()
                .filter(|t| !t.is_empty())
                .map(|t| Ok(t.to_string())),
            Err(e) => Some(Err(e)),
        }
    });
    Box::pin(stream)
}

/// Running buffer a caller folds fragments into.
///
/// After every [`push`](StreamBuffer::push) the returned text is the full
/// response so far, so a renderer can overwrite its last line with it.
#[derive(Debug, Clone, Default)]
pub struct StreamBuffer {
    text: String,
    fragments: usize,
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: &str) -> &str {
        self.text.push_str(fragment);
        self.fragments += 1;
        &self.text
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::{ChatCompletionChunk, LLMError};

    #[tokio::test]
    async fn fragments_skip_empty_chunks_and_keep_errors() {
        let items = vec![
            Ok(ChatCompletionChunk::text("m", "Hel")),
            Ok(ChatCompletionChunk::text("m", "")),
            Ok(ChatCompletionChunk::text("m", "lo")),
            Err(LLMError::NetworkError("reset".into())),
        ];
        let raw: ChatStream = Box::pin(futures::stream::iter(items));
        let collected: Vec<_> = text_fragments(raw).collect().await;

        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0].as_ref().unwrap(), "Hel");
        assert_eq!(collected[1].as_ref().unwrap(), "lo");
        assert!(collected[2].is_err());
    }

    #[test]
    fn buffer_grows_by_prefix() {
        let mut buf = StreamBuffer::new();
        let first = buf.push("ab").to_string();
        let second = buf.push("cd").to_string();

        assert!(second.starts_with(&first));
        assert_eq!(buf.as_str(), "abcd");
        assert_eq!(buf.fragments(), 2);
    }
}
