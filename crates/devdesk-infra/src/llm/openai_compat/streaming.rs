//! OpenAI SSE stream to [`StreamEvent`] adapter.
//!
//! Tool call arguments arrive as partial JSON fragments spread across
//! chunks, keyed by tool call index. [`ChunkMapper`] accumulates them and
//! emits [`StreamEvent::ToolUseComplete`] once a finish reason arrives, or
//! when the stream ends without one. Gemini reports `stop` rather than
//! `tool_calls` when it calls a function, so any finish reason flushes.

use std::collections::BTreeMap;

use futures_util::StreamExt;

use async_openai::types::chat::{
    ChatCompletionResponseStream, CreateChatCompletionStreamResponse, FinishReason,
};

use devdesk_core::llm::provider::LlmEventStream;
use devdesk_types::llm::{LlmError, StopReason, StreamEvent, Usage};

use super::map_openai_error;

/// Partial tool call assembled across chunks.
#[derive(Debug, Default)]
struct ToolCallAccumulator {
    id: String,
    name: String,
    json_buffer: String,
}

impl ToolCallAccumulator {
    fn into_event(self) -> Result<StreamEvent, LlmError> {
        let input = if self.json_buffer.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::from_str(&self.json_buffer).map_err(|e| {
                LlmError::Deserialization(format!("tool call JSON for '{}': {e}", self.name))
            })?
        };
        Ok(StreamEvent::ToolUseComplete {
            id: self.id,
            name: self.name,
            input,
        })
    }
}

/// Stateful mapping of chat completion chunks to provider-agnostic events.
#[derive(Debug, Default)]
pub struct ChunkMapper {
    tool_calls: BTreeMap<u32, ToolCallAccumulator>,
}

impl ChunkMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events carried by one chunk, in order.
    pub fn map_chunk(
        &mut self,
        chunk: CreateChatCompletionStreamResponse,
    ) -> Result<Vec<StreamEvent>, LlmError> {
        let mut events = Vec::new();

        // Sent on the last chunk when `stream_options.include_usage` is set,
        // usually with an empty `choices` array.
        if let Some(usage) = &chunk.usage {
            events.push(StreamEvent::Usage(Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            }));
        }

        for choice in chunk.choices {
            if let Some(text) = choice.delta.content {
                if !text.is_empty() {
                    events.push(StreamEvent::TextDelta {
                        index: choice.index,
                        text,
                    });
                }
            }

            for tc in choice.delta.tool_calls.unwrap_or_default() {
                let acc = self.tool_calls.entry(tc.index).or_default();
                if let Some(id) = tc.id.filter(|id| !id.is_empty()) {
                    acc.id = id;
                }
                if let Some(function) = tc.function {
                    if let Some(name) = function.name.filter(|n| !n.is_empty()) {
                        acc.name = name;
                    }
                    if let Some(args) = function.arguments {
                        acc.json_buffer.push_str(&args);
                    }
                }
            }

            if let Some(finish_reason) = choice.finish_reason {
                let had_tool_calls = !self.tool_calls.is_empty();
                events.extend(self.flush_tool_calls()?);

                let stop_reason = match finish_reason {
                    _ if had_tool_calls => StopReason::ToolUse,
                    FinishReason::Stop => StopReason::EndTurn,
                    FinishReason::Length => StopReason::MaxTokens,
                    FinishReason::ToolCalls => StopReason::ToolUse,
                    FinishReason::ContentFilter => StopReason::EndTurn,
                    FinishReason::FunctionCall => StopReason::ToolUse,
                };
                events.push(StreamEvent::MessageDelta { stop_reason });
            }
        }

        Ok(events)
    }

    /// Events owed at end of stream: any unflushed tool calls, then `Done`.
    pub fn finish(&mut self) -> Result<Vec<StreamEvent>, LlmError> {
        let mut events = self.flush_tool_calls()?;
        events.push(StreamEvent::Done);
        Ok(events)
    }

    fn flush_tool_calls(&mut self) -> Result<Vec<StreamEvent>, LlmError> {
        std::mem::take(&mut self.tool_calls)
            .into_values()
            .map(ToolCallAccumulator::into_event)
            .collect()
    }
}

/// Map an async-openai [`ChatCompletionResponseStream`] to a stream of [`StreamEvent`]s.
///
/// Emits `Connected` first and `Done` last; everything in between comes
/// from [`ChunkMapper`].
pub fn map_openai_stream(stream: ChatCompletionResponseStream) -> LlmEventStream {
    Box::pin(async_stream::try_stream! {
        yield StreamEvent::Connected;

        let mut mapper = ChunkMapper::new();
        let mut stream = stream;

        while let Some(result) = stream.next().await {
            let chunk = result.map_err(map_openai_error)?;
            for event in mapper.map_chunk(chunk)? {
                yield event;
            }
        }

        for event in mapper.finish()? {
            yield event;
        }
    })
}
