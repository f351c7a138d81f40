use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::application::{ConversationUseCase, TutorApi};
use crate::connector::adapter::HttpTutorClient;
use crate::domain::{ChatMessage, SessionRejection, TutorResponse};

const THINKING: &str = "AI is thinking...";
const CLEAR_PROMPT: &str = "Are you sure you want to clear the conversation? [y/N] ";
const GREETING: &str = "Trilingual tutor (Tamil / Sinhala / English). \
Type a message, /clear to start over, /quit to leave.";

/// Line-oriented terminal chat against a running tutor server.
pub struct ChatController;

impl ChatController {
    pub fn new() -> Self {
        Self
    }

    pub async fn chat(&self, url: String) -> Result<String> {
        let api = Arc::new(HttpTutorClient::new(&url));
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run(api, stdin, stdout).await
    }

    /// Drive one session from `input` until `/quit` or end of input.
    pub async fn run<R, W>(&self, api: Arc<dyn TutorApi>, input: R, mut output: W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut conversation = ConversationUseCase::new(api);
        let mut lines = input.lines();

        write_line(&mut output, GREETING).await?;

        while let Some(line) = lines.next_line().await? {
            let text = line.trim();
            match text {
                "" => continue,
                "/quit" => break,
                "/clear" => {
                    if conversation.session().is_empty() {
                        write_line(&mut output, "Nothing to clear.").await?;
                        continue;
                    }
                    output.write_all(CLEAR_PROMPT.as_bytes()).await?;
                    output.flush().await?;

                    let answer = lines.next_line().await?.unwrap_or_default();
                    let confirmed = answer.trim().eq_ignore_ascii_case("y");
                    if conversation.clear(confirmed)? {
                        write_line(&mut output, "Conversation cleared.").await?;
                    }
                    continue;
                }
                _ => {}
            }

            match conversation.submit(text) {
                Ok(message) => {
                    let echo = format!("You: {}", message.text());
                    write_line(&mut output, &echo).await?;
                }
                Err(SessionRejection::BlankMessage) => continue,
                Err(rejection) => return Err(rejection.into()),
            }
            write_line(&mut output, THINKING).await?;

            let rendered = render_message(conversation.await_reply().await?);
            write_line(&mut output, &rendered).await?;

            if let Some(error) = conversation.session().last_error() {
                let banner = format!("! {}", error.detail());
                write_line(&mut output, &banner).await?;
            }
        }

        Ok(format!(
            "Goodbye! {} messages in this conversation.",
            conversation.session().len()
        ))
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

fn render_message(message: &ChatMessage) -> String {
    match message.response() {
        Some(response) => render_reply(response),
        None => format!("AI: {}", message.text()),
    }
}

/// Text rendering of one tutor reply. The correction box only appears
/// when the learner's utterance was flagged.
pub fn render_reply(response: &TutorResponse) -> String {
    let mut output = format!("AI [{}]: {}\n", response.language_used, response.ai_response);

    let feedback = &response.feedback;
    if feedback.needs_correction() {
        output.push_str(&format!("  +-- Correction ({})\n", feedback.error_type));
        if !feedback.user_original.is_empty() {
            output.push_str(&format!("  | You said:  {}\n", feedback.user_original));
        }
        if !feedback.correction.is_empty() {
            output.push_str(&format!("  | Better:    {}\n", feedback.correction));
        }
        if !feedback.explanation.is_empty() {
            output.push_str(&format!("  | Why:       {}\n", feedback.explanation));
        }
        output.push_str("  +--\n");
    }

    output.push_str(&format!("  Vocabulary: {}", response.vocabulary_suggestion));

    if let Some(code) = &response.code_example {
        output.push_str("\n  Code example:");
        for line in code.lines() {
            output.push_str(&format!("\n    {}", line));
        }
    }

    output
}
