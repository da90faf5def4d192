//! Stream a reply from the chat endpoint and print it as it arrives.
//!
//! Run against a local server with:
//! `CHAT_API_BASE_URL=http://localhost:8000 cargo run -p chat-ox --example stream_chat -- "Hello"`

use std::io::Write;

use chat_ox::{Message, StreamEvent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in one sentence.".to_string());

    let mut stdout = std::io::stdout();

    chat_ox::stream_chat(&[Message::user(prompt)], |event| match event {
        StreamEvent::Text { content } => {
            print!("{content}");
            let _ = stdout.flush();
        }
        StreamEvent::Status { message } => eprintln!("[{message}]"),
        StreamEvent::Done { usage } => {
            println!();
            if let Some(usage) = usage {
                eprintln!(
                    "tokens: {} in / {} out",
                    usage.input_tokens, usage.output_tokens
                );
            }
        }
        StreamEvent::Error { message } => eprintln!("error: {message}"),
    })
    .await?;

    Ok(())
}
