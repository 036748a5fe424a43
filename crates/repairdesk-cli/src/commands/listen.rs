//! Live channel listener.
//!
//! Connects to `/ws`, prints every notification, and reconnects after a
//! drop using the configured policy until the reconnect window runs out.

use std::time::Instant;

use anyhow::bail;
use clap::Args;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use repairdesk_realtime::message::OutboundMessage;
use repairdesk_realtime::{ConnectionEvent, ConnectionState, ReconnectPolicy};

use crate::output;

/// Arguments for the listen command
#[derive(Debug, Args)]
pub struct ListenArgs {
    /// Live channel URL
    #[arg(long, default_value = "ws://127.0.0.1:5002/ws")]
    pub url: String,

    /// Access token, as printed by `repairdesk token`
    #[arg(long)]
    pub token: String,
}

/// How one connected session ended.
enum SessionEnd {
    /// Transport failure or server close; worth reconnecting.
    Dropped,
    /// The user pressed Ctrl+C.
    Interrupted,
}

/// Execute the listen command
pub async fn execute(args: &ListenArgs, config_path: &str) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let mut policy = ReconnectPolicy::from_config(&config.realtime);
    let mut state = ConnectionState::default();
    let url = format!("{}?access_token={}", args.url, args.token);

    loop {
        tracing::debug!(?state, "Connecting to live channel");

        match connect_async(url.as_str()).await {
            Ok((stream, _response)) => {
                state = state.on(ConnectionEvent::Opened);
                policy.reset();
                output::print_success(&format!("Connected to {}", args.url));

                match run_session(stream).await {
                    SessionEnd::Interrupted => {
                        state = state.on(ConnectionEvent::Closed);
                        tracing::debug!(?state, "Listener stopped");
                        return Ok(());
                    }
                    SessionEnd::Dropped => {
                        state = state.on(ConnectionEvent::Dropped);
                        output::print_warning("Connection lost");
                    }
                }
            }
            Err(e) => {
                state = state.on(ConnectionEvent::Dropped);
                tracing::warn!(error = %e, "Connection attempt failed");
            }
        }

        match policy.next_delay(Instant::now()) {
            Some(delay) => {
                println!("Reconnecting in {} ms...", delay.as_millis());
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = tokio::signal::ctrl_c() => return Ok(()),
                }
            }
            None => {
                state = state.on(ConnectionEvent::GaveUp);
                tracing::debug!(?state, "Reconnect window exhausted");
                output::print_error(&format!(
                    "Could not reconnect within {} s, giving up",
                    policy.window().as_secs()
                ));
                bail!("live channel unavailable");
            }
        }
    }
}

async fn run_session(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> SessionEnd {
    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => print_message(text.as_str()),
                Some(Ok(Message::Close(_))) | None => return SessionEnd::Dropped,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Live channel error");
                    return SessionEnd::Dropped;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                let _ = write.send(Message::Close(None)).await;
                return SessionEnd::Interrupted;
            }
        }
    }
}

fn print_message(raw: &str) {
    match serde_json::from_str::<OutboundMessage>(raw) {
        Ok(OutboundMessage::ReceiveNotification { message, data }) => {
            println!("🔔 {}", data.title);
            output::print_kv("message", &message);
            if let Some(order_id) = data.order_id {
                output::print_kv("order", &format!("#{order_id}"));
            }
        }
        Ok(OutboundMessage::Pong { timestamp }) => {
            tracing::debug!(timestamp, "Pong");
        }
        Ok(OutboundMessage::Error { code, message }) => {
            output::print_error(&format!("{code}: {message}"));
        }
        Err(e) => tracing::warn!(error = %e, raw, "Unrecognized message"),
    }
}
