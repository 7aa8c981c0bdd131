//! FAST market data server example.
//!
//! Every client gets its own encoder, so operator state starts fresh per
//! connection. Messages are framed by `LengthDelimitedCodec` with its default
//! 4-byte big-endian length prefix.

mod common;

use common::{
    ExampleConfig, TickGenerator, format_timestamp, hex, init_logging, market_data_template,
};
use bytes::BytesMut;
use fastwire::prelude::*;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{Duration, interval};
use tokio_util::codec::{Encoder, LengthDelimitedCodec};
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cfg = ExampleConfig::from_env();
    let template = Arc::new(market_data_template()?);

    let addr = cfg.addr();
    let listener: TcpListener = TcpListener::bind(&addr).await?;
    info!("FAST server listening on {}", addr);

    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Client connected: {}", peer);

        let template = Arc::clone(&template);
        let interval_ms = cfg.interval_ms;
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, &template, interval_ms).await {
                error!("Client error: {}", e);
            }
            info!("Client disconnected: {}", peer);
        });
    }
}

async fn handle_client(
    mut socket: TcpStream,
    template: &Template,
    interval_ms: u64,
) -> anyhow::Result<()> {
    let mut encoder = FastEncoder::new();
    let mut codec = LengthDelimitedCodec::new();
    let mut out = BytesMut::new();
    let mut ticks = TickGenerator::new();
    let mut ticker_interval = interval(Duration::from_millis(interval_ms));

    loop {
        tokio::select! {
            _ = ticker_interval.tick() => {
                let tick = ticks.next_tick();
                let values = tick.values(format_timestamp());
                let message = encoder.encode_message(template, &values)?;

                let size = message.len();
                debug!("Frame: {}", hex(&message));
                codec.encode(message, &mut out)?;
                if let Err(e) = socket.write_all_buf(&mut out).await {
                    warn!("Write error: {}", e);
                    break;
                }

                info!(
                    "Sent: seq={} symbol={} price={} size={:?} bytes={}",
                    tick.seq_num,
                    tick.symbol,
                    Decimal::new(tick.price_cents, -2),
                    tick.size,
                    size
                );
            }
            result = socket.readable() => {
                if result.is_err() {
                    break;
                }
                let mut buf = [0u8; 1];
                match socket.try_read(&mut buf) {
                    Ok(0) => {
                        info!("Client closed connection");
                        break;
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                    Err(e) => {
                        warn!("Read error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(())
}
