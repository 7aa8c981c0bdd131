//! FAST market data client example.
//!
//! Reads length-prefixed frames from the server and prints the presence map
//! and, when present, the template identifier of each message. Field values
//! are left undecoded since they depend on the receiver's operator state.

mod common;

use common::{ExampleConfig, hex, init_logging};
use fastwire::prelude::*;
use tokio::net::TcpStream;
use tokio_stream::StreamExt;
use tokio_util::codec::{FramedRead, LengthDelimitedCodec};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cfg = ExampleConfig::from_env();
    let addr = cfg.addr();
    info!("Connecting to FAST server at {}", addr);

    let socket: TcpStream = TcpStream::connect(&addr).await?;
    info!("Connected to FAST server");

    let mut frames = FramedRead::new(socket, LengthDelimitedCodec::new());
    let mut received: u64 = 0;

    while let Some(frame) = frames.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                error!("Read error: {}", e);
                break;
            }
        };
        received += 1;
        match describe(&frame) {
            Ok(summary) => info!("Received #{}: {}", received, summary),
            Err(e) => warn!("Malformed frame {}: {}", hex(&frame), e),
        }
    }

    info!("Server closed connection after {} messages", received);
    Ok(())
}

/// Summarizes the presence map and template identifier of a message.
fn describe(frame: &[u8]) -> Result<String> {
    let mut offset = 0;
    let mut pmap = FastDecoder::decode_pmap(frame, &mut offset)?;
    let bits: String = (0..pmap.len())
        .map(|i| if pmap.bit(i) { '1' } else { '0' })
        .collect();

    let template = if pmap.next_bit() {
        format!("template={}", FastDecoder::decode_uint(frame, &mut offset)?)
    } else {
        "template=previous".to_string()
    };

    Ok(format!(
        "{} pmap={} body={} bytes=[{}]",
        template,
        bits,
        frame.len() - offset,
        hex(&frame[offset..])
    ))
}
