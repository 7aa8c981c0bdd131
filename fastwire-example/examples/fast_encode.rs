//! Offline FAST encoding example.
//!
//! Encodes a short run of market data messages and shows how much each
//! operator saves once the dictionary is warm.

mod common;

use common::{TickGenerator, hex, init_logging, market_data_template};
use fastwire::prelude::*;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();

    let template = market_data_template()?;
    let mut encoder = FastEncoder::new();
    let mut ticks = TickGenerator::new();

    let mut total = 0usize;
    for second in 0..12u32 {
        let tick = ticks.next_tick();
        let sending_time = format!("20260127-10:00:{:02}.000", second);
        let message = encoder.encode_message(&template, &tick.values(sending_time))?;
        total += message.len();
        info!(
            "seq={} symbol={} size={:?} -> {} bytes: {}",
            tick.seq_num,
            tick.symbol,
            tick.size,
            message.len(),
            hex(&message)
        );
    }
    info!(
        "Encoded 12 messages in {} bytes, {} dictionary entries",
        total,
        encoder.dictionary().len()
    );

    encoder.reset();
    let tick = ticks.next_tick();
    let message = encoder.encode_message(&template, &tick.values(common::format_timestamp()))?;
    info!("After reset: {} bytes: {}", message.len(), hex(&message));

    Ok(())
}
