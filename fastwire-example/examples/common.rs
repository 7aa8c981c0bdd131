//! Common utilities shared across examples.

#![allow(dead_code)]

use fastwire::prelude::*;
use std::env;

/// Default server port.
pub const DEFAULT_PORT: u16 = 9890;

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Template identifier of the market data message.
pub const MARKET_DATA_TEMPLATE_ID: u32 = 1;

/// Example configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ExampleConfig {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Interval between market data messages in milliseconds.
    pub interval_ms: u64,
}

impl ExampleConfig {
    /// Loads the configuration from `FAST_HOST`, `FAST_PORT` and
    /// `FAST_INTERVAL_MS`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            host: env::var("FAST_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("FAST_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            interval_ms: env::var("FAST_INTERVAL_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(100),
        }
    }

    /// Returns the socket address string.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Initializes logging for examples.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}

/// Formats the current time as a FIX UTC timestamp.
pub fn format_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d-%H:%M:%S%.3f").to_string()
}

/// Builds the market data template.
///
/// Field layout:
/// - `MsgSeqNum`: uInt64, increment
/// - `SendingTime`: ascii, tail
/// - `Symbol`: ascii, copy
/// - `Price`: decimal, copy exponent (initial -2) and delta mantissa
/// - `Size`: optional uInt32, default 100
pub fn market_data_template() -> Result<Template> {
    let template = TemplateBuilder::new(MARKET_DATA_TEMPLATE_ID, "MarketData")
        .field(
            FieldInstruction::new("MsgSeqNum", FieldType::UInt64)
                .with_operator(Operator::Increment),
        )
        .field(
            FieldInstruction::new("SendingTime", FieldType::AsciiString)
                .with_operator(Operator::Tail),
        )
        .field(
            FieldInstruction::new("Symbol", FieldType::AsciiString).with_operator(Operator::Copy),
        )
        .field(
            FieldInstruction::new("Price", FieldType::Decimal)
                .with_exponent_operator(Operator::Copy, Some(-2))
                .with_mantissa_operator(Operator::Delta, None),
        )
        .field(
            FieldInstruction::new("Size", FieldType::UInt32)
                .optional()
                .with_operator(Operator::Default)
                .with_initial_value(InitialValue::UInt(100)),
        )
        .build()?;
    Ok(template)
}

/// One simulated market data update.
#[derive(Debug, Clone)]
pub struct Tick {
    /// Message sequence number.
    pub seq_num: u64,
    /// Instrument symbol.
    pub symbol: &'static str,
    /// Price in cents.
    pub price_cents: i64,
    /// Traded size, `None` when unknown.
    pub size: Option<u32>,
}

impl Tick {
    /// Returns the field values in template order.
    #[must_use]
    pub fn values(&self, sending_time: String) -> Vec<Option<FieldValue>> {
        vec![
            Some(FieldValue::UInt64(self.seq_num)),
            Some(FieldValue::Ascii(sending_time)),
            Some(FieldValue::Ascii(self.symbol.to_string())),
            Some(FieldValue::Decimal(Decimal::new(self.price_cents, -2))),
            self.size.map(FieldValue::UInt32),
        ]
    }
}

/// Deterministic tick generator.
#[derive(Debug)]
pub struct TickGenerator {
    seq_num: u64,
    symbols: [&'static str; 5],
    prices: [i64; 5],
}

impl TickGenerator {
    /// Creates a generator starting at sequence number 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seq_num: 1,
            symbols: ["AAPL", "GOOGL", "MSFT", "AMZN", "META"],
            prices: [15000, 14000, 38000, 17500, 50000],
        }
    }

    /// Produces the next tick.
    pub fn next_tick(&mut self) -> Tick {
        let seq_num = self.seq_num;
        // Stay on one symbol for a few ticks so copy and delta pay off.
        let idx = (seq_num as usize / 4) % self.symbols.len();
        self.prices[idx] += (seq_num % 10) as i64 - 5;
        let size = match seq_num % 3 {
            0 => None,
            1 => Some(100),
            _ => Some(100 + (seq_num % 900) as u32),
        };
        self.seq_num += 1;
        Tick {
            seq_num,
            symbol: self.symbols[idx],
            price_cents: self.prices[idx],
            size,
        }
    }
}

impl Default for TickGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders bytes as space separated hex.
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
