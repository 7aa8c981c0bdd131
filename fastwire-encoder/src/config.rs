/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! Encoder configuration.

/// Configuration for a FAST encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Initial capacity of the output buffers in bytes.
    pub initial_capacity: usize,
    /// Maximum encoded message size in bytes.
    pub max_message_size: usize,
    /// Whether to reset the dictionary whenever the template changes.
    pub reset_on_template_change: bool,
}

impl EncoderConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initial_capacity: 256,
            max_message_size: 1024 * 1024, // 1MB
            reset_on_template_change: false,
        }
    }

    /// Sets the initial buffer capacity.
    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the maximum message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Sets whether to reset the dictionary on template changes.
    #[must_use]
    pub const fn with_reset_on_template_change(mut self, reset: bool) -> Self {
        self.reset_on_template_change = reset;
        self
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for encoder configuration.
#[derive(Debug, Default)]
pub struct EncoderConfigBuilder {
    initial_capacity: Option<usize>,
    max_message_size: Option<usize>,
    reset_on_template_change: bool,
}

impl EncoderConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial buffer capacity.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets the maximum message size.
    #[must_use]
    pub const fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = Some(size);
        self
    }

    /// Sets whether to reset the dictionary on template changes.
    #[must_use]
    pub const fn reset_on_template_change(mut self, reset: bool) -> Self {
        self.reset_on_template_change = reset;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> EncoderConfig {
        let mut config = EncoderConfig::new();

        if let Some(capacity) = self.initial_capacity {
            config.initial_capacity = capacity;
        }
        if let Some(size) = self.max_message_size {
            config.max_message_size = size;
        }
        config.reset_on_template_change = self.reset_on_template_change;

        config
    }
}
