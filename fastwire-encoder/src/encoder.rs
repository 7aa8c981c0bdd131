/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! FAST message encoder.
//!
//! [`FastEncoder`] owns the dictionary of one session and turns a template
//! plus one value per field into a complete message:
//! presence map, template identifier (when it changed), then the field
//! values.

use crate::config::EncoderConfig;
use crate::dictionary::Dictionary;
use crate::operators::{EncodeContext, encode_value};
use crate::pmap::PresenceMapEncoder;
use crate::stream::FastStream;
use bytes::Bytes;
use fastwire_core::{EncodeError, FieldValue};
use fastwire_schema::Template;
use tracing::{debug, trace};

/// FAST message encoder for one session.
#[derive(Debug)]
pub struct FastEncoder {
    config: EncoderConfig,
    /// Field values of the message being encoded.
    body: FastStream,
    /// Assembled message.
    frame: FastStream,
    pmap: PresenceMapEncoder,
    dictionary: Dictionary,
    last_template_id: Option<u32>,
}

impl FastEncoder {
    /// Creates an encoder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EncoderConfig::default())
    }

    /// Creates an encoder with the given configuration.
    #[must_use]
    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            body: FastStream::with_capacity(config.initial_capacity),
            frame: FastStream::with_capacity(config.initial_capacity),
            pmap: PresenceMapEncoder::new(),
            dictionary: Dictionary::new(),
            last_template_id: None,
            config,
        }
    }

    /// Encodes one message.
    ///
    /// # Arguments
    /// * `template` - The template describing the message
    /// * `values` - One value per template field, `None` for absent fields
    ///
    /// # Errors
    /// Returns `EncodeError::FieldCountMismatch` if `values` does not match
    /// the template, `EncodeError::MessageTooLarge` if the result exceeds the
    /// configured maximum, or the first field error. A failed message leaves
    /// the dictionary and the last template identifier as they were.
    pub fn encode_message(
        &mut self,
        template: &Template,
        values: &[Option<FieldValue>],
    ) -> Result<Bytes, EncodeError> {
        if values.len() != template.len() {
            return Err(EncodeError::FieldCountMismatch {
                template_id: template.id(),
                expected: template.len(),
                actual: values.len(),
            });
        }

        self.dictionary.begin();
        match self.encode_frame(template, values) {
            Ok(message) => {
                self.dictionary.commit();
                self.last_template_id = Some(template.id());
                Ok(message)
            }
            Err(err) => {
                self.dictionary.rollback();
                debug!(template_id = template.id(), error = %err, "message discarded");
                Err(err)
            }
        }
    }

    fn encode_frame(
        &mut self,
        template: &Template,
        values: &[Option<FieldValue>],
    ) -> Result<Bytes, EncodeError> {
        let template_changed = self.last_template_id != Some(template.id());
        if template.reset() || (template_changed && self.config.reset_on_template_change) {
            debug!(
                template_id = template.id(),
                entries = self.dictionary.len(),
                "resetting dictionary"
            );
            self.dictionary.reset();
        }
        if template_changed {
            debug!(
                from = ?self.last_template_id,
                to = template.id(),
                "template changed"
            );
        }

        self.body.clear();
        self.pmap.clear();
        self.pmap.set_next_bit(template_changed);

        let mut cx = EncodeContext::new(&mut self.body, &mut self.pmap, &mut self.dictionary);
        for (instruction, value) in template.fields().iter().zip(values) {
            encode_value(instruction, value.as_ref(), &mut cx)?;
        }

        let pmap = self.pmap.encode();
        self.frame.clear();
        self.frame.encode_raw(&pmap);
        if template_changed {
            self.frame.encode_uint(u64::from(template.id()));
        }
        self.frame.encode_raw(self.body.as_bytes());

        let size = self.frame.len();
        if size > self.config.max_message_size {
            return Err(EncodeError::MessageTooLarge {
                size,
                max_size: self.config.max_message_size,
            });
        }

        trace!(
            template_id = template.id(),
            pmap_bits = self.pmap.len(),
            body = self.body.len(),
            size,
            "encoded message"
        );
        Ok(self.frame.freeze())
    }

    /// Forgets all previous values and the last template identifier.
    pub fn reset(&mut self) {
        debug!(entries = self.dictionary.len(), "resetting encoder");
        self.dictionary.reset();
        self.last_template_id = None;
    }

    /// Returns the identifier of the last encoded template.
    #[must_use]
    pub const fn last_template_id(&self) -> Option<u32> {
        self.last_template_id
    }

    /// Returns the session dictionary.
    #[must_use]
    pub const fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EncoderConfig {
        &self.config
    }
}

impl Default for FastEncoder {
    fn default() -> Self {
        Self::new()
    }
}
