//! # Message Dispatch
//!
//! Accepts a message on a topic: resolve the topic, check write access,
//! settle the fee, record the message.
//!
//! ## Check Order
//!
//! 1. `TopicNotFound`
//! 2. `Unauthorized` (write check)
//! 3. `LimitExceeded` (payload size)
//! 4. Escrow topics: `InvalidFeeAmount` unless the attached fee is exactly the
//!    configured fee, then the escrow deposit.
//!    Free topics: `EscrowDisabled` for any non-zero attached fee.
//! 5. Append.
//!
//! Every check precedes the deposit, and the append cannot fail, so a
//! rejected send changes nothing.

use super::entities::{Message, Receipt, SendMessage};
use super::log::MessageLog;
use crate::config::DispatchConfig;
use crate::ports::{FeeEscrow, TopicGate};
use hr_01_topic_registry::domain::FeePolicy;
use hr_03_message_escrow::domain::DepositRequest;
use shared_types::{
    Address, HeraldError, HeraldResult, MessageId, Scope, Timestamp, TopicId,
};
use tracing::{info, warn};

/// Dispatch state: limits plus the message log.
#[derive(Clone, Debug, Default)]
pub struct MessageDispatch {
    config: DispatchConfig,
    log: MessageLog,
}

impl MessageDispatch {
    /// Creates a dispatcher with an empty log.
    #[must_use]
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            log: MessageLog::new(),
        }
    }

    /// Sends one message.
    pub fn send_message(
        &mut self,
        topics: &impl TopicGate,
        escrow: &mut impl FeeEscrow,
        request: SendMessage,
        now: Timestamp,
    ) -> HeraldResult<Receipt> {
        let SendMessage {
            topic,
            sender,
            payload,
            attached_fee,
        } = request;

        let terms = topics.write_terms(topic, &sender)?;
        if !terms.can_write {
            warn!(topic_id = %topic, sender = %sender, "send rejected: no write access");
            return Err(HeraldError::unauthorized(sender, Scope::Topic(topic)));
        }
        if payload.len() > self.config.max_payload_bytes {
            return Err(HeraldError::LimitExceeded {
                field: "payload",
                size: payload.len(),
                max: self.config.max_payload_bytes,
            });
        }

        let escrowed = match terms.fee {
            FeePolicy::Escrow { token, amount } => {
                if attached_fee != amount {
                    warn!(topic_id = %topic, expected = %amount, attached = %attached_fee, "send rejected: fee mismatch");
                    return Err(HeraldError::InvalidFeeAmount {
                        topic,
                        expected: amount,
                        attached: attached_fee,
                    });
                }
                escrow.deposit(DepositRequest {
                    topic,
                    sender,
                    token,
                    amount,
                    recipient: terms.recipient,
                    app_owner: terms.app_owner,
                })?;
                Some(amount)
            }
            FeePolicy::Free => {
                if !attached_fee.is_zero() {
                    warn!(topic_id = %topic, attached = %attached_fee, "send rejected: fee on free topic");
                    return Err(HeraldError::EscrowDisabled(topic));
                }
                None
            }
        };

        let message = self.log.append(topic, sender, payload, now);
        info!(
            topic_id = %topic,
            message_id = %message.id,
            sequence = message.sequence,
            bytes = message.payload.len(),
            "message recorded"
        );
        Ok(Receipt {
            message_id: message.id,
            sequence: message.sequence,
            escrowed,
        })
    }

    /// Messages of `topic`, if `reader` may read it.
    ///
    /// # Errors
    /// - `TopicNotFound`
    /// - `Unauthorized` unless `reader` passes the read check
    pub fn read_topic_messages(
        &self,
        topics: &impl TopicGate,
        topic: TopicId,
        reader: &Address,
    ) -> HeraldResult<Vec<&Message>> {
        if !topics.can_read(topic, reader)? {
            warn!(topic_id = %topic, reader = %reader, "read rejected");
            return Err(HeraldError::unauthorized(*reader, Scope::Topic(topic)));
        }
        Ok(self.log.topic_messages(topic))
    }

    /// Looks up a message by id.
    #[must_use]
    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.log.message(id)
    }

    /// The underlying log.
    #[must_use]
    pub fn log(&self) -> &MessageLog {
        &self.log
    }
}
