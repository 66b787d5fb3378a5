//! Reply delivery helpers.
//!
//! Remote command output can exceed Telegram's message-size limit, so
//! replies go through a splitter that chunks long text while preserving
//! content and delivery order.

use crate::utils;
use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ChatId;

/// Maximum message length with a safety margin below Telegram's 4096 limit.
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4000;

/// Sends `text` to `chat_id`, splitting it into multiple messages if needed.
///
/// Parts are sent in order; the content is forwarded as-is, without
/// escaping or truncation.
///
/// # Errors
///
/// Returns an error if any part fails to send.
pub async fn send_long_message(bot: &Bot, chat_id: ChatId, text: &str) -> Result<()> {
    for part in utils::split_long_message(text, TELEGRAM_MESSAGE_LIMIT) {
        bot.send_message(chat_id, part).await?;
    }
    Ok(())
}
