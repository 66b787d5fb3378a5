//! Command and dialogue message handlers.
//!
//! Each handler performs one transition of the conversation state machine:
//! it sends exactly one reply (chunked if oversized) and advances or ends
//! the dialogue. Transition decisions are factored into pure `plan_*`
//! functions so the table can be tested without a live bot.

use crate::bot::messaging::send_long_message;
use crate::bot::state::State;
use crate::extract::{self, PasswordStrength};
use crate::menu;
use crate::relay::{RelayError, SshRelay};
use crate::storage::{RecordKind, Store};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::error;

/// Dialogue handle shared by all handlers
pub type BotDialogue = Dialogue<State, InMemStorage<State>>;

/// The only reply that confirms a save; anything else declines
const AFFIRMATIVE: &str = "да";

const WELCOME_TEXT: &str = "Привет! Я бот для поиска информации и диагностики сервера.\n\
    Используйте /find_email или /find_phone_number для поиска, /help - список команд.";

const CONNECT_FAILURE_TEXT: &str = "Не удалось подключиться к серверу.";

const NO_OUTPUT_TEXT: &str = "Команда не вернула вывода.";

/// Commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "snake_case", description = "Доступные команды:")]
pub enum Command {
    /// Reset the dialogue and greet the operator
    #[command(description = "начать работу с ботом")]
    Start,
    /// List all commands
    #[command(description = "список доступных команд")]
    Help,
    /// Start the email extraction dialogue
    #[command(description = "найти email-адреса")]
    FindEmail,
    /// Start the phone extraction dialogue
    #[command(description = "найти номера телефонов")]
    FindPhoneNumber,
    /// Start the password rating dialogue
    #[command(description = "проверить сложность пароля")]
    VerifyPassword,
    /// List every stored email address
    #[command(description = "показать сохранённые email-адреса")]
    GetEmails,
    /// List every stored phone number
    #[command(description = "показать сохранённые номера телефонов")]
    GetPhoneNumbers,
    /// Remote: release information
    #[command(description = "информация о релизе")]
    GetRelease,
    /// Remote: kernel and architecture
    #[command(description = "информация о системе")]
    GetUname,
    /// Remote: uptime
    #[command(description = "время работы системы")]
    GetUptime,
    /// Remote: filesystem usage
    #[command(description = "состояние файловой системы")]
    GetDf,
    /// Remote: memory usage
    #[command(description = "состояние оперативной памяти")]
    GetFree,
    /// Remote: CPU statistics
    #[command(description = "производительность системы")]
    GetMpstat,
    /// Remote: logged-in users
    #[command(description = "работающие пользователи")]
    GetW,
    /// Remote: recent logins
    #[command(description = "последние входы в систему")]
    GetAuths,
    /// Remote: critical journal entries
    #[command(description = "критические события")]
    GetCritical,
    /// Remote: process list
    #[command(description = "запущенные процессы")]
    GetPs,
    /// Remote: open ports
    #[command(description = "используемые порты")]
    GetSs,
    /// Remote: installed packages
    #[command(description = "установленные пакеты")]
    GetAptList,
    /// Remote: running services
    #[command(description = "запущенные сервисы")]
    GetServices,
    /// Remote: replication log file
    #[command(description = "логи репликации")]
    GetReplLogs,
}

impl Command {
    /// Menu name of a diagnostic command, `None` for dialogue commands.
    #[must_use]
    pub const fn menu_name(&self) -> Option<&'static str> {
        match self {
            Self::GetRelease => Some("get_release"),
            Self::GetUname => Some("get_uname"),
            Self::GetUptime => Some("get_uptime"),
            Self::GetDf => Some("get_df"),
            Self::GetFree => Some("get_free"),
            Self::GetMpstat => Some("get_mpstat"),
            Self::GetW => Some("get_w"),
            Self::GetAuths => Some("get_auths"),
            Self::GetCritical => Some("get_critical"),
            Self::GetPs => Some("get_ps"),
            Self::GetSs => Some("get_ss"),
            Self::GetAptList => Some("get_apt_list"),
            Self::GetServices => Some("get_services"),
            _ => None,
        }
    }
}

/// Resets the dialogue and sends the welcome text. Reachable from any state.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn start(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    reset_dialogue(&dialogue).await?;
    bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
    Ok(())
}

/// Returns the dialogue to `Idle` whatever state it is in, including a chat
/// that has no stored record yet.
async fn reset_dialogue(dialogue: &BotDialogue) -> Result<()> {
    dialogue
        .update(State::Idle)
        .await
        .map_err(|e| anyhow!(e.to_string()))
}

/// Sends the command list.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Prompts for text and enters the email extraction state.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn find_email(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    dialogue
        .update(State::AwaitingEmailText)
        .await
        .map_err(|e| anyhow!(e.to_string()))?;
    bot.send_message(msg.chat.id, "Пожалуйста, отправьте текст для поиска email-адресов.")
        .await?;
    Ok(())
}

/// Prompts for text and enters the phone extraction state.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn find_phone_number(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    dialogue
        .update(State::AwaitingPhoneText)
        .await
        .map_err(|e| anyhow!(e.to_string()))?;
    bot.send_message(msg.chat.id, "Пожалуйста, отправьте текст для поиска номеров телефонов.")
        .await?;
    Ok(())
}

/// Prompts for a password and enters the rating state.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn verify_password(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    dialogue
        .update(State::AwaitingPasswordText)
        .await
        .map_err(|e| anyhow!(e.to_string()))?;
    bot.send_message(msg.chat.id, "Пожалуйста, отправьте пароль для проверки.")
        .await?;
    Ok(())
}

/// Lists every stored value of the given kind.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn list_records(
    bot: Bot,
    msg: Message,
    store: Arc<Store>,
    kind: RecordKind,
) -> Result<()> {
    let (header, empty) = match kind {
        RecordKind::Email => ("Сохранённые email-адреса:", "Список email-адресов пуст."),
        RecordKind::Phone => ("Сохранённые номера телефонов:", "Список номеров телефонов пуст."),
    };
    match store.list_all(kind).await {
        Ok(values) if values.is_empty() => {
            bot.send_message(msg.chat.id, empty).await?;
        }
        Ok(values) => {
            let text = format!("{header}\n{}", values.join("\n"));
            send_long_message(&bot, msg.chat.id, &text).await?;
        }
        Err(e) => {
            error!("Store read failed: {}", e);
            bot.send_message(msg.chat.id, "Не удалось прочитать данные из базы.")
                .await?;
        }
    }
    Ok(())
}

/// Runs one diagnostic menu command on the remote host and forwards the
/// output verbatim. A transport failure becomes a short failure reply and
/// the dialogue stays idle.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn diagnostic(bot: Bot, msg: Message, relay: Arc<SshRelay>, name: &str) -> Result<()> {
    let shell = menu::shell_for(name).ok_or_else(|| anyhow!("unknown menu command: {name}"))?;
    let result = relay.run(shell).await;
    if let Err(e) = &result {
        error!("Relay failed for {}: {}", name, e);
    }
    send_long_message(&bot, msg.chat.id, &plan_relay_reply(result)).await?;
    Ok(())
}

/// Reads the replication log from the remote host and replies with its
/// content reformatted line by line under a banner.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn repl_logs(bot: Bot, msg: Message, relay: Arc<SshRelay>) -> Result<()> {
    let command = format!("cat {}", menu::REPL_LOG_PATH);
    let result = relay.run(&command).await.map(|raw| menu::format_repl_logs(&raw));
    if let Err(e) = &result {
        error!("Relay failed for get_repl_logs: {}", e);
    }
    send_long_message(&bot, msg.chat.id, &plan_relay_reply(result)).await?;
    Ok(())
}

/// Handles free text while idle: a short usage hint.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn idle_text(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, "Я понимаю только команды. Отправьте /help для списка.")
        .await?;
    Ok(())
}

/// Handles the text reply of the email extraction dialogue.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn email_text(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    let (reply, next) = plan_email_text(msg.text().unwrap_or(""));
    apply_transition(&dialogue, next).await?;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Handles the text reply of the phone extraction dialogue.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn phone_text(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    let (reply, next) = plan_phone_text(msg.text().unwrap_or(""));
    apply_transition(&dialogue, next).await?;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Rates the submitted password and ends the dialogue.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn password_text(bot: Bot, msg: Message, dialogue: BotDialogue) -> Result<()> {
    let reply = plan_password_text(msg.text().unwrap_or(""));
    dialogue.exit().await.map_err(|e| anyhow!(e.to_string()))?;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Handles the yes/no reply of the email save confirmation.
///
/// On confirmation the emails are re-extracted from the pending raw text
/// and appended one by one. A store failure leaves the dialogue state
/// unchanged so the confirmation can be retried.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn email_confirm(
    bot: Bot,
    msg: Message,
    pending_text: String,
    store: Arc<Store>,
    dialogue: BotDialogue,
) -> Result<()> {
    if is_affirmative(msg.text().unwrap_or("")) {
        let emails = extract::extract_emails(&pending_text);
        for email in &emails {
            if let Err(e) = store.append(RecordKind::Email, email).await {
                error!("Store write failed: {}", e);
                bot.send_message(msg.chat.id, "Не удалось сохранить данные, попробуйте ещё раз.")
                    .await?;
                return Ok(());
            }
        }
        dialogue.exit().await.map_err(|e| anyhow!(e.to_string()))?;
        bot.send_message(msg.chat.id, format!("Сохранено email-адресов: {}.", emails.len()))
            .await?;
    } else {
        dialogue.exit().await.map_err(|e| anyhow!(e.to_string()))?;
        bot.send_message(msg.chat.id, "Хорошо, ничего не сохраняю.").await?;
    }
    Ok(())
}

/// Handles the yes/no reply of the phone save confirmation.
///
/// The matches found earlier are carried in the dialogue state and
/// appended as-is on confirmation.
///
/// # Errors
///
/// Returns an error if the reply cannot be sent.
pub async fn phone_confirm(
    bot: Bot,
    msg: Message,
    phones: Vec<String>,
    store: Arc<Store>,
    dialogue: BotDialogue,
) -> Result<()> {
    if is_affirmative(msg.text().unwrap_or("")) {
        for phone in &phones {
            if let Err(e) = store.append(RecordKind::Phone, phone).await {
                error!("Store write failed: {}", e);
                bot.send_message(msg.chat.id, "Не удалось сохранить данные, попробуйте ещё раз.")
                    .await?;
                return Ok(());
            }
        }
        dialogue.exit().await.map_err(|e| anyhow!(e.to_string()))?;
        bot.send_message(msg.chat.id, format!("Сохранено номеров: {}.", phones.len()))
            .await?;
    } else {
        dialogue.exit().await.map_err(|e| anyhow!(e.to_string()))?;
        bot.send_message(msg.chat.id, "Хорошо, ничего не сохраняю.").await?;
    }
    Ok(())
}

async fn apply_transition(dialogue: &BotDialogue, next: State) -> Result<()> {
    if next == State::Idle {
        dialogue.exit().await.map_err(|e| anyhow!(e.to_string()))?;
    } else {
        dialogue
            .update(next)
            .await
            .map_err(|e| anyhow!(e.to_string()))?;
    }
    Ok(())
}

/// Decides the transition for text received in `AwaitingEmailText`.
pub(crate) fn plan_email_text(text: &str) -> (String, State) {
    let emails = extract::extract_emails(text);
    if emails.is_empty() {
        ("Email-адреса не найдены.".to_string(), State::Idle)
    } else {
        (
            format!(
                "Найденные email-адреса: {}\nСохранить их в базу? (да/нет)",
                emails.join(", ")
            ),
            State::AwaitingEmailConfirm(text.to_string()),
        )
    }
}

/// Decides the transition for text received in `AwaitingPhoneText`.
pub(crate) fn plan_phone_text(text: &str) -> (String, State) {
    let phones = extract::extract_phones(text);
    if phones.is_empty() {
        ("Номера телефонов не найдены.".to_string(), State::Idle)
    } else {
        (
            format!(
                "Найденные номера телефонов: {}\nСохранить их в базу? (да/нет)",
                phones.join(", ")
            ),
            State::AwaitingPhoneConfirm(phones),
        )
    }
}

/// Decides the reply for text received in `AwaitingPasswordText`.
pub(crate) fn plan_password_text(text: &str) -> &'static str {
    match extract::rate_password(text) {
        PasswordStrength::Strong => "Пароль сложный.",
        PasswordStrength::Weak => "Пароль простой.",
    }
}

/// Decides the reply body for a relayed command outcome. Output is
/// forwarded verbatim; a transport failure or an empty result becomes a
/// short notice, and neither touches the dialogue state.
pub(crate) fn plan_relay_reply(result: Result<String, RelayError>) -> String {
    match result {
        Ok(output) if output.trim().is_empty() => NO_OUTPUT_TEXT.to_string(),
        Ok(output) => output,
        Err(_) => CONNECT_FAILURE_TEXT.to_string(),
    }
}

/// Case-insensitive comparison against the fixed affirmative token.
/// Anything else, including empty text, declines.
pub(crate) fn is_affirmative(text: &str) -> bool {
    text.trim().to_lowercase() == AFFIRMATIVE
}
