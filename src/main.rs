use dotenvy::dotenv;
use std::sync::Arc;
use sysmon_bot::bot;
use sysmon_bot::bot::handlers::{BotDialogue, Command};
use sysmon_bot::bot::state::State;
use sysmon_bot::config::Settings;
use sysmon_bot::relay::SshRelay;
use sysmon_bot::storage::{RecordKind, Store};
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    init_logging();

    info!("Starting Sysmon Bot...");

    let settings = init_settings();
    let store = init_store(&settings);
    let relay = Arc::new(SshRelay::new(&settings));

    let bot = Bot::new(settings.telegram_token.clone());
    let handler = setup_handler();

    info!("Bot is running...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![store, relay, InMemStorage::<State>::new()])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_settings() -> Settings {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            s
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_store(settings: &Settings) -> Arc<Store> {
    match Store::open(&settings.database_path) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to open record store: {}", e);
            std::process::exit(1);
        }
    }
}

fn setup_handler() -> UpdateHandler<teloxide::RequestError> {
    dptree::entry().branch(
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(
                // /start interrupts any dialogue; every other command
                // arriving mid-dialogue is consumed as dialogue text
                dptree::entry()
                    .filter_command::<Command>()
                    .filter(|cmd: Command| matches!(cmd, Command::Start))
                    .endpoint(handle_start),
            )
            .branch(
                dptree::case![State::Idle]
                    .branch(
                        dptree::entry()
                            .filter_command::<Command>()
                            .endpoint(handle_command),
                    )
                    .branch(
                        Update::filter_message()
                            .filter(|msg: Message| msg.text().is_some())
                            .endpoint(handle_idle_text),
                    ),
            )
            // Non-text updates leave an active dialogue untouched
            .branch(
                dptree::filter(|msg: Message| msg.text().is_some())
                    .branch(dptree::case![State::AwaitingEmailText].endpoint(handle_email_text))
                    .branch(dptree::case![State::AwaitingPhoneText].endpoint(handle_phone_text))
                    .branch(
                        dptree::case![State::AwaitingPasswordText].endpoint(handle_password_text),
                    )
                    .branch(
                        dptree::case![State::AwaitingEmailConfirm(text)]
                            .endpoint(handle_email_confirm),
                    )
                    .branch(
                        dptree::case![State::AwaitingPhoneConfirm(phones)]
                            .endpoint(handle_phone_confirm),
                    ),
            ),
    )
}

async fn handle_start(
    bot: Bot,
    msg: Message,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::start(bot, msg, dialogue).await {
        error!("Start handler error: {}", e);
    }
    respond(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    store: Arc<Store>,
    relay: Arc<SshRelay>,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    let res = match cmd {
        // /start never reaches this dispatch: its dedicated branch in
        // setup_handler matches first, in every state
        Command::Start => Ok(()),
        Command::Help => bot::handlers::help(bot, msg).await,
        Command::FindEmail => bot::handlers::find_email(bot, msg, dialogue).await,
        Command::FindPhoneNumber => bot::handlers::find_phone_number(bot, msg, dialogue).await,
        Command::VerifyPassword => bot::handlers::verify_password(bot, msg, dialogue).await,
        Command::GetEmails => {
            bot::handlers::list_records(bot, msg, store, RecordKind::Email).await
        }
        Command::GetPhoneNumbers => {
            bot::handlers::list_records(bot, msg, store, RecordKind::Phone).await
        }
        Command::GetReplLogs => bot::handlers::repl_logs(bot, msg, relay).await,
        other => match other.menu_name() {
            Some(name) => bot::handlers::diagnostic(bot, msg, relay, name).await,
            None => Ok(()),
        },
    };
    if let Err(e) = res {
        error!("Command error: {}", e);
    }
    respond(())
}

async fn handle_idle_text(bot: Bot, msg: Message) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::idle_text(bot, msg).await {
        error!("Idle text handler error: {}", e);
    }
    respond(())
}

async fn handle_email_text(
    bot: Bot,
    msg: Message,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::email_text(bot, msg, dialogue).await {
        error!("Email text handler error: {}", e);
    }
    respond(())
}

async fn handle_phone_text(
    bot: Bot,
    msg: Message,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::phone_text(bot, msg, dialogue).await {
        error!("Phone text handler error: {}", e);
    }
    respond(())
}

async fn handle_password_text(
    bot: Bot,
    msg: Message,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::password_text(bot, msg, dialogue).await {
        error!("Password handler error: {}", e);
    }
    respond(())
}

async fn handle_email_confirm(
    bot: Bot,
    msg: Message,
    text: String,
    store: Arc<Store>,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::email_confirm(bot, msg, text, store, dialogue).await {
        error!("Email confirmation handler error: {}", e);
    }
    respond(())
}

async fn handle_phone_confirm(
    bot: Bot,
    msg: Message,
    phones: Vec<String>,
    store: Arc<Store>,
    dialogue: BotDialogue,
) -> Result<(), teloxide::RequestError> {
    if let Err(e) = bot::handlers::phone_confirm(bot, msg, phones, store, dialogue).await {
        error!("Phone confirmation handler error: {}", e);
    }
    respond(())
}
