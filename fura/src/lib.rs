pub mod cli;
pub mod commands;
pub mod infrastructure;
pub mod modules;
pub mod shared;

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

pub use cli::Cli;
use commands::{GetHistoryRequest, SubmitRequest};
use infrastructure::{AppEvent, AppState, Backend};
use modules::chat::{MessageRole, SubmitTrigger, UserProfile};
use modules::ConfigModule;
use shared::{AppError, AppResult};

const HISTORY_COMMAND: &str = "/history";
const QUIT_COMMAND: &str = "/quit";

pub async fn run(cli: Cli) -> AppResult<()> {
    // 初始化日志
    init_tracing(&cli.log_level)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Fura starting...");

    // 加载配置
    let config_module = ConfigModule::new_with_file(&cli.data_dir);
    if config_module.ensure_initialized().await? {
        tracing::info!(data_dir = %cli.data_dir.display(), "Created default config.json");
    }
    let mut config = config_module.load().await?;
    config.data_dir = cli.data_dir.clone();

    let backend = if cli.offline {
        Backend::Offline
    } else {
        Backend::Remote
    };
    let state = AppState::build(config, backend).await?;
    let user = state.chat.identity().current_user();

    print_history(&state).await?;
    println!("(type a message, \"draw: <prompt>\" for an image, {HISTORY_COMMAND}, {QUIT_COMMAND})");

    let renderer = tokio::spawn(render_events(state.event_bus.subscribe(), user));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            QUIT_COMMAND => break,
            HISTORY_COMMAND => print_history(&state).await?,
            _ => {
                commands::chat_set_draft(&state, line.clone()).await?;
                commands::chat_submit_detached(
                    &state,
                    SubmitRequest {
                        input: line,
                        trigger: SubmitTrigger::EnterKey,
                    },
                );
            }
        }
    }

    // 等待未完成的请求
    while state.chat.session().is_busy() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    // 留出时间让最后的事件打印出来
    tokio::time::sleep(Duration::from_millis(50)).await;
    renderer.abort();

    tracing::info!("Fura exiting");
    Ok(())
}

/// RUST_LOG 优先，否则使用 --log-level，无效时回退到 info
fn init_tracing(log_level: &str) -> AppResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match log_level.parse::<EnvFilter>() {
            Ok(filter) => filter,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid filter ({}); falling back to 'info'",
                    log_level, e
                );
                EnvFilter::new("info")
            }
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::LoggingError(e.to_string()))
}

async fn print_history(state: &AppState) -> AppResult<()> {
    for line in commands::chat_history(state, GetHistoryRequest::default()).await? {
        println!("{}", line.render());
    }
    Ok(())
}

/// 打印新到达的回复和错误，用户自己的输入不再回显
async fn render_events(mut events: broadcast::Receiver<AppEvent>, user: UserProfile) {
    loop {
        match events.recv().await {
            Ok(AppEvent::MessageAppended { ref message, .. })
                if message.role() == MessageRole::User => {}
            Ok(event) => {
                if let Some(line) = commands::render_event(&event, &user) {
                    println!("{}", line);
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!("Renderer skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
