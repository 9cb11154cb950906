// Chat Commands
//
// 前端调用的聊天命令处理器
// 通过 ChatModule 处理业务逻辑，返回可直接显示的数据

use serde::{Deserialize, Serialize};

use crate::infrastructure::{AppEvent, AppState};
use crate::modules::chat::{
    GetSessionViewQuery, RequestKind, SubmitInputCommand, SubmitOutcome, SubmitTrigger,
    UserProfile,
};
use crate::shared::{AppResult, ChatLine};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub input: String,
    #[serde(default = "default_trigger")]
    pub trigger: SubmitTrigger,
}

fn default_trigger() -> SubmitTrigger {
    SubmitTrigger::SendButton
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHistoryRequest {
    pub tail: Option<usize>,
}

/// 会话状态
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatus {
    pub busy: bool,
    pub submit_label: String,
    pub draft: String,
    pub total: usize,
}

/// 提交输入 - 等待回复追加完成后返回
pub async fn chat_submit(state: &AppState, request: SubmitRequest) -> AppResult<SubmitOutcome> {
    tracing::debug!(trigger = ?request.trigger, "[chat_submit] Received input");
    let outcome = state
        .chat
        .submit(SubmitInputCommand::new(request.input, request.trigger))
        .await?;
    Ok(outcome)
}

/// 提交输入 - 后台执行，回复通过事件总线到达
pub fn chat_submit_detached(state: &AppState, request: SubmitRequest) {
    let handle = state
        .chat
        .spawn_submit(SubmitInputCommand::new(request.input, request.trigger));

    tokio::spawn(async move {
        match handle.await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => tracing::error!("[chat_submit] Request failed: {}", e),
            Err(e) => tracing::error!("[chat_submit] Task aborted: {}", e),
        }
    });
}

/// 更新输入草稿
pub async fn chat_set_draft(state: &AppState, input: String) -> AppResult<()> {
    state.chat.set_draft(input).await;
    Ok(())
}

/// 获取显示用的历史记录
pub async fn chat_history(state: &AppState, request: GetHistoryRequest) -> AppResult<Vec<ChatLine>> {
    let query = match request.tail {
        Some(count) => GetSessionViewQuery::tail(count),
        None => GetSessionViewQuery::new(),
    };
    let view = state.chat.view(query).await?;

    Ok(view
        .messages
        .iter()
        .map(|message| ChatLine::from_message(message, &view.user))
        .collect())
}

/// 获取会话状态
pub async fn chat_status(state: &AppState) -> AppResult<ChatStatus> {
    let view = state.chat.view(GetSessionViewQuery::tail(0)).await?;
    Ok(ChatStatus {
        busy: view.busy,
        submit_label: view.submit_label.to_string(),
        draft: view.draft,
        total: view.total,
    })
}

/// 把总线事件渲染为一行输出，无需显示的事件返回 None
pub fn render_event(event: &AppEvent, user: &UserProfile) -> Option<String> {
    match event {
        AppEvent::MessageAppended { message, .. } => {
            Some(ChatLine::from_message(message, user).render())
        }
        AppEvent::BusyChanged { busy: true, in_flight } => {
            Some(format!("… thinking ({} pending)", in_flight))
        }
        AppEvent::BusyChanged { busy: false, .. } => None,
        AppEvent::RequestFailed { kind, error, .. } => {
            let kind = match kind {
                RequestKind::Text => "reply",
                RequestKind::Image => "image",
            };
            Some(format!("! {} request failed: {}", kind, error))
        }
    }
}
