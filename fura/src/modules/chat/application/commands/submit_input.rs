use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::{ApplicationError, CommandHandler};
use super::{
    SendImageCommand, SendImageHandler, SendImageResponse, SendTextCommand, SendTextHandler,
    SendTextResponse,
};
use crate::modules::chat::domain::{InputRouter, RoutedInput};

/// 提交方式
///
/// 两种方式的路由规则完全相同
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmitTrigger {
    /// 点击发送按钮
    SendButton,
    /// 在输入框按下回车
    EnterKey,
}

/// 提交输入命令
#[derive(Debug, Clone)]
pub struct SubmitInputCommand {
    pub input: String,
    pub trigger: SubmitTrigger,
}

impl SubmitInputCommand {
    pub fn new(input: impl Into<String>, trigger: SubmitTrigger) -> Self {
        Self {
            input: input.into(),
            trigger,
        }
    }
}

/// 提交结果
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// 空输入，什么都没做
    Ignored,
    Text(SendTextResponse),
    Image(SendImageResponse),
}

/// 提交输入处理器：`draw:` 前缀走图片生成，其余走文本补全
#[derive(Clone)]
pub struct SubmitInputHandler {
    router: InputRouter,
    send_text: SendTextHandler,
    send_image: SendImageHandler,
}

impl SubmitInputHandler {
    pub fn new(send_text: SendTextHandler, send_image: SendImageHandler) -> Self {
        Self {
            router: InputRouter::new(),
            send_text,
            send_image,
        }
    }
}

#[async_trait]
impl CommandHandler<SubmitInputCommand, SubmitOutcome> for SubmitInputHandler {
    async fn handle(&self, command: SubmitInputCommand) -> Result<SubmitOutcome, ApplicationError> {
        let routed = self.router.route(&command.input);
        debug!(trigger = ?command.trigger, route = ?routed, "Routing submitted input");

        let outcome = match routed {
            RoutedInput::Empty => None,
            RoutedInput::Text(content) => self
                .send_text
                .handle(SendTextCommand::new(content))
                .await?
                .map(SubmitOutcome::Text),
            RoutedInput::Image(prompt) => self
                .send_image
                .handle(SendImageCommand::new(prompt))
                .await?
                .map(SubmitOutcome::Image),
        };

        Ok(outcome.unwrap_or(SubmitOutcome::Ignored))
    }
}
