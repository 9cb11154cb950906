use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::super::{ApplicationError, ChatSession, CommandHandler};
use crate::modules::chat::domain::{
    ChatDomainEvent, ContextBuilder, Message, ReplyComposer, RequestId, RequestKind,
};
use crate::modules::chat::ports::{CompletionPort, CompletionRequest, IdentityPort};

/// 发送文本命令
#[derive(Debug, Clone)]
pub struct SendTextCommand {
    /// 用户输入（原样保存）
    pub content: String,
}

impl SendTextCommand {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// 发送文本响应
#[derive(Debug, Clone)]
pub struct SendTextResponse {
    pub request_id: RequestId,
    /// 用户消息
    pub user_message: Message,
    /// 助手回复（成功内容、兜底文本或固定错误文本）
    pub assistant_message: Message,
    /// 请求是否失败
    pub failed: bool,
}

/// 发送文本命令处理器
#[derive(Clone)]
pub struct SendTextHandler {
    session: Arc<ChatSession>,
    completion: Arc<dyn CompletionPort>,
    identity: Arc<dyn IdentityPort>,
    context_builder: ContextBuilder,
    reply_composer: ReplyComposer,
    model: String,
}

impl SendTextHandler {
    pub fn new(
        session: Arc<ChatSession>,
        completion: Arc<dyn CompletionPort>,
        identity: Arc<dyn IdentityPort>,
    ) -> Self {
        let model = completion.default_model().to_string();
        Self {
            session,
            completion,
            identity,
            context_builder: ContextBuilder::new(),
            reply_composer: ReplyComposer::new(),
            model,
        }
    }
}

/// 空白输入返回 Ok(None)，不改变任何状态也不发请求
#[async_trait]
impl CommandHandler<SendTextCommand, Option<SendTextResponse>> for SendTextHandler {
    async fn handle(
        &self,
        command: SendTextCommand,
    ) -> Result<Option<SendTextResponse>, ApplicationError> {
        if command.content.trim().is_empty() {
            debug!("Ignoring blank text input");
            return Ok(None);
        }

        let request_id = RequestId::new();
        let avatar = self.identity.current_user().avatar_url;

        // 先追加用户消息，再发请求
        let user_message = Message::new_user(command.content, avatar).with_request_id(request_id);
        let history = self.session.append(user_message.clone()).await;

        let _busy = self.session.begin_request();
        self.session.clear_draft().await;

        let request = CompletionRequest::new(self.context_builder.build(&history), &self.model)
            .with_request_id(request_id);

        info!(%request_id, messages = request.messages.len(), "Dispatching text completion");

        let (content, failed) = match self.completion.complete(request).await {
            Ok(response) => (self.reply_composer.text_reply(response.content), false),
            Err(e) => {
                error!(%request_id, "Text completion failed: {}", e);
                self.session.publish(ChatDomainEvent::request_failed(
                    request_id,
                    RequestKind::Text,
                    e.to_string(),
                ));
                (self.reply_composer.text_failure(), true)
            }
        };

        let assistant_message = Message::new_assistant(content).with_request_id(request_id);
        self.session.append(assistant_message.clone()).await;

        Ok(Some(SendTextResponse {
            request_id,
            user_message,
            assistant_message,
            failed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::application::test_support::{
        ScriptedCompletion, ScriptedReply, TestIdentity,
    };
    use crate::modules::chat::domain::{
        MessageRole, GREETING, NO_RESPONSE_REPLY, TEXT_FAILURE_REPLY,
    };
    use crate::modules::chat::infrastructure::InMemoryHistoryRepository;
    use std::time::Duration;
    use tokio::sync::Semaphore;

    async fn setup(
        completion: ScriptedCompletion,
    ) -> (
        SendTextHandler,
        Arc<ChatSession>,
        Arc<ScriptedCompletion>,
        Arc<InMemoryHistoryRepository>,
    ) {
        let repo = Arc::new(InMemoryHistoryRepository::new());
        let session = Arc::new(ChatSession::initialize(repo.clone()).await);
        let completion = Arc::new(completion);
        let handler = SendTextHandler::new(session.clone(), completion.clone(), Arc::new(TestIdentity));
        (handler, session, completion, repo)
    }

    #[tokio::test]
    async fn test_successful_reply_is_appended() {
        let (handler, session, completion, _) =
            setup(ScriptedCompletion::always(ScriptedReply::Content(Some("Hi there".into())))).await;

        let response = handler
            .handle(SendTextCommand::new("hello"))
            .await
            .unwrap()
            .unwrap();

        assert!(!response.failed);
        let messages = session.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role(), MessageRole::User);
        assert_eq!(messages[1].content(), "hello");
        assert_eq!(messages[1].avatar(), Some("https://img.example/ada.png"));
        assert_eq!(messages[2].role(), MessageRole::Assistant);
        assert_eq!(messages[2].content(), "Hi there");

        // 请求携带整个序列（含问候语），只有角色和内容
        let requests = completion.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "scripted-model");
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].messages[0].content, GREETING);
        assert_eq!(requests[0].messages[1].role, "user");
        assert_eq!(requests[0].messages[1].content, "hello");
    }

    #[tokio::test]
    async fn test_missing_content_uses_fallback() {
        let (handler, session, _, _) =
            setup(ScriptedCompletion::always(ScriptedReply::Content(None))).await;

        handler.handle(SendTextCommand::new("hello")).await.unwrap();

        let messages = session.messages().await;
        assert_eq!(messages.last().unwrap().content(), NO_RESPONSE_REPLY);
    }

    #[tokio::test]
    async fn test_network_failure_appends_single_error_message() {
        let (handler, session, _, _) =
            setup(ScriptedCompletion::always(ScriptedReply::NetworkFailure)).await;

        let response = handler
            .handle(SendTextCommand::new("hello"))
            .await
            .unwrap()
            .unwrap();

        assert!(response.failed);
        let messages = session.messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].content(), TEXT_FAILURE_REPLY);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_api_failure_collapses_to_same_error_message() {
        let (handler, session, _, _) =
            setup(ScriptedCompletion::always(ScriptedReply::ApiFailure(401))).await;

        handler.handle(SendTextCommand::new("hello")).await.unwrap();

        assert_eq!(
            session.messages().await.last().unwrap().content(),
            TEXT_FAILURE_REPLY
        );
    }

    #[tokio::test]
    async fn test_blank_input_is_noop() {
        let (handler, session, completion, repo) =
            setup(ScriptedCompletion::always(ScriptedReply::Echo)).await;
        session.set_draft("   ").await;
        let saves_before = repo.saves().await.len();

        for input in ["", "   ", "\n\t"] {
            let response = handler.handle(SendTextCommand::new(input)).await.unwrap();
            assert!(response.is_none());
        }

        assert_eq!(session.len().await, 1);
        assert!(completion.requests().is_empty());
        assert_eq!(repo.saves().await.len(), saves_before);
        assert_eq!(session.draft().await, "   ");
    }

    #[tokio::test]
    async fn test_user_message_lands_before_reply() {
        let gate = Arc::new(Semaphore::new(0));
        let (handler, session, _, repo) =
            setup(ScriptedCompletion::gated(ScriptedReply::Echo, gate.clone())).await;
        session.set_draft("hello").await;

        let task = tokio::spawn({
            let handler = handler.clone();
            async move { handler.handle(SendTextCommand::new("hello")).await }
        });

        // 等待请求发出
        tokio::time::timeout(Duration::from_secs(5), async {
            while !session.is_busy() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        let pending = session.messages().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[1].content(), "hello");
        assert_eq!(session.submit_label(), "Thinking...");
        assert_eq!(repo.saves().await.last().unwrap(), &pending);
        assert_eq!(session.draft().await, "");

        gate.add_permits(1);
        task.await.unwrap().unwrap();

        assert!(!session.is_busy());
        assert_eq!(session.messages().await[2].content(), "echo: hello");
    }

    #[tokio::test]
    async fn test_every_mutation_is_persisted() {
        let (handler, session, _, repo) =
            setup(ScriptedCompletion::always(ScriptedReply::Echo)).await;

        handler.handle(SendTextCommand::new("hello")).await.unwrap();

        let saves = repo.saves().await;
        // 初始化 + 用户消息 + 助手回复
        assert_eq!(saves.len(), 3);
        assert_eq!(saves[1].len(), 2);
        assert_eq!(saves[2], session.messages().await);
    }

    #[tokio::test]
    async fn test_reply_shares_request_id_with_prompt() {
        let (handler, _, _, _) = setup(ScriptedCompletion::always(ScriptedReply::Echo)).await;

        let response = handler
            .handle(SendTextCommand::new("hello"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.user_message.request_id(), Some(response.request_id));
        assert_eq!(
            response.assistant_message.request_id(),
            Some(response.request_id)
        );
    }
}
