// Chat Module - 聊天模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含实体、值对象、领域服务和领域事件
// - ports: 端口层，定义与外部世界的抽象接口
// - infrastructure: 基础设施层，实现端口的具体适配器
// - application: 应用层，实现 CQRS 命令和查询处理器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    // Traits
    ApplicationError,
    CommandHandler,
    QueryHandler,
    // State
    ChatSession,
    // Commands
    SendImageCommand,
    SendImageHandler,
    SendImageResponse,
    SendTextCommand,
    SendTextHandler,
    SendTextResponse,
    SubmitInputCommand,
    SubmitInputHandler,
    SubmitOutcome,
    SubmitTrigger,
    // Queries
    GetSessionViewHandler,
    GetSessionViewQuery,
    SessionView,
};

pub use domain::{
    ChatDomainEvent, ChatTurn, Conversation, InputRouter, Message, MessageId, MessageRole,
    RequestId, RequestKind, RoutedInput,
};

pub use infrastructure::{
    FileHistoryRepository, FileImageStore, HuggingFaceConfig, HuggingFaceImageAdapter,
    InMemoryHistoryRepository, InMemoryImageStore, MockCompletionAdapter, MockImageAdapter,
    OpenRouterAdapter, OpenRouterConfig, StaticIdentityProvider,
};

pub use ports::{
    CompletionError, CompletionPort, GeneratedImage, HistoryRepository, IdentityPort, ImageError,
    ImagePort, ImageStore, RepositoryError, UserProfile,
};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// 模块依赖的全部端口
pub struct ChatPorts {
    pub completion: Arc<dyn CompletionPort>,
    pub image: Arc<dyn ImagePort>,
    pub history: Arc<dyn HistoryRepository>,
    pub image_store: Arc<dyn ImageStore>,
    pub identity: Arc<dyn IdentityPort>,
}

/// Chat 模块容器
///
/// 管理模块内的依赖注入
pub struct ChatModule {
    session: Arc<ChatSession>,
    identity: Arc<dyn IdentityPort>,
    // Handlers
    send_text_handler: SendTextHandler,
    send_image_handler: SendImageHandler,
    submit_input_handler: SubmitInputHandler,
    get_session_view_handler: GetSessionViewHandler,
}

impl ChatModule {
    /// 创建使用内存存储的 ChatModule（用于开发测试）
    pub async fn new(
        completion: Arc<dyn CompletionPort>,
        image: Arc<dyn ImagePort>,
        identity: Arc<dyn IdentityPort>,
    ) -> Self {
        Self::with_ports(ChatPorts {
            completion,
            image,
            history: Arc::new(InMemoryHistoryRepository::new()),
            image_store: Arc::new(InMemoryImageStore::new()),
            identity,
        })
        .await
    }

    /// 创建带持久化存储的 ChatModule（生产环境推荐）
    ///
    /// # Arguments
    /// * `data_dir` - 应用数据目录路径
    ///
    /// # Errors
    /// 如果无法初始化文件存储，返回错误
    pub async fn new_with_persistence(
        data_dir: PathBuf,
        completion: Arc<dyn CompletionPort>,
        image: Arc<dyn ImagePort>,
        identity: Arc<dyn IdentityPort>,
    ) -> Result<Self, RepositoryError> {
        let history: Arc<dyn HistoryRepository> =
            Arc::new(FileHistoryRepository::new(data_dir.clone()).await?);
        let image_store: Arc<dyn ImageStore> = Arc::new(FileImageStore::new(data_dir).await?);

        Ok(Self::with_ports(ChatPorts {
            completion,
            image,
            history,
            image_store,
            identity,
        })
        .await)
    }

    /// 使用自定义端口创建 ChatModule，并从历史仓储恢复会话
    pub async fn with_ports(ports: ChatPorts) -> Self {
        let session = Arc::new(ChatSession::initialize(ports.history).await);

        let send_text_handler =
            SendTextHandler::new(session.clone(), ports.completion, ports.identity.clone());
        let send_image_handler =
            SendImageHandler::new(session.clone(), ports.image, ports.image_store);
        let submit_input_handler =
            SubmitInputHandler::new(send_text_handler.clone(), send_image_handler.clone());
        let get_session_view_handler =
            GetSessionViewHandler::new(session.clone(), ports.identity.clone());

        Self {
            session,
            identity: ports.identity,
            send_text_handler,
            send_image_handler,
            submit_input_handler,
            get_session_view_handler,
        }
    }

    // Command handlers

    /// 提交输入（发送按钮或回车）
    pub async fn submit(
        &self,
        command: SubmitInputCommand,
    ) -> Result<SubmitOutcome, ApplicationError> {
        self.submit_input_handler.handle(command).await
    }

    /// 在后台任务中提交输入，调用方不阻塞
    ///
    /// 多次调用会并发执行，回复按网络返回顺序追加，通过 RequestId 与提问对应
    pub fn spawn_submit(
        &self,
        command: SubmitInputCommand,
    ) -> JoinHandle<Result<SubmitOutcome, ApplicationError>> {
        let handler = self.submit_input_handler.clone();
        tokio::spawn(async move { handler.handle(command).await })
    }

    /// 发送文本
    pub async fn send_text(
        &self,
        command: SendTextCommand,
    ) -> Result<Option<SendTextResponse>, ApplicationError> {
        self.send_text_handler.handle(command).await
    }

    /// 生成图片
    pub async fn send_image(
        &self,
        command: SendImageCommand,
    ) -> Result<Option<SendImageResponse>, ApplicationError> {
        self.send_image_handler.handle(command).await
    }

    /// 更新输入草稿
    pub async fn set_draft(&self, input: impl Into<String>) {
        self.session.set_draft(input).await;
    }

    // Query handlers

    /// 获取会话视图
    pub async fn view(&self, query: GetSessionViewQuery) -> Result<SessionView, ApplicationError> {
        self.get_session_view_handler.handle(query).await
    }

    // Accessors

    /// 订阅领域事件
    pub fn subscribe(&self) -> broadcast::Receiver<ChatDomainEvent> {
        self.session.subscribe()
    }

    pub fn session(&self) -> &Arc<ChatSession> {
        &self.session
    }

    pub fn identity(&self) -> &Arc<dyn IdentityPort> {
        &self.identity
    }
}
