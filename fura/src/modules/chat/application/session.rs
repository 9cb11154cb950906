// Chat Session State
//
// 会话的共享可变状态：消息序列、输入草稿和忙碌计数。
// 追加与持久化在同一把锁内完成，写出的快照总是完整且按顺序的

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{info, warn};

use crate::modules::chat::domain::{ChatDomainEvent, Conversation, Message};
use crate::modules::chat::ports::{HistoryRepository, RepositoryError};

const EVENT_CAPACITY: usize = 100;

/// 提交按钮文字
pub const SEND_LABEL: &str = "Send";
pub const THINKING_LABEL: &str = "Thinking...";

/// 会话状态
pub struct ChatSession {
    conversation: Mutex<Conversation>,
    draft: RwLock<String>,
    in_flight: AtomicUsize,
    repository: Arc<dyn HistoryRepository>,
    events: broadcast::Sender<ChatDomainEvent>,
}

impl ChatSession {
    /// 启动时恢复会话
    ///
    /// 读取并解析成功则原样采用；槽位为空、读取失败或内容损坏时回退为问候语
    pub async fn initialize(repository: Arc<dyn HistoryRepository>) -> Self {
        let conversation = match repository.load().await {
            Ok(Some(messages)) => {
                info!(count = messages.len(), "Restored chat history");
                Conversation::from_messages(messages)
            }
            Ok(None) => {
                info!("No chat history found, starting with greeting");
                Conversation::greeting()
            }
            Err(RepositoryError::SerializationError(e)) => {
                warn!("Stored chat history is corrupt, falling back to greeting: {}", e);
                Conversation::greeting()
            }
            Err(e) => {
                warn!("Failed to read chat history, falling back to greeting: {}", e);
                Conversation::greeting()
            }
        };

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let session = Self {
            conversation: Mutex::new(conversation),
            draft: RwLock::new(String::new()),
            in_flight: AtomicUsize::new(0),
            repository,
            events,
        };

        // 初始状态同样写回存储
        {
            let conversation = session.conversation.lock().await;
            session.persist(&conversation).await;
        }

        session
    }

    /// 追加一条消息并持久化，返回追加后的完整序列
    pub async fn append(&self, message: Message) -> Vec<Message> {
        let mut conversation = self.conversation.lock().await;
        conversation.append(message.clone());
        self.persist(&conversation).await;

        let snapshot = conversation.messages().to_vec();
        let position = snapshot.len();
        drop(conversation);

        let _ = self
            .events
            .send(ChatDomainEvent::message_appended(message, position));
        snapshot
    }

    /// 整体快照写入，失败只记录日志
    async fn persist(&self, conversation: &Conversation) {
        if let Err(e) = self.repository.save(conversation.messages()).await {
            warn!("Failed to persist chat history: {}", e);
        }
    }

    /// 当前消息序列
    pub async fn messages(&self) -> Vec<Message> {
        self.conversation.lock().await.messages().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.conversation.lock().await.len()
    }

    // Draft

    pub async fn draft(&self) -> String {
        self.draft.read().await.clone()
    }

    pub async fn set_draft(&self, input: impl Into<String>) {
        *self.draft.write().await = input.into();
    }

    pub async fn clear_draft(&self) {
        self.draft.write().await.clear();
    }

    // Busy

    /// 至少有一个请求未完成
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            THINKING_LABEL
        } else {
            SEND_LABEL
        }
    }

    /// 标记一个请求开始；返回的守卫在 drop 时结束该请求（成功、失败或 panic 都会执行）
    pub fn begin_request(&self) -> BusyGuard<'_> {
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.events.send(ChatDomainEvent::busy_changed(in_flight));
        BusyGuard { session: self }
    }

    // Events

    pub fn subscribe(&self) -> broadcast::Receiver<ChatDomainEvent> {
        self.events.subscribe()
    }

    pub(crate) fn publish(&self, event: ChatDomainEvent) {
        let _ = self.events.send(event);
    }
}

/// 忙碌守卫
pub struct BusyGuard<'a> {
    session: &'a ChatSession,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.session.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        let _ = self
            .session
            .events
            .send(ChatDomainEvent::busy_changed(in_flight));
    }
}
