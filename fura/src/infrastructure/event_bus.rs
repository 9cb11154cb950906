use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::modules::chat::{ChatDomainEvent, Message, RequestId, RequestKind};

#[derive(Clone, Debug)]
pub enum AppEvent {
    MessageAppended {
        message: Message,
        position: usize,
    },
    BusyChanged {
        busy: bool,
        in_flight: usize,
    },
    RequestFailed {
        request_id: RequestId,
        kind: RequestKind,
        error: String,
    },
}

impl From<ChatDomainEvent> for AppEvent {
    fn from(event: ChatDomainEvent) -> Self {
        match event {
            ChatDomainEvent::MessageAppended(e) => AppEvent::MessageAppended {
                message: e.message,
                position: e.position,
            },
            ChatDomainEvent::BusyChanged(e) => AppEvent::BusyChanged {
                busy: e.busy,
                in_flight: e.in_flight,
            },
            ChatDomainEvent::RequestFailed(e) => AppEvent::RequestFailed {
                request_id: e.request_id,
                kind: e.kind,
                error: e.error,
            },
        }
    }
}

pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    pub fn publish(&self, event: AppEvent) {
        tracing::debug!("[EventBus] Publishing event: {:?}", event);
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// 把聊天模块的领域事件转发到总线，源关闭后任务结束
    pub fn forward_from(
        &self,
        mut source: broadcast::Receiver<ChatDomainEvent>,
    ) -> JoinHandle<()> {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(event) => {
                        tracing::debug!("[EventBus] Forwarding {}", event.event_type());
                        let _ = sender.send(AppEvent::from(event));
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("[EventBus] Dropped {} chat events", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(AppEvent::BusyChanged {
            busy: true,
            in_flight: 1,
        });

        match rx.recv().await.unwrap() {
            AppEvent::BusyChanged { busy, in_flight } => {
                assert!(busy);
                assert_eq!(in_flight, 1);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_forwards_domain_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let (tx, source) = broadcast::channel(8);

        let task = bus.forward_from(source);
        tx.send(ChatDomainEvent::message_appended(Message::new_assistant("hi"), 3))
            .unwrap();
        drop(tx);
        task.await.unwrap();

        match rx.recv().await.unwrap() {
            AppEvent::MessageAppended { message, position } => {
                assert_eq!(message.content(), "hi");
                assert_eq!(position, 3);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
