/// 图片生成指令前缀（大小写不敏感）
pub const DRAW_PREFIX: &str = "draw:";

/// 输入路由结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutedInput {
    /// 空输入或只有空白，不做任何处理
    Empty,
    /// 文本补全，保留原始输入
    Text(String),
    /// 图片生成，已去掉前缀并 trim 的提示词
    Image(String),
}

/// 输入路由器
///
/// 发送按钮和回车键共用同一套规则
#[derive(Debug, Clone, Default)]
pub struct InputRouter;

impl InputRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn route(&self, input: &str) -> RoutedInput {
        if let Some(prompt) = strip_draw_prefix(input) {
            let prompt = prompt.trim();
            if prompt.is_empty() {
                return RoutedInput::Empty;
            }
            return RoutedInput::Image(prompt.to_string());
        }

        if input.trim().is_empty() {
            RoutedInput::Empty
        } else {
            RoutedInput::Text(input.to_string())
        }
    }
}

fn strip_draw_prefix(input: &str) -> Option<&str> {
    let head = input.get(..DRAW_PREFIX.len())?;
    if head.eq_ignore_ascii_case(DRAW_PREFIX) {
        Some(&input[DRAW_PREFIX.len()..])
    } else {
        None
    }
}
