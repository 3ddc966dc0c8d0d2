// ==========================================
// 日志捕获 - 统计测试期间的 warn 事件
// ==========================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// 在当前线程执行闭包, 返回结果与期间产生的 warn 数量
pub fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(counter.clone()));
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, counter.load(Ordering::SeqCst))
}
