//! Human-readable texts for each lifecycle event.

use repairdesk_core::events::{OrderEvent, OrderEventKind};
use repairdesk_entity::notification::NotificationKind;

/// Title, body and type tag of a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationContent {
    /// A student filed a new order. Sent to administrators.
    pub fn order_created(creator: &str, order_title: &str) -> Self {
        Self {
            title: "🆕 新工单提交".to_string(),
            message: format!("{creator} 提交了新工单：{order_title}"),
            kind: NotificationKind::OrderCreated,
        }
    }

    pub fn order_assigned(order_title: &str) -> Self {
        Self {
            title: "📢 新工单通知".to_string(),
            message: format!("您有新的工单待处理：{order_title}"),
            kind: NotificationKind::OrderAssigned,
        }
    }

    pub fn order_reassigned(order_title: &str) -> Self {
        Self {
            title: "🔄 工单改派通知".to_string(),
            message: format!("工单已改派给您：{order_title}"),
            kind: NotificationKind::OrderReassigned,
        }
    }

    pub fn status_changed(order_title: &str, status: &str) -> Self {
        Self {
            title: "🔔 工单状态更新".to_string(),
            message: format!("您的工单「{order_title}」状态已更新为：{status}"),
            kind: NotificationKind::OrderStatusChanged,
        }
    }

    /// Whole days once at least two have elapsed, otherwise fractional hours.
    pub fn order_timeout(order_id: i64, order_title: &str, hours_pending: f64) -> Self {
        let days = (hours_pending / 24.0).floor() as i64;
        let elapsed = if days >= 2 {
            format!("{days}天")
        } else {
            format!("{hours_pending:.1}小时")
        };
        Self {
            title: "⚠️ 工单超时提醒".to_string(),
            message: format!("工单 #{order_id}「{order_title}」已超时{elapsed}未处理！"),
            kind: NotificationKind::OrderTimeout,
        }
    }

    /// Texts for a lifecycle event.
    pub fn for_event(event: &OrderEvent) -> Self {
        match event.kind {
            OrderEventKind::Created => Self::order_created(&event.creator, &event.title),
            OrderEventKind::Assigned => Self::order_assigned(&event.title),
            OrderEventKind::Reassigned => Self::order_reassigned(&event.title),
            OrderEventKind::StatusChanged => Self::status_changed(&event.title, &event.new_status),
            OrderEventKind::TimedOut => Self::order_timeout(
                event.order_id,
                &event.title,
                event.pending_hours.unwrap_or_default(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_timeout_in_days() {
        let content = NotificationContent::order_timeout(12, "水龙头漏水", 50.0);
        assert_eq!(content.message, "工单 #12「水龙头漏水」已超时2天未处理！");
        assert_eq!(content.kind, NotificationKind::OrderTimeout);
    }

    #[test]
    fn test_timeout_in_hours() {
        let content = NotificationContent::order_timeout(3, "灯坏了", 30.26);
        assert_eq!(content.message, "工单 #3「灯坏了」已超时30.3小时未处理！");
    }

    #[test]
    fn test_status_changed_text() {
        let content = NotificationContent::status_changed("门锁", "Processing");
        assert_eq!(content.title, "🔔 工单状态更新");
        assert_eq!(content.message, "您的工单「门锁」状态已更新为：Processing");
    }

    #[test]
    fn test_for_event_dispatches_on_kind() {
        let event = OrderEvent {
            kind: OrderEventKind::Reassigned,
            order_id: 1,
            title: "空调".to_string(),
            new_status: "Pending".to_string(),
            creator: "li".to_string(),
            assignee: Some(9),
            pending_hours: None,
            occurred_at: Utc::now(),
        };
        let content = NotificationContent::for_event(&event);
        assert_eq!(content.kind, NotificationKind::OrderReassigned);
        assert_eq!(content.message, "工单已改派给您：空调");
    }
}
