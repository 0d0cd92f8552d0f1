//! Readable rendering of recent chat history for prompts.

use chrono::{DateTime, Local, Utc};

use super::types::ChatMessage;

/// Render `messages` oldest first, one `{time}, {speaker}: {text}` per line.
///
/// Bot messages are attributed to `{bot_nickname}(你)` so the model can tell
/// its own lines apart. Times are relative to `now`.
pub fn render_readable(messages: &[ChatMessage], bot_nickname: &str, now: DateTime<Utc>) -> String {
    let mut ordered: Vec<&ChatMessage> = messages.iter().collect();
    ordered.sort_by_key(|m| m.time);

    ordered
        .into_iter()
        .map(|m| {
            let speaker = if m.is_bot {
                format!("{bot_nickname}(你)")
            } else {
                m.user_nickname
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or(&m.user_id)
                    .to_string()
            };
            format!("{}, {}: {}", relative_time(m.time, now), speaker, m.text.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable age of `then` as seen at `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match secs {
        s if s < 20 => "刚刚".to_string(),
        s if s < 60 => format!("{s}秒前"),
        s if s < 3_600 => format!("{}分钟前", s / 60),
        s if s < 86_400 => format!("{}小时前", s / 3_600),
        s if s < 172_800 => format!("{}天前", s / 86_400),
        _ => then
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn msg(id: &str, nick: Option<&str>, is_bot: bool, text: &str, ago: Duration) -> ChatMessage {
        ChatMessage {
            message_id: id.to_string(),
            user_id: format!("u-{id}"),
            user_nickname: nick.map(str::to_string),
            is_bot,
            text: text.to_string(),
            time: now() - ago,
        }
    }

    #[test]
    fn relative_buckets() {
        let n = now();
        assert_eq!(relative_time(n, n), "刚刚");
        assert_eq!(relative_time(n - Duration::seconds(19), n), "刚刚");
        assert_eq!(relative_time(n - Duration::seconds(45), n), "45秒前");
        assert_eq!(relative_time(n - Duration::minutes(5), n), "5分钟前");
        assert_eq!(relative_time(n - Duration::hours(3), n), "3小时前");
        assert_eq!(relative_time(n - Duration::hours(30), n), "1天前");
    }

    #[test]
    fn future_timestamps_are_just_now() {
        let n = now();
        assert_eq!(relative_time(n + Duration::minutes(2), n), "刚刚");
    }

    #[test]
    fn old_messages_use_absolute_time() {
        let n = now();
        let rendered = relative_time(n - Duration::days(3), n);
        assert_eq!(rendered.len(), "2025-05-29 12:00:00".len());
        assert!(rendered.starts_with("2025-05-"));
    }

    #[test]
    fn renders_oldest_first_with_bot_substitution() {
        let messages = vec![
            msg("2", None, true, "我来啦", Duration::minutes(1)),
            msg("1", Some("阿明"), false, " 今天好热 ", Duration::minutes(10)),
            msg("3", Some(""), false, "同意", Duration::seconds(5)),
        ];
        let text = render_readable(&messages, "小助手", now());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "10分钟前, 阿明: 今天好热",
                "1分钟前, 小助手(你): 我来啦",
                "刚刚, u-3: 同意",
            ]
        );
    }

    #[test]
    fn empty_history_renders_empty() {
        assert_eq!(render_readable(&[], "小助手", now()), "");
    }
}
