use fleetmon_common::i18n::{metric_label, normalize_locale, TRANSLATIONS};
use fleetmon_common::types::{AlertEvent, EventKind};

/// Renders one cycle's events into the summary text pushed to recipients.
/// Returns `None` when the cycle produced no events; silence means nothing
/// to report, not an empty message.
pub fn build_report(events: &[AlertEvent], locale: &str) -> Option<String> {
    if events.is_empty() {
        return None;
    }
    let locale = normalize_locale(locale);
    let title = TRANSLATIONS.get(locale, "report.title", "Fleet monitoring report");

    let mut lines = Vec::with_capacity(events.len() + 1);
    lines.push(title.to_string());
    for event in events {
        lines.push(format_event(event, locale));
    }
    Some(lines.join("\n"))
}

fn format_event(event: &AlertEvent, locale: &str) -> String {
    let key = match event.kind {
        EventKind::Fire => "report.alert",
        EventKind::Recover => "report.recover",
    };
    let template = TRANSLATIONS.get_template(locale, key).unwrap_or(key);
    template
        .replace("{name}", &event.node_name)
        .replace("{id}", &event.node_id.to_string())
        .replace("{metric}", metric_label(locale, event.metric))
        .replace("{value}", &format_value(event.current_value))
        .replace("{duration}", &event.breach_duration_secs.to_string())
}

/// Two decimal places, trailing zeros trimmed: 90.00 → "90", 0.95 → "0.95".
fn format_value(value: f64) -> String {
    let text = format!("{value:.2}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}
