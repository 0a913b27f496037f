//! Lightweight i18n translation registry.
//!
//! Centralized static translation map keyed by `(locale, message_key)`.
//! Supported locales: `zh-CN`, `en`. No external i18n framework dependency.

use crate::types::MetricKind;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Default locale when none is configured.
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Supported locales.
pub const SUPPORTED_LOCALES: &[&str] = &["zh-CN", "en"];

/// Central translation registry.
pub struct Translations {
    map: HashMap<(&'static str, &'static str), &'static str>,
}

impl Translations {
    /// Get a translated string for the given locale and key.
    /// Falls back to `en` if the locale is not found, then to the provided default.
    pub fn get<'a>(&self, locale: &str, key: &str, default: &'a str) -> &'a str {
        if let Some(&val) = self.map.get(&(locale, key)) {
            return val;
        }
        if locale != "en" {
            if let Some(&val) = self.map.get(&("en", key)) {
                return val;
            }
        }
        default
    }

    /// Get a translated template string for formatting.
    /// Returns `None` if no translation is found for any locale.
    pub fn get_template(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.map
            .get(&(locale, key))
            .or_else(|| {
                if locale != "en" {
                    self.map.get(&("en", key))
                } else {
                    None
                }
            })
            .copied()
    }
}

/// Global translation singleton.
pub static TRANSLATIONS: LazyLock<Translations> = LazyLock::new(|| {
    let mut map = HashMap::new();

    macro_rules! t {
        ($locale:expr, $key:expr, $val:expr) => {
            map.insert(($locale, $key), $val);
        };
    }

    // ---- Metric display names ----
    t!("en", "metric.cpu", "CPU");
    t!("zh-CN", "metric.cpu", "CPU");
    t!("en", "metric.memory", "Memory");
    t!("zh-CN", "metric.memory", "内存");
    t!("en", "metric.disk", "Disk");
    t!("zh-CN", "metric.disk", "磁盘");
    t!("en", "metric.upload_speed", "Upload speed");
    t!("zh-CN", "metric.upload_speed", "上传速度");
    t!("en", "metric.download_speed", "Download speed");
    t!("zh-CN", "metric.download_speed", "下载速度");

    // ---- Cycle report ----
    t!("en", "report.title", "Fleet monitoring report");
    t!("zh-CN", "report.title", "服务器监测汇报");
    t!(
        "en",
        "report.alert",
        "Node {name}({id}): {metric} over threshold, current value {value}, lasting {duration}s"
    );
    t!(
        "zh-CN",
        "report.alert",
        "服务器{name}({id}) {metric}超过阈值，当前值{value}，已持续{duration}秒"
    );
    t!(
        "en",
        "report.recover",
        "Node {name}({id}): {metric} back to normal, current value {value}"
    );
    t!(
        "zh-CN",
        "report.recover",
        "服务器{name}({id}) {metric}恢复正常，当前值{value}"
    );

    Translations { map }
});

/// Display label for a metric kind in the given locale.
pub fn metric_label(locale: &str, kind: MetricKind) -> &'static str {
    let key: &'static str = match kind {
        MetricKind::Cpu => "metric.cpu",
        MetricKind::Memory => "metric.memory",
        MetricKind::Disk => "metric.disk",
        MetricKind::UploadSpeed => "metric.upload_speed",
        MetricKind::DownloadSpeed => "metric.download_speed",
    };
    TRANSLATIONS.get(locale, key, kind.as_str())
}

/// Check if a locale string is supported.
pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// Normalize locale: return the locale if supported, otherwise return the default.
pub fn normalize_locale(locale: &str) -> &str {
    if is_supported_locale(locale) {
        locale
    } else {
        DEFAULT_LOCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_labels_zh_cn() {
        assert_eq!(metric_label("zh-CN", MetricKind::Memory), "内存");
        assert_eq!(metric_label("zh-CN", MetricKind::UploadSpeed), "上传速度");
        assert_eq!(metric_label("zh-CN", MetricKind::Cpu), "CPU");
    }

    #[test]
    fn metric_labels_fall_back_to_en() {
        assert_eq!(metric_label("fr", MetricKind::Disk), "Disk");
    }

    #[test]
    fn report_templates_present_in_both_locales() {
        let t = &*TRANSLATIONS;
        for key in ["report.title", "report.alert", "report.recover"] {
            assert!(
                t.get_template("zh-CN", key).is_some(),
                "missing zh-CN template for {key}"
            );
            assert!(
                t.get_template("en", key).is_some(),
                "missing en template for {key}"
            );
        }
    }

    #[test]
    fn all_keys_have_both_locales() {
        let t = &*TRANSLATIONS;
        let keys: std::collections::HashSet<&str> = t.map.keys().map(|(_, key)| *key).collect();
        for key in &keys {
            assert!(
                t.map.contains_key(&("zh-CN", key)),
                "Missing zh-CN translation for key: {key}"
            );
            assert!(
                t.map.contains_key(&("en", key)),
                "Missing en translation for key: {key}"
            );
        }
    }

    #[test]
    fn normalize_unknown_locale() {
        assert_eq!(normalize_locale("zh-CN"), "zh-CN");
        assert_eq!(normalize_locale("de"), DEFAULT_LOCALE);
    }
}
