//! ハートビートサンプルのパーサー
//!
//! Prometheus text exposition形式から`loop_heartbeat_timestamp_seconds`の行だけを拾い、
//! `instance`/`service`ラベルとタイムスタンプ値を取り出す。
//! 一致しない行や壊れた行はエラーにせず読み飛ばす。

use heartbeat_exporter_common::types::HeartbeatSample;
use once_cell::sync::Lazy;
use regex::Regex;

static SAMPLE_LINE: Lazy<Regex> = Lazy::new(|| {
    // ラベル値は引用符内なら`}`を含んでよい
    Regex::new(
        r#"(?m)^loop_heartbeat_timestamp_seconds\{((?:[^"}\n]|"(?:[^"\\\n]|\\.)*")*)\}[ \t]+(\S+)"#,
    )
    .expect("heartbeat line pattern is valid")
});

static LABEL_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_][a-zA-Z0-9_]*)\s*=\s*"((?:[^"\\]|\\.)*)""#)
        .expect("label pair pattern is valid")
});

/// exposition本文からハートビートを抽出する（入力順）
pub fn parse(text: &str) -> Vec<HeartbeatSample> {
    SAMPLE_LINE
        .captures_iter(text)
        .filter_map(|caps| {
            let labels = caps.get(1)?.as_str();
            let timestamp: f64 = caps.get(2)?.as_str().parse().ok()?;
            if !timestamp.is_finite() {
                return None;
            }
            Some(HeartbeatSample {
                instance: label_value(labels, "instance")?,
                service: label_value(labels, "service")?,
                timestamp,
            })
        })
        .collect()
}

fn label_value(labels: &str, name: &str) -> Option<String> {
    LABEL_PAIR
        .captures_iter(labels)
        .find(|caps| &caps[1] == name)
        .map(|caps| unescape(&caps[2]))
}

fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
