//! Lenient parsing of oracle replies.
//!
//! The oracle is asked for a bare JSON object but routinely wraps it in
//! markdown fences, leaks control tokens or adds prose around it. Nothing
//! here ever fails: malformed replies degrade to neutral defaults.

use regex_lite::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use heartquest_domain::{BehaviorDirective, MissionAnalysis, NpcMood, NpcReaction};

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("valid regex"));

// <|...|> style tokens, llama [INST]/[/INST] and <<SYS>>/<</SYS>>
static SPECIAL_TOKENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\|[^|>]+\|>|\[/?INST\]|<</?SYS>>").expect("valid regex"));

const ANALYSIS_FALLBACK_SUMMARY: &str = "The mission has concluded.";
const ANALYSIS_FALLBACK_ADVICE: &str = "Try to be more engaging next time.";
const ANALYSIS_DEFAULT_ADVICE: &str = "Keep being yourself.";

/// Remove code fences and leaked model tokens, then trim.
pub fn strip_noise(raw: &str) -> String {
    let without_tokens = SPECIAL_TOKENS_RE.replace_all(raw, "");
    CODE_FENCE_RE
        .replace_all(&without_tokens, "")
        .trim()
        .to_string()
}

/// Find the outermost `{...}` object in `text` and parse it.
fn extract_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

/// Integers are accepted as numbers, fractional numbers or numeric strings.
fn int_field(map: &Map<String, Value>, key: &str) -> Option<i32> {
    let value = map.get(key)?;
    let wide = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64),
        _ => None,
    }?;
    Some(wide.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Parse an action reply into an [`NpcReaction`].
///
/// A reply without a usable `dialogue` string is treated as plain speech:
/// the trimmed raw text becomes the dialogue with neutral defaults.
pub fn parse_reaction(raw: &str) -> NpcReaction {
    let cleaned = strip_noise(raw);

    let parsed = extract_object(&cleaned).and_then(|map| {
        let dialogue = string_field(&map, "dialogue")?.trim().to_string();
        Some(NpcReaction {
            dialogue,
            mood: string_field(&map, "mood")
                .map(NpcMood::from_label)
                .unwrap_or_default(),
            affection_delta: int_field(&map, "affection_delta").unwrap_or(0),
            directive: string_field(&map, "npc_action")
                .map(BehaviorDirective::from_label)
                .unwrap_or_default(),
        })
    });

    parsed.unwrap_or_else(|| NpcReaction::speech_only(raw.trim()))
}

/// Parse a mission analysis reply. A missing `summary` counts as a parse failure.
pub fn parse_analysis(raw: &str) -> MissionAnalysis {
    let cleaned = strip_noise(raw);

    extract_object(&cleaned)
        .and_then(|map| {
            let summary = string_field(&map, "summary")?.trim().to_string();
            Some(MissionAnalysis {
                summary,
                affection_change: int_field(&map, "affection_change").unwrap_or(0),
                npc_mood: string_field(&map, "npc_mood")
                    .map(NpcMood::from_label)
                    .unwrap_or_default(),
                advice: string_field(&map, "advice")
                    .map(|a| a.trim().to_string())
                    .unwrap_or_else(|| ANALYSIS_DEFAULT_ADVICE.to_string()),
            })
        })
        .unwrap_or_else(|| MissionAnalysis {
            summary: ANALYSIS_FALLBACK_SUMMARY.to_string(),
            affection_change: 0,
            npc_mood: NpcMood::Neutral,
            advice: ANALYSIS_FALLBACK_ADVICE.to_string(),
        })
}
