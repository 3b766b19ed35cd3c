//! Prompt templates for ticket classification.

/// Classification directive.
///
/// Asks the model for strict JSON with the fields understood by the normalizer.
pub const CLASSIFICATION_DIRECTIVE: &str = "次のチケット内容を分析し、厳密なJSONのみで返答してください。
日本語で、以下のキーを必ず含めてください: label, reason, confidence, action, title, related。
- label: 分類ラベル（例: '問い合わせ' / '障害対応' / 'その他' など任意）
- reason: その分類にした理由。省略せず、根拠（症状・影響範囲・再現条件・関連コンポーネント等）を具体的に記述。最低でも150文字以上、可能なら200〜400文字程度。
- action: 推奨される対応方法。調査手順・暫定回避策・恒久対策の順で箇条書き風に簡潔に。
- confidence: 0.0〜1.0 の信頼度（数値）
- title: チケット内容からユーザーにとって分かりやすく、関連も想起しやすい分類タイトル（短く明確に）
- related: titleに関連する語やラベルを3〜6個の配列で（例: ['サービス停止','復旧対応',...]）
他の文字やマークダウン、説明は一切出力しないでください。
";

/// Example output appended after the ticket.
pub const EXAMPLE_OUTPUT: &str = r#"出力例: {"label": "障害対応", "reason": "ログイン処理で…", "confidence": 0.82, "action": "1) ログ採取...", "title": "インシデント / 障害対応", "related": ["サービス停止", "エラー調査", "復旧対応"]}"#;

/// Build the full instruction prompt for one (already trimmed) ticket.
pub fn build_prompt(ticket: &str) -> String {
    format!("{CLASSIFICATION_DIRECTIVE}チケット内容: '{ticket}'\n{EXAMPLE_OUTPUT}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_ticket_verbatim() {
        let ticket = "billing issue, cannot pay invoice";
        let prompt = build_prompt(ticket);

        assert!(prompt.contains("チケット内容: 'billing issue, cannot pay invoice'"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let ticket = "ログインできません {\"weird\": true}";

        assert_eq!(build_prompt(ticket), build_prompt(ticket));
    }

    #[test]
    fn test_prompt_names_every_field() {
        let prompt = build_prompt("x");

        for field in ["label", "reason", "confidence", "action", "title", "related"] {
            assert!(prompt.contains(&format!("- {field}:")), "missing field `{field}`");
        }

        assert!(prompt.starts_with("次のチケット内容を分析し、厳密なJSONのみで返答してください。"));
        assert!(prompt.ends_with(EXAMPLE_OUTPUT));
    }
}
