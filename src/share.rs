// Result sharing: the text players paste or post, and the X intent URL.

use crate::game::Rank;

pub const TWEET_INTENT_URL: &str = "https://twitter.com/intent/tweet";

pub const COPY_OK_NOTICE: &str =
    "結果をクリップボードにコピーしました！\nそのままSNSにペーストしてシェアしてね✨";
pub const COPY_FAILED_NOTICE: &str = "コピーに失敗しました。お手数ですが手動でシェアしてください。";

pub fn share_text(score: u32, share_url: &str) -> String {
    format!(
        "🎮 反射神経ゲーム結果：\nスコア：{}点（{}）でクリア！\n👉 {}",
        score,
        Rank::from_score(score).label(),
        share_url
    )
}

/// Intent URL with the share text percent-encoded into the `text` parameter.
pub fn intent_url(text: &str) -> String {
    format!("{}?text={}", TWEET_INTENT_URL, urlencoding::encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_text_carries_score_rank_and_url() {
        let text = share_text(1000, "https://example.com/play");
        assert!(text.starts_with("🎮 "));
        assert!(text.contains("スコア：1000点（Bランク 👍）"));
        assert!(text.ends_with("👉 https://example.com/play"));
    }

    #[test]
    fn test_intent_url_is_percent_encoded() {
        let url = intent_url("a b\n&c");
        assert_eq!(url, "https://twitter.com/intent/tweet?text=a%20b%0A%26c");
        let url = intent_url(&share_text(0, "https://x.y"));
        assert!(!url[TWEET_INTENT_URL.len()..].contains(' '));
        assert!(url.contains("https%3A%2F%2Fx.y"));
    }
}
