use lazy_static::lazy_static;
use poise::serenity_prelude::{async_trait, Context, Message, MessageType};
use regex::Regex;
use tokio::time::{sleep, Duration};

use crate::{
    events::{deletion, Plugin},
    Result,
};

/// How long Discord gets to unfurl a post link on its own before the bot
/// steps in. A heuristic, not a synchronization point.
const UNFURL_WAIT: Duration = Duration::from_secs(1);

/// Rewrites twitter.com/x.com post links to vxtwitter.com, path untouched.
pub fn rewrite_post_links(content: &str) -> Vec<String> {
    lazy_static! {
        static ref POST_URL: Regex = Regex::new(r"https://(?:twitter|x)\.com/(\S+)").unwrap();
    }

    POST_URL
        .captures_iter(content)
        .map(|caps| format!("https://vxtwitter.com/{}", &caps[1]))
        .collect()
}

/// Reposts twitter/x links through vxtwitter so a preview renders, unless
/// Discord managed to attach a native one within [`UNFURL_WAIT`].
pub struct PostLinkRewriter;

#[async_trait]
impl Plugin for PostLinkRewriter {
    fn get_name(&self) -> &'static str {
        "post_link_rewriter"
    }

    async fn on_message_created(&self, ctx: &Context, message: &Message) -> Result<()> {
        if message.author.bot {
            return Ok(());
        }
        if !matches!(message.kind, MessageType::Regular | MessageType::InlineReply) {
            return Ok(());
        }

        let urls = rewrite_post_links(&message.content);
        if urls.is_empty() {
            return Ok(());
        }

        sleep(UNFURL_WAIT).await;
        // Gateway messages are snapshots; a native embed only shows up on a
        // fresh fetch.
        let fresh = ctx
            .http
            .get_message(message.channel_id.0, message.id.0)
            .await?;
        if !fresh.embeds.is_empty() {
            return Ok(());
        }

        for url in urls {
            let sent = message.channel_id.say(&ctx.http, &url).await?;
            sent.react(&ctx.http, deletion::delete_reaction()).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twitter_and_x_hosts_are_rewritten() {
        let content = "https://x.com/acme/status/123 https://twitter.com/acme/status/456";
        assert_eq!(
            rewrite_post_links(content),
            vec![
                "https://vxtwitter.com/acme/status/123",
                "https://vxtwitter.com/acme/status/456",
            ]
        );
    }

    #[test]
    fn path_and_query_pass_through_unchanged() {
        assert_eq!(
            rewrite_post_links("https://x.com/acme/status/123?s=20&t=bx0"),
            vec!["https://vxtwitter.com/acme/status/123?s=20&t=bx0"]
        );
    }

    #[test]
    fn other_hosts_are_left_alone() {
        assert!(rewrite_post_links("https://example.com/acme/status/123").is_empty());
        assert!(rewrite_post_links("http://x.com/acme/status/123").is_empty());
    }

    #[test]
    fn bare_hosts_are_left_alone() {
        assert!(rewrite_post_links("https://x.com/ and nothing else").is_empty());
    }

    #[test]
    fn plain_text_yields_nothing() {
        assert!(rewrite_post_links("nothing to see here").is_empty());
    }
}
