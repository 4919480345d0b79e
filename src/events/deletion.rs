use anyhow::anyhow;
use poise::serenity_prelude::{async_trait, Channel, Context, Reaction, ReactionType};

use crate::{
    events::{is_previewable_channel, resolve_channel, Plugin},
    Result,
};

/// Wastebasket glyph users react with to take a repost down.
pub const DELETE_REACTION_EMOJI: &str = "\u{1F5D1}";

pub fn delete_reaction() -> ReactionType {
    ReactionType::Unicode(DELETE_REACTION_EMOJI.to_string())
}

/// Deletes a repost when a user flags it with the wastebasket reaction.
///
/// Only messages the bot itself authored are eligible, and only when they
/// carry at least one embed, so reacting to unrelated messages does nothing.
pub struct RepostDeleter;

#[async_trait]
impl Plugin for RepostDeleter {
    fn get_name(&self) -> &'static str {
        "repost_deleter"
    }

    async fn on_reaction_added(&self, ctx: &Context, reaction: &Reaction) -> Result<()> {
        if !is_delete_reaction(&reaction.emoji) {
            return Ok(());
        }

        let bot_id = ctx.cache.current_user().id;
        if reaction.user_id == Some(bot_id) {
            // the reaction the bot attaches to its own repost
            return Ok(());
        }

        let channel = match resolve_channel(ctx, reaction.channel_id).await? {
            Channel::Guild(channel) if is_previewable_channel(channel.kind) => channel,
            other => return Err(anyhow!("Unknown channel type: {other:?}").into()),
        };

        let message = channel.id.message(&ctx.http, reaction.message_id).await?;
        if message.author.id != bot_id {
            return Ok(());
        }
        if message.embeds.is_empty() {
            return Ok(());
        }

        message.delete(&ctx.http).await?;

        Ok(())
    }
}

fn is_delete_reaction(emoji: &ReactionType) -> bool {
    emoji.unicode_eq(DELETE_REACTION_EMOJI)
}

#[cfg(test)]
mod tests {
    use poise::serenity_prelude::EmojiId;

    use super::*;

    #[test]
    fn wastebasket_is_the_delete_reaction() {
        assert!(is_delete_reaction(&ReactionType::Unicode("🗑".to_string())));
    }

    #[test]
    fn other_unicode_reactions_are_ignored() {
        assert!(!is_delete_reaction(&ReactionType::Unicode("👍".to_string())));
    }

    #[test]
    fn custom_emoji_reactions_are_ignored() {
        let emoji = ReactionType::Custom {
            animated: false,
            id: EmojiId(285619986453135360),
            name: Some("trash".to_string()),
        };
        assert!(!is_delete_reaction(&emoji));
    }
}
