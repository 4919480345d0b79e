use poise::serenity_prelude::{
    async_trait, Channel, ChannelId, ChannelType, Context, Message, Reaction,
};

use crate::{ctx_data::CtxData, Error, Result};

mod deletion;
mod link_rewrite;
mod message_links;

use self::{
    deletion::RepostDeleter, link_rewrite::PostLinkRewriter, message_links::MessageLinkExpander,
};

pub async fn handle_event(
    ctx: &Context,
    event: &poise::Event<'_>,
    _framework: poise::FrameworkContext<'_, CtxData, Error>,
    data: &CtxData,
) -> Result<()> {
    data.plugins.handle(ctx, event).await
}

#[async_trait]
pub trait Plugin: Send + Sync {
    fn get_name(&self) -> &'static str;

    async fn on_message_created(&self, _ctx: &Context, _message: &Message) -> Result<()> {
        Ok(())
    }

    async fn on_reaction_added(&self, _ctx: &Context, _reaction: &Reaction) -> Result<()> {
        Ok(())
    }
}

pub struct Plugins {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Plugins {
    pub fn new() -> Self {
        Self {
            plugins: vec![
                Box::new(MessageLinkExpander),
                Box::new(PostLinkRewriter),
                Box::new(RepostDeleter),
            ],
        }
    }

    pub async fn handle(&self, ctx: &Context, event: &poise::Event<'_>) -> Result<()> {
        match event {
            poise::Event::Message { new_message } => {
                for plugin in &self.plugins {
                    plugin
                        .on_message_created(ctx, new_message)
                        .await
                        .map_err(|e| format!("{}: {e}", plugin.get_name()))?;
                }
            }
            poise::Event::ReactionAdd { add_reaction } => {
                for plugin in &self.plugins {
                    plugin
                        .on_reaction_added(ctx, add_reaction)
                        .await
                        .map_err(|e| format!("{}: {e}", plugin.get_name()))?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}

async fn resolve_channel(ctx: &Context, channel_id: ChannelId) -> Result<Channel> {
    match ctx.cache.channel(channel_id) {
        Some(channel) => Ok(channel),
        None => Ok(ctx.http.get_channel(channel_id.0).await?),
    }
}

fn is_previewable_channel(kind: ChannelType) -> bool {
    matches!(
        kind,
        ChannelType::Text
            | ChannelType::News
            | ChannelType::Voice
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
            | ChannelType::NewsThread
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_channels_are_previewable() {
        for kind in [
            ChannelType::Text,
            ChannelType::News,
            ChannelType::Voice,
            ChannelType::PublicThread,
            ChannelType::PrivateThread,
            ChannelType::NewsThread,
        ] {
            assert!(is_previewable_channel(kind), "{kind:?}");
        }
    }

    #[test]
    fn structural_channels_are_not_previewable() {
        for kind in [ChannelType::Category, ChannelType::Forum, ChannelType::Stage] {
            assert!(!is_previewable_channel(kind), "{kind:?}");
        }
    }
}
