use itertools::Itertools;
use lazy_static::lazy_static;
use poise::serenity_prelude::{
    async_trait, ChannelId, Context, CreateEmbed, GuildChannel, GuildId, Message, MessageId,
    MessageType, UserId,
};
use regex::Regex;

use crate::{
    events::{deletion, is_previewable_channel, resolve_channel, Plugin},
    utils::get_nick_from_user,
    Result,
};

/// Coordinates parsed out of a message link.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageLink {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub message: MessageId,
}

/// Extracts message-link coordinates from message text, left to right.
pub fn parse_message_links(content: &str) -> impl Iterator<Item = MessageLink> + '_ {
    lazy_static! {
        static ref MESSAGE_URL: Regex = Regex::new(
            r"https://(?:ptb\.|canary\.)?discord(?:app)?\.com/channels/([0-9]{17,20})/([0-9]{17,20})/([0-9]{17,20})"
        )
        .unwrap();
    }

    MESSAGE_URL.captures_iter(content).filter_map(|caps| {
        Some(MessageLink {
            guild: GuildId(caps[1].parse().ok()?),
            channel: ChannelId(caps[2].parse().ok()?),
            message: MessageId(caps[3].parse().ok()?),
        })
    })
}

/// Reposts messages linked from the same guild as rich embeds.
///
/// Cross-guild links are dropped, as are links into channels the bot cannot
/// read previews from. The first repost gets the wastebasket reaction and an
/// author link that records where the expansion came from.
pub struct MessageLinkExpander;

#[async_trait]
impl Plugin for MessageLinkExpander {
    fn get_name(&self) -> &'static str {
        "message_link_expander"
    }

    async fn on_message_created(&self, ctx: &Context, message: &Message) -> Result<()> {
        if message.author.bot {
            return Ok(());
        }
        if !matches!(message.kind, MessageType::Regular | MessageType::InlineReply) {
            return Ok(());
        }
        let Some(guild_id) = message.guild_id else {
            return Ok(());
        };

        for link in parse_message_links(&message.content) {
            if link.guild != guild_id {
                continue;
            }
            let Some(channel) = resolve_channel(ctx, link.channel).await?.guild() else {
                continue;
            };
            if !is_previewable_channel(channel.kind) {
                continue;
            }

            let mut target = channel.id.message(&ctx.http, link.message).await?;
            // REST messages come back without a guild id, which breaks link()
            target.guild_id = Some(link.guild);
            expand(ctx, message, &channel, &target).await?;
        }

        Ok(())
    }
}

async fn expand(
    ctx: &Context,
    inbound: &Message,
    origin: &GuildChannel,
    target: &Message,
) -> Result<()> {
    let mut sent: Vec<Message> = Vec::new();

    if !target.content.is_empty() || !target.attachments.is_empty() {
        let embed = preview_embed(ctx, target, origin).await;
        let message = inbound
            .channel_id
            .send_message(&ctx.http, |m| m.set_embed(embed))
            .await?;
        sent.push(message);
    }

    for attachment in target.attachments.iter().skip(1) {
        let message = inbound
            .channel_id
            .send_message(&ctx.http, |m| m.embed(|e| e.image(&attachment.proxy_url)))
            .await?;
        sent.push(message);
    }

    for embed in &target.embeds {
        let message = inbound
            .channel_id
            .send_message(&ctx.http, |m| m.set_embed(CreateEmbed::from(embed.clone())))
            .await?;
        sent.push(message);
    }

    if sent.is_empty() {
        return Ok(());
    }

    let sent_ids = sent.iter().map(|message| message.id).collect::<Vec<_>>();
    let jump_url = audit_jump_url(&target.link(), target.author.id, inbound.author.id, &sent_ids);

    let top = &mut sent[0];
    top.react(&ctx.http, deletion::delete_reaction()).await?;

    let source = top.embeds.first().cloned();
    top.edit(&ctx.http, |m| {
        let mut embed = source
            .clone()
            .map(CreateEmbed::from)
            .unwrap_or_default();
        let author = source.and_then(|embed| embed.author);
        embed.author(|a| {
            if let Some(author) = author {
                a.name(author.name);
                if let Some(icon_url) = author.icon_url {
                    a.icon_url(icon_url);
                }
            }
            a.url(&jump_url)
        });
        m.set_embed(embed)
    })
    .await?;

    Ok(())
}

async fn preview_embed(ctx: &Context, target: &Message, origin: &GuildChannel) -> CreateEmbed {
    let author_name = get_nick_from_user(ctx, origin.guild_id, &target.author).await;
    let guild_icon = ctx
        .cache
        .guild(origin.guild_id)
        .and_then(|guild| guild.icon_url());

    let mut embed = CreateEmbed::default();
    embed
        .description(&target.content)
        .timestamp(target.timestamp)
        .author(|a| {
            a.name(author_name)
                .icon_url(target.author.face())
                .url(target.link())
        })
        .footer(|f| {
            f.text(&origin.name);
            if let Some(icon_url) = guild_icon {
                f.icon_url(icon_url);
            }
            f
        });
    if let Some(attachment) = target.attachments.first() {
        embed.image(&attachment.proxy_url);
    }

    embed
}

/// Jump link back to the expanded message, with a write-only audit trail of
/// the author pair and every repost produced for it.
fn audit_jump_url(
    jump_url: &str,
    target_author: UserId,
    inbound_author: UserId,
    sent: &[MessageId],
) -> String {
    let extra = sent.iter().map(|id| id.0).join(",");
    format!("{jump_url}?base_aid={target_author}&aid={inbound_author}&extra={extra}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_yields_no_links() {
        assert_eq!(parse_message_links("nothing to see here").count(), 0);
    }

    #[test]
    fn message_link_is_parsed() {
        let content = "see https://discord.com/channels/267624335836053506/381870553235193857/806800208679550986 !";
        let links = parse_message_links(content).collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![MessageLink {
                guild: GuildId(267624335836053506),
                channel: ChannelId(381870553235193857),
                message: MessageId(806800208679550986),
            }]
        );
    }

    #[test]
    fn alternate_hosts_are_parsed() {
        for host in ["ptb.discord.com", "canary.discord.com", "discordapp.com"] {
            let content = format!(
                "https://{host}/channels/267624335836053506/381870553235193857/806800208679550986"
            );
            assert_eq!(parse_message_links(&content).count(), 1, "{host}");
        }
    }

    #[test]
    fn short_ids_are_rejected() {
        let content = "https://discord.com/channels/1234/5678/9012";
        assert_eq!(parse_message_links(content).count(), 0);
    }

    #[test]
    fn links_are_parsed_left_to_right() {
        let content = "https://discord.com/channels/267624335836053506/381870553235193857/806800208679550986 \
                       https://discord.com/channels/267624335836053506/381870553235193857/828051507562348585";
        let messages = parse_message_links(content)
            .map(|link| link.message)
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![MessageId(806800208679550986), MessageId(828051507562348585)]
        );
    }

    #[test]
    fn extraction_is_restartable() {
        let content =
            "https://discord.com/channels/267624335836053506/381870553235193857/806800208679550986";
        assert_eq!(parse_message_links(content).count(), 1);
        assert_eq!(parse_message_links(content).count(), 1);
    }

    #[test]
    fn audit_jump_url_records_authors_and_reposts() {
        let url = audit_jump_url(
            "https://discord.com/channels/1/2/3",
            UserId(11),
            UserId(22),
            &[MessageId(33), MessageId(44)],
        );
        assert_eq!(
            url,
            "https://discord.com/channels/1/2/3?base_aid=11&aid=22&extra=33,44"
        );
    }
}
