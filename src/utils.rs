use poise::serenity_prelude::{Context, GuildId, User};

pub async fn get_nick_from_user(ctx: &Context, guild_id: GuildId, user: &User) -> String {
    let guild_nick = user.nick_in(ctx, guild_id).await;
    guild_nick.unwrap_or_else(|| user.name.clone())
}
