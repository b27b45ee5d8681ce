use poise::serenity_prelude as serenity;

use crate::command::{format_duration, format_relative};
use crate::db;
use crate::{Context, Error};

/// Shows accumulated voice-channel time for a user.
#[poise::command(slash_command, guild_only)]
pub async fn vctime(
    ctx: Context<'_>,
    #[description = "User to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());

    match db::get_entry(&ctx.data().db, &user.id.to_string()).await? {
        Some(entry) => {
            let ago = format_relative(chrono::Utc::now() - entry.last_seen);
            ctx.say(format!(
                "**{}** has spent {} in voice channels. Last seen {}.",
                user.name,
                format_duration(entry.total_seconds),
                ago
            ))
            .await?;
        }
        None => {
            ctx.say(format!("**{}** has no recorded voice time yet.", user.name))
                .await?;
        }
    }

    Ok(())
}
