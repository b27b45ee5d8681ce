use poise::serenity_prelude as serenity;

use crate::command::format_relative;
use crate::db;
use crate::{Context, Error};

/// Shows when a user was last seen in a voice channel.
#[poise::command(slash_command, guild_only)]
pub async fn seen(
    ctx: Context<'_>,
    #[description = "The user to check"] user: serenity::User,
) -> Result<(), Error> {
    if ctx.data().tracker.registry().is_tracking(user.id.get()) {
        ctx.say(format!("{} is in a voice channel right now.", user.name))
            .await?;
        return Ok(());
    }

    match db::get_entry(&ctx.data().db, &user.id.to_string()).await? {
        Some(entry) => {
            let ago = format_relative(chrono::Utc::now() - entry.last_seen);
            ctx.say(format!(
                "{} was last seen in a voice channel {}.",
                user.name, ago
            ))
            .await?;
        }
        None => {
            ctx.say(format!(
                "{} has never been seen in a voice channel.",
                user.name
            ))
            .await?;
        }
    }

    Ok(())
}
