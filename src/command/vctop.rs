use crate::command::format_duration;
use crate::db;
use crate::{Context, Error};

const DEFAULT_LIMIT: u8 = 10;

/// Shows the all-time voice channel rankings.
#[poise::command(slash_command, guild_only)]
pub async fn vctop(
    ctx: Context<'_>,
    #[description = "Number of users to show (default: 10)"]
    #[min = 1]
    #[max = 25]
    limit: Option<u8>,
) -> Result<(), Error> {
    let limit = i64::from(limit.unwrap_or(DEFAULT_LIMIT));

    let entries = db::top_entries(&ctx.data().db, limit).await?;
    if entries.is_empty() {
        ctx.say("No voice channel statistics available yet.").await?;
        return Ok(());
    }

    let mut response = String::from("**All-Time Voice Channel Rankings**\n");
    for (index, entry) in entries.iter().enumerate() {
        let rank = index + 1;
        let medal = match rank {
            1 => "🥇".to_string(),
            2 => "🥈".to_string(),
            3 => "🥉".to_string(),
            n => format!("{}.", n),
        };
        response.push_str(&format!(
            "{} <@{}>: {}\n",
            medal,
            entry.user_id,
            format_duration(entry.total_seconds)
        ));
    }

    ctx.say(response).await?;
    Ok(())
}
