use poise::serenity_prelude as serenity;
use rand::seq::SliceRandom;

use crate::{Context, Error};

const KOOL_RESPONSES: &[&str] = &[
    "Yes, you are kool! 😎",
    "Kool status: Confirmed! ✅",
    "Kool as ice! ❄️",
    "The koolest of them all! 👑",
    "100% kool certified! 🏆",
];

const NOT_KOOL_RESPONSES: &[&str] = &[
    "No, you are not kool... yet! 😢",
    "Kool status: Pending... ⏳",
    "Koolness level: Needs improvement 📈",
    "Future kool kid! 🌱",
    "Koolness upgrade available! 💎",
];

/// Checks whether the invoker carries the configured kool role.
#[poise::command(slash_command, guild_only)]
pub async fn amikool(ctx: Context<'_>) -> Result<(), Error> {
    let cool_role = serenity::RoleId::new(ctx.data().config.cool_role_id);

    let has_role = match ctx.author_member().await {
        Some(member) => member.roles.contains(&cool_role),
        None => false,
    };

    let reply = {
        let mut rng = rand::thread_rng();
        let pool = if has_role {
            KOOL_RESPONSES
        } else {
            NOT_KOOL_RESPONSES
        };
        *pool.choose(&mut rng).unwrap_or(&pool[0])
    };

    ctx.say(reply).await?;
    Ok(())
}
