//! Message and command handlers
//!
//! Every handler resolves the sender to a user record first (explicit
//! context, one lookup per inbound message), then drives the storage
//! and extraction layers. Storage and extraction failures stop here:
//! they are logged and answered with one sentence, never propagated
//! into the transport layer.

use std::sync::Arc;

use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use watchq_core::types::{NewItem, NewPlaylist, PlaylistId, UserId};
use watchq_extract::MediaKind;

use crate::commands::Command;
use crate::error::Result;
use crate::render;
use crate::state::{AppState, PendingAction};

const INTERNAL_ERROR: &str = "🔴 Internal error. Please try again.";
const NOT_RECOGNIZED: &str = "That link is not a recognized video or playlist";

/// Identity context resolved once per inbound message
#[derive(Debug, Clone, Copy)]
struct UserContext {
    user_id: UserId,
    default_playlist_id: PlaylistId,
}

impl UserContext {
    async fn resolve(
        pool: &SqlitePool,
        tg_user: &teloxide::types::User,
    ) -> std::result::Result<Self, watchq_storage::StorageError> {
        let user_id = watchq_storage::users::ensure(
            pool,
            tg_user.id.0 as i64,
            tg_user.username.as_deref(),
        )
        .await?;
        let default_playlist_id =
            watchq_storage::playlists::ensure_default(pool, user_id).await?;

        Ok(Self {
            user_id,
            default_playlist_id,
        })
    }
}

/// Resolve the sender, replying with a generic error on failure.
///
/// Returns `None` for messages without a sender and when resolution
/// failed (the user was already told).
async fn require_user(bot: &Bot, msg: &Message, pool: &SqlitePool) -> Result<Option<UserContext>> {
    let Some(tg_user) = msg.from() else {
        return Ok(None);
    };

    match UserContext::resolve(pool, tg_user).await {
        Ok(ctx) => Ok(Some(ctx)),
        Err(err) => {
            tracing::error!(error = %err, "failed to resolve user");
            bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
            Ok(None)
        }
    }
}

/// Route a parsed command
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> Result<()> {
    match cmd {
        Command::Start => start(bot, msg, state).await,
        Command::ShowPlaylists => show_playlists(bot, msg, state).await,
        Command::Next(arg) => next_video(bot, msg, state, arg).await,
        Command::DeletePlaylist => arm_confirmation(bot, msg, state, PendingAction::Delete).await,
        Command::Restart => arm_confirmation(bot, msg, state, PendingAction::Restart).await,
        Command::Stat => stat(bot, msg, state).await,
        Command::Cancel => cancel(bot, msg, state).await,
        Command::Help => help(bot, msg).await,
    }
}

async fn start(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };

    let name = msg
        .from()
        .and_then(|u| u.username.clone())
        .map_or_else(|| "there".to_string(), |u| format!("@{u}"));

    tracing::info!(user_id = ctx.user_id, "user started the bot");
    bot.send_message(
        msg.chat.id,
        format!("Hi, {name}! Send me a YouTube video or playlist link to start\nUse /help for the command list"),
    )
    .await?;
    Ok(())
}

async fn help(bot: Bot, msg: Message) -> Result<()> {
    use teloxide::utils::command::BotCommands;
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// A raw message that matched the watch-link pattern
pub async fn ingest_link(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };
    let Some(link) = msg.text().map(str::trim) else {
        return Ok(());
    };

    let kind = match state.extractor.classify(link).await {
        Ok(kind) => kind,
        Err(err) => {
            tracing::error!(error = %err, link, "classification failed");
            bot.send_message(msg.chat.id, NOT_RECOGNIZED).await?;
            return Ok(());
        }
    };

    match kind {
        MediaKind::Playlist => ingest_playlist(&bot, &msg, &state, ctx, link).await,
        MediaKind::Video => ingest_video(&bot, &msg, &state, ctx, link).await,
        MediaKind::Unknown => {
            tracing::warn!(link, "link is neither a video nor a playlist");
            bot.send_message(msg.chat.id, NOT_RECOGNIZED).await?;
            Ok(())
        }
    }
}

async fn ingest_playlist(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    ctx: UserContext,
    link: &str,
) -> Result<()> {
    let info = match state.extractor.fetch_playlist(link).await {
        Ok(info) => info,
        Err(err) => {
            tracing::error!(error = %err, link, "playlist extraction failed");
            bot.send_message(msg.chat.id, NOT_RECOGNIZED).await?;
            return Ok(());
        }
    };

    let items: Vec<NewItem> = info
        .entries
        .into_iter()
        .map(|e| NewItem {
            position: Some(e.position),
            title: e.title,
            url: e.url,
            duration_sec: e.duration_sec,
        })
        .collect();

    let created = watchq_storage::playlists::create_with_items(
        &state.pool,
        ctx.user_id,
        &NewPlaylist {
            source_url: info.source_url,
            title: info.title,
            total_duration_sec: info.total_duration_sec,
        },
        &items,
    )
    .await;

    match created {
        Ok(Some(playlist_id)) => {
            tracing::info!(user_id = ctx.user_id, playlist_id, items = items.len(), "playlist saved");
            bot.send_message(msg.chat.id, "Playlist saved").await?;
        }
        Ok(None) => {
            bot.send_message(msg.chat.id, "This playlist is already saved")
                .await?;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to save playlist");
            bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
        }
    }
    Ok(())
}

async fn ingest_video(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    ctx: UserContext,
    link: &str,
) -> Result<()> {
    // Single-item extraction failures degrade to a placeholder title
    // instead of aborting
    let video = match state.extractor.fetch_video(link).await {
        Ok(video) => video,
        Err(err) => {
            tracing::warn!(error = %err, link, "video extraction failed, storing the bare link");
            watchq_extract::VideoInfo {
                title: None,
                url: link.to_string(),
                duration_sec: None,
            }
        }
    };

    let item = NewItem {
        position: None,
        title: video.title.clone(),
        url: video.url,
        duration_sec: video.duration_sec,
    };

    let added = watchq_storage::items::add(&state.pool, ctx.default_playlist_id, &item).await;
    if let Err(err) = added {
        tracing::error!(error = %err, "failed to save video");
        bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
        return Ok(());
    }

    // A finished default playlist opens back up for the new item
    if let Err(err) = watchq_storage::playlists::reopen_if_has_pending(
        &state.pool,
        ctx.default_playlist_id,
        ctx.user_id,
    )
    .await
    {
        tracing::error!(error = %err, "failed to reopen default playlist");
    }

    let title = video.title.unwrap_or_else(|| "video".to_string());
    bot.send_message(
        msg.chat.id,
        format!("Video: 🎥 {title}\nadded to your saved videos"),
    )
    .await?;
    Ok(())
}

async fn show_playlists(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };

    match watchq_storage::playlists::overview(&state.pool, ctx.user_id).await {
        Ok(playlists) => {
            bot.send_message(msg.chat.id, render::playlists_text(&playlists))
                .parse_mode(ParseMode::Html)
                .disable_web_page_preview(true)
                .await?;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch playlists");
            bot.send_message(msg.chat.id, "🔴 Failed to fetch playlists.")
                .await?;
        }
    }
    Ok(())
}

/// Serve the next pending video, from the playlist at the given display
/// position or from a random ready playlist
async fn next_video(bot: Bot, msg: Message, state: Arc<AppState>, arg: String) -> Result<()> {
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };

    let arg = arg.trim();
    let mut playlist_id = None;

    if !arg.is_empty() {
        let Ok(position) = arg.parse::<i64>() else {
            bot.send_message(msg.chat.id, "Playlist number must be an integer")
                .await?;
            return Ok(());
        };
        playlist_id = match watchq_storage::playlists::resolve_position(
            &state.pool,
            ctx.user_id,
            position,
        )
        .await
        {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(error = %err, "failed to resolve playlist position");
                bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
                return Ok(());
            }
        };
    }

    let playlist_id = match playlist_id {
        Some(id) => Some(id),
        None => {
            match watchq_storage::playlists::pick_random_ready(&state.pool, ctx.user_id).await {
                Ok(id) => id,
                Err(err) => {
                    tracing::error!(error = %err, "failed to pick a playlist");
                    bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
                    return Ok(());
                }
            }
        }
    };

    let Some(playlist_id) = playlist_id else {
        bot.send_message(msg.chat.id, "No playlists with pending videos")
            .await?;
        return Ok(());
    };

    serve_next(&bot, &msg, &state, ctx, playlist_id).await
}

/// The serving step shared by every /next path: send the link, mark the
/// item done, stamp the serve time, and announce completion when the
/// playlist just drained.
async fn serve_next(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    ctx: UserContext,
    playlist_id: PlaylistId,
) -> Result<()> {
    let next =
        match watchq_storage::items::find_next_pending(&state.pool, playlist_id, ctx.user_id).await
        {
            Ok(next) => next,
            Err(err) => {
                tracing::error!(error = %err, "failed to query next item");
                bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
                return Ok(());
            }
        };

    let Some(next) = next else {
        bot.send_message(msg.chat.id, "No pending videos in this playlist. Try again")
            .await?;
        return Ok(());
    };

    bot.send_message(msg.chat.id, next.url.clone()).await?;

    match watchq_storage::items::mark_done(&state.pool, next.id, playlist_id, ctx.user_id).await {
        Ok(true) => tracing::info!(item_id = next.id, playlist_id, "item served and marked done"),
        Ok(false) => tracing::warn!(item_id = next.id, playlist_id, "served item did not update"),
        Err(err) => tracing::error!(error = %err, "failed to mark item done"),
    }

    match watchq_storage::playlists::touch_last_served(&state.pool, playlist_id, ctx.user_id).await
    {
        Ok(_) => {}
        Err(err) => tracing::error!(error = %err, "failed to stamp last served time"),
    }

    match watchq_storage::playlists::mark_done_if_finished(&state.pool, playlist_id, ctx.user_id)
        .await
    {
        Ok(true) => {
            tracing::info!(playlist_id, "playlist finished");
            bot.send_message(msg.chat.id, "Playlist has been marked as done!")
                .await?;
        }
        Ok(false) => {}
        Err(err) => tracing::error!(error = %err, "failed to check playlist completion"),
    }

    Ok(())
}

async fn stat(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };

    match watchq_storage::stats::for_user(&state.pool, ctx.user_id).await {
        Ok(stats) => {
            bot.send_message(msg.chat.id, render::stats_text(&stats))
                .await?;
            tracing::info!(user_id = ctx.user_id, "stats delivered");
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to compute stats");
            bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
        }
    }
    Ok(())
}

/// First step of a destructive command: show the numbered listing and
/// wait for the user to answer with a position
async fn arm_confirmation(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
    action: PendingAction,
) -> Result<()> {
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };

    let playlists = match watchq_storage::playlists::overview(&state.pool, ctx.user_id).await {
        Ok(playlists) => playlists,
        Err(err) => {
            tracing::error!(error = %err, "failed to fetch playlists");
            bot.send_message(msg.chat.id, "🔴 Failed to fetch playlists.")
                .await?;
            return Ok(());
        }
    };

    let instruction = match action {
        PendingAction::Delete => "🗑️ To delete a playlist send its number\n✋🏻 To cancel send /cancel\n",
        PendingAction::Restart => "🔄 To restart a playlist send its number\n✋🏻 To cancel send /cancel\n",
    };

    state.arm(msg.chat.id, action).await;

    bot.send_message(
        msg.chat.id,
        format!("{instruction}{}", render::playlists_text(&playlists)),
    )
    .parse_mode(ParseMode::Html)
    .disable_web_page_preview(true)
    .await?;
    Ok(())
}

/// Second step of a destructive command: the armed chat answered with
/// (hopefully) a playlist number
pub async fn pending_reply(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let Some(action) = state.pending(msg.chat.id).await else {
        return Ok(());
    };
    let Some(ctx) = require_user(&bot, &msg, &state.pool).await? else {
        return Ok(());
    };

    let answer = msg.text().unwrap_or_default().trim();
    let Ok(position) = answer.parse::<i64>() else {
        // Keep the flag armed so the user can retry
        bot.send_message(msg.chat.id, "Please send the NUMBER of the playlist, or /cancel.")
            .await?;
        return Ok(());
    };

    state.take_pending(msg.chat.id).await;

    let playlist_id = match watchq_storage::playlists::resolve_position(
        &state.pool,
        ctx.user_id,
        position,
    )
    .await
    {
        Ok(id) => id,
        Err(err) => {
            tracing::error!(error = %err, "failed to resolve playlist position");
            bot.send_message(msg.chat.id, INTERNAL_ERROR).await?;
            return Ok(());
        }
    };

    let Some(playlist_id) = playlist_id else {
        bot.send_message(msg.chat.id, "No playlist found by that number.")
            .await?;
        return Ok(());
    };

    match action {
        PendingAction::Delete => delete_playlist(&bot, &msg, &state, ctx, playlist_id).await,
        PendingAction::Restart => restart_playlist(&bot, &msg, &state, ctx, playlist_id).await,
    }
}

async fn delete_playlist(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    ctx: UserContext,
    playlist_id: PlaylistId,
) -> Result<()> {
    match watchq_storage::playlists::delete(&state.pool, playlist_id, ctx.user_id).await {
        Ok(Some(deleted)) => {
            tracing::info!(playlist_id = deleted.id, title = ?deleted.title, "playlist deleted");
            bot.send_message(msg.chat.id, render::deleted_text(&deleted))
                .parse_mode(ParseMode::Html)
                .disable_web_page_preview(true)
                .await?;
        }
        Ok(None) => {
            bot.send_message(msg.chat.id, "Nothing to delete (already removed?).")
                .await?;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to delete playlist");
            bot.send_message(msg.chat.id, "🔴 Failed to delete the playlist.")
                .await?;
        }
    }
    Ok(())
}

async fn restart_playlist(
    bot: &Bot,
    msg: &Message,
    state: &AppState,
    ctx: UserContext,
    playlist_id: PlaylistId,
) -> Result<()> {
    match watchq_storage::playlists::restart(&state.pool, playlist_id, ctx.user_id).await {
        Ok(outcome) => {
            tracing::info!(playlist_id, ?outcome, "playlist restart handled");
            bot.send_message(msg.chat.id, render::restart_text(outcome))
                .await?;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to restart playlist");
            bot.send_message(msg.chat.id, "🔴 Internal error while restarting the playlist.")
                .await?;
        }
    }
    Ok(())
}

async fn cancel(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let reply = match state.take_pending(msg.chat.id).await {
        Some(PendingAction::Delete) => "Deletion cancelled.",
        Some(PendingAction::Restart) => "Restart cancelled.",
        None => "Nothing to cancel.",
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
