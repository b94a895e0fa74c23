/// The user-visible command surface
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "snake_case",
    description = "Here are the available commands:"
)]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,

    #[command(description = "Show your playlists")]
    ShowPlaylists,

    #[command(description = "Get the next video (random or by position in /show_playlists)")]
    Next(String),

    #[command(description = "Delete a playlist by its position")]
    DeletePlaylist,

    #[command(description = "Restart a playlist by its position")]
    Restart,

    #[command(description = "Show your statistics")]
    Stat,

    #[command(description = "Cancel the pending action")]
    Cancel,

    #[command(description = "Show available commands")]
    Help,
}
