//! Main handler for bot mentions.

use log::{debug, error, info};
use poise::serenity_prelude::{Context, Message as SerenityMessage, UserId};

use crate::bot::Data;
use crate::error::{BotError, Result};
use crate::intent::Intent;

use super::response::{send_chat_reply, send_image_reply, send_speech_reply};

/// Greeting sent when the bot is mentioned with no other text.
const GREETING: &str = "Hello, Friend";

/// Main handler for messages that mention the bot.
///
/// Each event is handled statelessly: a capability or send failure in one
/// branch is converted into an apology reply here and never affects later
/// events.
pub async fn handle_mention(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    bot_user_id: UserId,
) -> Result<()> {
    if new_message.author.bot || !new_message.mentions_user_id(bot_user_id) {
        return Ok(());
    }

    info!(
        "Received message from {} in channel {}: {}",
        new_message.author.tag(),
        new_message.channel_id,
        new_message.content
    );

    let prompt = strip_mention(&new_message.content, bot_user_id);
    if prompt.is_empty() {
        new_message.reply(&ctx.http, GREETING).await?;
        return Ok(());
    }

    if let Err(e) = new_message.channel_id.broadcast_typing(&ctx.http).await {
        debug!("Failed to broadcast typing indicator: {e}");
    }

    let intent = Intent::classify(&prompt);
    debug!("Classified prompt as {} request", intent);

    let outcome = match &intent {
        Intent::Image(argument) => dispatch_image(ctx, new_message, data, argument).await,
        Intent::Speech(argument) => dispatch_speech(ctx, new_message, data, argument).await,
        Intent::Chat(argument) => dispatch_chat(ctx, new_message, data, argument).await,
    };

    if let Err(e) = outcome {
        error!(
            "{} request from {} failed: {}",
            intent,
            new_message.author.tag(),
            e
        );
        new_message.reply(&ctx.http, apology(&intent, &e)).await?;
    }

    Ok(())
}

async fn dispatch_image(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    prompt: &str,
) -> Result<()> {
    let image_url = data.navy_client().generate_image(prompt).await?;
    send_image_reply(ctx, new_message, &image_url).await
}

async fn dispatch_speech(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    text: &str,
) -> Result<()> {
    let audio = data.navy_client().synthesize_speech(text).await?;
    send_speech_reply(ctx, new_message, audio).await
}

async fn dispatch_chat(
    ctx: &Context,
    new_message: &SerenityMessage,
    data: &Data,
    prompt: &str,
) -> Result<()> {
    let reply = data.navy_client().chat_complete(prompt).await?;
    send_chat_reply(ctx, new_message, &reply).await
}

/// Remove the bot's mention token (plain and nickname forms) and trim.
fn strip_mention(content: &str, bot_user_id: UserId) -> String {
    content
        .replace(&format!("<@{bot_user_id}>"), "")
        .replace(&format!("<@!{bot_user_id}>"), "")
        .trim()
        .to_string()
}

/// User-visible apology for a failed branch.
fn apology(intent: &Intent, error: &BotError) -> &'static str {
    match intent {
        Intent::Image(_) => "Failed to generate the image.",
        Intent::Speech(_) => "Failed to say something.",
        Intent::Chat(_) => match error {
            BotError::MalformedResponse(_) => "Sorry, I didn't understand the response.",
            _ => "Something went wrong while responding.",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_ID: u64 = 1234567890;

    #[test]
    fn strips_plain_mention() {
        let content = format!("<@{BOT_ID}> imagine a cat");
        assert_eq!(strip_mention(&content, UserId::new(BOT_ID)), "imagine a cat");
    }

    #[test]
    fn strips_nickname_mention() {
        let content = format!("<@!{BOT_ID}> say hello");
        assert_eq!(strip_mention(&content, UserId::new(BOT_ID)), "say hello");
    }

    #[test]
    fn strips_interior_mention() {
        let content = format!("hey <@{BOT_ID}> what is 2+2");
        assert_eq!(strip_mention(&content, UserId::new(BOT_ID)), "hey  what is 2+2");
    }

    #[test]
    fn bare_mention_leaves_empty_prompt() {
        let content = format!("  <@{BOT_ID}>  ");
        assert_eq!(strip_mention(&content, UserId::new(BOT_ID)), "");
    }

    #[test]
    fn apologies_are_branch_specific() {
        let transport_like = BotError::MissingField("data[0].url");
        assert_eq!(
            apology(&Intent::Image(String::new()), &transport_like),
            "Failed to generate the image."
        );
        assert_eq!(
            apology(&Intent::Speech(String::new()), &transport_like),
            "Failed to say something."
        );
        assert_eq!(
            apology(&Intent::Chat(String::new()), &transport_like),
            "Something went wrong while responding."
        );
    }

    #[test]
    fn malformed_chat_response_gets_distinct_apology() {
        let malformed = BotError::MalformedResponse("expected value at line 1".to_string());
        assert_eq!(
            apology(&Intent::Chat(String::new()), &malformed),
            "Sorry, I didn't understand the response."
        );
        // Other branches keep their own apology even for a malformed body
        assert_eq!(
            apology(&Intent::Image(String::new()), &malformed),
            "Failed to generate the image."
        );
    }
}
