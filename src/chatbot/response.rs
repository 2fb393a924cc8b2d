//! Builds and sends Discord replies for each capability's result.

use chrono::Utc;
use log::info;
use poise::serenity_prelude::{
    Context, CreateActionRow, CreateAttachment, CreateButton, CreateEmbed, CreateMessage,
    Message as SerenityMessage,
};
use url::Url;

use crate::error::Result;

/// Discord's message limit is 2000 characters (standard users).
const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Chunk size for replies that exceed the message limit.
const CHUNK_LEN: usize = 1999;

/// Accent color for image embeds.
const EMBED_COLOR: u32 = 0x0025_A9FF;

/// Send a generated image as an embed with a download link button.
pub async fn send_image_reply(
    ctx: &Context,
    new_message: &SerenityMessage,
    image_url: &Url,
) -> Result<()> {
    let embed = CreateEmbed::new()
        .title("🎨 AI Image Generated")
        .description("Here's your image based on the prompt.")
        .image(image_url.as_str())
        .color(EMBED_COLOR);

    let row = CreateActionRow::Buttons(vec![
        CreateButton::new_link(image_url.as_str()).label("Download Image"),
    ]);

    let message = CreateMessage::new()
        .embed(embed)
        .components(vec![row])
        .reference_message(new_message);

    new_message
        .channel_id
        .send_message(&ctx.http, message)
        .await?;

    info!(
        "Replied to {} in channel {} with image embed: {}",
        new_message.author.tag(),
        new_message.channel_id,
        image_url
    );
    Ok(())
}

/// Send synthesized speech as an in-memory file attachment.
pub async fn send_speech_reply(
    ctx: &Context,
    new_message: &SerenityMessage,
    audio: Vec<u8>,
) -> Result<()> {
    let filename = format!("voice_{}.mp3", Utc::now().timestamp());
    let audio_len = audio.len();

    let message = CreateMessage::new()
        .reference_message(new_message)
        .add_file(CreateAttachment::bytes(audio, filename));

    new_message
        .channel_id
        .send_message(&ctx.http, message)
        .await?;

    info!(
        "Replied to {} in channel {} with audio attachment ({} bytes)",
        new_message.author.tag(),
        new_message.channel_id,
        audio_len
    );
    Ok(())
}

/// Send a chat reply, chunking when it exceeds the Discord message limit.
///
/// The first chunk goes out as a reply to the triggering message; every later
/// chunk is a plain channel message, each awaited before the next so the
/// channel preserves the original order.
pub async fn send_chat_reply(
    ctx: &Context,
    new_message: &SerenityMessage,
    text: &str,
) -> Result<()> {
    if !needs_split(text) {
        new_message.reply(&ctx.http, text).await?;
        info!(
            "Replied to {} in channel {}: {}",
            new_message.author.tag(),
            new_message.channel_id,
            text
        );
        return Ok(());
    }

    let mut sent = 0usize;
    let mut chunks = chunks(text, CHUNK_LEN);
    if let Some(first) = chunks.next() {
        new_message.reply(&ctx.http, first).await?;
        sent += 1;
    }
    for chunk in chunks {
        new_message
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().content(chunk))
            .await?;
        sent += 1;
    }

    info!(
        "Replied to {} in channel {} with {} chunks ({} chars total)",
        new_message.author.tag(),
        new_message.channel_id,
        sent,
        text.chars().count()
    );
    Ok(())
}

/// Whether a reply is too long for a single Discord message.
fn needs_split(text: &str) -> bool {
    text.chars().count() > DISCORD_MESSAGE_LIMIT
}

/// Lazily split `text` into chunks of at most `max_chars` characters,
/// in order and never inside a character.
fn chunks(text: &str, max_chars: usize) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let split = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(i, _)| i);
        let (head, tail) = rest.split_at(split);
        rest = tail;
        Some(head)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_at_limit_is_not_split() {
        let text = "a".repeat(2000);
        assert!(!needs_split(&text));
    }

    #[test]
    fn reply_over_limit_is_split() {
        let text = "a".repeat(2001);
        assert!(needs_split(&text));
    }

    #[test]
    fn oversized_reply_splits_into_two_chunks() {
        let text = "a".repeat(2001);
        let pieces: Vec<&str> = chunks(&text, CHUNK_LEN).collect();
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].chars().count(), 1999);
        assert_eq!(pieces[1].chars().count(), 2);
    }

    #[test]
    fn chunk_concatenation_reconstructs_input() {
        let text = "xyz".repeat(2500);
        let rebuilt: String = chunks(&text, CHUNK_LEN).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn chunks_never_split_a_character() {
        // 3 bytes per char, so a byte-offset cut would land mid-character
        let text = "世".repeat(4000);
        for piece in chunks(&text, CHUNK_LEN) {
            assert!(piece.chars().count() <= 1999);
            assert!(piece.chars().all(|c| c == '世'));
        }
        let rebuilt: String = chunks(&text, CHUNK_LEN).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert_eq!(chunks("", CHUNK_LEN).count(), 0);
    }
}
