//! TUI-less "ask" command

use std::error::Error;
use std::path::Path;

use crate::auth::{
    resolve_credential, CredentialChain, CredentialSource, KeyringCredentials, PromptCredentials,
};
use crate::core::config::data::Config;
use crate::core::conversation::Conversation;
use crate::core::message::Message;
use crate::core::tutor::{TurnRequest, Tutor};
use crate::ui::content::clean_content;
use crate::utils::image::file_to_data_uri;

/// Runs a single turn through a fresh conversation and returns the message
/// that settled it: the reply, or the apology bubble on failure.
pub async fn answer(
    tutor: &mut Tutor,
    credential: &str,
    prompt: &str,
    image: Option<String>,
) -> Message {
    let mut conversation = Conversation::new();
    let request = TurnRequest::start(&mut conversation, credential, prompt, image);
    let outcome = tutor.run_turn(request).await;
    conversation.settle_turn(outcome.result).clone()
}

async fn credential_or_prompt() -> Result<String, Box<dyn Error>> {
    if let Some(key) = resolve_credential(&CredentialChain::standard()).await {
        return Ok(key);
    }
    PromptCredentials::new(KeyringCredentials::new())
        .select_credential()
        .await?
        .ok_or_else(|| "No API key provided".into())
}

pub async fn run_ask(
    prompt: Vec<String>,
    image: Option<&Path>,
    config: &Config,
    offline: bool,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() && image.is_none() {
        eprintln!("Usage: tutor ask [--image <path>] <prompt>");
        std::process::exit(1);
    }

    let image = match image {
        Some(path) => Some(file_to_data_uri(path)?),
        None => None,
    };

    let credential = credential_or_prompt().await?;
    let mut tutor = super::build_tutor(config, offline);
    let message = answer(&mut tutor, &credential, &prompt, image).await;

    if message.is_error {
        eprintln!("❌ {}", message.content);
        std::process::exit(1);
    }
    println!("{}", clean_content(&message.content));
    Ok(())
}
