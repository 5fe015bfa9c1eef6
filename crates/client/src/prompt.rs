//! Interactive prompts for the create form and the delete dialog.

use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};

use sushisync_core::sushi::{messages, CreateSushiRequest, SushiType};

use crate::cli::sushi::CreateArgs;

const SUSHI_TYPES: [SushiType; 2] = [SushiType::Nigiri, SushiType::Roll];

/// Builds a create request from the flags, prompting for whatever is missing.
///
/// Values are not checked here; the sync layer validates the request
/// before anything is sent.
pub fn create_request(args: CreateArgs) -> dialoguer::Result<CreateSushiRequest> {
    let name = ask(args.name, "Name")?;
    let sushi_type = match args.sushi_type {
        Some(sushi_type) => sushi_type,
        None => {
            let labels = SUSHI_TYPES.map(|t| t.as_str());
            let index = Select::new()
                .with_prompt("Type")
                .items(&labels)
                .default(0)
                .interact()?;
            SUSHI_TYPES[index]
        }
    };
    let price = ask(args.price, "Price")?;
    let image = ask(args.image, "Image URL")?;
    let fish = ask(args.fish, "Fish")?;
    let fish_type = ask(args.fish_type, "Fish type")?;
    let pieces = ask(args.pieces, "Pieces")?;

    Ok(CreateSushiRequest::new(name, sushi_type, price)
        .with_image(image)
        .with_fish(fish)
        .with_fish_type(fish_type)
        .with_pieces(pieces))
}

/// Asks the confirm-delete question. Defaults to no.
pub fn confirm_delete(name: &str) -> dialoguer::Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "{} [{} / {}]",
            messages::confirm_delete_body(name),
            messages::YES_DELETE,
            messages::NO_CANCEL
        ))
        .default(false)
        .interact()
}

fn ask<T>(value: Option<T>, prompt: &str) -> dialoguer::Result<T>
where
    T: Clone + ToString + FromStr,
    <T as FromStr>::Err: ToString,
{
    match value {
        Some(value) => Ok(value),
        None => Input::<T>::new().with_prompt(prompt).interact_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_flags_need_no_prompt() {
        let args = CreateArgs {
            name: Some("Dragon Roll".to_string()),
            image: Some("https://example.com/dragon.jpg".to_string()),
            price: Some(12.0),
            sushi_type: Some(SushiType::Roll),
            fish: Some("Eel".to_string()),
            fish_type: Some("Grilled".to_string()),
            pieces: Some(8),
        };

        let request = create_request(args).unwrap();

        assert_eq!(request.name, "Dragon Roll");
        assert_eq!(request.sushi_type, SushiType::Roll);
        assert_eq!(request.fish_type.as_deref(), Some("Grilled"));
        assert_eq!(request.pieces, Some(8));
    }
}
