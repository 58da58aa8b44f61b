//! CLI bot commands: create, list, show, delete.

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};

use botique_core::repository::bot::BotFilter;
use botique_types::bot::{Bot, BotId, CreateBotRequest};
use botique_types::identity::UserId;

use crate::state::AppState;

/// `btq create bot <name>`
pub async fn create_bot(
    state: &AppState,
    name: String,
    description: Option<String>,
    creator: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let creator_id = match creator {
        Some(raw) => raw.parse::<UserId>()?,
        None => {
            let id = UserId::new();
            if !json {
                println!(
                    "  {} No creator given; generated user id {}",
                    console::style("ℹ").bold(),
                    console::style(&id).cyan()
                );
            }
            id
        }
    };

    let bot = state
        .bot_service
        .create_bot(
            CreateBotRequest {
                name,
                description,
                price_id: None,
            },
            creator_id,
        )
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bot)?);
    } else {
        println!();
        println!(
            "  {} Created bot '{}' ({})",
            console::style("✓").green(),
            console::style(&bot.name).cyan(),
            bot.id
        );
        println!(
            "  {}",
            console::style("Upload knowledge files via POST /api/v1/bots/{id}/knowledge").dim()
        );
        println!();
    }

    Ok(())
}

/// `btq list bots`
pub async fn list_bots(
    state: &AppState,
    creator: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let creator_id = creator.map(|raw| raw.parse::<UserId>()).transpose()?;

    let bots = state
        .bot_service
        .list_bots(Some(BotFilter {
            creator_id,
            ..Default::default()
        }))
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bots)?);
        return Ok(());
    }

    if bots.is_empty() {
        println!();
        println!("  No bots yet. Create one with: btq create bot <name>");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["ID", "Name", "Description", "Files", "Created"]);

    for bot in &bots {
        table.add_row(vec![
            bot.id.to_string(),
            bot.name.clone(),
            truncate(&bot.description, 40),
            bot.training_data.len().to_string(),
            bot.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// `btq show <id>`
pub async fn show_bot(state: &AppState, id: &str, json: bool) -> anyhow::Result<()> {
    let bot_id: BotId = id.parse()?;
    let bot = state.bot_service.get_bot(&bot_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bot)?);
        return Ok(());
    }

    print_bot(&bot);
    Ok(())
}

/// `btq delete bot <id>`
pub async fn delete_bot(
    state: &AppState,
    id: &str,
    force: bool,
    json: bool,
) -> anyhow::Result<()> {
    let bot_id: BotId = id.parse()?;
    let bot = state.bot_service.get_bot(&bot_id).await?;

    if !force {
        println!();
        println!(
            "  {} Deleting '{}' removes the bot and its subscriptions.",
            console::style("!").yellow().bold(),
            console::style(&bot.name).cyan()
        );
        println!("  Re-run with --force to confirm.");
        println!();
        return Ok(());
    }

    // CLI deletion acts as the creator.
    state
        .bot_service
        .delete_bot(&bot_id, &bot.creator_id)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "id": bot_id.to_string()})
        );
    } else {
        println!();
        println!(
            "  {} Deleted bot '{}'",
            console::style("✓").green(),
            console::style(&bot.name).cyan()
        );
        println!();
    }

    Ok(())
}

fn print_bot(bot: &Bot) {
    println!();
    println!(
        "  {} {}",
        console::style(&bot.name).cyan().bold(),
        console::style(format!("({})", bot.id)).dim()
    );
    if !bot.description.is_empty() {
        println!("  {}", bot.description);
    }
    println!();
    println!("  Creator:   {}", bot.creator_id);
    println!(
        "  Picture:   {}",
        if bot.profile_pic_url.is_empty() {
            "(none)"
        } else {
            &bot.profile_pic_url
        }
    );
    println!("  Knowledge: {} file(s)", bot.training_data.len());
    for key in &bot.training_data {
        println!("    - {key}");
    }
    println!("  Created:   {}", bot.created_at.format("%Y-%m-%d %H:%M"));
    println!();
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{prefix}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 40), "short");
        let long = "x".repeat(60);
        let out = truncate(&long, 40);
        assert_eq!(out.chars().count(), 40);
        assert!(out.ends_with('…'));
    }
}
