use colored::Colorize;
use meetflow_protocol::Profile;

use crate::context::CommandContext;

fn render(profile: &Profile) {
    println!("{}  {}", profile.name.bold(), profile.email);
    if let Some(line) = &profile.head_line {
        println!("{line}");
    }
    if let Some(url) = &profile.photo_url {
        println!("photo: {url}");
    }
}

pub async fn show(ctx: &CommandContext) -> anyhow::Result<()> {
    let profile = ctx.client.profile().await?;
    let value = serde_json::to_value(&profile)?;
    ctx.print(&value, |_| render(&profile));
    Ok(())
}

pub async fn update(
    name: Option<String>,
    head_line: Option<String>,
    ctx: &CommandContext,
) -> anyhow::Result<()> {
    let mut profile = ctx.client.profile().await?;
    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(head_line) = head_line {
        profile.head_line = Some(head_line);
    }

    let updated = ctx.client.update_profile(profile).await?;
    let value = serde_json::to_value(&updated)?;
    ctx.print(&value, |_| render(&updated));
    Ok(())
}

pub async fn photo(url: &str, ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.client.attach_photo(url).await?;
    println!("Photo attached.");
    Ok(())
}
