use anyhow::bail;
use colored::Colorize;
use meetflow_protocol::{RegisterRequest, Role};

use crate::context::CommandContext;

pub async fn login(email: &str, password: &str, ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.client.login(email, password).await?;
    Ok(())
}

pub fn logout(ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.client.sign_out();
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(ctx: &CommandContext) -> anyhow::Result<()> {
    let account = ctx.client.whoami().await?;
    let value = serde_json::to_value(&account.user)?;
    ctx.print(&value, |_| {
        println!("{}  {}", account.user.name.bold(), account.user.email);
        println!("role: {}  active: {}", account.user.role, account.user.active);
        if let Some(url) = &account.user.photo_url {
            println!("photo: {url}");
        }
    });
    Ok(())
}

pub fn status(ctx: &CommandContext) -> anyhow::Result<()> {
    let value = ctx.client.session().status();
    ctx.print(&value, |value| {
        if value["authenticated"] == true {
            println!(
                "{} as {} ({})",
                "authenticated".green(),
                value["email"].as_str().unwrap_or("?"),
                value["role"].as_str().unwrap_or("?")
            );
        } else {
            println!("{}", value["message"].as_str().unwrap_or("not authenticated"));
        }
    });
    Ok(())
}

pub async fn register(
    name: &str,
    email: &str,
    password: &str,
    role: &str,
    ctx: &CommandContext,
) -> anyhow::Result<()> {
    let role = match role {
        "client" => Role::Client,
        "professional" => Role::Professional,
        other => bail!("unknown role '{other}' (expected client or professional)"),
    };
    let response = ctx
        .client
        .register(&RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirmation: password.to_string(),
            role,
        })
        .await?;
    println!("Registered {} ({}).", response.user.email, response.user.role);
    Ok(())
}
