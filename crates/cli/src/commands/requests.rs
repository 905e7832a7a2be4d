use anyhow::bail;
use colored::Colorize;
use meetflow_protocol::RequestPage;

use crate::context::CommandContext;

fn render(page: &RequestPage) {
    if page.requests.is_empty() {
        println!("No pending requests.");
        return;
    }
    for request in &page.requests {
        println!(
            "{}  {} for {}  {} min  {}  [{}]",
            request.status,
            request.service_name.bold(),
            request.client_name,
            request.duration,
            request.init_date,
            request.id
        );
        if let Some(message) = &request.message {
            println!("  {message}");
        }
    }
}

pub async fn list(page: u32, ctx: &CommandContext) -> anyhow::Result<()> {
    let requests = ctx.client.pending_requests(page).await?;
    let value = serde_json::to_value(&requests)?;
    ctx.print(&value, |_| render(&requests));
    Ok(())
}

pub async fn accept(request_id: &str, service_id: &str, ctx: &CommandContext) -> anyhow::Result<()> {
    let pending = ctx.client.pending_requests(1).await?;
    let Some(request) = pending.requests.iter().find(|request| request.id == request_id) else {
        bail!("no pending request with id {request_id}");
    };
    ctx.client.accept_request(request, service_id).await?;
    println!("Accepted request from {}.", request.client_name.bold());
    Ok(())
}

pub async fn decline(request_id: &str, ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.client.decline_request(request_id).await?;
    println!("Declined request {request_id}.");
    Ok(())
}
