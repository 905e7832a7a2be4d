use colored::Colorize;
use meetflow_protocol::CreateServiceRequest;

use crate::context::CommandContext;

pub async fn list(page: u32, ctx: &CommandContext) -> anyhow::Result<()> {
    let services = ctx.client.services(page).await?;
    let value = serde_json::to_value(&services)?;
    ctx.print(&value, |_| {
        if services.services.is_empty() {
            println!("No services.");
            return;
        }
        for service in &services.services {
            let price = service
                .price
                .map(|price| format!("  R$ {price:.2}"))
                .unwrap_or_default();
            println!("{}  {} min{}  [{}]", service.name.bold(), service.duration, price, service.id);
            if let Some(description) = &service.description {
                println!("  {description}");
            }
        }
        if let Some(total) = services.total {
            println!("total: {total}");
        }
    });
    Ok(())
}

pub async fn create(
    name: &str,
    duration: u32,
    description: Option<String>,
    price: Option<f64>,
    ctx: &CommandContext,
) -> anyhow::Result<()> {
    let service = ctx
        .client
        .create_service(&CreateServiceRequest {
            name: name.to_string(),
            description,
            duration,
            price,
        })
        .await?;
    println!("Created service {} [{}].", service.name.bold(), service.id);
    Ok(())
}
