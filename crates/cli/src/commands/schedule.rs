use colored::Colorize;
use meetflow_protocol::CreateAppointmentRequest;

use crate::context::CommandContext;

pub async fn show(page: u32, ctx: &CommandContext) -> anyhow::Result<()> {
    let schedule = ctx.client.schedule(page).await?;
    let value = serde_json::to_value(&schedule)?;
    ctx.print(&value, |_| {
        if schedule.appointments.is_empty() {
            println!("No appointments.");
            return;
        }
        for appointment in &schedule.appointments {
            println!(
                "{}  {} with {}  {} min  [{}]",
                appointment.init_date,
                appointment.service_name.bold(),
                appointment.client_name,
                appointment.duration,
                appointment.id
            );
        }
    });
    Ok(())
}

pub async fn book(
    request_id: &str,
    service_id: &str,
    date: &str,
    message: Option<String>,
    ctx: &CommandContext,
) -> anyhow::Result<()> {
    let appointment = ctx
        .client
        .book_appointment(&CreateAppointmentRequest {
            request_id: request_id.to_string(),
            service_id: service_id.to_string(),
            init_date: date.to_string(),
            message,
        })
        .await?;
    match appointment {
        Some(appointment) => println!("Booked {} [{}].", appointment.service_name.bold(), appointment.id),
        None => println!("Booked."),
    }
    Ok(())
}
