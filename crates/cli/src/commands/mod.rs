mod profile;
mod requests;
mod schedule;
mod services;
mod session;

use crate::cli::{Commands, ProfileAction, RequestAction, ServiceAction};
use crate::context::CommandContext;

pub async fn dispatch(command: Commands, ctx: &CommandContext) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => session::login(&email, &password, ctx).await,
        Commands::Logout => session::logout(ctx),
        Commands::Whoami => session::whoami(ctx).await,
        Commands::Status => session::status(ctx),
        Commands::Register { name, email, password, role } => {
            session::register(&name, &email, &password, &role, ctx).await
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show => profile::show(ctx).await,
            ProfileAction::Update { name, head_line } => profile::update(name, head_line, ctx).await,
            ProfileAction::Photo { url } => profile::photo(&url, ctx).await,
        },
        Commands::Services { action } => match action {
            ServiceAction::List { page } => services::list(page, ctx).await,
            ServiceAction::Create { name, duration, description, price } => {
                services::create(&name, duration, description, price, ctx).await
            }
        },
        Commands::Requests { action } => match action {
            RequestAction::List { page } => requests::list(page, ctx).await,
            RequestAction::Accept { request_id, service } => {
                requests::accept(&request_id, &service, ctx).await
            }
            RequestAction::Decline { request_id } => requests::decline(&request_id, ctx).await,
        },
        Commands::Schedule { page } => schedule::show(page, ctx).await,
        Commands::Book { request_id, service, date, message } => {
            schedule::book(&request_id, &service, &date, message, ctx).await
        }
    }
}
