mod state;
mod validation;

use anyhow::bail;
use clap::{Parser, Subcommand};
use serde_json::json;
use spark_domain::csv::{export_filename, plans_to_csv};
use spark_domain::generate::{GenerationRequest, OfferRequest, TrendRemixRequest};
use spark_domain::plan::{Plan, PlanStatus};
use spark_domain::profile::Profile;
use spark_domain::reminders::ReminderPreset;
use spark_domain::seed::{seed_plan_value, seed_profile};
use spark_domain::util::{format_ms_date, now_ms};
use spark_infra::config::AppConfig;
use spark_infra::logging::init_tracing;
use state::AppState;
use validation::{parse_hex_color, parse_http_link, parse_non_empty};

#[derive(Parser)]
#[command(name = "spark", about = "Local-first content planner", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save the creator profile and mark onboarding complete
    Onboard {
        #[arg(long, value_parser = parse_non_empty)]
        niche: String,
        /// Comma-separated content pillars
        #[arg(long)]
        pillars: Option<String>,
        #[arg(long, default_value = "friendly")]
        voice: String,
    },
    /// Generate today's plan from the saved profile
    Today {
        /// Persist the generated plan instead of just printing it
        #[arg(long)]
        save: bool,
    },
    /// Remix an external trend line into the niche
    Remix {
        #[arg(long, value_parser = parse_non_empty)]
        trend: String,
        #[arg(long)]
        save: bool,
    },
    /// Turn an affiliate link into a promotional plan
    Offer {
        #[arg(long, default_value = "My #1 Recommended Tool")]
        title: String,
        #[arg(long, value_parser = parse_http_link)]
        link: String,
        #[arg(long, default_value = "Saves me hours each week and is beginner-friendly.")]
        why: String,
        #[arg(long, default_value = "Grab it here →")]
        cta: String,
        #[arg(long)]
        save: bool,
    },
    /// List saved plans, newest first
    List,
    /// Mark a plan as posted
    Post { id: String },
    /// Set a plan's status in either direction
    Status { id: String, status: PlanStatus },
    /// Delete a plan
    Delete { id: String },
    /// Export all plans as CSV
    Export {
        /// Output path; defaults to a date-stamped file in the current directory
        #[arg(long)]
        out: Option<String>,
    },
    /// Seed a default profile and a demo plan for a first run
    Seed,
    /// Print pending-plan and onboarding badge counts
    Badges,
    /// Show the clock time a reminder preset maps to
    Remind { preset: ReminderPreset },
    /// Manage monetization products
    #[command(subcommand)]
    Product(ProductCommand),
    /// Manage brand settings
    #[command(subcommand)]
    Branding(BrandingCommand),
}

#[derive(Subcommand)]
enum ProductCommand {
    Add {
        #[arg(long, value_parser = parse_non_empty)]
        title: String,
        #[arg(long, value_parser = parse_http_link)]
        link: String,
        #[arg(long)]
        price: Option<f64>,
    },
    List,
    Remove { id: String },
}

#[derive(Subcommand)]
enum BrandingCommand {
    Show,
    Set {
        #[arg(long, value_parser = parse_hex_color)]
        primary: Option<String>,
        #[arg(long, value_parser = parse_http_link)]
        logo_url: Option<String>,
        #[arg(long, value_parser = parse_http_link)]
        monetize_logo_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(&config)?;
    let state = AppState::new(config).await?;
    run(cli.command, &state).await
}

async fn run(command: Command, state: &AppState) -> anyhow::Result<()> {
    match command {
        Command::Onboard {
            niche,
            pillars,
            voice,
        } => onboard(state, niche, pillars, voice).await,
        Command::Today { save } => today(state, save).await,
        Command::Remix { trend, save } => remix(state, trend, save).await,
        Command::Offer {
            title,
            link,
            why,
            cta,
            save,
        } => offer(state, title, link, why, cta, save).await,
        Command::List => list(state).await,
        Command::Post { id } => set_status(state, &id, PlanStatus::Posted).await,
        Command::Status { id, status } => set_status(state, &id, status).await,
        Command::Delete { id } => delete(state, &id).await,
        Command::Export { out } => export(state, out).await,
        Command::Seed => seed(state).await,
        Command::Badges => badges(state).await,
        Command::Remind { preset } => {
            remind(preset);
            Ok(())
        }
        Command::Product(command) => product(state, command).await,
        Command::Branding(command) => branding(state, command).await,
    }
}

async fn onboard(
    state: &AppState,
    niche: String,
    pillars: Option<String>,
    voice: String,
) -> anyhow::Result<()> {
    let mut profile = Profile {
        niche,
        voice,
        ..Profile::default()
    };
    if let Some(pillars) = pillars {
        let parsed: Vec<String> = pillars
            .split(',')
            .map(str::trim)
            .filter(|pillar| !pillar.is_empty())
            .map(str::to_string)
            .collect();
        if !parsed.is_empty() {
            profile.pillars = parsed;
        }
    }
    state.profile.save(&profile).await?;
    state.flags.set_onboarding_done().await?;
    println!(
        "profile saved: {} / {} ({})",
        profile.niche,
        profile.pillars.join(", "),
        profile.voice
    );
    Ok(())
}

async fn today(state: &AppState, save: bool) -> anyhow::Result<()> {
    let profile = state.profile.get_or_default().await?;
    let request = GenerationRequest::from_profile(&profile);
    let generated = state.generator.generate(&request).await;
    println!("{}", serde_json::to_string_pretty(&generated)?);
    if save {
        let plan = state.plans.upsert(&generated.to_plan_value("quick-save")).await?;
        print_saved(&plan);
    }
    Ok(())
}

async fn remix(state: &AppState, trend: String, save: bool) -> anyhow::Result<()> {
    let profile = state.profile.get_or_default().await?;
    let request = TrendRemixRequest {
        niche: profile.niche,
        voice: profile.voice,
        pillars: profile.pillars,
        trend,
    };
    let generated = state.generator.remix(&request);
    println!("{}", serde_json::to_string_pretty(&generated)?);
    if save {
        let plan = state.plans.upsert(&generated.to_plan_value("remix")).await?;
        print_saved(&plan);
    }
    Ok(())
}

async fn offer(
    state: &AppState,
    title: String,
    link: String,
    why: String,
    cta: String,
    save: bool,
) -> anyhow::Result<()> {
    let profile = state.profile.get_or_default().await?;
    let request = OfferRequest {
        title,
        link: link.clone(),
        why,
        cta,
        niche: profile.niche,
        pillars: profile.pillars,
    };
    let generated = state.generator.offer(&request);
    println!("{}", serde_json::to_string_pretty(&generated)?);
    if save {
        let mut value = generated.to_plan_value("offer");
        value["meta"]["link"] = json!(link);
        let plan = state.plans.upsert(&value).await?;
        print_saved(&plan);
    }
    Ok(())
}

async fn list(state: &AppState) -> anyhow::Result<()> {
    let plans = state.plans.load_plans().await?;
    if plans.is_empty() {
        println!("no plans yet; try `spark today --save`");
        return Ok(());
    }
    for plan in &plans {
        println!(
            "{}  {}  {:<7}  {}",
            plan.id,
            format_ms_date(plan.created_at),
            plan.status.as_str(),
            plan.title
        );
    }
    Ok(())
}

async fn set_status(state: &AppState, id: &str, status: PlanStatus) -> anyhow::Result<()> {
    match state.plans.set_status(id, status).await? {
        Some(plan) => {
            println!("{}: {}", plan.status.as_str(), plan.title);
            Ok(())
        }
        None => bail!("no plan with id {id}"),
    }
}

async fn delete(state: &AppState, id: &str) -> anyhow::Result<()> {
    if state.plans.delete(id).await? {
        println!("deleted {id}");
    } else {
        println!("nothing to delete for {id}");
    }
    Ok(())
}

async fn export(state: &AppState, out: Option<String>) -> anyhow::Result<()> {
    let plans = state.plans.read_all().await?;
    let csv = plans_to_csv(&plans);
    let path = out.unwrap_or_else(|| export_filename(now_ms()));
    tokio::fs::write(&path, csv).await?;
    println!("wrote {} plan(s) to {path}", plans.len());
    Ok(())
}

async fn seed(state: &AppState) -> anyhow::Result<()> {
    if state.profile.get().await?.is_none() {
        state.profile.save(&seed_profile()).await?;
        println!("seeded default profile");
    }
    let plan = state.plans.upsert(&seed_plan_value(now_ms())).await?;
    print_saved(&plan);
    Ok(())
}

async fn badges(state: &AppState) -> anyhow::Result<()> {
    let counts = state.badges.snapshot().await?;
    println!("pending plans: {}", counts.pending);
    println!(
        "onboarding: {}",
        if counts.onboarding_incomplete {
            "incomplete"
        } else {
            "done"
        }
    );
    Ok(())
}

fn remind(preset: ReminderPreset) {
    match preset.time() {
        Some(time) => println!(
            "{} reminder fires daily at {:02}:{:02}",
            preset.as_str(),
            time.hour,
            time.minute
        ),
        None => println!("reminders are off"),
    }
}

async fn product(state: &AppState, command: ProductCommand) -> anyhow::Result<()> {
    match command {
        ProductCommand::Add { title, link, price } => {
            let raw = json!({ "title": title, "link": link, "price": price });
            let product = state.products.save(&raw).await?;
            println!("saved product {}: {}", product.id, product.title);
        }
        ProductCommand::List => {
            let products = state.products.list().await?;
            if products.is_empty() {
                println!("no products yet");
            }
            for product in &products {
                let price = product
                    .price
                    .map(|price| format!("  ${price:.2}"))
                    .unwrap_or_default();
                println!("{}  {}  {}{price}", product.id, product.title, product.link);
            }
        }
        ProductCommand::Remove { id } => {
            if state.products.remove(&id).await? {
                println!("removed {id}");
            } else {
                println!("nothing to remove for {id}");
            }
        }
    }
    Ok(())
}

async fn branding(state: &AppState, command: BrandingCommand) -> anyhow::Result<()> {
    match command {
        BrandingCommand::Show => {
            let branding = state.branding.get().await?;
            println!("{}", serde_json::to_string_pretty(&branding)?);
        }
        BrandingCommand::Set {
            primary,
            logo_url,
            monetize_logo_url,
        } => {
            let mut branding = state.branding.get().await?;
            if let Some(primary) = primary {
                branding.primary = primary;
            }
            if let Some(logo_url) = logo_url {
                branding.logo_url = Some(logo_url);
            }
            if let Some(monetize_logo_url) = monetize_logo_url {
                branding.monetize_logo_url = Some(monetize_logo_url);
            }
            state.branding.save(&branding).await?;
            println!("{}", serde_json::to_string_pretty(&branding)?);
        }
    }
    Ok(())
}

fn print_saved(plan: &Plan) {
    println!("saved {} ({}): {}", plan.id, plan.status.as_str(), plan.title);
}

#[cfg(test)]
mod tests;
