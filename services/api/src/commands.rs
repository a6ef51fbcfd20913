use crate::infra::{build_quote_service, load_catalog, load_pricing};
use auto_quote::config::AppConfig;
use auto_quote::error::AppError;
use auto_quote::quotes::{PremiumQuote, PricingInput, QuoteId, QuoteRecord};
use chrono::{Datelike, Local};
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Driver age in years
    #[arg(long)]
    pub(crate) age: u32,
    /// Vehicle type (sedan, suv, truck, van, ...)
    #[arg(long)]
    pub(crate) vehicle_type: String,
    /// Model year of the vehicle
    #[arg(long)]
    pub(crate) vehicle_year: i32,
    /// Accidents on record
    #[arg(long, default_value_t = 0)]
    pub(crate) accidents: u32,
    /// Moving violations on record
    #[arg(long, default_value_t = 0)]
    pub(crate) violations: u32,
    /// Coverage level (basic, standard, full, premium)
    #[arg(long, default_value = "standard")]
    pub(crate) coverage_level: String,
    /// Driving history (clean, minor, major)
    #[arg(long, default_value = "clean")]
    pub(crate) driving_history: String,
    /// Pricing year; defaults to the current year
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Print every adjustment instead of only the premium
    #[arg(long)]
    pub(crate) breakdown: bool,
    /// Emit JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Subcommand, Debug)]
pub(crate) enum CatalogCommand {
    /// List vehicle types
    Types,
    /// List makes offering a vehicle type
    Makes {
        #[arg(long = "type")]
        vehicle_type: String,
    },
    /// List models of a make offered for a vehicle type
    Models {
        #[arg(long)]
        make: String,
        #[arg(long = "type")]
        vehicle_type: String,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum QuotesCommand {
    /// List saved quotes, oldest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print one saved quote as JSON
    Show { id: String },
    /// Delete a saved quote; unknown ids are ignored
    Delete { id: String },
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = load_pricing(&config.pricing)?;
    let year = args.year.unwrap_or_else(|| Local::now().year());

    let input = PricingInput {
        age: args.age,
        vehicle_type: args.vehicle_type,
        vehicle_year: args.vehicle_year,
        accidents: args.accidents,
        violations: args.violations,
        coverage_level: args.coverage_level,
        driving_history: args.driving_history,
    };
    let quote = engine.quote(&input, year);

    if args.json {
        print_json(&quote)?;
    } else {
        print!("{}", render_estimate(&quote, args.breakdown));
    }
    Ok(())
}

pub(crate) fn render_estimate(quote: &PremiumQuote, breakdown: bool) -> String {
    let mut out = String::new();
    if breakdown {
        for step in &quote.adjustments {
            out.push_str(&format!(
                "{:<22} x{:<6.3} {:>10.2}  {}\n",
                format!("{:?}", step.factor),
                step.multiplier,
                step.running_total,
                step.notes
            ));
        }
    }
    out.push_str(&format!("Monthly premium: ${:.2}", quote.premium));
    if quote.floor_applied {
        out.push_str(" (minimum premium)");
    }
    out.push('\n');
    out
}

pub(crate) fn run_catalog(command: CatalogCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(&config.catalog)?;

    match command {
        CatalogCommand::Types => {
            for vehicle_type in catalog.types() {
                println!("{:<14} {}", vehicle_type.id, vehicle_type.name);
            }
        }
        CatalogCommand::Makes { vehicle_type } => {
            for make in catalog.makes_for_type(&vehicle_type) {
                println!("{:<14} {}", make.id, make.name);
            }
        }
        CatalogCommand::Models { make, vehicle_type } => {
            for model in catalog.models_for_make_and_type(&make, &vehicle_type) {
                println!("{:<14} {:<16} {}", model.id, model.name, model.years);
            }
        }
    }
    Ok(())
}

pub(crate) fn run_quotes(command: QuotesCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_quote_service(&config)?;

    match command {
        QuotesCommand::List { json } => {
            let records = service.list()?;
            if json {
                print_json(&records)?;
            } else if records.is_empty() {
                println!("No saved quotes.");
            } else {
                for record in &records {
                    println!("{}", summary_line(record));
                }
            }
        }
        QuotesCommand::Show { id } => {
            let record = service.get(&QuoteId(id))?;
            print_json(&record)?;
        }
        QuotesCommand::Delete { id } => {
            let id = QuoteId(id);
            if service.delete(&id)? {
                println!("Deleted quote {id}.");
            } else {
                println!("No quote {id}; nothing deleted.");
            }
        }
    }
    Ok(())
}

pub(crate) fn summary_line(record: &QuoteRecord) -> String {
    let data = &record.data;
    format!(
        "{}  {}  {} {}  {} {} {}  ${:.2}",
        record.id,
        record.date.format("%Y-%m-%d"),
        data.applicant.first_name,
        data.applicant.last_name,
        data.vehicle.vehicle_year,
        data.vehicle.vehicle_make,
        data.vehicle.vehicle_model,
        record.quote
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
