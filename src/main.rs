use clap::Parser;
use serde::Deserialize;
use tracing::info;

use marchen::config::{Cli, Command};
use marchen::display::{print_event_plan, print_ranked_dates, print_staffing, write_ranked_dates_to_file};
use marchen::logging::init_tracing;
use marchen::parser::load_availability;
use marchen::plan::{build_event_plan, EventSnapshot, PlanCounts};
use marchen::schedule::{find_optimal_dates, CandidateRange};
use marchen::staffing::{calculate_staffing, StaffingInput};
use marchen::weather::{assess_forecast, ForecastResponse};
use marchen::web;

#[derive(Deserialize)]
struct PlanFile {
    event: EventSnapshot,
    #[serde(default)]
    counts: PlanCounts,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let offset = cli.offset()?;

    match cli.command {
        Command::Serve(args) => {
            println!("Access the API at http://localhost:{}/api", args.port);
            web::start_server(args, offset).await?;
        }
        Command::Dates(args) => {
            let vendors = load_availability(&args.csv, offset)?;
            let range = CandidateRange::new(args.start, args.end);
            info!(vendors = vendors.len(), days = range.len(), "ranking candidate dates");

            let scored = find_optimal_dates(&vendors, &range);
            print_ranked_dates(&scored, args.top);

            if let Some(output) = args.output {
                write_ranked_dates_to_file(&scored, &output)?;
                println!("\nRanking saved to {}", output);
            }
        }
        Command::Staffing(args) => {
            let input = StaffingInput {
                max_vendors: args.vendors,
                area_sq_m: args.area,
                expected_visitors: args.visitors,
                duration_hours: args.hours,
            };
            print_staffing(&calculate_staffing(&input));
        }
        Command::Plan(args) => {
            let file: PlanFile = serde_json::from_str(&std::fs::read_to_string(&args.input)?)?;
            print_event_plan(&build_event_plan(&file.event, &file.counts));
        }
        Command::Weather(args) => {
            let response: ForecastResponse = serde_json::from_str(&std::fs::read_to_string(&args.forecast)?)?;
            let forecast = assess_forecast(&response.list, args.date);
            println!("{}: {:?} risk, {}", args.date, forecast.risk_level, forecast.summary);
        }
    }

    Ok(())
}
