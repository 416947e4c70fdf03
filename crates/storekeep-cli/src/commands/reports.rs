//! Sales report subcommands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use storekeep_core::resources::SalesPeriod;
use storekeep_http::api::ReportsApi;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct ReportsCommand {
    #[command(subcommand)]
    pub command: ReportsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ReportsSubcommand {
    /// Sales totals for a period
    Sales(PeriodArgs),

    /// Best-selling products for a period
    TopSellers(PeriodArgs),
}

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// week, month, last_month or year
    #[arg(long, default_value = "month")]
    pub period: SalesPeriod,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn handle(cmd: ReportsCommand, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::require(global).await?;
    let api = ReportsApi::new(session.client());

    let result = match cmd.command {
        ReportsSubcommand::Sales(args) => sales(&api, &args).await,
        ReportsSubcommand::TopSellers(args) => top_sellers(&api, &args).await,
    };
    session.finish(result)
}

async fn sales(api: &ReportsApi, args: &PeriodArgs) -> Result<()> {
    let report = api
        .sales(args.period)
        .await
        .context("Failed to load sales report")?;
    output::json_as(&report, args.pretty)
}

async fn top_sellers(api: &ReportsApi, args: &PeriodArgs) -> Result<()> {
    let sellers = api
        .top_sellers(args.period)
        .await
        .context("Failed to load top sellers")?;

    if sellers.is_empty() {
        output::note(&format!("No sales in period '{}'.", args.period));
        return Ok(());
    }

    for seller in &sellers {
        output::json_as(seller, args.pretty)?;
    }
    Ok(())
}
