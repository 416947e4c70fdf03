//! Store resource subcommands.
//!
//! Every resource goes through the same [`CrudResource`] calls, so the
//! handlers here are generic over the wrapper.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use storekeep_core::resources::ListQuery;
use storekeep_http::ApiClient;
use storekeep_http::api::{
    CategoriesApi, CouponsApi, CrudResource, CustomersApi, OrdersApi, ProductsApi,
};

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::CliSession;

#[derive(Args, Debug)]
pub struct StoreCommand {
    #[command(subcommand)]
    pub command: StoreSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum StoreSubcommand {
    /// List one page of a resource
    List(ListArgs),

    /// Fetch a single item
    Get(ItemArgs),

    /// Delete an item
    Delete(DeleteArgs),

    /// Print the total number of items
    Count(CountArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Products,
    Orders,
    Customers,
    Coupons,
    Categories,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub resource: ResourceKind,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Status filter (e.g. publish, processing)
    #[arg(long)]
    pub status: Option<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct ItemArgs {
    pub resource: ResourceKind,

    pub id: u64,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub resource: ResourceKind,

    pub id: u64,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CountArgs {
    pub resource: ResourceKind,
}

impl ListArgs {
    fn query(&self) -> ListQuery {
        let mut query = ListQuery::new().page(self.page);
        if let Some(per_page) = self.per_page {
            query = query.per_page(per_page);
        }
        if let Some(search) = &self.search {
            query = query.search(search.as_str());
        }
        if let Some(status) = &self.status {
            query = query.status(status.as_str());
        }
        query
    }
}

/// Run `$body` with `$api` bound to the wrapper for `$kind`.
macro_rules! with_resource {
    ($kind:expr, $client:expr, |$api:ident| $body:expr) => {
        match $kind {
            ResourceKind::Products => {
                let $api = ProductsApi::new($client);
                $body
            }
            ResourceKind::Orders => {
                let $api = OrdersApi::new($client);
                $body
            }
            ResourceKind::Customers => {
                let $api = CustomersApi::new($client);
                $body
            }
            ResourceKind::Coupons => {
                let $api = CouponsApi::new($client);
                $body
            }
            ResourceKind::Categories => {
                let $api = CategoriesApi::new($client);
                $body
            }
        }
    };
}

pub async fn handle(cmd: StoreCommand, global: &GlobalArgs) -> Result<()> {
    let session = CliSession::require(global).await?;
    let result = dispatch(cmd.command, session.client()).await;
    session.finish(result)
}

async fn dispatch(cmd: StoreSubcommand, client: &ApiClient) -> Result<()> {
    match cmd {
        StoreSubcommand::List(args) => {
            with_resource!(args.resource, client, |api| list(&api, &args).await)
        }
        StoreSubcommand::Get(args) => {
            with_resource!(args.resource, client, |api| get(&api, &args).await)
        }
        StoreSubcommand::Delete(args) => {
            with_resource!(args.resource, client, |api| delete(&api, &args).await)
        }
        StoreSubcommand::Count(args) => {
            with_resource!(args.resource, client, |api| count(&api).await)
        }
    }
}

async fn list<R>(api: &R, args: &ListArgs) -> Result<()>
where
    R: CrudResource,
    R::Item: Serialize,
{
    let page = api
        .list(args.query())
        .await
        .context("Failed to list items")?;

    if page.items.is_empty() {
        output::note("No items found.");
        return Ok(());
    }

    for item in &page.items {
        output::json_as(item, args.pretty)?;
    }

    output::note(&format!(
        "Page {} of {} ({} total)",
        args.page, page.total_pages, page.total
    ));

    Ok(())
}

async fn get<R>(api: &R, args: &ItemArgs) -> Result<()>
where
    R: CrudResource,
    R::Item: Serialize,
{
    let item = api.get(args.id).await.context("Failed to fetch item")?;
    output::json_as(&item, args.pretty)
}

async fn delete<R: CrudResource>(api: &R, args: &DeleteArgs) -> Result<()> {
    if !args.force && !confirm(&format!("Delete {:?} #{}?", args.resource, args.id))? {
        eprintln!("Aborted.");
        return Ok(());
    }

    api.delete(args.id).await.context("Failed to delete item")?;
    output::success(&format!("Deleted #{}", args.id));
    Ok(())
}

async fn count<R: CrudResource>(api: &R) -> Result<()> {
    let total = api.count().await.context("Failed to count items")?;
    println!("{}", total);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_args_build_query() {
        let args = ListArgs {
            resource: ResourceKind::Orders,
            page: 3,
            per_page: Some(50),
            search: None,
            status: Some("processing".to_string()),
            pretty: false,
        };
        let query = args.query();
        assert_eq!(query.page, Some(3));
        assert_eq!(query.per_page, Some(50));
        assert_eq!(query.status.as_deref(), Some("processing"));
        assert!(query.search.is_none());
    }
}
