//! Sales report parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Extra;
use crate::error::{Error, InvalidInputError};

/// Reporting window understood by `/reports/sales`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesPeriod {
    Week,
    #[default]
    Month,
    LastMonth,
    Year,
}

impl SalesPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            SalesPeriod::Week => "week",
            SalesPeriod::Month => "month",
            SalesPeriod::LastMonth => "last_month",
            SalesPeriod::Year => "year",
        }
    }
}

impl fmt::Display for SalesPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SalesPeriod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(SalesPeriod::Week),
            "month" => Ok(SalesPeriod::Month),
            "last_month" => Ok(SalesPeriod::LastMonth),
            "year" => Ok(SalesPeriod::Year),
            other => Err(InvalidInputError::Other {
                message: format!("unknown sales period '{}'", other),
            }
            .into()),
        }
    }
}

/// One row of `/reports/top_sellers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopSeller {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub quantity: u64,
    #[serde(flatten)]
    pub extra: Extra,
}
