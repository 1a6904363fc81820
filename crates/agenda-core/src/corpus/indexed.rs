//! Local pastor roster: `| # | Pastor Name | Church Name |`. Row order is the
//! prayer cycle.

use super::{table, ReferenceLoader};
use crate::error::{AgendaError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PastorRow {
    pub index: u32,
    pub pastor: String,
    pub church: String,
}

impl PastorRow {
    /// `Church Alpha - Pastor Alpha`, the form the agenda line carries.
    pub fn label(&self) -> String {
        format!("{} - {}", self.church, self.pastor)
    }
}

pub struct PastorLoader;

impl ReferenceLoader for PastorLoader {
    type Key = u32;
    type Entry = PastorRow;

    fn grammar(&self) -> &'static str {
        "indexed table (| # | person | organization |)"
    }

    fn parse(&self, text: &str) -> Result<Vec<(u32, PastorRow)>> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let Some(cells) = table::parse_row(line) else {
                continue;
            };
            if table::is_separator(&cells) {
                continue;
            }
            // Header rows have a non-numeric first cell.
            let Ok(index) = cells[0].trim_end_matches('.').parse::<u32>() else {
                continue;
            };
            let (Some(pastor), Some(church)) = (cells.get(1), cells.get(2)) else {
                return Err(AgendaError::parse(
                    self.grammar(),
                    format!("row {index} needs a person and an organization column"),
                ));
            };
            rows.push((
                index,
                PastorRow {
                    index,
                    pastor: pastor.clone(),
                    church: church.clone(),
                },
            ));
        }
        Ok(rows)
    }
}
