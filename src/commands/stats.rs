//! `sspm stats show`: project counts per year and group.

use super::{Output, json};
use crate::Result;
use crate::config::Config;
use crate::project::{self, ProjectRecord};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearStats {
    pub year: i32,
    pub total: usize,
    pub open: usize,
    pub groups: Vec<GroupCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total: usize,
    pub open: usize,
    /// Newest year first
    pub years: Vec<YearStats>,
}

impl Output for Stats {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.total == 0 {
            return "No projects found.".to_string();
        }
        let mut lines = vec![format!("{} project(s), {} open", self.total, self.open)];
        for year in &self.years {
            lines.push(format!(
                "{}: {} project(s), {} open",
                year.year, year.total, year.open
            ));
            for group in &year.groups {
                lines.push(format!("  {}: {}", group.group, group.count));
            }
        }
        lines.join("\n")
    }
}

/// Aggregate a listing; groups within a year are sorted by name.
pub fn aggregate(records: &[ProjectRecord]) -> Stats {
    let mut years: BTreeMap<i32, (usize, BTreeMap<&str, usize>)> = BTreeMap::new();
    for record in records {
        let (open, groups) = years.entry(record.year).or_default();
        if record.is_open() {
            *open += 1;
        }
        *groups.entry(record.group.as_str()).or_default() += 1;
    }

    let years: Vec<YearStats> = years
        .into_iter()
        .rev()
        .map(|(year, (open, groups))| YearStats {
            year,
            total: groups.values().sum(),
            open,
            groups: groups
                .into_iter()
                .map(|(group, count)| GroupCount {
                    group: group.to_string(),
                    count,
                })
                .collect(),
        })
        .collect();

    Stats {
        total: records.len(),
        open: years.iter().map(|y| y.open).sum(),
        years,
    }
}

pub fn show(config: &Config) -> Result<Stats> {
    config.require_valid()?;
    let records = project::scan(&config.projects_location()?, None)?;
    Ok(aggregate(&records))
}
