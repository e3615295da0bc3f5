use clap::{Parser, ValueEnum};
use tessera_calendar::{CalendarConfig, CellPosition, NaiveDate, SelectionMode, Weekday, YearMonth};

/// Weekday accepted by `--first-day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FirstDay {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl From<FirstDay> for Weekday {
    fn from(day: FirstDay) -> Self {
        match day {
            FirstDay::Mon => Weekday::Mon,
            FirstDay::Tue => Weekday::Tue,
            FirstDay::Wed => Weekday::Wed,
            FirstDay::Thu => Weekday::Thu,
            FirstDay::Fri => Weekday::Fri,
            FirstDay::Sat => Weekday::Sat,
            FirstDay::Sun => Weekday::Sun,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "example")]
#[command(version, long_about = None)]
#[command(about = "Render a tessera-calendar month grid in the terminal")]
pub struct Cli {
    /// Month to display as YYYY-MM (defaults to the current month)
    #[arg(long, value_parser = parse_month)]
    pub month: Option<YearMonth>,
    /// Weekday of the first column
    #[arg(long, value_enum, default_value_t = FirstDay::Mon)]
    pub first_day: FirstDay,
    /// Drop the Saturday and Sunday columns
    #[arg(long)]
    pub hide_weekends: bool,
    /// Hide filler days from the neighbouring months
    #[arg(long)]
    pub hide_adjacent: bool,
    /// Allow selecting several dates
    #[arg(long)]
    pub multi: bool,
    /// Date to select as YYYY-MM-DD, repeatable
    #[arg(long = "select", value_parser = parse_date)]
    pub select: Vec<NaiveDate>,
    /// Months to move forward after selecting (negative moves back)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub months: i32,
    /// Cell to tap as ROW,COLUMN after navigating, repeatable
    #[arg(long = "tap", value_parser = parse_position)]
    pub taps: Vec<CellPosition>,
}

impl Cli {
    /// Calendar configuration described by the options.
    pub fn config(&self) -> CalendarConfig {
        let selection_mode = if self.multi {
            SelectionMode::MultiSelect
        } else {
            SelectionMode::SingleSelect
        };
        CalendarConfig::default()
            .displayed_month(self.month.unwrap_or_else(YearMonth::current))
            .first_day_of_week(self.first_day.into())
            .show_weekends(!self.hide_weekends)
            .show_days_from_other_months(!self.hide_adjacent)
            .selection_mode(selection_mode)
    }
}

fn parse_month(value: &str) -> Result<YearMonth, String> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got `{value}`"))?;
    let year = year
        .parse::<i32>()
        .map_err(|err| format!("invalid year `{year}`: {err}"))?;
    let month = month
        .parse::<u32>()
        .map_err(|err| format!("invalid month `{month}`: {err}"))?;
    YearMonth::new(year, month).ok_or_else(|| format!("month out of range: `{value}`"))
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{value}`: {err}"))
}

fn parse_position(value: &str) -> Result<CellPosition, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COLUMN, got `{value}`"))?;
    let row = row
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid row `{row}`: {err}"))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("invalid column `{column}`: {err}"))?;
    Ok(CellPosition::new(row, column))
}
