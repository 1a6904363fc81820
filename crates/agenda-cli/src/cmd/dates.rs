use crate::output::print_json;
use agenda_core::paths::format_date;
use chrono::NaiveDate;

pub fn run(today: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let dates = super::week_dates(today);

    if json {
        print_json(&dates)?;
    } else {
        println!("Last week: {}", format_date(dates.last_week));
        println!("Next week: {}", format_date(dates.next_week));
    }
    Ok(())
}
