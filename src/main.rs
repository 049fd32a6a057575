use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate, Weekday};
use std::env;
use std::path::Path;

use rate_ledger::{
    date_label, weekday_abbrev, CalendarView, CellEntry, CsvTableStore, DayCell, ProductSetting,
    Session,
};

const DEFAULT_DATA_DIR: &str = "ledger-data";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("demo") => run_demo(dir_arg(&args, 2)),
        Some("show") => {
            let hotel = hotel_arg(&args)?;
            run_show(&hotel, dir_arg(&args, 3))
        }
        Some("export") => {
            let hotel = hotel_arg(&args)?;
            run_export(&hotel, dir_arg(&args, 3))
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn dir_arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or(DEFAULT_DATA_DIR)
}

fn hotel_arg(args: &[String]) -> Result<String> {
    match args.get(2) {
        Some(hotel) => Ok(hotel.clone()),
        None => bail!("missing hotel name (usage: rate-ledger {} HOTEL [DIR])", args[1]),
    }
}

fn print_usage() {
    println!("🏨 rate-ledger {}", rate_ledger::VERSION);
    println!();
    println!("Usage:");
    println!("  rate-ledger demo [DIR]           seed sample data and print a stock calendar");
    println!("  rate-ledger show HOTEL [DIR]     print a hotel's ledger rows");
    println!("  rate-ledger export HOTEL [DIR]   write the channel upload file");
    println!();
    println!("DIR defaults to ./{DEFAULT_DATA_DIR}");
}

fn open_session(dir: &str, today: NaiveDate) -> Result<Session<CsvTableStore>> {
    let store = CsvTableStore::open(dir)
        .with_context(|| format!("failed to open data directory '{dir}'"))?;
    Session::load(store, today).context("failed to load persisted state")
}

fn run_demo(dir: &str) -> Result<()> {
    let today = Local::now().date_naive();
    let mut session = open_session(dir, today)?;

    if session.catalog().is_empty() {
        println!("🌱 Seeding sample catalog...");
        session.add_hotel("Seaside Resort")?;
        session.add_hotel("Mountain Lodge")?;
        session.select_hotel("Seaside Resort")?;
        session.add_product("Family Standard [3P]", Some("FS-3".to_string()))?;
        session.add_product("Suite Ocean [4P]", Some("SO-4".to_string()))?;
    } else {
        let first = match session.catalog().hotels().first() {
            Some(hotel) => hotel.clone(),
            None => bail!("catalog has products but no hotels; data directory looks corrupt"),
        };
        session.select_hotel(&first)?;
    }
    let hotel = session.current_hotel().unwrap_or_default().to_string();
    println!("🏨 Working on: {hotel}");

    // Stage the next four weekends and commit rates for every product.
    let staged = session.stage_dates(
        today,
        today + Duration::days(27),
        &[Weekday::Fri, Weekday::Sat],
    )?;
    println!("📅 Staged {staged} weekend dates:");
    for label in session.staged_labels() {
        println!("   - {label}");
    }

    let settings: Vec<ProductSetting> = session
        .products()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            ProductSetting::new(&p.name)
                .with_price(189_000 + 70_000 * i as u32)
                .with_stock(3)
        })
        .collect();
    let written = session.commit(&settings)?;
    println!("💾 Committed {written} ledger rows");

    println!();
    println!("🗓  Stock calendar {}", session.month_label());
    print_grid(&session.month_grid(CalendarView::Stock)?);

    println!();
    println!("✓ Data flushed to '{dir}'");
    Ok(())
}

fn run_show(hotel: &str, dir: &str) -> Result<()> {
    let today = Local::now().date_naive();
    let mut session = open_session(dir, today)?;
    session.select_hotel(hotel)?;

    let rows = session.rows();
    if rows.is_empty() {
        println!("No ledger rows for '{hotel}' yet.");
        return Ok(());
    }

    println!("📋 {} rows for {hotel}", rows.len());
    for row in rows {
        println!(
            "  {}  {:<24} {:>10}  stock {:>2}  [{}]",
            date_label(row.date),
            row.product,
            rate_ledger::format_price(row.price),
            row.stock,
            row.status.channel_flag(),
        );
    }
    Ok(())
}

fn run_export(hotel: &str, dir: &str) -> Result<()> {
    let today = Local::now().date_naive();
    let mut session = open_session(dir, today)?;
    session.select_hotel(hotel)?;

    let path = session
        .export_to(Path::new(dir), today)
        .context("failed to write upload file")?;
    println!("📤 Wrote {} rows to {}", session.rows().len(), path.display());
    Ok(())
}

fn print_grid(grid: &rate_ledger::MonthGrid) {
    let header: Vec<&str> = grid
        .weekday_headers()
        .iter()
        .map(|w| weekday_abbrev(*w))
        .collect();
    println!("  {}", header.join(" "));

    for week in &grid.weeks {
        let days: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                DayCell::Outside => "  ·".to_string(),
                DayCell::Day { day, .. } => format!("{day:3}"),
            })
            .collect();
        println!("  {}", days.join(" "));

        for cell in week {
            if let DayCell::Day { day, entries } = cell {
                if !entries.is_empty() {
                    println!("    {day:>2}: {}", describe_entries(entries));
                }
            }
        }
    }
}

fn describe_entries(entries: &[CellEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let badge = if e.suspended { " ⛔" } else { "" };
            format!("{} {}{badge}", e.product, e.display)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
