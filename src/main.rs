// Entry point and high-level CLI flow.
//
// - Option [1] loads the three export files, printing diagnostics.
// - Option [2] builds the sales report for a fiscal year, writes the JSON
//   and previews a few tables.
// - After generating a report, the user can go back to the menu or exit.
use anyhow::Result;
use once_cell::sync::Lazy;
use sales_report::category::to_gregorian;
use sales_report::config::ReportConfig;
use sales_report::loader::{self, LoadReport};
use sales_report::scope::ReportRequest;
use sales_report::source::Dataset;
use sales_report::{output, reports, util};
use std::io::{self, Write};
use std::sync::Mutex;

// Load the exports once, report on them as many times as needed.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Dataset>,
}

fn app_state() -> std::sync::MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn print_load_report(what: &str, report: &LoadReport) {
    println!(
        "{}: {} rows read, {} loaded, {} skipped.",
        what,
        util::format_int(report.total_rows),
        util::format_int(report.loaded_rows),
        util::format_int(report.parse_errors)
    );
    if report.quarter_mismatches > 0 {
        println!(
            "Note: {} rows had a quarter that did not match their month (month used).",
            util::format_int(report.quarter_mismatches)
        );
    }
}

/// Handle option [1]: load the fact, member and submission exports.
fn handle_load(config: &ReportConfig) {
    let loaded = (|| -> sales_report::error::ReportResult<Dataset> {
        let (facts, fact_report) = loader::load_fact_rows(&config.facts_path)?;
        let (members, member_report) = loader::load_members(&config.members_path)?;
        let (submissions, sub_report) = loader::load_submissions(&config.submissions_path)?;
        print_load_report("Contract facts", &fact_report);
        print_load_report("Members", &member_report);
        print_load_report("Submissions", &sub_report);
        Ok(Dataset {
            facts,
            members,
            submissions,
        })
    })();

    match loaded {
        Ok(data) => {
            println!();
            app_state().data = Some(data);
        }
        Err(e) => {
            log::error!("load failed: {e}");
            eprintln!("Failed to load data: {}\n", e);
        }
    }
}

/// Handle option [2]: build the report and write it out.
fn handle_generate_reports(config: &ReportConfig) {
    let data = app_state().data.clone();
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the data files first (option 1).\n");
        return;
    };

    let today = util::today_at_offset(config.utc_offset_hours);
    let year_input = read_line("Fiscal year (blank for current): ");
    let years = match year_input.parse::<i32>() {
        Ok(y) => vec![y],
        Err(_) if year_input.is_empty() => Vec::new(),
        Err(_) => {
            println!("Invalid year: {}\n", year_input);
            return;
        }
    };

    let request = ReportRequest {
        role: config.role,
        user_id: config.user_id,
        years,
        months: Vec::new(),
        quarters: Vec::new(),
        comparison_years: config.comparison_years,
    };

    let report = match reports::build_report(&data, &data, &request, config, today) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Report failed: {}\n", e);
            return;
        }
    };

    println!("Generating reports...");
    if let Err(e) = output::write_json(&config.output_path, &report) {
        eprintln!("Write error: {}", e);
    }

    for year in report.monthly_member_summary.keys() {
        println!("== Fiscal year {} (AD {}) ==\n", year, to_gregorian(*year));
        println!("Sales by Price Range ({})\n", year);
        output::preview_table_rows(&output::price_range_rows(&report, *year), 6);
        println!("Sales by Region ({})\n", year);
        output::preview_table_rows(&output::region_rows(&report, *year), 8);
        println!("Member Submissions ({})\n", year);
        output::preview_table_rows(&output::membership_rows(&report, *year), 12);
    }

    if report.excluded_rows.rows > 0 {
        println!(
            "Note: {} rows excluded for unrecognised region/price range labels.",
            util::format_int(report.excluded_rows.rows)
        );
    }
    println!("(Full report exported to {})\n", config.output_path);
}

fn main() -> Result<()> {
    env_logger::init();
    let config = ReportConfig::from_env()?;

    loop {
        println!("Sales Contract Reports:");
        println!("[1] Load the data files");
        println!("[2] Generate Reports\n");
        match read_line("Enter choice: ").as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                handle_generate_reports(&config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1 or 2.\n"),
        }
    }
    Ok(())
}
