//! Mortgage Engine CLI
//!
//! Command-line interface for loan schedules, full loan results, tax benefits,
//! loan comparisons, and batch runs

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use mortgage_engine::loan::{load_loan_json, load_loans};
use mortgage_engine::results::CalculationConfig;
use mortgage_engine::{
    generate_amortization_schedule, calculate_monthly_payment, AmortizationEntry, FilingStatus,
    LoanInputs, LoanResults, ScenarioRunner, TaxProfile,
};

#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage payment, amortization, and tax benefit calculations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// First payment is one month after this date (default: today)
    #[arg(long, global = true)]
    start: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an amortization schedule and write it to CSV
    Schedule(ScheduleArgs),
    /// Full results for a loan described in a JSON file
    Loan(LoanArgs),
    /// Tax benefit of mortgage interest and property tax deductions
    Tax(TaxArgs),
    /// Compare two loans described in JSON files
    Compare(CompareArgs),
    /// Evaluate every loan in a CSV file
    Batch(BatchArgs),
}

#[derive(Args)]
struct ScheduleArgs {
    #[arg(long)]
    principal: f64,
    /// Annual rate in percent
    #[arg(long)]
    rate: f64,
    #[arg(long)]
    term: u32,
    #[arg(long, default_value = "amortization_schedule.csv")]
    output: PathBuf,
    /// Rows to print to the console
    #[arg(long, default_value_t = 12)]
    rows: usize,
}

#[derive(Args)]
struct LoanArgs {
    /// LoanInputs JSON file
    input: PathBuf,
    /// Print the full results as JSON instead of a summary
    #[arg(long)]
    json: bool,
    /// Write the effective schedule to this CSV file
    #[arg(long)]
    schedule: Option<PathBuf>,
}

#[derive(Args)]
struct TaxArgs {
    /// LoanInputs JSON file
    input: PathBuf,
    #[arg(long)]
    income: f64,
    /// single, married_joint, married_separate, head_of_household
    #[arg(long, default_value = "single")]
    filing_status: FilingStatus,
    #[arg(long, default_value_t = 0.0)]
    property_tax: f64,
    /// Directory with tax_brackets.csv and standard_deductions.csv
    #[arg(long)]
    tax_tables: Option<PathBuf>,
    #[arg(long, default_value_t = 2025)]
    tax_year: i32,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompareArgs {
    first: PathBuf,
    second: PathBuf,
}

#[derive(Args)]
struct BatchArgs {
    /// Loan CSV file
    input: PathBuf,
    #[arg(long, default_value = "batch_results.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match cli.start {
        Some(start) => CalculationConfig::starting(start),
        None => CalculationConfig::default(),
    };

    match cli.command {
        Commands::Schedule(args) => run_schedule(args, &config),
        Commands::Loan(args) => run_loan(args, config),
        Commands::Tax(args) => run_tax(args),
        Commands::Compare(args) => run_compare(args, config),
        Commands::Batch(args) => run_batch(args, config),
    }
}

fn run_schedule(args: ScheduleArgs, config: &CalculationConfig) -> Result<()> {
    let payment = calculate_monthly_payment(args.principal, args.rate, args.term);
    let schedule = generate_amortization_schedule(args.principal, args.rate, args.term, config.start_date);

    println!(
        "Loan: {} at {} for {} years",
        format_currency(args.principal, 2),
        format_percentage(args.rate),
        args.term
    );
    println!("Monthly P&I: {}\n", format_currency(payment, 2));
    print_schedule(&schedule, args.rows);

    write_schedule_csv(&args.output, &schedule)?;
    println!("\nFull schedule written to: {}", args.output.display());
    Ok(())
}

fn run_loan(args: LoanArgs, config: CalculationConfig) -> Result<()> {
    let loan = load_loan(&args.input)?;
    let results = ScenarioRunner::with_config(config)
        .run(&loan)
        .with_context(|| format!("Calculating {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_results(&results);
    }

    if let Some(path) = args.schedule {
        write_schedule_csv(&path, results.effective_schedule())?;
        println!("\nSchedule written to: {}", path.display());
    }
    Ok(())
}

fn run_tax(args: TaxArgs) -> Result<()> {
    let loan = load_loan(&args.input)?;
    let profile = TaxProfile {
        annual_income: args.income,
        filing_status: args.filing_status,
        property_tax_annual: args.property_tax,
    };

    let runner = match &args.tax_tables {
        Some(dir) => ScenarioRunner::from_csv_path(args.tax_year, dir)
            .with_context(|| format!("Loading tax tables from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };
    let benefit = runner.tax_benefits(&loan, &profile)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&benefit)?);
        return Ok(());
    }

    println!("Tax Benefits ({}):", profile.filing_status);
    println!("  First-Year Interest:      {}", format_currency(benefit.first_year_interest, 0));
    println!("  Interest Deduction:       {}", format_currency(benefit.mortgage_interest_deduction, 0));
    println!("  Property Tax Deduction:   {}", format_currency(benefit.property_tax_deduction, 0));
    println!("  Total Itemized:           {}", format_currency(benefit.total_itemized_deductions, 0));
    println!("  Standard Deduction:       {}", format_currency(benefit.standard_deduction, 0));
    println!("  Recommended:              {:?}", benefit.recommended_method);
    println!("  Marginal Rate:            {}", format_percentage(benefit.marginal_tax_rate * 100.0));
    println!("  Annual Tax Savings:       {}", format_currency(benefit.annual_tax_savings, 0));
    println!("  Monthly Tax Savings:      {}", format_currency(benefit.monthly_tax_savings, 0));
    println!("  Original Payment:         {}", format_currency(benefit.original_monthly_payment, 0));
    println!("  Effective Payment:        {}", format_currency(benefit.effective_monthly_payment, 0));
    if benefit.exceeds_750k_limit {
        println!("  Note: interest deduction prorated to the $750,000 qualified debt limit");
    }
    if benefit.exceeds_salt_cap {
        println!("  Note: property tax deduction capped at $10,000");
    }
    Ok(())
}

fn run_compare(args: CompareArgs, config: CalculationConfig) -> Result<()> {
    let first = load_loan(&args.first)?;
    let second = load_loan(&args.second)?;
    let comparison = ScenarioRunner::with_config(config).compare(&first, &second)?;

    println!("Loan 2 vs Loan 1:");
    println!("  Monthly Payment:  {}", format_signed(comparison.monthly_payment_difference));
    println!("  Total Interest:   {}", format_signed(comparison.total_interest_difference));
    println!("  Total Cost:       {}", format_signed(comparison.total_cost_difference));
    println!("  Cash at Closing:  {}", format_signed(comparison.cash_at_closing_difference));
    println!("  Lifetime Cost:    {}", format_signed(comparison.lifetime_cost_difference));
    match comparison.cheaper {
        Some(loan) => println!("  Cheaper: {:?}", loan),
        None => println!("  Cheaper: neither (equal lifetime cost)"),
    }
    Ok(())
}

fn run_batch(args: BatchArgs, config: CalculationConfig) -> Result<()> {
    let start = Instant::now();
    let loans = load_loans(&args.input)
        .with_context(|| format!("Loading loans from {}", args.input.display()))?;
    println!("Loaded {} loans in {:?}", loans.len(), start.elapsed());

    let results = ScenarioRunner::with_config(config).run_batch(&loans);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;
    writer.write_record([
        "Row",
        "Principal",
        "Rate",
        "TermYears",
        "MonthlyPI",
        "MonthlyTotal",
        "TotalInterest",
        "TotalCost",
        "CashAtClosing",
        "PMIRemovalMonth",
        "WorstCasePayment",
        "Error",
    ])?;

    let mut failures = 0;
    for (i, (loan, result)) in loans.iter().zip(&results).enumerate() {
        let row = (i + 1).to_string();
        let record = match result {
            Ok(r) => vec![
                row,
                format!("{:.2}", loan.principal),
                format!("{:.4}", r.effective_rate),
                loan.term_years.to_string(),
                format!("{:.2}", r.monthly_payment_pi),
                format!("{:.2}", r.monthly_payment_total),
                format!("{:.2}", r.total_interest),
                format!("{:.2}", r.total_cost),
                format!("{:.2}", r.cash_needed_at_closing),
                r.pmi_removal_month.map(|m| m.to_string()).unwrap_or_default(),
                r.worst_case_max_payment.map(|p| format!("{:.2}", p)).unwrap_or_default(),
                String::new(),
            ],
            Err(e) => {
                failures += 1;
                let mut record = vec![
                    row,
                    format!("{:.2}", loan.principal),
                    format!("{:.4}", loan.interest_rate),
                    loan.term_years.to_string(),
                ];
                record.extend(std::iter::repeat(String::new()).take(7));
                record.push(e.to_string());
                record
            }
        };
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "Evaluated {} loans ({} rejected) in {:?}",
        loans.len(),
        failures,
        start.elapsed()
    );
    println!("Output written to {}", args.output.display());
    Ok(())
}

fn load_loan(path: &Path) -> Result<LoanInputs> {
    load_loan_json(path).with_context(|| format!("Reading loan from {}", path.display()))
}

fn print_results(results: &LoanResults) {
    println!("Loan Results:");
    println!("  Effective Rate:       {}", format_percentage(results.effective_rate));
    println!("  Monthly P&I:          {}", format_currency(results.monthly_payment_pi, 2));
    println!("  Monthly Escrow:       {}", format_currency(results.monthly_escrow, 2));
    if results.monthly_pmi > 0.0 {
        println!("  Monthly PMI:          {}", format_currency(results.monthly_pmi, 2));
    }
    println!("  Total Monthly:        {}", format_currency(results.monthly_payment_total, 2));
    println!("  Total Interest:       {}", format_currency(results.total_interest, 0));
    println!("  Total Cost:           {}", format_currency(results.total_cost, 0));

    println!("\nClosing:");
    println!("  Closing Costs:        {}", format_currency(results.total_closing_costs, 0));
    println!("  Net Closing Costs:    {}", format_currency(results.net_closing_costs, 0));
    println!("  Down Payment:         {}", format_currency(results.down_payment, 0));
    println!("  Cash at Closing:      {}", format_currency(results.cash_needed_at_closing, 0));
    if let Some(ltv) = results.loan_to_value {
        println!("  LTV:                  {}", format_percentage(ltv));
    }

    if let (Some(month), Some(date)) = (results.pmi_removal_month, results.pmi_removal_date) {
        println!("\nPMI removed at payment {} ({})", month, date);
    }
    if results.total_pmi_paid > 0.0 {
        println!("  Total PMI Paid:       {}", format_currency(results.total_pmi_paid, 0));
    }

    if let (Some(months), Some(saved)) = (results.accelerated_term_months, results.total_interest_saved) {
        println!("\nExtra Payments:");
        println!("  Term:                 {} -> {} months", results.original_term_months, months);
        println!("  Interest Saved:       {}", format_currency(saved, 0));
        if let Some(date) = results.early_payoff_date {
            println!("  Payoff Date:          {}", date);
        }
    }

    if let Some(projections) = &results.arm_projections {
        println!("\nARM Worst Case:");
        println!("{:>5} {:>8} {:>12}", "Year", "Rate", "Payment");
        for p in projections {
            println!("{:>5} {:>8} {:>12}", p.year, format_percentage(p.rate), format_currency(p.monthly_payment, 2));
        }
        if let Some(max) = results.worst_case_max_payment {
            println!("  Max Payment:          {}", format_currency(max, 2));
        }
        if let Some(total) = results.worst_case_total_cost {
            println!("  Worst-Case Total:     {}", format_currency(total, 0));
        }
    }
}

fn print_schedule(schedule: &[AmortizationEntry], rows: usize) {
    println!("{:>5} {:>12} {:>14} {:>14} {:>14}", "Pmt", "Date", "Principal", "Interest", "Balance");
    println!("{}", "-".repeat(63));
    for e in schedule.iter().take(rows) {
        println!("{}", schedule_row(e));
    }
    if schedule.len() > rows {
        println!("... ({} more payments)", schedule.len() - rows);
    }
}

/// One console row; the date is rendered first so the column width applies
fn schedule_row(e: &AmortizationEntry) -> String {
    format!(
        "{:>5} {:>12} {:>14} {:>14} {:>14}",
        e.payment_number,
        e.payment_date.to_string(),
        format_currency(e.principal_paid, 2),
        format_currency(e.interest_paid, 2),
        format_currency(e.remaining_balance, 2),
    )
}

fn write_schedule_csv(path: &Path, schedule: &[AmortizationEntry]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Creating {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record([
        "Payment", "Date", "Principal", "Interest", "ExtraPrincipal", "PMI", "TotalPayment", "Balance", "Rate", "LTV",
    ])?;
    for e in schedule {
        writer.write_record([
            e.payment_number.to_string(),
            e.payment_date.to_string(),
            format!("{:.2}", e.principal_paid),
            format!("{:.2}", e.interest_paid),
            format!("{:.2}", e.extra_principal_paid),
            format!("{:.2}", e.pmi_paid),
            format!("{:.2}", e.total_payment),
            format!("{:.2}", e.remaining_balance),
            format!("{:.4}", e.interest_rate),
            e.ltv_percent.map(|ltv| format!("{:.2}", ltv)).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// USD with thousands separators: 1234567.891 -> $1,234,567.89
fn format_currency(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("{}${}.{}", sign, grouped, fraction),
        None => format!("{}${}", sign, grouped),
    }
}

fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{}", format_currency(value, 0))
    } else {
        format_currency(value, 0)
    }
}

/// Percent value to two decimals: 6.5 -> 6.50%
fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}
