//! splitledger CLI
//!
//! Compute balances, settlement suggestions, recurring rollforward, and
//! budget reports for a group activity file.
//!
//! # Usage
//!
//! ```bash
//! # Net position per member
//! splitledger balances --input group.json
//!
//! # Suggested minimal-transfer settlement plan
//! splitledger plan --input group.json --format json
//!
//! # Materialize recurring rules due by a date
//! splitledger due --input group.json --date 2024-04-01
//!
//! # Budget breakdown vs a 50/30/20 target
//! splitledger report --input group.json
//!
//! # Generate a random group file for testing
//! splitledger generate --members 8 --expenses 40
//! ```

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use splitledger::analytics::budget::{BudgetReport, TargetSplit};
use splitledger::analytics::monthly::MonthlyBreakdown;
use splitledger::core::category::Category;
use splitledger::core::expense::Expense;
use splitledger::core::group::Group;
use splitledger::core::income::IncomeEntry;
use splitledger::core::ledger::GroupLedger;
use splitledger::core::settlement::Settlement;
use splitledger::core::user::UserId;
use splitledger::plan::settle_up::SettlePlanner;
use splitledger::schedule::recurring::{Cadence, RecurringRule};
use splitledger::schedule::scheduler::Scheduler;
use splitledger::simulation::generator::{generate_activity, ActivityConfig};
use std::collections::BTreeMap;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"splitledger — group expense splitting and settlement suggestions

USAGE:
    splitledger <COMMAND> [OPTIONS]

COMMANDS:
    balances    Net position per member
    plan        Suggested minimal-transfer settlement plan
    due         Materialize recurring rules due by a date
    report      Budget breakdown vs a 50/30/20-style target
    generate    Generate a random group activity file (for testing)
    help        Show this message

OPTIONS (balances, plan, report):
    --input <FILE>      Path to JSON group activity file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (due):
    --input <FILE>      Path to JSON group activity file
    --date <DATE>       Run date, YYYY-MM-DD (required)
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (report):
    --needs <N> --wants <N> --savings <N>
                        Override the 50/30/20 target (must sum to 100)

OPTIONS (generate):
    --members <N>       Number of members (default: 5)
    --expenses <N>      Number of expenses (default: 30)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    splitledger balances --input group.json
    splitledger plan --input group.json --format json
    splitledger due --input group.json --date 2024-04-01
    splitledger report --input group.json --needs 60 --wants 20 --savings 20
    splitledger generate --members 8 --expenses 40 --output test.json"#
    );
}

// --- JSON input schema ---

#[derive(serde::Deserialize)]
struct GroupFile {
    group: String,
    members: Vec<String>,
    #[serde(default)]
    categories: Vec<CategoryInput>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
    #[serde(default)]
    settlements: Vec<SettlementInput>,
    #[serde(default)]
    income: Vec<IncomeInput>,
    #[serde(default)]
    recurring: Vec<RecurringInput>,
}

#[derive(serde::Deserialize)]
struct CategoryInput {
    name: String,
    #[serde(default)]
    budget_kind: Option<splitledger::analytics::budget::BudgetKind>,
}

#[derive(serde::Deserialize)]
struct ExpenseInput {
    payer: String,
    amount: String,
    category: String,
    date: String,
    #[serde(default)]
    description: Option<String>,
    /// Explicit per-member shares; mutually exclusive with `participants`.
    #[serde(default)]
    shares: Option<BTreeMap<String, String>>,
    /// Even split among these members when `shares` is absent.
    #[serde(default)]
    participants: Option<Vec<String>>,
}

#[derive(serde::Deserialize)]
struct SettlementInput {
    from: String,
    to: String,
    amount: String,
    date: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(serde::Deserialize)]
struct IncomeInput {
    recipient: String,
    amount: String,
    date: String,
    source: String,
}

#[derive(serde::Deserialize)]
struct RecurringInput {
    payer: String,
    amount: String,
    category: String,
    participants: Vec<String>,
    cadence: Cadence,
    next_due: String,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

// --- JSON output schemas ---

#[derive(serde::Serialize)]
struct BalanceOutput {
    member: String,
    balance: String,
    status: String,
}

#[derive(serde::Serialize)]
struct PlanOutput {
    outstanding: String,
    payment_count: usize,
    total_transferred: String,
    payments: Vec<PaymentOutput>,
}

#[derive(serde::Serialize)]
struct PaymentOutput {
    from: String,
    to: String,
    amount: String,
}

#[derive(serde::Serialize)]
struct MaterializedOutput {
    date: String,
    payer: String,
    amount: String,
    category: String,
}

fn parse_amount(raw: &str) -> Decimal {
    raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}': {}", raw, e);
        process::exit(1);
    })
}

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|e| {
        eprintln!("Invalid date '{}' (expected YYYY-MM-DD): {}", raw, e);
        process::exit(1);
    })
}

fn load_ledger(path: &str) -> GroupLedger {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "group": "flat",
  "members": ["alice", "bob"],
  "expenses": [
    {{ "payer": "alice", "amount": "90", "category": "dining",
       "date": "2024-03-01", "participants": ["alice", "bob"] }}
  ]
}}"#
        );
        process::exit(1);
    });

    let group = Group::with_members(&file.group, file.members.iter().map(UserId::new));
    let mut ledger = GroupLedger::new(group);

    for c in file.categories {
        let mut category = Category::new(&c.name);
        if let Some(kind) = c.budget_kind {
            category = category.with_budget_kind(kind);
        }
        ledger.add_category(category);
    }

    for e in file.expenses {
        let payer = UserId::new(&e.payer);
        let amount = parse_amount(&e.amount);
        let date = parse_date(&e.date);

        let mut expense = match (&e.shares, &e.participants) {
            (Some(shares), _) => {
                let shares: BTreeMap<UserId, Decimal> = shares
                    .iter()
                    .map(|(u, a)| (UserId::new(u), parse_amount(a)))
                    .collect();
                Expense::new(payer, amount, &e.category, date, shares)
            }
            (None, Some(participants)) => Expense::split_evenly(
                payer,
                amount,
                &e.category,
                date,
                participants.iter().map(UserId::new),
            ),
            (None, None) => {
                eprintln!("Expense needs either 'shares' or 'participants'");
                process::exit(1);
            }
        };
        if let Some(description) = e.description {
            expense = expense.with_description(description);
        }
        ledger.record_expense(expense).unwrap_or_else(|e| {
            eprintln!("Rejected expense: {}", e);
            process::exit(1);
        });
    }

    for s in file.settlements {
        let mut settlement = Settlement::new(
            UserId::new(&s.from),
            UserId::new(&s.to),
            parse_amount(&s.amount),
            parse_date(&s.date),
        );
        if let Some(note) = s.note {
            settlement = settlement.with_note(note);
        }
        ledger.record_settlement(settlement).unwrap_or_else(|e| {
            eprintln!("Rejected settlement: {}", e);
            process::exit(1);
        });
    }

    for i in file.income {
        let entry = IncomeEntry::new(
            UserId::new(&i.recipient),
            parse_amount(&i.amount),
            parse_date(&i.date),
            &i.source,
        );
        ledger.record_income(entry).unwrap_or_else(|e| {
            eprintln!("Rejected income: {}", e);
            process::exit(1);
        });
    }

    for r in file.recurring {
        let mut rule = RecurringRule::new(
            UserId::new(&r.payer),
            parse_amount(&r.amount),
            &r.category,
            r.participants.iter().map(UserId::new).collect(),
            r.cadence,
            parse_date(&r.next_due),
        );
        if !r.active {
            rule.deactivate();
        }
        ledger.add_rule(rule).unwrap_or_else(|e| {
            eprintln!("Rejected recurring rule: {}", e);
            process::exit(1);
        });
    }

    info!(
        "loaded group '{}': {} members, {} expenses, {} settlements",
        ledger.group().name(),
        ledger.group().member_count(),
        ledger.expenses().len(),
        ledger.settlements().len()
    );
    ledger
}

/// Parse `--input` and `--format` from an option list.
fn parse_io_options(args: &[String]) -> (String, String, Vec<(String, String)>) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut extra = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            flag if flag.starts_with("--") => {
                i += 1;
                let value = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("{} requires a value", flag);
                    process::exit(1);
                });
                extra.push((flag.trim_start_matches("--").to_string(), value));
            }
            other => {
                eprintln!("Unknown option: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format, extra)
}

fn cmd_balances(args: &[String]) {
    let (path, format, _) = parse_io_options(args);
    let ledger = load_ledger(&path);
    let balances = ledger.balances();

    if format == "json" {
        let output: Vec<BalanceOutput> = balances
            .all_positions()
            .iter()
            .map(|(user, balance)| BalanceOutput {
                member: user.to_string(),
                balance: balance.to_string(),
                status: if *balance > Decimal::ZERO {
                    "OWED".to_string()
                } else if *balance < Decimal::ZERO {
                    "OWES".to_string()
                } else {
                    "SETTLED".to_string()
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("=== Balances: {} ===", ledger.group().name());
        for (user, balance) in balances.all_positions() {
            let status = if *balance > Decimal::ZERO {
                "is owed"
            } else if *balance < Decimal::ZERO {
                "owes"
            } else {
                "settled"
            };
            println!("  {:<16} {:>10}  ({})", user.to_string(), balance, status);
        }
        println!("Outstanding: {}", balances.total_outstanding());
    }
}

fn cmd_plan(args: &[String]) {
    let (path, format, _) = parse_io_options(args);
    let ledger = load_ledger(&path);
    let balances = ledger.balances();
    let plan = SettlePlanner::suggest(&balances);

    if format == "json" {
        let output = PlanOutput {
            outstanding: plan.outstanding().to_string(),
            payment_count: plan.payment_count(),
            total_transferred: plan.total_transferred().to_string(),
            payments: plan
                .payments()
                .iter()
                .map(|p| PaymentOutput {
                    from: p.from.to_string(),
                    to: p.to.to_string(),
                    amount: p.amount.to_string(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        println!("{}", plan);
    }
}

fn cmd_due(args: &[String]) {
    let (path, format, extra) = parse_io_options(args);
    let date = extra
        .iter()
        .find(|(flag, _)| flag == "date")
        .map(|(_, value)| parse_date(value))
        .unwrap_or_else(|| {
            eprintln!("Error: --date <YYYY-MM-DD> is required");
            process::exit(1);
        });

    let mut ledger = load_ledger(&path);
    let materialized = Scheduler::run_due(&mut ledger, date).unwrap_or_else(|e| {
        eprintln!("Failed to materialize recurring expenses: {}", e);
        process::exit(1);
    });

    if format == "json" {
        let output: Vec<MaterializedOutput> = materialized
            .iter()
            .map(|e| MaterializedOutput {
                date: e.date().to_string(),
                payer: e.payer().to_string(),
                amount: e.amount().to_string(),
                category: e.category().to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else if materialized.is_empty() {
        println!("No recurring payments due by {}.", date);
    } else {
        println!("Materialized {} expense(s):", materialized.len());
        for e in &materialized {
            println!("  {}  {} paid {} ({})", e.date(), e.payer(), e.amount(), e.category());
        }
    }
}

fn cmd_report(args: &[String]) {
    let (path, format, extra) = parse_io_options(args);

    let pct = |flag: &str| -> Option<Decimal> {
        extra
            .iter()
            .find(|(f, _)| f == flag)
            .map(|(_, value)| parse_amount(value))
    };
    let target = match (pct("needs"), pct("wants"), pct("savings")) {
        (None, None, None) => TargetSplit::default(),
        (Some(needs), Some(wants), Some(savings)) => {
            if needs + wants + savings != Decimal::from(100) {
                eprintln!("Target percentages must sum to 100");
                process::exit(1);
            }
            TargetSplit::new(needs, wants, savings)
        }
        _ => {
            eprintln!("Provide all of --needs, --wants, --savings or none");
            process::exit(1);
        }
    };

    let ledger = load_ledger(&path);
    let report = BudgetReport::build(&ledger, target);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        println!("{}", report);
        let breakdown = MonthlyBreakdown::build(&ledger);
        if !breakdown.is_empty() {
            println!("{}", breakdown);
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut members = 5usize;
    let mut expenses = 30usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                members = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--members requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                expenses = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--expenses requires a number");
                    process::exit(1);
                });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = ActivityConfig {
        member_count: members,
        expense_count: expenses,
        ..Default::default()
    };
    let ledger = generate_activity(&config);

    #[derive(serde::Serialize)]
    struct OutputExpense {
        payer: String,
        amount: String,
        category: String,
        date: String,
        shares: BTreeMap<String, String>,
    }

    #[derive(serde::Serialize)]
    struct OutputSettlement {
        from: String,
        to: String,
        amount: String,
        date: String,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        group: String,
        members: Vec<String>,
        expenses: Vec<OutputExpense>,
        settlements: Vec<OutputSettlement>,
    }

    let output = OutputFile {
        group: ledger.group().name().to_string(),
        members: ledger
            .group()
            .members()
            .iter()
            .map(|u| u.to_string())
            .collect(),
        expenses: ledger
            .expenses()
            .expenses()
            .iter()
            .map(|e| OutputExpense {
                payer: e.payer().to_string(),
                amount: e.amount().to_string(),
                category: e.category().to_string(),
                date: e.date().to_string(),
                shares: e
                    .shares()
                    .iter()
                    .map(|(u, s)| (u.to_string(), s.to_string()))
                    .collect(),
            })
            .collect(),
        settlements: ledger
            .settlements()
            .iter()
            .map(|s| OutputSettlement {
                from: s.from().to_string(),
                to: s.to().to_string(),
                amount: s.amount().to_string(),
                date: s.date().to_string(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} members → {}",
            ledger.expenses().len(),
            members,
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "plan" => cmd_plan(rest),
        "due" => cmd_due(rest),
        "report" => cmd_report(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
