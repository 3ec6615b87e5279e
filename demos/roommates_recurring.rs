//! Recurring household expenses and budget analytics example.
//!
//! Demonstrates scheduling monthly bills, catching up past-due rules,
//! and checking spending against a 50/30/20 target.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use splitledger::analytics::budget::{BudgetKind, BudgetReport, TargetSplit};
use splitledger::analytics::monthly::MonthlyBreakdown;
use splitledger::core::expense::Expense;
use splitledger::core::group::Group;
use splitledger::core::income::IncomeEntry;
use splitledger::core::ledger::GroupLedger;
use splitledger::core::user::UserId;
use splitledger::plan::settle_up::SettlePlanner;
use splitledger::schedule::recurring::{Cadence, RecurringRule};
use splitledger::schedule::scheduler::Scheduler;

fn main() {
    env_logger::init();

    println!("╔═══════════════════════════════════════════╗");
    println!("║  splitledger: Roommates & Recurring Bills ║");
    println!("╚═══════════════════════════════════════════╝\n");

    let ana = UserId::new("ana");
    let ben = UserId::new("ben");

    let mut ledger = GroupLedger::new(Group::with_members(
        "apartment-4b",
        [ana.clone(), ben.clone()],
    ));

    let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(2024, m, day).unwrap();

    // --- Scenario 1: Standing bills ---
    println!("━━━ Scenario 1: Standing Bills ━━━\n");

    println!("Rules:");
    println!("  rent     $1,400.00/month, ana pays, due the 1st");
    println!("  internet    $60.00/month, ben pays, due the 1st\n");

    ledger
        .add_rule(
            RecurringRule::new(
                ana.clone(),
                dec!(1400.00),
                "rent",
                vec![ana.clone(), ben.clone()],
                Cadence::Monthly,
                d(1, 1),
            )
            .with_description("apartment rent"),
        )
        .unwrap();
    ledger
        .add_rule(
            RecurringRule::new(
                ben.clone(),
                dec!(60.00),
                "internet",
                vec![ana.clone(), ben.clone()],
                Cadence::Monthly,
                d(1, 1),
            )
            .with_description("fiber plan"),
        )
        .unwrap();

    // Two months go by before anyone opens the app; the scheduler
    // materializes every missed occurrence.
    let today = d(2, 15);
    let materialized = Scheduler::run_due(&mut ledger, today).unwrap();
    println!("Catching up through {}:", today);
    for expense in &materialized {
        println!(
            "  {}  {:<10} ${:>8}  paid by {}",
            expense.date(),
            expense.category(),
            expense.amount(),
            expense.payer()
        );
    }
    println!();

    // --- Scenario 2: One-off spending and income ---
    println!("━━━ Scenario 2: One-off Spending & Income ━━━\n");

    ledger
        .record_expense(Expense::split_evenly(
            ben.clone(),
            dec!(180.00),
            "groceries",
            d(2, 10),
            [ana.clone(), ben.clone()],
        ))
        .unwrap();
    ledger
        .record_expense(Expense::split_evenly(
            ana.clone(),
            dec!(95.00),
            "dining",
            d(2, 14),
            [ana.clone(), ben.clone()],
        ))
        .unwrap();
    ledger
        .record_income(
            IncomeEntry::new(ana.clone(), dec!(4200.00), d(2, 1), "salary")
                .with_allocation(BudgetKind::Emergency, dec!(400.00)),
        )
        .unwrap();
    ledger
        .record_income(IncomeEntry::new(ben.clone(), dec!(3100.00), d(2, 1), "salary"))
        .unwrap();

    // --- Scenario 3: Budget report ---
    println!("━━━ Scenario 3: Budget vs 50/30/20 Target ━━━\n");

    let report = BudgetReport::build(&ledger, TargetSplit::default());
    println!("{}", report);

    // --- Scenario 4: Month-by-month breakdown ---
    println!("━━━ Scenario 4: Monthly Breakdown ━━━\n");

    let breakdown = MonthlyBreakdown::build(&ledger);
    for (month, summary) in breakdown.months() {
        println!(
            "  {}  spent ${:>9}  income ${:>9}  net ${:>9}",
            month,
            summary.spent,
            summary.income,
            summary.net()
        );
    }
    println!();

    // --- Scenario 5: Settle up ---
    println!("━━━ Scenario 5: Settling the Ledger ━━━\n");

    let plan = SettlePlanner::suggest(&ledger.balances());
    println!("{}", plan);
}
