//! Basic expense splitting and settle-up example.
//!
//! Demonstrates recording shared expenses, reading the resulting
//! balance sheet, and computing a minimal set of suggested payments.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use splitledger::core::expense::Expense;
use splitledger::core::group::Group;
use splitledger::core::ledger::GroupLedger;
use splitledger::core::settlement::Settlement;
use splitledger::core::user::UserId;
use splitledger::plan::settle_up::SettlePlanner;

fn main() {
    println!("╔═══════════════════════════════════════╗");
    println!("║  splitledger: Basic Split Example     ║");
    println!("╚═══════════════════════════════════════╝\n");

    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let carol = UserId::new("carol");

    let mut ledger = GroupLedger::new(Group::with_members(
        "weekend-trip",
        [alice.clone(), bob.clone(), carol.clone()],
    ));

    // --- Scenario 1: A weekend of shared expenses ---
    println!("━━━ Scenario 1: Shared Expenses ━━━\n");

    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();

    println!("Expenses:");
    println!("  alice pays $240.00 for the cabin  (split 3 ways)");
    println!("  bob   pays  $90.00 for groceries  (split 3 ways)");
    println!("  carol pays  $45.00 for gas        (alice and carol)\n");

    ledger
        .record_expense(Expense::split_evenly(
            alice.clone(),
            dec!(240.00),
            "lodging",
            day(1),
            [alice.clone(), bob.clone(), carol.clone()],
        ))
        .unwrap();
    ledger
        .record_expense(Expense::split_evenly(
            bob.clone(),
            dec!(90.00),
            "groceries",
            day(2),
            [alice.clone(), bob.clone(), carol.clone()],
        ))
        .unwrap();
    ledger
        .record_expense(Expense::split_evenly(
            carol.clone(),
            dec!(45.00),
            "gas",
            day(2),
            [alice.clone(), carol.clone()],
        ))
        .unwrap();

    let balances = ledger.balances();
    println!("Balances:");
    for (user, balance) in balances.all_positions() {
        let status = if *balance > dec!(0) {
            "is owed"
        } else if *balance < dec!(0) {
            "owes"
        } else {
            "settled"
        };
        println!("  {:<8} {:>10}  [{}]", user, balance, status);
    }
    println!();

    // --- Scenario 2: Pairwise debt view ---
    println!("━━━ Scenario 2: Who Owes Whom ━━━\n");

    let graph = ledger.debt_graph();
    for (from, to, amount) in graph.edges() {
        println!("  {} owes {} ${}", from, to, amount);
    }
    let net = graph.pairwise_net(&bob, &alice);
    println!(
        "\n  bob/alice after offsetting: net ${}, cancelled ${}\n",
        net.net_amount, net.cancelled
    );

    // --- Scenario 3: Settle up ---
    println!("━━━ Scenario 3: Suggested Payments ━━━\n");

    let plan = SettlePlanner::suggest(&balances);
    println!("{}", plan);
    println!(
        "Total moved: ${} across {} payment(s)\n",
        plan.total_transferred(),
        plan.payment_count()
    );

    // Record one of the suggested payments and re-plan.
    println!("━━━ Scenario 4: After Bob Pays Up ━━━\n");

    let first = plan.payments()[0].clone();
    ledger
        .record_settlement(Settlement::new(
            first.from.clone(),
            first.to.clone(),
            first.amount,
            day(3),
        ))
        .unwrap();

    let remaining = SettlePlanner::suggest(&ledger.balances());
    if remaining.is_empty() {
        println!("  Everyone is settled.");
    } else {
        println!("{}", remaining);
    }
}
