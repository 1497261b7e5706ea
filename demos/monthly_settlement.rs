//! Monthly settlement example for a three-person household

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use household_ledger::utils::MemoryStorage;
use household_ledger::{
    patterns, Category, Household, HouseholdId, HouseholdLedger, LedgerConfig, Member, MemberId,
    Period,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏠 Household Ledger - Monthly Settlement Example\n");

    let storage = MemoryStorage::new();
    let household = HouseholdId(1);
    let (andrea, pamela, lucia) = (MemberId(1), MemberId(2), MemberId(3));

    // 1. Household and roster
    storage.save_household(Household {
        id: household,
        name: "Depa Miraflores".to_string(),
        monthly_budget: Some(BigDecimal::from(3500)),
    })?;
    storage.add_member(household, Member::new(andrea, "Andrea"))?;
    storage.add_member(household, Member::new(pamela, "Pamela"))?;
    storage.add_member(household, Member::new(lucia, "Lucia"))?;

    // 2. A month of shared spending
    println!("💰 Recording expenses...\n");
    let everyone = [andrea, pamela, lucia];
    let day = |month: u32, day: u32| NaiveDate::from_ymd_opt(2024, month, day).ok_or("bad date");
    let amount = |value: u32| BigDecimal::from(value);

    let expenses = vec![
        patterns::split_between(amount(1800), andrea, everyone, Category::Rent, day(3, 1)?)?,
        patterns::split_between(amount(240), pamela, everyone, Category::Utilities, day(3, 4)?)?,
        patterns::split_between(amount(412), lucia, everyone, Category::Groceries, day(3, 9)?)?,
        patterns::split_between(
            amount(95),
            pamela,
            [pamela, lucia],
            Category::Restaurants,
            day(3, 16)?,
        )?,
        patterns::paid_for(amount(38), andrea, lucia, Category::Pharmacy, day(3, 22)?)?,
        patterns::personal(amount(120), pamela, Category::Clothing, day(3, 27)?)?,
        // Previous month, for the comparison
        patterns::split_between(amount(1800), andrea, everyone, Category::Rent, day(2, 1)?)?,
        patterns::split_between(amount(530), lucia, everyone, Category::Groceries, day(2, 12)?)?,
    ];
    for expense in expenses {
        println!(
            "  ✓ {} {} paid by {} ({} sharing)",
            expense.category,
            expense.amount,
            expense.paid_by,
            expense.shared_with.len()
        );
        storage.record_expense(household, expense)?;
    }
    println!();

    let ledger = HouseholdLedger::with_config(storage, LedgerConfig::default())?;
    let period = Period::new(2024, 3)?;
    let report = ledger.monthly_report(household, period).await?;

    let name = |id: MemberId| {
        report
            .members
            .iter()
            .find(|member| member.id == id)
            .map(|member| member.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    // 3. Balances
    println!("📊 Net balances for {}:", period);
    for balance in &report.balances {
        println!(
            "  {:<8} paid {:>9}  owes {:>9}  net {:>9}",
            name(balance.member),
            balance.credit,
            balance.owed,
            balance.net
        );
    }
    println!();

    // 4. Settlement
    println!("🤝 Settlement:");
    if report.settlement.is_settled() {
        println!("  Everyone is square");
    }
    for transfer in &report.settlement.transfers {
        println!(
            "  {} pays {} to {}",
            name(transfer.debtor),
            transfer.amount,
            name(transfer.creditor)
        );
    }
    for residue in &report.settlement.residue {
        println!("  (rounding: {} left with {})", name(residue.member), residue.amount);
    }
    println!();

    // 5. Spending summary
    println!("🧾 Spending by category:");
    for total in report.summary.ranked_categories() {
        println!(
            "  {:<16} {:>9}  {:>6}%",
            total.category, total.amount, total.percentage
        );
    }
    println!(
        "  Fixed {} / Variable {} / Total {}",
        report.summary.fixed_total, report.summary.variable_total, report.summary.grand_total
    );
    println!();

    // 6. Insights
    if let Some(budget) = &report.budget {
        println!(
            "📈 Budget: {} of {} used ({}%), {} remaining",
            budget.spent, budget.budget, budget.used_percentage, budget.remaining
        );
    }
    if let Some(contributions) = &report.contributions {
        let verdict = if contributions.is_balanced {
            "balanced"
        } else {
            "uneven"
        };
        println!("⚖️  Contributions are {} (average {})", verdict, contributions.average);
    }
    let comparison = &report.comparison;
    println!(
        "📅 Against {}: {} vs {} ({})",
        period.previous(),
        comparison.current_total,
        comparison.previous_total,
        if comparison.is_lower() { "lower" } else { "higher" }
    );

    let integrity = ledger.verify_settlement(household, period).await?;
    println!(
        "\n✅ Settlement verified: {} ({} transfers)",
        integrity.is_valid, integrity.transfer_count
    );

    Ok(())
}
