//! 完整生產規劃示例

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use stitch_calc::PlanCalculator;
use stitch_core::{
    ColorStrategy, Complexity, FinanceInputs, InventoryInputs, MoqInputs, OrderSpec,
    PaymentFlexibility, PlanRequest, SizeCode, TimelineInputs,
};
use stitch_tables::StaticTables;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 完整生產規劃示例 ===\n");

    // 訂單：500 件連帽衫，三個配色
    let order = OrderSpec::new(
        "hoodie-pullover",
        SizeCode::M,
        "cotton-jersey-180gsm",
        "EcoKnits-Tirupur",
        500,
    )
    .with_colors(vec![
        "black".to_string(),
        "heather-grey".to_string(),
        "olive".to_string(),
    ])
    .with_target_launch(NaiveDate::from_ymd_opt(2026, 7, 1).unwrap());

    let finance = FinanceInputs {
        initial_capital: Decimal::from(25_000),
        retail_price: None,
        expected_monthly_sales: vec![60, 80, 90, 90, 70, 60],
    };

    let inventory = InventoryInputs {
        category: "activewear".to_string(),
        fit_type: "standard".to_string(),
        target_demographic: "unisex".to_string(),
        color_strategy: ColorStrategy::NeutralHeavy,
        lead_time_weeks: 8,
        expected_weekly_sales: Decimal::from(25),
        selling_season_weeks: 26,
    };

    let timeline = TimelineInputs {
        order_month: 3,
        complexity: Complexity::Medium,
        today: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
    };

    let request = PlanRequest::new(order, finance, inventory, timeline).with_moq(MoqInputs {
        num_styles: 3,
        order_month: 3,
        payment_flexibility: PaymentFlexibility::FiftyDeposit,
        target_units: 500,
        fabrics: vec!["cotton-jersey-180gsm".to_string()],
        colors: vec![
            "black".to_string(),
            "heather-grey".to_string(),
            "olive".to_string(),
        ],
    });

    let calculator = PlanCalculator::new(Arc::new(StaticTables::new()));
    let plan = calculator.calculate(&request)?;

    // 成本鏈
    println!("成本分解（單件）:");
    println!("  用布量: {} m", plan.cost.fabric_consumption_meters);
    println!("  布料: ${}", plan.cost.fabric_cost);
    println!("  輔料: ${}", plan.cost.trim_cost);
    println!("  人工: ${}", plan.cost.labor_cost);
    println!("  FOB: ${}", plan.cost.fob);
    println!("  到岸成本: ${}", plan.cost.landed_cost);
    println!(
        "  DTC 定價: ${}（毛利 {}%）",
        plan.cost.pricing.dtc.price, plan.cost.pricing.dtc.margin_pct
    );

    // 現金流
    println!("\n現金流:");
    println!("  訂金: ${}", plan.cashflow.payment_schedule.deposit_amount);
    println!("  尾款: ${}", plan.cashflow.payment_schedule.balance_amount);
    println!("  現金最低點: ${}", plan.cashflow.capital.lowest_cash_point);
    match plan.cashflow.breakeven.breakeven_month {
        Some(month) => println!("  損益平衡: 第 {} 個月", month),
        None => println!("  損益平衡: 預測期內未達成"),
    }

    // 庫存分配
    println!("\n庫存分配（曲線: {}）:", plan.inventory.size_curve_applied);
    for allocation in &plan.inventory.size_allocation {
        println!(
            "  {}: {} 件（{}%）",
            allocation.size.as_str(),
            allocation.units,
            allocation.percentage
        );
    }
    println!("  SKU 數: {}", plan.inventory.sku_count());

    // 時程
    println!("\n生產時程（共 {} 天）:", plan.timeline.total_calendar_days);
    for phase in &plan.timeline.phases {
        println!(
            "  {} ~ {}  {}（{} 天）",
            phase.start_date, phase.end_date, phase.name, phase.duration_days
        );
    }
    println!("  預計完成: {}", plan.timeline.estimated_completion);

    // MOQ 談判
    if let Some(moq) = &plan.moq {
        println!("\nMOQ 談判:");
        for strategy in &moq.strategies {
            println!(
                "  {}: 標準 {} → 預估 {}（成功率 {}）",
                strategy.supplier,
                strategy.standard_moq,
                strategy.estimated_moq,
                strategy.success_probability
            );
        }
        println!("  建議: {}", moq.recommendation);
    }

    // 警告
    if !plan.warnings.is_empty() {
        println!("\n警告:");
        for warning in &plan.warnings {
            println!("  [{}] {}", warning.subject, warning.message);
        }
    }

    Ok(())
}
