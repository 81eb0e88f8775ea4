// Production planning, written as expressions instead of a coefficient matrix
//
// A workshop builds chairs and tables:
// - Each chair takes 2 hours of labour, each table 3 hours
// - 100 hours of labour are available
// - At most 40 pieces fit in storage
// - Profit is $30 per chair and $50 per table
//
// Maximize: 30*chairs + 50*tables
// Subject to:
//   2*chairs + 3*tables <= 100  (labour)
//   chairs + tables <= 40       (storage)
//
// Run with: cargo run --example production_plan

use milpkit::{Domain, Model, SolutionStatus, SolverBackend, SolverConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SolverConfig::new(SolverBackend::MicroLp).with_time_limit(10.0);
    let mut model = Model::with_config(config)?;

    let chairs = model.create("chairs", Domain::NON_NEGATIVE_INTEGER)?;
    let tables = model.create("tables", Domain::NON_NEGATIVE_INTEGER)?;

    // labour
    let chair_hours = model.scale(chairs, 2.0, Domain::NON_NEGATIVE_REAL)?;
    let table_hours = model.scale(tables, 3.0, Domain::NON_NEGATIVE_REAL)?;
    let hours = model.sum(chair_hours, table_hours, Domain::NON_NEGATIVE_REAL)?;
    let available = model.named_constant("available_hours", 100, Domain::NON_NEGATIVE_CONSTANT_REAL)?;
    model.set_less_or_equal(hours, available)?;

    // storage
    let pieces = model.sum(chairs, tables, Domain::NON_NEGATIVE_INTEGER)?;
    let storage = model.named_constant("storage", 40, Domain::NON_NEGATIVE_CONSTANT_INTEGER)?;
    model.set_less_or_equal(pieces, storage)?;

    // profit
    let chair_profit = model.scale(chairs, 30.0, Domain::NON_NEGATIVE_REAL)?;
    let table_profit = model.scale(tables, 50.0, Domain::NON_NEGATIVE_REAL)?;
    let profit = model.sum(chair_profit, table_profit, Domain::NON_NEGATIVE_REAL)?;
    model.maximize(profit)?;

    println!("=== Production Planning Problem ===\n");
    println!(
        "Compiled into {} columns and {} rows\n",
        model.columns(),
        model.rows()
    );

    match model.solve()? {
        SolutionStatus::Optimal => {
            println!("✓ Optimal plan found");
            println!("  Chairs: {:.0}", model.value(chairs)?);
            println!("  Tables: {:.0}", model.value(tables)?);
            println!("  Labour: {:.1} hours", model.value(hours)?);
            println!("  Profit: ${:.2}", model.value(profit)?);
            if let Some(solution) = model.solution() {
                println!("  Solve time: {:.2} ms", solution.statistics.solve_time_ms);
            }
        }
        status => println!("✗ No optimal plan: {}", status),
    }

    Ok(())
}
