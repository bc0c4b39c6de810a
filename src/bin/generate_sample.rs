use std::path::PathBuf;

use anyhow::{Context, Result};

use sheet_report::data::cache::{cache_path, save_table};
use sheet_report::data::model::{CellValue, Column, Table};

/// Minimal deterministic PRNG (64-bit LCG)
struct SimpleRng(u64);

impl SimpleRng {
    fn next_below(&mut self, n: u64) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) % n
    }
}

fn sales_table(rng: &mut SimpleRng) -> Result<Table> {
    let regions = ["US", "EU", "APAC"];
    let products = ["widget", "gadget", "gizmo"];
    let channels = ["online", "retail"];

    let mut region = Vec::new();
    let mut product = Vec::new();
    let mut channel = Vec::new();
    let mut units = Vec::new();
    let mut price = Vec::new();

    for _ in 0..60 {
        region.push(CellValue::from(regions[rng.next_below(3) as usize]));
        product.push(CellValue::from(products[rng.next_below(3) as usize]));
        channel.push(CellValue::from(channels[rng.next_below(2) as usize]));
        units.push(CellValue::Integer(1 + rng.next_below(50) as i64));
        price.push(CellValue::Float(5.0 + rng.next_below(400) as f64 / 20.0));
    }

    Ok(Table::new(vec![
        Column::new("region", region),
        Column::new("product", product),
        Column::new("channel", channel),
        Column::new("units", units),
        Column::new("price", price),
    ])?)
}

fn inventory_table(rng: &mut SimpleRng) -> Result<Table> {
    let warehouses = ["North", "South"];
    let products = ["widget", "gadget", "gizmo"];

    let mut warehouse = Vec::new();
    let mut product = Vec::new();
    let mut stock = Vec::new();
    let mut discontinued = Vec::new();

    for w in warehouses {
        for p in products {
            warehouse.push(CellValue::from(w));
            product.push(CellValue::from(p));
            // Leave one gap so missing values show up in reports.
            if w == "South" && p == "gizmo" {
                stock.push(CellValue::Null);
            } else {
                stock.push(CellValue::Integer(rng.next_below(500) as i64));
            }
            discontinued.push(CellValue::Bool(rng.next_below(5) == 0));
        }
    }

    Ok(Table::new(vec![
        Column::new("warehouse", warehouse),
        Column::new("product", product),
        Column::new("stock", stock),
        Column::new("discontinued", discontinued),
    ])?)
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("./data"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng(42);
    for (name, table) in [
        ("sales", sales_table(&mut rng)?),
        ("inventory", inventory_table(&mut rng)?),
    ] {
        let path = cache_path(&out_dir, name);
        save_table(&table, &path).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {} rows to {}", table.len(), path.display());
    }
    Ok(())
}
