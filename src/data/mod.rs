/// Data layer: table model, cache files, conversion, filtering, pivots.
///
/// Architecture:
/// ```text
///  workbook (.xlsx / .xls / .ods)
///        │
///        ▼
///   ┌──────────┐
///   │ convert  │  sheets 2..n → one Table each
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache   │  Table ⇄ <sheet>.parquet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  named columns of CellValue
///   └──────────┘
///        │
///        ├──────────────┬──────────────┐
///        ▼              ▼              ▼
///   ┌──────────┐  ┌──────────┐  ┌──────────┐
///   │  filter  │  │  pivot   │  │  chart   │
///   └──────────┘  └──────────┘  └──────────┘
///        │              │
///        ▼              ▼
///   ┌──────────────────────┐
///   │ report (text / CSV)  │
///   └──────────────────────┘
/// ```

pub mod cache;
pub mod chart;
pub mod convert;
pub mod filter;
pub mod model;
pub mod pivot;
pub mod report;
