//! Data layer: cleaned records, loading, filtering and option lists.
//!
//! Architecture:
//! ```text
//!  car_prices.zip
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  extract → parse CSV → drop id / NA rows → derive return, month
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Record>, sorted makes
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐     ┌──────────┐
//!   │  filter   │ ──▶ │ options   │  models per make, year bounds
//!   └──────────┘     └──────────┘
//! ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod options;
