//! ハートビート判定
//!
//! exposition本文 → サンプル → freshness判定 → サービス単位の集約、という
//! スクレイプサイクルの純粋な計算部分。I/Oとキャッシュは`engine`が担当する。

pub mod aggregator;
pub mod freshness;
pub mod parser;

pub use aggregator::{aggregate, ScrapeOutcome};
pub use freshness::FreshnessPolicy;
pub use parser::parse;
