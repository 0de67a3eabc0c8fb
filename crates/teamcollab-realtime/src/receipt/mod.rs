//! Read receipts.

pub mod aggregator;

pub use aggregator::ReadReceiptAggregator;
