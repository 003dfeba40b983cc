pub mod summary_service;

pub use summary_service::{
    ClientTotals, MonthBalance, OccupancyStat, OverviewCell, OverviewRow, PropertySummary,
    SummaryService,
};
