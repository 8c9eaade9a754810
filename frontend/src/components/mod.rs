pub mod dashboard;
pub mod header;
pub mod home;
pub mod results;
pub mod scan;
pub mod sensors;
pub mod tabs;
pub mod trend_chart;
pub mod utils;
