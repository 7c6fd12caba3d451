pub mod date_range;
pub mod forecast_table;
pub mod history_table;
pub mod lat_lon;
pub mod variables;
pub mod weekday;
