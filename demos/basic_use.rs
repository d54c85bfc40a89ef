use agrometeo::{AgrometeoDataset, AgrometeoError, Measurement, Scale};
use chrono::NaiveDate;
use std::env;

fn main() -> Result<(), AgrometeoError> {
    // Set RUST_LOG=info to see requests as they are issued
    env_logger::init();
    configure_polars_display();

    let dataset = AgrometeoDataset::builder()
        .region("Pully, Switzerland")
        .build()?;

    println!("{} stations in region", dataset.stations()?.len());

    let ts_df = dataset
        .get_ts_df()
        .variable("temperature")
        .start_date(NaiveDate::from_ymd_opt(2022, 3, 22).unwrap())
        .end_date(NaiveDate::from_ymd_opt(2022, 3, 23).unwrap())
        .scale(Scale::Hour)
        .measurement(Measurement::Max)
        .call()?;
    println!("{ts_df}");

    let long_df = dataset
        .get_ts_long_df()
        .variable("temperature")
        .start_date("2022-03-22")
        .end_date("2022-03-23")
        .scale(Scale::Day)
        .value_name("temperature")
        .call()?;
    println!("{long_df}");

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
