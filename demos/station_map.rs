use agrometeo::{plot_map, AgrometeoDataset, AgrometeoError, Colormap, Crs, LegendPosition, Scale};
use std::fs;

fn main() -> Result<(), AgrometeoError> {
    env_logger::init();

    // [west, south, east, north] around Lake Geneva
    let dataset = AgrometeoDataset::builder()
        .region([5.9, 46.1, 7.1, 46.6])
        .crs(Crs::Lv03)
        .build()?;

    let gdf = dataset
        .get_ts_gdf()
        .variable("temperature")
        .start_date("2022-03-22")
        .end_date("2022-03-23")
        .scale(Scale::Day)
        .call()?;
    println!("{}", gdf.frame());

    let svg = plot_map(&gdf)
        .cmap(Colormap::RdYlBu)
        .legend_position(LegendPosition::Bottom)
        .title("Daily mean temperature, 22 March 2022")
        .add_basemap(false)
        .call()?;

    match fs::write("station_map.svg", svg) {
        Ok(()) => println!("Wrote station_map.svg"),
        Err(e) => eprintln!("Could not write station_map.svg: {e}"),
    }
    Ok(())
}
