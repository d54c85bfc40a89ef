use agrometeo::{AgrometeoDataset, AgrometeoError, Ecv, VariableId};

fn main() -> Result<(), AgrometeoError> {
    env_logger::init();

    let dataset = AgrometeoDataset::builder().build()?;

    for variable in dataset.variables()? {
        println!(
            "{:>4}  {:<40} {}",
            variable.code,
            variable.name,
            variable.unit.as_deref().unwrap_or("-")
        );
    }

    for ecv in Ecv::ALL {
        match dataset.resolve_variable(ecv) {
            Ok(code) => println!("{ecv} -> {code}"),
            Err(e) => println!("{ecv} -> {e}"),
        }
    }

    let code = dataset.resolve_variable(VariableId::from("Precipitation"))?;
    println!("Precipitation is sensor {code}");
    Ok(())
}
