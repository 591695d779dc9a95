use coolprop_state::{Converter, FluidState, HumidAirProp, HumidAirState, StateError, UnitSystem};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // ── Humid air: 20 °C, 1 atm, 50 % RH ────────────────────────────
    let mut air = HumidAirState::coolprop()?;
    air.set_pressure(101_325.0)?;
    air.set_celsius(20.0)?;
    air.set_relative_humidity(0.5)?;

    let hvac = Converter::new(UnitSystem::hvac());
    println!("=== Humid air ===");
    println!("T   = {:.2} °C", air.celsius()?);
    println!("P   = {:.0} Pa", air.pressure()?);
    println!("RH  = {:.1} %", air.get_in(HumidAirProp::RelativeHumidity, &hvac)?);
    println!("W   = {:.6} kg/kg", air.humidity_ratio()?);
    println!("Twb = {}", or_na(air.get_in(HumidAirProp::WetBulb, &hvac), "°C"));
    println!("Tdp = {}", or_na(air.get_in(HumidAirProp::DewPoint, &hvac), "°C"));
    println!("h   = {}", or_na(air.enthalpy(), "J/kg"));
    println!("rho = {}", or_na(air.density(), "kg/m³"));

    // ── Water: 100 °C, 1 atm ────────────────────────────────────────
    let mut water = FluidState::coolprop_fluid("Water")?;
    water.set_celsius(100.0)?;
    water.set_pressure(101_325.0)?;

    println!("\n=== Water ===");
    print!("{water}");

    let snap = water.constraints();
    println!("\n--- Constraint information ---");
    let names: Vec<_> = snap.properties.iter().map(|(c, _)| c.to_string()).collect();
    println!("Set properties: {}", names.join(", "));
    println!("Fluid:       {}", snap.fluid.as_deref().unwrap_or("-"));
    println!("Is complete: {}", snap.is_complete);
    println!("Status:      {}", snap.status.map_or("Not available".to_string(), |p| p.to_string()));
    println!("Edition:     {}", snap.edition.as_deref().unwrap_or("Not available"));

    // ── R134a: 25 °C, 10 bar ────────────────────────────────────────
    let mut r134a = FluidState::coolprop_fluid("R134a")?;
    r134a.set_celsius(25.0)?;
    r134a.set_pressure(1_000_000.0)?;

    println!("\n=== R134a ===");
    println!("T   = {:.2} °C", r134a.celsius()?);
    println!("P   = {:.2} bar", r134a.pressure()? / 1e5);
    println!("rho = {}", or_na(r134a.density(), "kg/m³"));
    match r134a.quality()? {
        Some(q) => println!("Q   = {q:.4}"),
        None => println!("Q   = not defined ({})", r134a.phase()?),
    }

    Ok(())
}

fn or_na(value: Result<f64, StateError>, unit: &str) -> String {
    match value {
        Ok(v) => format!("{v:.4} {unit}"),
        Err(e) => format!("not available ({e})"),
    }
}
